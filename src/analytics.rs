//! Analytics over an already-fetched collection of journal entries.
//!
//! Everything here is derived purely from the entry slice handed in; the
//! aggregator runs no queries of its own. Callers typically fetch the
//! window's entries through the query engine and pass them straight in.
//!
//! An empty entry set is an expected steady state ("no entries yet"), not
//! an error: [`summarize`] then returns an all-zero [`JournalReport`].

use crate::constants::{REPORT_WINDOW_DAYS, TOP_TAGS_LIMIT, WORD_TREND_POINTS};
use crate::db::entries::JournalEntry;
use crate::errors::QueryError;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// The reporting window for the missed-day scan.
///
/// The scan walks backwards from `end`, covering at most
/// [`REPORT_WINDOW_DAYS`] days even when a wider range is requested.
#[derive(Debug, Clone, Copy)]
pub struct ReportWindow {
    /// Optional start of the window; without it the scan covers the full
    /// default span.
    pub start: Option<NaiveDate>,
    /// Last day of the window, usually "today".
    pub end: NaiveDate,
}

impl ReportWindow {
    /// The default window: the 90 days ending at `today`.
    pub fn last_90_days(today: NaiveDate) -> Self {
        ReportWindow {
            start: None,
            end: today,
        }
    }

    /// A caller-specified window.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidRange`] when `end` is before `start`.
    pub fn bounded(start: NaiveDate, end: NaiveDate) -> Result<Self, QueryError> {
        if end < start {
            return Err(QueryError::InvalidRange { start, end });
        }
        Ok(ReportWindow {
            start: Some(start),
            end,
        })
    }

    /// Number of days the missed-day scan covers, capped at the default span.
    fn scan_days(&self) -> i64 {
        match self.start {
            Some(start) => ((self.end - start).num_days() + 1).min(REPORT_WINDOW_DAYS),
            None => REPORT_WINDOW_DAYS,
        }
    }
}

/// One mood's occurrence count across the report's entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodCount {
    pub name: String,
    pub icon: String,
    pub count: usize,
}

/// The most frequent mood, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodBadge {
    pub name: String,
    pub icon: String,
}

/// One segment of the mood proportion chart.
///
/// Segments tile the 0-100% range in the same deterministic order as
/// [`JournalReport::mood_distribution`], so the chart layout is
/// reproducible run to run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSegment {
    pub label: String,
    pub start_percent: f64,
    pub end_percent: f64,
}

/// One tag's ranking entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
    /// Share of entries carrying the tag, as a truncated whole percentage.
    pub percentage: u32,
}

/// One category's ranking entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
    pub percentage: u32,
}

/// One point on the word-count trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub words: usize,
}

/// Derived analytics over a set of journal entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JournalReport {
    pub total_entries: usize,
    pub total_words: usize,
    /// Integer-truncated average; 0 when there are no entries.
    pub avg_words_per_entry: usize,
    /// Mood occurrence counts (all of each entry's moods, not just the
    /// primary), ordered by count descending with ties broken by first
    /// occurrence in input order.
    pub mood_distribution: Vec<MoodCount>,
    pub most_frequent_mood: Option<MoodBadge>,
    pub mood_chart: Vec<ChartSegment>,
    /// Tags ranked by occurrence count descending, top 10.
    pub top_tags: Vec<TagCount>,
    /// Categories ranked by count descending; uncategorized entries are
    /// excluded.
    pub category_distribution: Vec<CategoryCount>,
    /// Word counts of the 7 most recent entries, ascending by date.
    pub word_count_trend: Vec<TrendPoint>,
    /// Days in the reporting window with no entry, most recent first.
    pub missed_days: Vec<NaiveDate>,
}

/// Counts occurrences keyed by name, preserving first-encounter order for
/// ties after the stable sort by descending count.
fn ranked_counts<'a, I: Iterator<Item = &'a str>>(names: I) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in names {
        if !counts.contains_key(name) {
            order.push(name.to_string());
        }
        *counts.entry(name.to_string()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|name| {
            let count = counts[&name];
            (name, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Builds the full analytics report for the given entries and window.
///
/// The entry slice is taken as fetched (the query engine returns pages
/// newest-first); all orderings in the report are re-derived here, so the
/// input order only matters for tie-breaking.
pub fn summarize(entries: &[JournalEntry], window: ReportWindow) -> JournalReport {
    if entries.is_empty() {
        return JournalReport::default();
    }

    let total_entries = entries.len();
    let total_words: usize = entries.iter().map(JournalEntry::word_count).sum();
    let avg_words_per_entry = total_words / total_entries;

    // Mood distribution: count every mood occurrence, remember each mood's
    // icon from its first appearance.
    let mut icons: HashMap<String, String> = HashMap::new();
    for mood in entries.iter().flat_map(|e| e.moods()) {
        icons
            .entry(mood.name.clone())
            .or_insert_with(|| mood.icon.clone());
    }
    let mood_distribution: Vec<MoodCount> = ranked_counts(
        entries
            .iter()
            .flat_map(|e| e.moods())
            .map(|m| m.name.as_str()),
    )
    .into_iter()
    .map(|(name, count)| MoodCount {
        icon: icons.get(&name).cloned().unwrap_or_default(),
        name,
        count,
    })
    .collect();

    let most_frequent_mood = mood_distribution.first().map(|m| MoodBadge {
        name: m.name.clone(),
        icon: m.icon.clone(),
    });

    let total_moods: usize = mood_distribution.iter().map(|m| m.count).sum();
    let mut mood_chart = Vec::with_capacity(mood_distribution.len());
    let mut cursor = 0.0;
    for mood in &mood_distribution {
        let share = mood.count as f64 / total_moods as f64 * 100.0;
        mood_chart.push(ChartSegment {
            label: mood.name.clone(),
            start_percent: cursor,
            end_percent: cursor + share,
        });
        cursor += share;
    }

    let top_tags: Vec<TagCount> = ranked_counts(
        entries
            .iter()
            .flat_map(|e| e.tags.iter())
            .map(|t| t.name.as_str()),
    )
    .into_iter()
    .take(TOP_TAGS_LIMIT)
    .map(|(name, count)| TagCount {
        name,
        count,
        percentage: (count as f64 / total_entries as f64 * 100.0) as u32,
    })
    .collect();

    let category_distribution: Vec<CategoryCount> = ranked_counts(
        entries
            .iter()
            .filter_map(|e| e.category.as_ref())
            .map(|c| c.name.as_str()),
    )
    .into_iter()
    .map(|(name, count)| CategoryCount {
        name,
        count,
        percentage: (count as f64 / total_entries as f64 * 100.0) as u32,
    })
    .collect();

    let mut recent: Vec<&JournalEntry> = entries.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(WORD_TREND_POINTS);
    recent.reverse();
    let word_count_trend: Vec<TrendPoint> = recent
        .into_iter()
        .map(|e| TrendPoint {
            date: e.date,
            words: e.word_count(),
        })
        .collect();

    let entry_dates: HashSet<NaiveDate> = entries.iter().map(|e| e.date).collect();
    let missed_days: Vec<NaiveDate> = (0..window.scan_days())
        .map(|i| window.end - Duration::days(i))
        .filter(|day| !entry_dates.contains(day))
        .collect();

    JournalReport {
        total_entries,
        total_words,
        avg_words_per_entry,
        mood_distribution,
        most_frequent_mood,
        mood_chart,
        top_tags,
        category_distribution,
        word_count_trend,
        missed_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog::{Category, Mood, MoodKind, Tag};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn mood(id: i64, name: &str, icon: &str) -> Mood {
        Mood {
            id,
            name: name.to_string(),
            icon: icon.to_string(),
            is_default: false,
            kind: MoodKind::Neutral,
        }
    }

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
        }
    }

    fn entry(date: NaiveDate, content: &str) -> JournalEntry {
        let mut e = JournalEntry::new(date);
        e.content = content.to_string();
        e
    }

    #[test]
    fn test_empty_entries_yield_default_report() {
        let report = summarize(&[], ReportWindow::last_90_days(d(15)));
        assert_eq!(report.total_entries, 0);
        assert_eq!(report.total_words, 0);
        assert_eq!(report.avg_words_per_entry, 0);
        assert!(report.mood_distribution.is_empty());
        assert!(report.most_frequent_mood.is_none());
        assert!(report.mood_chart.is_empty());
        assert!(report.missed_days.is_empty());
    }

    #[test]
    fn test_word_totals_and_truncated_average() {
        let entries = vec![
            entry(d(1), "one two three"),
            entry(d(2), "four five"),
            entry(d(3), ""),
        ];
        let report = summarize(&entries, ReportWindow::last_90_days(d(3)));
        assert_eq!(report.total_words, 5);
        // 5 / 3 truncates to 1
        assert_eq!(report.avg_words_per_entry, 1);
    }

    #[test]
    fn test_mood_distribution_counts_all_moods() {
        let mut a = entry(d(1), "x");
        a.set_primary_mood(mood(1, "Happy", "😊"));
        a.toggle_secondary_mood(mood(2, "Calm", "🧘"));
        let mut b = entry(d(2), "x");
        b.set_primary_mood(mood(2, "Calm", "🧘"));
        let mut c = entry(d(3), "x");
        c.set_primary_mood(mood(2, "Calm", "🧘"));

        let report = summarize(&[a, b, c], ReportWindow::last_90_days(d(3)));
        assert_eq!(report.mood_distribution.len(), 2);
        assert_eq!(report.mood_distribution[0].name, "Calm");
        assert_eq!(report.mood_distribution[0].count, 3);
        assert_eq!(report.mood_distribution[1].count, 1);

        let top = report.most_frequent_mood.unwrap();
        assert_eq!(top.name, "Calm");
        assert_eq!(top.icon, "🧘");
    }

    #[test]
    fn test_mood_ties_break_by_first_occurrence() {
        let mut a = entry(d(1), "x");
        a.set_primary_mood(mood(1, "Happy", "😊"));
        let mut b = entry(d(2), "x");
        b.set_primary_mood(mood(2, "Sad", "😔"));

        // Same counts: the mood seen first in input order wins
        let report = summarize(&[a.clone(), b.clone()], ReportWindow::last_90_days(d(2)));
        assert_eq!(report.most_frequent_mood.unwrap().name, "Happy");

        let report = summarize(&[b, a], ReportWindow::last_90_days(d(2)));
        assert_eq!(report.most_frequent_mood.unwrap().name, "Sad");
    }

    #[test]
    fn test_mood_chart_tiles_to_one_hundred_percent() {
        let mut a = entry(d(1), "x");
        a.set_primary_mood(mood(1, "Happy", "😊"));
        a.toggle_secondary_mood(mood(2, "Calm", "🧘"));
        let mut b = entry(d(2), "x");
        b.set_primary_mood(mood(3, "Sad", "😔"));

        let report = summarize(&[a, b], ReportWindow::last_90_days(d(2)));
        let chart = &report.mood_chart;
        assert_eq!(chart.len(), 3);

        // Segments tile contiguously from 0 to 100
        assert_eq!(chart[0].start_percent, 0.0);
        for pair in chart.windows(2) {
            assert!((pair[0].end_percent - pair[1].start_percent).abs() < 1e-9);
        }
        assert!((chart.last().unwrap().end_percent - 100.0).abs() < 1e-9);

        let covered: f64 = chart
            .iter()
            .map(|s| s.end_percent - s.start_percent)
            .sum();
        assert!((covered - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_chart_order_matches_distribution_order() {
        let mut a = entry(d(1), "x");
        a.set_primary_mood(mood(1, "Happy", "😊"));
        let mut b = entry(d(2), "x");
        b.set_primary_mood(mood(2, "Calm", "🧘"));
        b.toggle_secondary_mood(mood(1, "Happy", "😊"));

        let report = summarize(&[a, b], ReportWindow::last_90_days(d(2)));
        let dist_labels: Vec<_> = report.mood_distribution.iter().map(|m| &m.name).collect();
        let chart_labels: Vec<_> = report.mood_chart.iter().map(|s| &s.label).collect();
        assert_eq!(dist_labels, chart_labels);
    }

    #[test]
    fn test_top_tags_ranking_and_limit() {
        let mut entries = Vec::new();
        // "busy" appears on 12 entries, tag-N on one each
        for day in 1..=12 {
            let mut e = entry(d(day), "x");
            let mut tags = vec![tag(0, "busy")];
            tags.push(tag(day as i64, &format!("tag-{}", day)));
            e.tags = tags;
            entries.push(e);
        }

        let report = summarize(&entries, ReportWindow::last_90_days(d(12)));
        assert_eq!(report.top_tags.len(), TOP_TAGS_LIMIT);
        assert_eq!(report.top_tags[0].name, "busy");
        assert_eq!(report.top_tags[0].count, 12);
        assert_eq!(report.top_tags[0].percentage, 100);
        // 1/12 truncates to 8
        assert_eq!(report.top_tags[1].percentage, 8);
    }

    #[test]
    fn test_category_distribution_excludes_uncategorized() {
        let mut a = entry(d(1), "x");
        a.category = Some(Category {
            id: 1,
            name: "Work".to_string(),
            color_hex: "#33FF57".to_string(),
        });
        let b = entry(d(2), "x");

        let report = summarize(&[a, b], ReportWindow::last_90_days(d(2)));
        assert_eq!(report.category_distribution.len(), 1);
        assert_eq!(report.category_distribution[0].name, "Work");
        assert_eq!(report.category_distribution[0].count, 1);
        assert_eq!(report.category_distribution[0].percentage, 50);
    }

    #[test]
    fn test_word_count_trend_recent_seven_ascending() {
        let entries: Vec<JournalEntry> = (1..=10)
            .map(|day| entry(d(day), &"w ".repeat(day as usize)))
            .collect();

        let report = summarize(&entries, ReportWindow::last_90_days(d(10)));
        assert_eq!(report.word_count_trend.len(), WORD_TREND_POINTS);
        let days: Vec<u32> = report
            .word_count_trend
            .iter()
            .map(|p| chrono::Datelike::day(&p.date))
            .collect();
        assert_eq!(days, vec![4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(report.word_count_trend[0].words, 4);
    }

    #[test]
    fn test_missed_days_in_default_window() {
        // Entries on exactly today and yesterday: 88 of 90 days missed
        let today = d(20);
        let entries = vec![entry(today, "x"), entry(d(19), "x")];

        let report = summarize(&entries, ReportWindow::last_90_days(today));
        assert_eq!(report.missed_days.len(), 88);
        assert!(!report.missed_days.contains(&today));
        assert!(!report.missed_days.contains(&d(19)));
        // Most recent missed day first
        assert_eq!(report.missed_days[0], d(18));
        let mut sorted = report.missed_days.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(report.missed_days, sorted);
    }

    #[test]
    fn test_missed_days_bounded_window() {
        let window = ReportWindow::bounded(d(1), d(10)).unwrap();
        let entries = vec![entry(d(5), "x")];

        let report = summarize(&entries, window);
        assert_eq!(report.missed_days.len(), 9);
        assert_eq!(report.missed_days[0], d(10));
        assert!(!report.missed_days.contains(&d(5)));
    }

    #[test]
    fn test_missed_days_window_capped_at_ninety() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let window = ReportWindow::bounded(start, end).unwrap();
        let entries = vec![entry(end, "x")];

        let report = summarize(&entries, window);
        // 90-day scan minus the single entry day
        assert_eq!(report.missed_days.len(), 89);
    }

    #[test]
    fn test_bounded_window_rejects_reversed_range() {
        assert!(matches!(
            ReportWindow::bounded(d(10), d(1)),
            Err(QueryError::InvalidRange { .. })
        ));
    }
}
