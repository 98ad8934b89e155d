/*!
# Daybook - A One-Entry-Per-Day Journal

Daybook is a command-line journal that keeps exactly one entry per calendar
day, classified with moods, tags and categories, and derives streaks and
analytics from the entry history.

This file contains the main application flow, coordinating the various
components to implement the journal functionality.

## Usage

```text
daybook add --content "Slow morning, good coffee" --mood Happy --tag Reflection
daybook show --date 2024-03-14
daybook list --search coffee --page 1
daybook month 2024 3
daybook stats --json
daybook streak
```

## Configuration

The application can be configured with the following environment variable:
- `DAYBOOK_DB`: Path to the database file (defaults to
  `~/.local/share/daybook/journal.db`)
*/

use chrono::{Local, NaiveDate};
use clap::Parser;
use daybook::analytics::{self, ReportWindow};
use daybook::cli::{parse_date, CliArgs, Command};
use daybook::config::Config;
use daybook::db::catalog::{self, Mood, Tag};
use daybook::db::entries::{self, JournalEntry};
use daybook::db::query::{self, EntryFilter};
use daybook::db::Database;
use daybook::errors::{AppError, AppResult};
use daybook::streak;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> AppResult<()> {
    let args = CliArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting daybook");
    debug!("CLI arguments: {:?}", args);

    let config = Config::load()?;
    config.validate()?;
    config.ensure_db_directory()?;
    debug!("Database path: {:?}", config.db_path);

    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    // Obtain the reference date once; everything downstream is pure in it
    let today = Local::now().date_naive();

    match args.command {
        Command::Add {
            date,
            title,
            content,
            category,
            tags,
            moods,
        } => run_add(&db, today, date, title, content, category, tags, moods),
        Command::Show { date } => run_show(&db, today, date),
        Command::List {
            search,
            moods,
            category,
            from,
            to,
            tags,
            page,
            page_size,
        } => run_list(&db, search, moods, category, from, to, tags, page, page_size),
        Command::Month { year, month } => run_month(&db, year, month),
        Command::Delete { id } => run_delete(&db, id),
        Command::Tags => run_tags(&db),
        Command::Stats { from, to, json } => run_stats(&db, today, from, to, json),
        Command::Streak => run_streak(&db, today),
    }
}

fn parse_opt_date(date: Option<String>) -> AppResult<Option<NaiveDate>> {
    date.map(|s| {
        parse_date(&s).map_err(|e| AppError::Journal(format!("Invalid date '{}': {}", s, e)))
    })
    .transpose()
}

fn parse_date_arg(date: Option<String>, today: NaiveDate) -> AppResult<NaiveDate> {
    Ok(parse_opt_date(date)?.unwrap_or(today))
}

fn resolve_moods(db: &Database, names: &[String]) -> AppResult<Vec<Mood>> {
    let conn = db.get_conn()?;
    let library = catalog::list_moods(&conn)?;
    names
        .iter()
        .map(|name| {
            library
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(name))
                .cloned()
                .ok_or_else(|| AppError::Journal(format!("Unknown mood: {}", name)))
        })
        .collect()
}

fn resolve_tags(db: &Database, names: &[String]) -> AppResult<Vec<Tag>> {
    let conn = db.get_conn()?;
    names
        .iter()
        .map(|name| catalog::create_tag(&conn, name))
        .collect()
}

fn resolve_category(db: &Database, name: &str) -> AppResult<i64> {
    let conn = db.get_conn()?;
    catalog::list_categories(&conn)?
        .into_iter()
        .find(|c| c.name.eq_ignore_ascii_case(name))
        .map(|c| c.id)
        .ok_or_else(|| AppError::Journal(format!("Unknown category: {}", name)))
}

#[allow(clippy::too_many_arguments)]
fn run_add(
    db: &Database,
    today: NaiveDate,
    date: Option<String>,
    title: Option<String>,
    content: String,
    category: Option<String>,
    tags: Vec<String>,
    moods: Vec<String>,
) -> AppResult<()> {
    let date = parse_date_arg(date, today)?;
    let moods = resolve_moods(db, &moods)?;
    let tags = resolve_tags(db, &tags)?;
    let category_id = category.as_deref().map(|n| resolve_category(db, n)).transpose()?;

    let mut conn = db.get_conn()?;

    // Editing an existing day updates it in place; a new day is an insert
    let mut entry = entries::get_entry_by_date(&conn, date)?.unwrap_or_else(|| JournalEntry::new(date));
    if title.is_some() {
        entry.title = title;
    }
    entry.content = content;
    entry.category_id = category_id.or(entry.category_id);
    entry.tags = tags;
    entry.primary_mood = None;
    entry.secondary_moods.clear();
    let mut moods = moods.into_iter();
    if let Some(primary) = moods.next() {
        entry.set_primary_mood(primary);
        for mood in moods {
            entry.toggle_secondary_mood(mood);
        }
    }

    let id = entries::save_entry(&mut conn, &mut entry)?;
    println!("Saved entry {} for {}", id, date);
    Ok(())
}

fn print_entry_line(entry: &JournalEntry) {
    let id = entry.id.unwrap_or_default();
    let title = entry.title.as_deref().unwrap_or("(untitled)");
    let mood = entry
        .primary_mood
        .as_ref()
        .map(|m| format!(" {} {}", m.icon, m.name))
        .unwrap_or_default();
    let tags = if entry.tags.is_empty() {
        String::new()
    } else {
        let names: Vec<_> = entry.tags.iter().map(|t| t.name.as_str()).collect();
        format!(" [{}]", names.join(", "))
    };
    println!("{}  #{}  {}{}{}", entry.date, id, title, mood, tags);
}

fn run_show(db: &Database, today: NaiveDate, date: Option<String>) -> AppResult<()> {
    let date = parse_date_arg(date, today)?;
    let conn = db.get_conn()?;

    match entries::get_entry_by_date(&conn, date)? {
        Some(entry) => {
            print_entry_line(&entry);
            if let Some(category) = &entry.category {
                println!("Category: {}", category.name);
            }
            for mood in &entry.secondary_moods {
                println!("Also feeling: {} {}", mood.icon, mood.name);
            }
            println!("\n{}", entry.content);
        }
        None => println!("No entry for {}", date),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_list(
    db: &Database,
    search: Option<String>,
    moods: Vec<String>,
    category: Option<String>,
    from: Option<String>,
    to: Option<String>,
    tags: Vec<String>,
    page: u32,
    page_size: u32,
) -> AppResult<()> {
    let mood_ids = resolve_moods(db, &moods)?.into_iter().map(|m| m.id).collect();
    let category_id = category.as_deref().map(|n| resolve_category(db, n)).transpose()?;

    let conn = db.get_conn()?;
    let known_tags = catalog::list_tags(&conn)?;
    let tag_ids = tags
        .iter()
        .map(|name| {
            known_tags
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(name))
                .map(|t| t.id)
                .ok_or_else(|| AppError::Journal(format!("Unknown tag: {}", name)))
        })
        .collect::<AppResult<Vec<i64>>>()?;

    let filter = EntryFilter {
        search_term: search,
        mood_ids,
        category_id,
        start_date: parse_opt_date(from)?,
        end_date: parse_opt_date(to)?,
        tag_ids,
    };

    let total = query::count_entries(&conn, &filter)?;
    let entries = query::list_entries(&conn, &filter, page, page_size)?;
    for entry in &entries {
        print_entry_line(entry);
    }
    println!("\n{} of {} matching entries (page {})", entries.len(), total, page);
    Ok(())
}

fn run_month(db: &Database, year: i32, month: u32) -> AppResult<()> {
    let conn = db.get_conn()?;
    let entries = entries::list_by_month(&conn, year, month)?;
    for entry in &entries {
        print_entry_line(entry);
    }
    println!("\n{} entries in {}-{:02}", entries.len(), year, month);
    Ok(())
}

fn run_delete(db: &Database, id: i64) -> AppResult<()> {
    let conn = db.get_conn()?;
    entries::delete_entry(&conn, id)?;
    println!("Deleted entry {}", id);
    Ok(())
}

fn run_tags(db: &Database) -> AppResult<()> {
    let conn = db.get_conn()?;
    for tag in catalog::list_tags(&conn)? {
        println!("{}", tag.name);
    }
    Ok(())
}

fn run_stats(
    db: &Database,
    today: NaiveDate,
    from: Option<String>,
    to: Option<String>,
    json: bool,
) -> AppResult<()> {
    let end = parse_date_arg(to, today)?;
    let (window, start_date) = match parse_opt_date(from)? {
        Some(start) => (ReportWindow::bounded(start, end)?, Some(start)),
        None => (ReportWindow::last_90_days(end), None),
    };

    let conn = db.get_conn()?;
    let filter = EntryFilter {
        start_date,
        end_date: Some(end),
        ..EntryFilter::default()
    };
    let entries = query::list_entries(&conn, &filter, 1, u32::MAX)?;
    let report = analytics::summarize(&entries, window);

    if json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(|e| {
            AppError::Journal(format!("Cannot serialize report: {}", e))
        })?);
        return Ok(());
    }

    println!("Entries:        {}", report.total_entries);
    println!("Words:          {}", report.total_words);
    println!("Avg words/day:  {}", report.avg_words_per_entry);
    if let Some(mood) = &report.most_frequent_mood {
        println!("Top mood:       {} {}", mood.icon, mood.name);
    }
    if !report.mood_distribution.is_empty() {
        println!("\nMoods:");
        for mood in &report.mood_distribution {
            println!("  {} {} x{}", mood.icon, mood.name, mood.count);
        }
    }
    if !report.top_tags.is_empty() {
        println!("\nTop tags:");
        for tag in &report.top_tags {
            println!("  {} x{} ({}%)", tag.name, tag.count, tag.percentage);
        }
    }
    if !report.category_distribution.is_empty() {
        println!("\nCategories:");
        for category in &report.category_distribution {
            println!("  {} x{} ({}%)", category.name, category.count, category.percentage);
        }
    }
    if !report.word_count_trend.is_empty() {
        println!("\nWord trend:");
        for point in &report.word_count_trend {
            println!("  {}  {}", point.date, point.words);
        }
    }
    println!("\nMissed days in window: {}", report.missed_days.len());
    Ok(())
}

fn run_streak(db: &Database, today: NaiveDate) -> AppResult<()> {
    let conn = db.get_conn()?;
    let dates = entries::entry_dates(&conn)?;
    println!("Current streak: {} days", streak::current_streak(&dates, today));
    println!("Longest streak: {} days", streak::longest_streak(&dates));
    Ok(())
}
