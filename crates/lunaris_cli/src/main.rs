//! Command-line probe for the Lunaris core.
//!
//! # Responsibility
//! - Print the moon report for a day.
//! - Render a month as a 7-column text grid, optionally with notes from a
//!   journal database.
//! - Keep output deterministic when `--date` / `--today` are given.

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use lunaris_core::db::open_db;
use lunaris_core::{
    annotate_month, core_version, daily_message, full_moon_countdown_label, moon_report,
    parse_calendar_day, parse_calendar_month, DayAnnotation, JournalService, MonthGrid, MonthView,
    SpecialDate, SqliteNoteRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

const WEEKDAY_HEADERS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Lunaris moon-phase journal
#[derive(Parser, Debug)]
#[command(name = "lunaris")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print phase, illumination and the next full moon
    Moon {
        /// Day to report (YYYY-MM-DD), defaults to today
        #[arg(short, long, value_parser = parse_calendar_day)]
        date: Option<NaiveDate>,
    },

    /// Print a month grid with phase glyphs and note markers
    Calendar {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long, value_parser = parse_calendar_month)]
        month: Option<NaiveDate>,

        /// Day treated as today (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_calendar_day)]
        today: Option<NaiveDate>,

        /// Journal database to read notes from
        #[arg(long)]
        db: Option<PathBuf>,

        /// Note owner inside the journal database
        #[arg(long, default_value = "local")]
        owner: String,

        /// Special date as YYYY-MM-DD:type:message (repeatable)
        #[arg(long = "special", value_parser = parse_special_date)]
        specials: Vec<SpecialDate>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = match cli.command {
        None => {
            println!("lunaris_core ping={}", lunaris_core::ping());
            println!("lunaris_core version={}", core_version());
            Ok(())
        }
        Some(Commands::Moon { date }) => {
            print_moon(date.unwrap_or_else(local_today));
            Ok(())
        }
        Some(Commands::Calendar {
            month,
            today,
            db,
            owner,
            specials,
        }) => {
            let today = today.unwrap_or_else(local_today);
            let view = MonthView::new(month.unwrap_or(today), today);
            load_grid(&view, db, &owner, &specials).map(|grid| print_grid(&grid, &specials))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_moon(day: NaiveDate) {
    let report = moon_report(day);
    println!("{} {}", report.phase.symbol(), report.phase);
    println!("day: {}", report.day);
    println!("illumination: {:.0}%", report.illumination * 100.0);
    println!("next full moon: {}", report.next_full_moon);
    println!("{}", full_moon_countdown_label(report.days_until_full_moon));
    if let Some(message) = daily_message(day, &[]) {
        println!("{}", message.text);
    }
}

fn load_grid(
    view: &MonthView,
    db: Option<PathBuf>,
    owner: &str,
    specials: &[SpecialDate],
) -> Result<MonthGrid, String> {
    let Some(path) = db else {
        return Ok(annotate_month(view, &[], specials));
    };
    let conn = open_db(&path).map_err(|err| format!("open {}: {err}", path.display()))?;
    let repo = SqliteNoteRepository::try_new(&conn).map_err(|err| err.to_string())?;
    JournalService::new(repo)
        .month_view(owner, view, specials)
        .map_err(|err| err.to_string())
}

fn print_grid(grid: &MonthGrid, specials: &[SpecialDate]) {
    let view = grid.view();
    println!("{}", view.month_start().format("%B %Y"));
    let header: String = WEEKDAY_HEADERS.iter().map(|d| format!("{d:<5}")).collect();
    println!("{}", header.trim_end());
    for row in grid.rows() {
        let line: String = row.iter().map(format_cell).collect();
        println!("{}", line.trim_end());
    }
    println!();
    println!("* note  ! special date  [ ] today");

    let full_moons = grid.full_moons();
    if !full_moons.is_empty() {
        let days: Vec<_> = full_moons.iter().map(|day| day.to_string()).collect();
        println!("full moon: {}", days.join(", "));
    }
    if grid.is_quiet() {
        println!("No notes or events this month... yet.");
    }
    if let Some(message) = daily_message(view.today(), specials) {
        println!("{}", message.text);
    }
}

fn format_cell(day: &DayAnnotation) -> String {
    if !day.in_current_month {
        return " .   ".to_string();
    }
    let marker = match (day.has_note, day.is_special_date) {
        (true, _) => '*',
        (false, true) => '!',
        (false, false) => ' ',
    };
    let number = day.date.day();
    if day.is_today {
        format!("[{number:>2}]{marker}")
    } else {
        format!("{number:>3}{}{marker}", day.phase.symbol())
    }
}

fn parse_special_date(value: &str) -> Result<SpecialDate, String> {
    let mut parts = value.splitn(3, ':');
    let (Some(date), Some(kind), Some(message)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected YYYY-MM-DD:type:message, got `{value}`"));
    };
    SpecialDate::parse(date, kind, message).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{format_cell, parse_special_date, Cli};
    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};
    use lunaris_core::{annotate_month, MonthView};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn calendar_flags_parse_into_days() {
        let cli = Cli::try_parse_from([
            "lunaris",
            "calendar",
            "--month",
            "2025-04",
            "--today",
            "2025-04-15",
            "--special",
            "2025-04-15:birthday:Happy birthday",
        ])
        .unwrap();
        let Some(super::Commands::Calendar {
            month,
            today,
            specials,
            ..
        }) = cli.command
        else {
            panic!("expected calendar command");
        };
        assert_eq!(month, NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(today, NaiveDate::from_ymd_opt(2025, 4, 15));
        assert_eq!(specials[0].message, "Happy birthday");
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(Cli::try_parse_from(["lunaris", "moon", "--date", "15/04/2025"]).is_err());
        assert!(parse_special_date("2025-04-15").is_err());
    }

    #[test]
    fn special_message_may_contain_colons() {
        let special = parse_special_date("2025-04-15:trip:Lisbon: day 1").unwrap();
        assert_eq!(special.kind, "trip");
        assert_eq!(special.message, "Lisbon: day 1");
    }

    #[test]
    fn cells_mark_notes_today_and_adjacent_days() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        let grid = annotate_month(&MonthView::new(today, today), &[], &[]);
        assert_eq!(format_cell(&grid.days()[0]), " .   ");
        assert_eq!(format_cell(grid.day(today).unwrap()), "[15] ");
    }
}
