//! `datepicker` CLI: print month grids, generate recurring dates, and convert
//! exported selections from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Print the current month
//! datepicker month
//!
//! # June 2024, Monday-first, German names
//! datepicker month --year 2024 --month 6 --locale de
//!
//! # Apply picker options (min/max, disabled dates) and emit cell JSON
//! datepicker month --year 2024 --month 6 --options picker.json --format json
//!
//! # Every other day, five times
//! datepicker recur --pattern daily --start 2024-06-01 --interval 2 --count 5
//!
//! # Every July 4th until 2030, as an iCalendar file
//! datepicker recur --pattern yearly --start 2024-01-01 --month-day 07-04 \
//!     --end 2030-12-31 --format ics
//!
//! # Convert an exported selection between formats (stdin -> stdout)
//! datepicker convert --from csv --to ics < selection.csv
//!
//! # Render a value for display
//! datepicker format -i value.json --pattern "%A %d %B" --locale fr
//! ```

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use clap::{Parser, Subcommand, ValueEnum};
use datepicker_engine::export;
use datepicker_engine::format::format_value;
use datepicker_engine::grid::{weekday_order, weeks};
use datepicker_engine::locale::resolve_locale;
use datepicker_engine::{
    Datepicker, DatepickerOptions, DatepickerValue, DayCell, RecurrenceKind, RecurringPattern,
};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "datepicker",
    version,
    about = "Calendar grids, recurring dates and selection conversion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit logs as JSON lines on stderr (level via RUST_LOG, default "warn")
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one month as a text grid or as cell JSON
    Month {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
        /// Month to show, 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
        /// Locale for names and the default first day of week
        #[arg(long)]
        locale: Option<String>,
        /// First column, e.g. "sun" or "mon" (overrides the locale)
        #[arg(long)]
        first_day: Option<String>,
        /// Picker options JSON file (camelCase, as accepted by the engine)
        #[arg(long)]
        options: Option<String>,
        #[arg(long, value_enum, default_value_t = GridFormat::Text)]
        format: GridFormat,
        /// Output file (writes to stdout if omitted or "-")
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Generate the dates of a recurring pattern
    Recur {
        #[arg(long, value_enum)]
        pattern: PatternArg,
        /// First day of the series (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Last day of the series (inclusive)
        #[arg(long)]
        end: Option<String>,
        /// Stop after this many dates (takes precedence over --end)
        #[arg(long)]
        count: Option<u32>,
        #[arg(long, default_value_t = 1)]
        interval: u32,
        /// Weekly: weekday to repeat on (defaults to the start's weekday)
        #[arg(long)]
        day_of_week: Option<String>,
        /// Monthly: day of month, clamped to short months
        #[arg(long)]
        day_of_month: Option<u32>,
        /// Yearly: month and day as MM-DD
        #[arg(long)]
        month_day: Option<String>,
        #[arg(long, value_enum, default_value_t = RecurFormat::Lines)]
        format: RecurFormat,
        /// Output file (writes to stdout if omitted or "-")
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Convert an exported selection between json, csv and ics
    Convert {
        #[arg(long, value_enum)]
        from: ExchangeFormat,
        #[arg(long, value_enum)]
        to: ExchangeFormat,
        /// Input file (reads from stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted or "-")
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render a JSON value as display text
    Format {
        /// Value JSON file (reads from stdin if omitted or "-")
        #[arg(short, long)]
        input: Option<String>,
        /// strftime pattern; %B %b %A %a use locale names
        #[arg(long, default_value = "%Y-%m-%d")]
        pattern: String,
        #[arg(long, default_value = "en-US")]
        locale: String,
        /// IANA timezone to render in (the value is read as UTC)
        #[arg(long)]
        timezone: Option<String>,
        /// Output file (writes to stdout if omitted or "-")
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GridFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum PatternArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Weekdays,
    Weekends,
}

impl From<PatternArg> for RecurrenceKind {
    fn from(p: PatternArg) -> Self {
        match p {
            PatternArg::Daily => RecurrenceKind::Daily,
            PatternArg::Weekly => RecurrenceKind::Weekly,
            PatternArg::Monthly => RecurrenceKind::Monthly,
            PatternArg::Yearly => RecurrenceKind::Yearly,
            PatternArg::Weekdays => RecurrenceKind::Weekdays,
            PatternArg::Weekends => RecurrenceKind::Weekends,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RecurFormat {
    /// One YYYY-MM-DD per line
    Lines,
    Json,
    Csv,
    Ics,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExchangeFormat {
    Json,
    Csv,
    Ics,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::Month {
            year,
            month,
            locale,
            first_day,
            options,
            format,
            output,
        } => {
            let mut opts = match options.as_deref() {
                Some(path) => DatepickerOptions::from_json(&read_input(Some(path))?)
                    .with_context(|| format!("Invalid picker options in {}", path))?,
                None => DatepickerOptions::default(),
            };
            if let Some(locale) = locale {
                opts.locale = locale;
            }
            if let Some(first_day) = first_day.as_deref() {
                opts.first_day_of_week = Some(parse_weekday(first_day)?);
            }

            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());
            if !(1..=12).contains(&month) {
                anyhow::bail!("Month must be 1-12, got {}", month);
            }

            let mut picker = Datepicker::new(opts).context("Failed to create picker")?;
            picker.go_to(year, month);
            debug!(year, month, "rendering month");

            let out = match format {
                GridFormat::Text => render_month(&picker),
                GridFormat::Json => serde_json::to_string_pretty(&picker.cells())? + "\n",
            };
            write_output(output.as_deref(), &out)?;
        }
        Commands::Recur {
            pattern,
            start,
            end,
            count,
            interval,
            day_of_week,
            day_of_month,
            month_day,
            format,
            output,
        } => {
            let mut rule =
                RecurringPattern::new(pattern.into(), parse_date(&start)?).interval(interval);
            if let Some(count) = count {
                rule = rule.occurrences(count);
            }
            if let Some(end) = end.as_deref() {
                rule = rule.until(parse_date(end)?);
            }
            if let Some(weekday) = day_of_week.as_deref() {
                rule = rule.on_weekday(parse_weekday(weekday)?);
            }
            if let Some(day) = day_of_month {
                rule = rule.on_day_of_month(day);
            }
            if let Some(month_day) = month_day.as_deref() {
                let (month, day) = parse_month_day(month_day)?;
                rule = rule.on_month_day(month, day);
            }

            let dates = datepicker_engine::recurring::expand(&rule)
                .context("Failed to expand recurring pattern")?;
            debug!(generated = dates.len(), "expanded pattern");

            let out = match format {
                RecurFormat::Lines => dates
                    .iter()
                    .map(|d| d.date().format("%Y-%m-%d").to_string() + "\n")
                    .collect(),
                RecurFormat::Json => serde_json::to_string_pretty(&dates)? + "\n",
                RecurFormat::Csv => export::to_csv(&DatepickerValue::multiple(dates)),
                RecurFormat::Ics => export::to_ics(&DatepickerValue::multiple(dates)),
            };
            write_output(output.as_deref(), &out)?;
        }
        Commands::Convert {
            from,
            to,
            input,
            output,
        } => {
            let text = read_input(input.as_deref())?;
            let value = match from {
                ExchangeFormat::Json => export::from_json(&text),
                ExchangeFormat::Csv => export::from_csv(&text),
                ExchangeFormat::Ics => export::from_ics(&text),
            }
            .context("Failed to read selection")?;

            let converted = match to {
                ExchangeFormat::Json => export::to_json(&value)? + "\n",
                ExchangeFormat::Csv => export::to_csv(&value),
                ExchangeFormat::Ics => export::to_ics(&value),
            };
            write_output(output.as_deref(), &converted)?;
        }
        Commands::Format {
            input,
            pattern,
            locale,
            timezone,
            output,
        } => {
            let text = read_input(input.as_deref())?;
            let value: DatepickerValue =
                export::from_json(&text).context("Failed to parse value JSON")?;
            let tz = DatepickerOptions {
                timezone,
                ..DatepickerOptions::default()
            }
            .timezone()?;
            let rendered = format_value(&value, &pattern, &resolve_locale(&locale), tz);
            write_output(output.as_deref(), &(rendered + "\n"))?;
        }
    }

    Ok(())
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

/// Text grid: a centred title, a weekday header, then one row per week.
/// Days that cannot be selected are shown as `--`.
fn render_month(picker: &Datepicker) -> String {
    let nav = picker.navigation();
    let locale = picker.locale();
    let title = format!("{} {}", locale.month_name(nav.view_month), nav.view_year);

    let header: Vec<String> = weekday_order(picker.first_day_of_week())
        .iter()
        .map(|d| {
            let short: String = locale.weekday_name_short(*d).chars().take(2).collect();
            format!("{:>3}", short)
        })
        .collect();
    let width = header.len() * 3;

    let mut out = format!("{:^width$}\n", title, width = width);
    out.push_str(&header.concat());
    out.push('\n');

    let cells = picker.cells();
    for week in weeks(&cells) {
        let row: String = week.iter().map(render_cell).collect();
        out.push_str(row.trim_end());
        out.push('\n');
    }
    out
}

fn render_cell(cell: &Option<DayCell>) -> String {
    match cell {
        None => "   ".to_string(),
        Some(c) if !c.selectable => " --".to_string(),
        Some(c) => format!("{:>3}", c.date.day()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    datepicker_engine::date::parse(s)
        .map(|d| d.date())
        .with_context(|| format!("Invalid date: '{}'", s))
}

fn parse_weekday(s: &str) -> Result<Weekday> {
    s.parse::<Weekday>()
        .map_err(|_| anyhow::anyhow!("Invalid weekday: '{}'. Use e.g. sun, mon, tue", s))
}

/// `MM-DD`, checked against a leap year so `02-29` is accepted.
fn parse_month_day(s: &str) -> Result<(u32, u32)> {
    let parsed = s
        .split_once('-')
        .and_then(|(m, d)| Some((m.parse::<u32>().ok()?, d.parse::<u32>().ok()?)))
        .filter(|&(m, d)| NaiveDate::from_ymd_opt(2024, m, d).is_some());
    parsed.ok_or_else(|| anyhow::anyhow!("Invalid month-day: '{}'. Use MM-DD, e.g. 07-04", s))
}

/// Read `path`, or stdin when it is absent or `-`.
fn read_input(path: Option<&str>) -> Result<String> {
    let Some(path) = path.filter(|p| *p != "-") else {
        let mut buf = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        debug!(bytes = buf.len(), "read stdin");
        return Ok(buf);
    };
    let text = fs::read_to_string(path).with_context(|| format!("Cannot read {}", path))?;
    debug!(path, bytes = text.len(), "read input file");
    Ok(text)
}

/// Write `content` to `path`, creating missing parent directories, or to
/// stdout when the path is absent or `-`.
fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    let Some(path) = path.filter(|p| *p != "-") else {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|()| stdout.flush())
            .context("Failed to write to stdout")?;
        return Ok(());
    };
    let path = Path::new(path);
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory {}", dir.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Cannot write {}", path.display()))?;
    debug!(path = %path.display(), bytes = content.len(), "wrote output file");
    Ok(())
}
