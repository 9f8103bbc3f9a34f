mod app;
mod help;
mod jumpto;
mod theme;
mod widget;
use crate::app::App;
use anyhow::Context;
use hilal::calendar::{load_events, CalendarEngine, Constraint, SelectionMode, SelectionState};
use hilal::locale::{parse_iso_date, Locale};
use hilal::zakat::{calculate, parse_amount, MetalPrices, NisabStandard, ZakatAssets};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::ffi::OsString;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use time::{Date, OffsetDateTime, Weekday};
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct CalendarArgs {
    date: Option<Date>,
    range: bool,
    hijri: bool,
    holidays: bool,
    monday: bool,
    locale: Locale,
    events: Option<PathBuf>,
    min_date: Option<Date>,
    max_date: Option<Date>,
    disabled: Vec<Date>,
    log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct ZakatArgs {
    assets: ZakatAssets,
    prices: MetalPrices,
    standard: NisabStandard,
    locale: Locale,
    json: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum Command {
    Run(CalendarArgs),
    Zakat(ZakatArgs),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = CalendarArgs::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("range") => args.range = true,
                Arg::Long("hijri") => args.hijri = true,
                Arg::Long("holidays") => args.holidays = true,
                Arg::Long("monday") => args.monday = true,
                Arg::Long("arabic") => args.locale = Locale::Ar,
                Arg::Long("events") => args.events = Some(parser.value()?.into()),
                Arg::Long("min") => args.min_date = Some(parse_date(parser.value()?)?),
                Arg::Long("max") => args.max_date = Some(parse_date(parser.value()?)?),
                Arg::Long("disable") => args.disabled.push(parse_date(parser.value()?)?),
                Arg::Long("log-file") => args.log_file = Some(parser.value()?.into()),
                Arg::Value(value) if value == "zakat" && args == CalendarArgs::default() => {
                    return ZakatArgs::from_parser(parser).map(Command::Zakat);
                }
                Arg::Value(value) if args.date.is_none() => args.date = Some(parse_date(value)?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(args) => args.run(),
            Command::Zakat(args) => args.run(),
            Command::Help => {
                println!("Usage: hilal [<options>] [YYYY-MM-DD]");
                println!("       hilal zakat [<zakat options>]");
                println!();
                println!("Bilingual calendar and date picker with an optional Hijri overlay");
                println!();
                println!("Options:");
                println!("  --range           Select a range of dates instead of a single date");
                println!("  --hijri           Show Hijri dates under each day");
                println!("  --holidays        Mark Islamic holidays (implies --hijri)");
                println!("  --monday          Start weeks on Monday");
                println!("  --arabic          Display the calendar in Arabic");
                println!("  --events FILE     Load events from a JSON file");
                println!("  --min DATE        Disallow selecting dates before DATE");
                println!("  --max DATE        Disallow selecting dates after DATE");
                println!("  --disable DATE    Disallow selecting DATE (may be repeated)");
                println!("  --log-file FILE   Write logs to FILE");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                println!();
                println!("Zakat options:");
                println!("  --cash N          Cash and bank balances in SAR");
                println!("  --gold G          Gold held, in grams");
                println!("  --silver G        Silver held, in grams");
                println!("  --business N      Business assets in SAR");
                println!("  --investments N   Investments in SAR");
                println!("  --other N         Other zakatable assets in SAR");
                println!("  --gold-price P    Gold price in SAR per gram [default: 250]");
                println!("  --silver-price P  Silver price in SAR per gram [default: 3]");
                println!("  --silver-standard Measure the Nisab in silver rather than gold");
                println!("  --arabic          Write the summary in Arabic");
                println!("  --json            Output the calculation as JSON");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl CalendarArgs {
    fn run(self) -> anyhow::Result<()> {
        if let Some(path) = &self.log_file {
            let file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            init_tracing(BoxMakeWriter::new(Mutex::new(file)), "hilal=debug", false)?;
        }
        let today = local_today()?;
        let events = match &self.events {
            Some(path) => load_events(path)?,
            None => Vec::new(),
        };
        let mut constraint = Constraint::new().disabled_dates(self.disabled);
        if let Some(min) = self.min_date {
            constraint = constraint.min_date(min);
        }
        if let Some(max) = self.max_date {
            constraint = constraint.max_date(max);
        }
        let mode = if self.range {
            SelectionMode::Range
        } else {
            SelectionMode::Single
        };
        let mut engine = CalendarEngine::new(mode, today)
            .week_start(if self.monday {
                Weekday::Monday
            } else {
                Weekday::Sunday
            })
            .show_hijri(self.hijri || self.holidays)
            .show_islamic_holidays(self.holidays)
            .events(events)
            .constraint(constraint)
            .locale(self.locale)
            .on_select(|state| tracing::info!(?state, "selection committed"));
        if let Some(date) = self.date {
            engine.jump_to(date);
        }
        tracing::debug!(?engine, "starting calendar");
        let selection = with_terminal(|terminal| Ok(App::new(engine, today).run(terminal)?))?;
        if let Some(text) = iso_selection(&selection) {
            println!("{text}");
        }
        Ok(())
    }
}

impl ZakatArgs {
    fn from_parser(mut parser: Parser) -> Result<ZakatArgs, lexopt::Error> {
        let mut args = ZakatArgs::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Long("cash") => args.assets.cash = parse_amount(&parser.value()?.string()?),
                Arg::Long("gold") => {
                    args.assets.gold_grams = parse_amount(&parser.value()?.string()?);
                }
                Arg::Long("silver") => {
                    args.assets.silver_grams = parse_amount(&parser.value()?.string()?);
                }
                Arg::Long("business") => {
                    args.assets.business = parse_amount(&parser.value()?.string()?);
                }
                Arg::Long("investments") => {
                    args.assets.investments = parse_amount(&parser.value()?.string()?);
                }
                Arg::Long("other") => args.assets.other = parse_amount(&parser.value()?.string()?),
                Arg::Long("gold-price") => args.prices.gold = parser.value()?.parse()?,
                Arg::Long("silver-price") => args.prices.silver = parser.value()?.parse()?,
                Arg::Long("silver-standard") => args.standard = NisabStandard::Silver,
                Arg::Long("arabic") => args.locale = Locale::Ar,
                Arg::Long("json") => args.json = true,
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(args)
    }

    fn run(self) -> anyhow::Result<()> {
        init_tracing(BoxMakeWriter::new(std::io::stderr), "warn", true)?;
        let today = local_today()?;
        let calc = calculate(self.assets, self.prices, self.standard);
        if self.json {
            let report = serde_json::to_string_pretty(&calc.report(self.prices, today))
                .context("failed to serialize zakat report")?;
            println!("{report}");
        } else {
            println!("{}", calc.summary(self.prices, self.locale, today));
        }
        Ok(())
    }
}

fn parse_date(value: OsString) -> Result<Date, lexopt::Error> {
    let value = value.string()?;
    parse_iso_date(&value).map_err(|e| lexopt::Error::ParsingFailed {
        value,
        error: Box::new(e),
    })
}

/// The committed selection as `YYYY-MM-DD`, or two such dates for a range
fn iso_selection(state: &SelectionState) -> Option<String> {
    match state {
        SelectionState::Single { selected } => selected.map(|d| d.to_string()),
        SelectionState::Range(range) => match (range.from(), range.to()) {
            (Some(from), Some(to)) => Some(format!("{from} {to}")),
            _ => None,
        },
    }
}

fn local_today() -> anyhow::Result<Date> {
    Ok(OffsetDateTime::now_local()
        .context("failed to determine local date")?
        .date())
}

fn init_tracing(writer: BoxMakeWriter, default_filter: &str, ansi: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to initialize logging")
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
