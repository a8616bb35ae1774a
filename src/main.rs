mod documents;
mod filter;
mod league;
mod processor;
mod schedule;
mod store;
mod summary;
mod writer;

use crate::filter::FilterChain;
use crate::league::{DateLeague, League, MLB, NBA};
use crate::schedule::NflLeague;
use crate::store::JsonFileStore;
use crate::writer::WriterRegistry;
use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use log::info;
use sportsref_api::client::SportsRefApi;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(options) = RunOptions::from_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    let api = match std::env::var("SPORTSBRIEF_API") {
        Ok(base_url) => SportsRefApi::with_base_url(base_url),
        Err(_) => SportsRefApi::new(),
    };
    let (mut league, writers, filters) = build_league(&options.league, api)?;

    let store_path = options
        .store_path
        .or_else(|| std::env::var("SPORTSBRIEF_DB").ok())
        .unwrap_or_else(|| "sportsbrief.json".to_owned());
    let mut store = JsonFileStore::open(&store_path)
        .with_context(|| format!("opening store '{store_path}'"))?;

    info!(
        "Processing {} games from {} through {}...",
        league.name(),
        options.start,
        options.end
    );
    let units = league.units_between(options.start, options.end)?;
    let report =
        processor::process_games(league.as_mut(), &units, &writers, &filters, &mut store)?;
    info!(
        "Done: {} boxscores, {} games upserted, {} blurbs written.",
        report.boxscores, report.games_upserted, report.blurbs
    );
    Ok(())
}

fn build_league(
    name: &str,
    api: SportsRefApi,
) -> anyhow::Result<(Box<dyn League>, WriterRegistry, FilterChain)> {
    match name.to_ascii_lowercase().as_str() {
        "nfl" => Ok((
            Box::new(NflLeague::new(api)),
            writer::nfl_registry(),
            filter::nfl_filters(),
        )),
        "mlb" => Ok((
            Box::new(DateLeague::new(MLB, api)),
            writer::generic_registry(),
            filter::basic_filters(),
        )),
        "nba" => Ok((
            Box::new(DateLeague::new(NBA, api)),
            writer::generic_registry(),
            filter::basic_filters(),
        )),
        other => bail!("Unknown league '{other}'. Supported leagues: mlb, nba, nfl."),
    }
}

struct RunOptions {
    league: String,
    start: NaiveDate,
    end: NaiveDate,
    store_path: Option<String>,
}

impl RunOptions {
    /// Manual flag parsing; `None` means an informational flag already
    /// handled the invocation.
    fn from_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Self>> {
        let mut league = None;
        let mut date = None;
        let mut start = None;
        let mut end = None;
        let mut store_path = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => {
                    println!("{}", usage_text());
                    return Ok(None);
                }
                "-V" | "--version" => {
                    println!("sportsbrief {}", env!("CARGO_PKG_VERSION"));
                    return Ok(None);
                }
                "-l" | "--league" => league = Some(flag_value(&arg, &mut args)?),
                "-d" | "--date" => date = Some(parse_date(&arg, &flag_value(&arg, &mut args)?)?),
                "--start" => start = Some(parse_date(&arg, &flag_value(&arg, &mut args)?)?),
                "--end" => end = Some(parse_date(&arg, &flag_value(&arg, &mut args)?)?),
                "--store" => store_path = Some(flag_value(&arg, &mut args)?),
                _ => bail!("Unknown argument: {arg}\n\n{}", usage_text()),
            }
        }

        let Some(league) = league else {
            bail!("A league is required (-l mlb|nba|nfl).\n\n{}", usage_text());
        };
        if date.is_some() && (start.is_some() || end.is_some()) {
            bail!("--date cannot be combined with --start/--end.");
        }
        let (start, end) = match (date, start, end) {
            (Some(date), _, _) => (date, date),
            (None, Some(start), Some(end)) => (start, end),
            (None, Some(start), None) => (start, Utc::now().date_naive()),
            (None, None, Some(_)) => bail!("--end requires --start."),
            (None, None, None) => {
                let today = Utc::now().date_naive();
                (today, today)
            }
        };
        if start > end {
            bail!("Start date {start} is after end date {end}.");
        }
        Ok(Some(Self { league, start, end, store_path }))
    }
}

fn flag_value(flag: &str, args: &mut impl Iterator<Item = String>) -> anyhow::Result<String> {
    args.next().with_context(|| format!("{flag} requires a value"))
}

fn parse_date(flag: &str, value: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("{flag}: '{value}' is not a YYYY-MM-DD date"))
}

fn usage_text() -> &'static str {
    "sportsbrief - incremental game processing and player blurb generation

Usage:
  sportsbrief -l <league> [-d <date> | --start <date> [--end <date>]] [--store <path>]
  sportsbrief --help
  sportsbrief --version

Options:
  -l, --league <mlb|nba|nfl>   League to process (required)
  -d, --date <YYYY-MM-DD>      Single date to process (default: today)
      --start <YYYY-MM-DD>     First date of an inclusive range
      --end <YYYY-MM-DD>       Last date of the range (default: today)
      --store <path>           JSON document store path

Environment:
  SPORTSBRIEF_DB    Store path when --store is not given (default sportsbrief.json)
  SPORTSBRIEF_API   Override the stats provider base URL"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Option<RunOptions>> {
        RunOptions::from_args(args.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn a_single_date_becomes_a_one_day_range() {
        let options = parse(&["-l", "nfl", "-d", "2021-10-25"]).unwrap().unwrap();
        assert_eq!(options.league, "nfl");
        assert_eq!(options.start, NaiveDate::from_ymd_opt(2021, 10, 25).unwrap());
        assert_eq!(options.start, options.end);
    }

    #[test]
    fn an_explicit_range_is_kept_as_given() {
        let options = parse(&["--league", "mlb", "--start", "2021-07-01", "--end", "2021-07-03"])
            .unwrap()
            .unwrap();
        assert_eq!(options.start, NaiveDate::from_ymd_opt(2021, 7, 1).unwrap());
        assert_eq!(options.end, NaiveDate::from_ymd_opt(2021, 7, 3).unwrap());
    }

    #[test]
    fn a_reversed_range_is_rejected() {
        assert!(parse(&["-l", "nba", "--start", "2021-07-03", "--end", "2021-07-01"]).is_err());
    }

    #[test]
    fn date_and_range_flags_conflict() {
        assert!(parse(&["-l", "nfl", "-d", "2021-10-25", "--start", "2021-10-20"]).is_err());
    }

    #[test]
    fn the_league_flag_is_required() {
        assert!(parse(&["-d", "2021-10-25"]).is_err());
    }

    #[test]
    fn malformed_dates_are_rejected() {
        assert!(parse(&["-l", "nfl", "-d", "10/25/2021"]).is_err());
        assert!(parse(&["-l", "nfl", "-d"]).is_err());
    }

    #[test]
    fn informational_flags_short_circuit() {
        assert!(parse(&["--help"]).unwrap().is_none());
        assert!(parse(&["-V"]).unwrap().is_none());
    }

    #[test]
    fn unknown_leagues_fail_at_construction() {
        assert!(build_league("xfl", SportsRefApi::new()).is_err());
        assert!(build_league("NFL", SportsRefApi::new()).is_ok());
    }
}
