use chrono::{Datelike, Days, NaiveDate};
use log::debug;
use sportsref_api::client::{ApiResult, SportsRefApi};
use sportsref_api::{Boxscore, Player, ScheduleUnit};
use std::collections::HashMap;

/// Schedule-addressing rules for one sport.
#[derive(Debug, Clone, Copy)]
pub struct LeagueConfig {
    pub name: &'static str,
    /// Provider path segment, e.g. "nfl".
    pub slug: &'static str,
    /// (month, day) cutoff: dates before it belong to the previous season.
    pub season_start: (u32, u32),
    /// Seasons span a calendar-year boundary and render as "2021-22".
    pub multiyear: bool,
}

pub const MLB: LeagueConfig =
    LeagueConfig { name: "MLB", slug: "mlb", season_start: (3, 15), multiyear: false };
pub const NBA: LeagueConfig =
    LeagueConfig { name: "NBA", slug: "nba", season_start: (9, 15), multiyear: true };
pub const NFL: LeagueConfig =
    LeagueConfig { name: "NFL", slug: "nfl", season_start: (8, 1), multiyear: false };

/// Calendar year a date's season belongs to, per the league cutoff.
pub(crate) fn season_year(season_start: (u32, u32), date: NaiveDate) -> i32 {
    let before_cutoff = (date.month(), date.day()) < season_start;
    if before_cutoff { date.year() - 1 } else { date.year() }
}

pub(crate) fn render_season(year: i32, multiyear: bool) -> String {
    if multiyear {
        format!("{year}-{:02}", (year + 1).rem_euclid(100))
    } else {
        year.to_string()
    }
}

/// Small polymorphic interface over a sport's schedule addressing and its
/// upstream data. Implementations own per-process memoization and are not
/// safe for concurrent use; callers serialize invocations.
pub trait League {
    fn name(&self) -> &str;

    /// Stable, deterministic season identifier for a date.
    fn season_for(&self, date: NaiveDate) -> String;

    /// Expand an inclusive date range into provider schedule units.
    fn units_between(&mut self, start: NaiveDate, end: NaiveDate) -> ApiResult<Vec<ScheduleUnit>>;

    /// Boxscores for one unit, memoized per unit string for this process so
    /// repeated lookups within a run do not re-fetch.
    fn boxscores(&mut self, unit: &ScheduleUnit) -> ApiResult<Vec<Boxscore>>;

    /// Roster lookup for the season the date falls in.
    fn player(&self, player_id: &str, date: NaiveDate) -> ApiResult<Player>;
}

/// League addressed by calendar date (MLB, NBA): one schedule unit per day.
pub struct DateLeague {
    config: LeagueConfig,
    api: SportsRefApi,
    boxscores: HashMap<String, Vec<Boxscore>>,
}

impl DateLeague {
    pub fn new(config: LeagueConfig, api: SportsRefApi) -> Self {
        Self { config, api, boxscores: HashMap::new() }
    }
}

impl League for DateLeague {
    fn name(&self) -> &str {
        self.config.name
    }

    fn season_for(&self, date: NaiveDate) -> String {
        render_season(season_year(self.config.season_start, date), self.config.multiyear)
    }

    fn units_between(&mut self, start: NaiveDate, end: NaiveDate) -> ApiResult<Vec<ScheduleUnit>> {
        let mut units = Vec::new();
        let mut date = start;
        while date <= end {
            units.push(ScheduleUnit::Date(date));
            match date.checked_add_days(Days::new(1)) {
                Some(next) => date = next,
                None => break,
            }
        }
        Ok(units)
    }

    fn boxscores(&mut self, unit: &ScheduleUnit) -> ApiResult<Vec<Boxscore>> {
        cached_boxscores(&mut self.boxscores, &self.api, self.config.slug, unit)
    }

    fn player(&self, player_id: &str, date: NaiveDate) -> ApiResult<Player> {
        self.api.fetch_player(self.config.slug, player_id, &self.season_for(date))
    }
}

/// Shared memoized fetch, keyed by the unit's display string.
pub(crate) fn cached_boxscores(
    cache: &mut HashMap<String, Vec<Boxscore>>,
    api: &SportsRefApi,
    slug: &str,
    unit: &ScheduleUnit,
) -> ApiResult<Vec<Boxscore>> {
    let key = unit.to_string();
    if !cache.contains_key(&key) {
        debug!("fetching boxscores for '{key}'");
        let fetched = api.fetch_boxscores(slug, unit)?;
        cache.insert(key.clone(), fetched);
    }
    Ok(cache.get(&key).cloned().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dates_before_the_cutoff_belong_to_the_prior_season() {
        let cutoff = (6, 1);
        assert_eq!(season_year(cutoff, date(2020, 5, 31)), 2019);
        assert_eq!(season_year(cutoff, date(2020, 6, 1)), 2020);
        assert_eq!(season_year(cutoff, date(2020, 12, 31)), 2020);
        assert_eq!(season_year(cutoff, date(2021, 1, 1)), 2020);
    }

    #[test]
    fn multiyear_seasons_render_with_a_two_digit_suffix() {
        assert_eq!(render_season(2020, true), "2020-21");
        assert_eq!(render_season(2021, true), "2021-22");
        assert_eq!(render_season(1999, true), "1999-00");
        assert_eq!(render_season(2021, false), "2021");
    }

    #[test]
    fn nba_season_spans_the_year_boundary() {
        let league = DateLeague::new(NBA, SportsRefApi::new());
        assert_eq!(league.season_for(date(2021, 10, 25)), "2021-22");
        assert_eq!(league.season_for(date(2022, 2, 1)), "2021-22");
        assert_eq!(league.season_for(date(2021, 9, 1)), "2020-21");
    }

    #[test]
    fn units_between_is_one_per_day_inclusive() {
        let mut league = DateLeague::new(MLB, SportsRefApi::new());
        let units = league.units_between(date(2021, 7, 1), date(2021, 7, 3)).unwrap();
        assert_eq!(
            units,
            vec![
                ScheduleUnit::Date(date(2021, 7, 1)),
                ScheduleUnit::Date(date(2021, 7, 2)),
                ScheduleUnit::Date(date(2021, 7, 3)),
            ]
        );
        assert!(league.units_between(date(2021, 7, 3), date(2021, 7, 1)).unwrap().is_empty());
    }
}
