use crate::league::{self, League, LeagueConfig, cached_boxscores, render_season, season_year};
use chrono::{Datelike, Duration, NaiveDate};
use log::info;
use sportsref_api::client::{ApiError, ApiResult, SportsRefApi};
use sportsref_api::{Boxscore, Player, ScheduleUnit};
use std::collections::HashMap;
use std::fmt;

/// Any team's schedule spans the shared league week grid; the Patriots are
/// as good a reference as any.
const REFERENCE_TEAM: &str = "NWE";

/// The regular season gained a week in 2021. Historical schedule facts,
/// kept as data rather than re-derived.
const EXPANDED_SEASON_FROM: i32 = 2021;

pub fn regular_season_weeks(season: i32) -> u32 {
    if season >= EXPANDED_SEASON_FROM { 17 } else { 16 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Week {
    Preseason,
    Numbered(u32),
    Postseason,
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Week::Preseason => write!(f, "preseason"),
            Week::Numbered(n) => write!(f, "{n}"),
            Week::Postseason => write!(f, "postseason"),
        }
    }
}

/// Most recent Tuesday at or before the date. Weeks run Tuesday to Tuesday;
/// a game on the boundary belongs to the new week.
fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = (i64::from(date.weekday().num_days_from_monday()) + 6) % 7;
    date - Duration::days(offset)
}

/// Ordered week-start boundaries for one season, derived from a reference
/// team's game dates.
#[derive(Debug, Clone)]
pub struct SeasonSchedule {
    week_starts: Vec<NaiveDate>,
}

impl SeasonSchedule {
    pub fn from_game_dates(dates: &[NaiveDate]) -> Self {
        let mut week_starts: Vec<NaiveDate> = dates.iter().copied().map(week_start).collect();
        week_starts.sort_unstable();
        week_starts.dedup();
        Self { week_starts }
    }

    /// Week a date falls in. The tail of the season runs one week past the
    /// reference team's last boundary because of its bye week; dates in the
    /// seven days after the last boundary are the final numbered week, and
    /// anything later is the postseason.
    pub fn week_for(&self, date: NaiveDate) -> Week {
        let (Some(&first), Some(&last)) = (self.week_starts.first(), self.week_starts.last())
        else {
            return Week::Preseason;
        };
        if date < first {
            return Week::Preseason;
        }
        let at_or_before = self.week_starts.iter().filter(|&&start| start <= date).count() as u32;
        if at_or_before < self.week_starts.len() as u32 {
            Week::Numbered(at_or_before)
        } else if date < last + Duration::days(7) {
            Week::Numbered(at_or_before + 1)
        } else {
            Week::Postseason
        }
    }
}

/// Enumerate every (season, week) pair from `start` to `end` inclusive,
/// rolling week back to 1 and season forward by 1 at each season's length.
/// Preseason and postseason endpoints are normalized to the nearest numeric
/// week. Empty when the normalized start is past the normalized end.
pub fn expand_weeks(start: (i32, Week), end: (i32, Week)) -> Vec<(i32, u32)> {
    let (mut start_season, start_week) = start;
    let (mut end_season, end_week) = end;

    let start_week = match start_week {
        Week::Preseason => 1,
        Week::Numbered(n) => n,
        Week::Postseason => {
            start_season += 1;
            1
        }
    };
    let end_week = match end_week {
        Week::Preseason => {
            end_season -= 1;
            regular_season_weeks(end_season)
        }
        Week::Numbered(n) => n,
        Week::Postseason => regular_season_weeks(end_season),
    };

    let mut weeks = Vec::new();
    let (mut season, mut week) = (start_season, start_week);
    while season < end_season || (season == end_season && week <= end_week) {
        weeks.push((season, week));
        if week < regular_season_weeks(season) {
            week += 1;
        } else {
            season += 1;
            week = 1;
        }
    }
    weeks
}

/// Week-organized league. Season schedules are built once per season from
/// the reference team's games and cached for the process lifetime.
pub struct NflLeague {
    config: LeagueConfig,
    api: SportsRefApi,
    schedules: HashMap<i32, SeasonSchedule>,
    boxscores: HashMap<String, Vec<Boxscore>>,
}

impl NflLeague {
    pub fn new(api: SportsRefApi) -> Self {
        Self {
            config: league::NFL,
            api,
            schedules: HashMap::new(),
            boxscores: HashMap::new(),
        }
    }

    fn schedule(&mut self, season: i32) -> ApiResult<&SeasonSchedule> {
        if !self.schedules.contains_key(&season) {
            info!("building week schedule for season {season}");
            let kickoffs =
                self.api.fetch_team_schedule(self.config.slug, REFERENCE_TEAM, season)?;
            let game_dates: Vec<NaiveDate> = kickoffs.iter().map(|dt| dt.date_naive()).collect();
            self.schedules.insert(season, SeasonSchedule::from_game_dates(&game_dates));
        }
        self.schedules
            .get(&season)
            .ok_or_else(|| ApiError::Other(format!("no schedule cached for season {season}")))
    }

    pub fn week_for(&mut self, date: NaiveDate) -> ApiResult<(i32, Week)> {
        let season = season_year(self.config.season_start, date);
        let schedule = self.schedule(season)?;
        Ok((season, schedule.week_for(date)))
    }

    pub fn weeks_between(&mut self, start: NaiveDate, end: NaiveDate) -> ApiResult<Vec<(i32, u32)>> {
        let start_week = self.week_for(start)?;
        let end_week = self.week_for(end)?;
        Ok(expand_weeks(start_week, end_week))
    }
}

impl League for NflLeague {
    fn name(&self) -> &str {
        self.config.name
    }

    fn season_for(&self, date: NaiveDate) -> String {
        render_season(season_year(self.config.season_start, date), self.config.multiyear)
    }

    fn units_between(&mut self, start: NaiveDate, end: NaiveDate) -> ApiResult<Vec<ScheduleUnit>> {
        let weeks = self.weeks_between(start, end)?;
        Ok(weeks
            .into_iter()
            .map(|(season, week)| ScheduleUnit::Week { season, week })
            .collect())
    }

    fn boxscores(&mut self, unit: &ScheduleUnit) -> ApiResult<Vec<Boxscore>> {
        cached_boxscores(&mut self.boxscores, &self.api, self.config.slug, unit)
    }

    fn player(&self, player_id: &str, date: NaiveDate) -> ApiResult<Player> {
        self.api.fetch_player(self.config.slug, player_id, &self.season_for(date))
    }
}
