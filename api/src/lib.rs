pub mod client;
pub mod wire;

use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the provider wire format
// ---------------------------------------------------------------------------

/// Addressing granularity for fetching boxscores: a calendar date for
/// date-organized leagues, a (week, season) pair for week-organized ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleUnit {
    Date(NaiveDate),
    Week { season: i32, week: u32 },
}

impl fmt::Display for ScheduleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleUnit::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            ScheduleUnit::Week { season, week } => write!(f, "{week}-{season}"),
        }
    }
}

/// One game's result plus per-player stat lines for both sides.
#[derive(Debug, Clone, Default)]
pub struct Boxscore {
    pub id: String,
    pub date: DateTime<Utc>,
    pub home: TeamLine,
    pub away: TeamLine,
    pub home_players: Vec<PlayerBoxscore>,
    pub away_players: Vec<PlayerBoxscore>,
}

impl Boxscore {
    /// A game without a final score on both sides is still in progress.
    pub fn is_complete(&self) -> bool {
        self.home.points.is_some() && self.away.points.is_some()
    }

    /// Winning side of a completed game. Ties are framed from the home side.
    pub fn winner(&self) -> Option<&TeamLine> {
        let (home, away) = (self.home.points?, self.away.points?);
        Some(if home >= away { &self.home } else { &self.away })
    }

    pub fn loser(&self) -> Option<&TeamLine> {
        let (home, away) = (self.home.points?, self.away.points?);
        Some(if home >= away { &self.away } else { &self.home })
    }

    /// All stat lines, home side first.
    pub fn players(&self) -> impl Iterator<Item = &PlayerBoxscore> {
        self.home_players.iter().chain(self.away_players.iter())
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamLine {
    pub name: String,         // "New England Patriots"
    pub abbreviation: String, // "NWE"
    pub points: Option<u16>,  // None until the game is final
}

/// One player's stat line for one game. Which fields carry values depends on
/// the position; a field the provider did not report is `None` and consumers
/// treat it as "not applicable" rather than an error.
#[derive(Debug, Clone, Default)]
pub struct PlayerBoxscore {
    pub player_id: String,
    pub name: String,
    pub completed_passes: Option<u16>,
    pub attempted_passes: Option<u16>,
    pub passing_yards: Option<i32>,
    pub passing_touchdowns: Option<u16>,
    pub interceptions: Option<u16>,
    pub fumbles_lost: Option<u16>,
    pub rush_attempts: Option<u16>,
    pub rush_yards: Option<i32>,
    pub rush_touchdowns: Option<u16>,
    pub targets: Option<u16>,
    pub receptions: Option<u16>,
    pub receiving_yards: Option<i32>,
    pub receiving_touchdowns: Option<u16>,
    pub field_goals_attempted: Option<u16>,
    pub field_goals_made: Option<u16>,
    pub extra_points_attempted: Option<u16>,
    pub extra_points_made: Option<u16>,
}

/// Roster identity for one player in one season.
#[derive(Debug, Clone, Default)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Option<String>, // "QB", "RB", ... None when the roster has no listing
    pub team: Option<String>,     // team abbreviation
}
