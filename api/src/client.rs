use crate::wire::{BoxscoreResponse, GamesResponse, PlayerResponse, ScheduleResponse, WirePlayerLine, WireTeamSide};
use crate::{Boxscore, Player, PlayerBoxscore, ScheduleUnit, TeamLine};
use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const DEFAULT_BASE_URL: &str = "https://api.sports-reference.com/v1";

/// Stats gateway client. All calls are blocking; the pipeline that drives
/// this client is strictly sequential.
#[derive(Debug, Clone)]
pub struct SportsRefApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SportsRefApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("sportsbrief/0.1 (box score blurb pipeline)")
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl SportsRefApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at a different gateway, e.g. a mock server in tests
    /// or the SPORTSBRIEF_API override.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// List the boxscore ids for one schedule unit.
    pub fn fetch_game_index(&self, league: &str, unit: &ScheduleUnit) -> ApiResult<Vec<String>> {
        let url = match unit {
            ScheduleUnit::Date(date) => {
                format!("{}/{league}/boxscores?date={}", self.base_url, date.format("%Y-%m-%d"))
            }
            ScheduleUnit::Week { season, week } => {
                format!("{}/{league}/boxscores?week={week}&year={season}", self.base_url)
            }
        };
        let raw: GamesResponse = self.get(&url)?;
        let ids = raw
            .games
            .unwrap_or_default()
            .into_iter()
            .filter_map(|g| g.boxscore)
            .collect();
        Ok(ids)
    }

    /// Fetch one game's full boxscore.
    pub fn fetch_boxscore(&self, league: &str, id: &str) -> ApiResult<Boxscore> {
        let url = format!("{}/{league}/boxscores/{id}", self.base_url);
        let raw: BoxscoreResponse = self.get(&url)?;
        map_boxscore(id, raw)
    }

    /// Fetch every boxscore in a schedule unit.
    pub fn fetch_boxscores(&self, league: &str, unit: &ScheduleUnit) -> ApiResult<Vec<Boxscore>> {
        let ids = self.fetch_game_index(league, unit)?;
        ids.iter().map(|id| self.fetch_boxscore(league, id)).collect()
    }

    /// Fetch one player's roster entry for a season.
    pub fn fetch_player(&self, league: &str, player_id: &str, season: &str) -> ApiResult<Player> {
        let url = format!("{}/{league}/players/{player_id}?season={season}", self.base_url);
        let raw: PlayerResponse = self.get(&url)?;
        if raw.id.is_none() && raw.name.is_none() {
            return Err(ApiError::NotFound(format!(
                "no roster entry for player '{player_id}' in season {season}"
            )));
        }
        Ok(Player {
            id: raw.id.unwrap_or_else(|| player_id.to_owned()),
            name: raw.name.unwrap_or_default(),
            position: raw.position,
            team: raw.team,
        })
    }

    /// Fetch one team's full-season game datetimes, in schedule order.
    pub fn fetch_team_schedule(
        &self,
        league: &str,
        team: &str,
        season: i32,
    ) -> ApiResult<Vec<DateTime<Utc>>> {
        let url = format!("{}/{league}/teams/{team}/schedule?season={season}", self.base_url);
        let raw: ScheduleResponse = self.get(&url)?;
        let dates: Vec<DateTime<Utc>> = raw
            .games
            .unwrap_or_default()
            .iter()
            .filter_map(|g| g.datetime.as_deref())
            .filter_map(parse_datetime)
            .collect();
        if dates.is_empty() {
            return Err(ApiError::NotFound(format!(
                "no schedule for {team} in {league} season {season}"
            )));
        }
        Ok(dates)
    }

    fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res.json::<T>().map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_boxscore(requested_id: &str, raw: BoxscoreResponse) -> ApiResult<Boxscore> {
    let id = raw.id.unwrap_or_else(|| requested_id.to_owned());
    let date = raw
        .date
        .as_deref()
        .and_then(parse_datetime)
        .ok_or_else(|| ApiError::Other(format!("boxscore '{id}': missing or invalid date")))?;

    let home = raw.home.unwrap_or_default();
    let away = raw.away.unwrap_or_default();
    Ok(Boxscore {
        id,
        date,
        home_players: map_players(&home),
        away_players: map_players(&away),
        home: map_team_line(home),
        away: map_team_line(away),
    })
}

fn map_team_line(side: WireTeamSide) -> TeamLine {
    TeamLine {
        name: side.name.unwrap_or_default(),
        abbreviation: side.abbreviation.unwrap_or_default(),
        points: side.points.as_deref().and_then(|p| p.parse().ok()),
    }
}

fn map_players(side: &WireTeamSide) -> Vec<PlayerBoxscore> {
    side.players.iter().flatten().map(map_player_line).collect()
}

fn map_player_line(line: &WirePlayerLine) -> PlayerBoxscore {
    let empty = HashMap::new();
    let stats = line.stats.as_ref().unwrap_or(&empty);
    // Unparseable or absent entries become None; blurb composition treats
    // them as "stat not applicable".
    let count = |key: &str| stats.get(key).and_then(|v| v.parse::<u16>().ok());
    let yards = |key: &str| stats.get(key).and_then(|v| v.parse::<i32>().ok());

    PlayerBoxscore {
        player_id: line.player_id.clone().unwrap_or_default(),
        name: line.name.clone().unwrap_or_default(),
        completed_passes: count("completed_passes"),
        attempted_passes: count("attempted_passes"),
        passing_yards: yards("passing_yards"),
        passing_touchdowns: count("passing_touchdowns"),
        interceptions: count("interceptions"),
        fumbles_lost: count("fumbles_lost"),
        rush_attempts: count("rush_attempts"),
        rush_yards: yards("rush_yards"),
        rush_touchdowns: count("rush_touchdowns"),
        targets: count("targets"),
        receptions: count("receptions"),
        receiving_yards: yards("receiving_yards"),
        receiving_touchdowns: count("receiving_touchdowns"),
        field_goals_attempted: count("field_goals_attempted"),
        field_goals_made: count("field_goals_made"),
        extra_points_attempted: count("extra_points_attempted"),
        extra_points_made: count("extra_points_made"),
    }
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            // Some endpoints send bare dates.
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    #[test]
    fn parse_datetime_accepts_rfc3339_and_bare_dates() {
        let kickoff = parse_datetime("2021-10-25T00:20:00Z").unwrap();
        assert_eq!(kickoff.date_naive(), NaiveDate::from_ymd_opt(2021, 10, 25).unwrap());
        let bare = parse_datetime("2014-09-07").unwrap();
        assert_eq!(bare.year(), 2014);
        assert!(parse_datetime("yesterday").is_none());
    }

    #[test]
    fn player_line_mapping_drops_unparseable_stats() {
        let line = WirePlayerLine {
            player_id: Some("SanchPa00".into()),
            name: Some("Pablo Sanchez".into()),
            stats: Some(HashMap::from([
                ("rush_attempts".to_owned(), "15".to_owned()),
                ("rush_yards".to_owned(), "-3".to_owned()),
                ("receptions".to_owned(), "".to_owned()),
            ])),
        };
        let mapped = map_player_line(&line);
        assert_eq!(mapped.rush_attempts, Some(15));
        assert_eq!(mapped.rush_yards, Some(-3));
        assert_eq!(mapped.receptions, None, "empty wire value must map to None");
        assert_eq!(mapped.attempted_passes, None);
    }

    #[test]
    fn boxscore_mapping_without_scores_is_incomplete() {
        let raw = BoxscoreResponse {
            id: Some("202110250nwe".into()),
            date: Some("2021-10-25T00:20:00Z".into()),
            home: Some(WireTeamSide {
                name: Some("New England Patriots".into()),
                abbreviation: Some("NWE".into()),
                points: None,
                players: None,
            }),
            away: Some(WireTeamSide::default()),
        };
        let boxscore = map_boxscore("202110250nwe", raw).unwrap();
        assert!(!boxscore.is_complete());
        assert_eq!(boxscore.home.abbreviation, "NWE");
    }

    #[test]
    fn boxscore_mapping_requires_a_date() {
        let raw = BoxscoreResponse { id: Some("x".into()), ..Default::default() };
        assert!(map_boxscore("x", raw).is_err());
    }

    // -----------------------------------------------------------------------
    // HTTP round trips against a mock gateway
    // -----------------------------------------------------------------------

    #[test]
    fn fetch_game_index_for_a_week() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/nfl/boxscores?week=7&year=2021")
            .with_header("content-type", "application/json")
            .with_body(r#"{"games":[{"boxscore":"202110240ten"},{"boxscore":"202110250nwe"}]}"#)
            .create();

        let api = SportsRefApi::with_base_url(server.url());
        let ids = api
            .fetch_game_index("nfl", &ScheduleUnit::Week { season: 2021, week: 7 })
            .unwrap();
        mock.assert();
        assert_eq!(ids, vec!["202110240ten", "202110250nwe"]);
    }

    #[test]
    fn fetch_boxscore_maps_players_and_scores() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/nfl/boxscores/202110250nwe")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": "202110250nwe",
                    "date": "2021-10-25T00:20:00Z",
                    "home": {
                        "name": "New England Patriots",
                        "abbreviation": "NWE",
                        "points": "27",
                        "players": [
                            {"playerId": "JoneMa05", "name": "Mac Jones",
                             "stats": {"completed_passes": "24", "attempted_passes": "36",
                                       "passing_yards": "275", "passing_touchdowns": "2",
                                       "interceptions": "1"}}
                        ]
                    },
                    "away": {
                        "name": "New York Jets",
                        "abbreviation": "NYJ",
                        "points": "17",
                        "players": []
                    }
                }"#,
            )
            .create();

        let api = SportsRefApi::with_base_url(server.url());
        let boxscore = api.fetch_boxscore("nfl", "202110250nwe").unwrap();
        assert!(boxscore.is_complete());
        assert_eq!(boxscore.winner().unwrap().abbreviation, "NWE");
        assert_eq!(boxscore.home_players.len(), 1);
        assert_eq!(boxscore.home_players[0].passing_yards, Some(275));
    }

    #[test]
    fn fetch_player_not_on_roster_is_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/nfl/players/Nobody00?season=2021")
            .with_status(404)
            .create();

        let api = SportsRefApi::with_base_url(server.url());
        let err = api.fetch_player("nfl", "Nobody00", "2021").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn fetch_team_schedule_parses_kickoffs() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/nfl/teams/NWE/schedule?season=2014")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"games":[{"datetime":"2014-09-07T17:00:00Z"},{"datetime":"2014-09-14T17:00:00Z"}]}"#,
            )
            .create();

        let api = SportsRefApi::with_base_url(server.url());
        let dates = api.fetch_team_schedule("nfl", "NWE", 2014).unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0].date_naive(), NaiveDate::from_ymd_opt(2014, 9, 7).unwrap());
    }
}
