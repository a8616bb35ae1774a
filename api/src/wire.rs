/// Stats gateway raw wire types — serde shapes for deserializing provider
/// responses. These map to our clean domain types via the mapping functions
/// in client.rs.
use serde::Deserialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Game index (one entry per game in a schedule unit)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GamesResponse {
    pub games: Option<Vec<GameRef>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameRef {
    /// Boxscore id, e.g. "202110250nwe".
    pub boxscore: Option<String>,
}

// ---------------------------------------------------------------------------
// Boxscore detail
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct BoxscoreResponse {
    pub id: Option<String>,
    pub date: Option<String>, // ISO 8601
    pub home: Option<WireTeamSide>,
    pub away: Option<WireTeamSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WireTeamSide {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    /// The provider sends scores as strings; absent = game not final.
    pub points: Option<String>,
    pub players: Option<Vec<WirePlayerLine>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WirePlayerLine {
    #[serde(rename = "playerId")]
    pub player_id: Option<String>,
    pub name: Option<String>,
    /// Open-ended stat table, keys like "attempted_passes". Values are
    /// strings on the wire; unparseable entries are dropped during mapping.
    pub stats: Option<HashMap<String, String>>,
}

// ---------------------------------------------------------------------------
// Roster player
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlayerResponse {
    pub id: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
}

// ---------------------------------------------------------------------------
// Team season schedule (used to derive NFL week boundaries)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    pub games: Option<Vec<ScheduledGame>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduledGame {
    pub datetime: Option<String>, // ISO 8601 kickoff
}
