use crate::store::Document;
use chrono::Utc;
use serde_json::json;
use sportsref_api::{Boxscore, Player, TeamLine};

pub const GAME_COLLECTION: &str = "game";
pub const BLURB_COLLECTION: &str = "blurb";
/// Dotted path of the provider's game id inside a game document.
pub const GAME_KEY: &str = "game.id";
pub const BLURB_SOURCE: &str = "sports-reference.com";

/// One generated blurb, paired with the player it describes.
#[derive(Debug, Clone)]
pub struct Blurb {
    pub player: Player,
    pub news: String,
}

/// Fresh game document for a first-seen boxscore. Completion and processing
/// transitions belong to the orchestrator, so both flags start false.
pub fn game_document(boxscore: &Boxscore, league: &str) -> Document {
    json!({
        "game": {
            "id": boxscore.id,
            "date": boxscore.date.to_rfc3339(),
            "home": team_fields(&boxscore.home),
            "away": team_fields(&boxscore.away),
        },
        "league": league,
        "complete": false,
        "processed": false,
    })
}

fn team_fields(team: &TeamLine) -> Document {
    json!({
        "name": team.name,
        "abbreviation": team.abbreviation,
        "points": team.points,
    })
}

/// Immutable blurb documents for one run; never updated once written.
pub fn blurb_documents(blurbs: &[Blurb], source: &str, league: &str) -> Vec<Document> {
    let created = Utc::now().to_rfc3339();
    blurbs
        .iter()
        .map(|blurb| {
            json!({
                "created": created,
                "source": source,
                "league": league,
                "player": {
                    "id": blurb.player.id,
                    "name": blurb.player.name,
                    "position": blurb.player.position,
                    "team": blurb.player.team,
                },
                "news": blurb.news,
            })
        })
        .collect()
}
