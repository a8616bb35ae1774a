use crate::documents::{self, BLURB_COLLECTION, Blurb, GAME_COLLECTION, GAME_KEY};
use crate::filter::FilterChain;
use crate::league::League;
use crate::store::{self, Document, DocumentStore, FieldFilter};
use crate::writer::WriterRegistry;
use anyhow::Result;
use log::{debug, info, warn};
use serde_json::{Value, json};
use sportsref_api::{Boxscore, ScheduleUnit};
use std::collections::BTreeMap;

/// Counts from one orchestrator invocation. A rerun over unchanged data
/// reports zero blurbs and zero upserts.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub boxscores: usize,
    pub blurbs: usize,
    pub games_upserted: usize,
}

/// Incremental-state driver: fetch boxscores for the requested units,
/// move each game's persisted document forward through
/// unknown → in-progress → complete-unprocessed → complete-processed,
/// and blurb each game exactly once, on its completion transition.
pub fn process_games(
    league: &mut dyn League,
    units: &[ScheduleUnit],
    writers: &WriterRegistry,
    filters: &FilterChain,
    store: &mut dyn DocumentStore,
) -> Result<RunReport> {
    info!("Getting boxscores...");
    let mut boxscores = Vec::new();
    for unit in units {
        debug!("getting boxscores for '{unit}'");
        boxscores.extend(league.boxscores(unit)?);
    }

    info!("Writing player blurbs...");
    let mut blurbs: Vec<Blurb> = Vec::new();
    let mut updated: BTreeMap<String, Document> = BTreeMap::new();
    for boxscore in &boxscores {
        debug!("checking game document for '{}'", boxscore.id);
        let filter = FieldFilter::from([(GAME_KEY.to_owned(), json!(boxscore.id))]);
        let (mut doc, mut changed) = match store::get_document(store, GAME_COLLECTION, &filter)? {
            Some(existing) => (existing, false),
            None => (documents::game_document(boxscore, league.name()), true),
        };

        // Completion is monotonic: a game already marked complete stays
        // complete no matter what the live boxscore says.
        if !flag(&doc, "complete") && boxscore.is_complete() {
            let fresh = documents::game_document(boxscore, league.name());
            doc["game"] = fresh["game"].clone();
            doc["complete"] = json!(true);
            changed = true;
        }

        if flag(&doc, "complete") && !flag(&doc, "processed") {
            blurbs.extend(blurbs_for_boxscore(boxscore, &*league, writers, filters));
            doc["processed"] = json!(true);
            changed = true;
        }

        if changed {
            updated.insert(boxscore.id.clone(), doc);
        }
    }

    let report = RunReport {
        boxscores: boxscores.len(),
        blurbs: blurbs.len(),
        games_upserted: updated.len(),
    };

    // Game updates land before blurb inserts: a crash in between loses
    // blurbs, while the reverse order would leave blurbed games unprocessed
    // and duplicate their blurbs on the rerun.
    if updated.is_empty() {
        info!("No new or updated games.");
    } else {
        info!("Putting {} new and updated games into the store...", updated.len());
        let docs: Vec<Document> = updated.into_values().collect();
        store::update_documents(store, GAME_COLLECTION, docs, GAME_KEY, true)?;
    }
    if blurbs.is_empty() {
        info!("No blurbs written.");
    } else {
        info!("Putting {} blurbs into the store...", blurbs.len());
        let docs = documents::blurb_documents(&blurbs, documents::BLURB_SOURCE, league.name());
        store::put_documents(store, BLURB_COLLECTION, docs)?;
    }
    info!("Processing complete.");
    Ok(report)
}

/// Blurbs for every eligible player on both sides of one boxscore. A player
/// whose roster entry cannot be resolved is excluded, never fatal.
pub fn blurbs_for_boxscore(
    boxscore: &Boxscore,
    league: &dyn League,
    writers: &WriterRegistry,
    filters: &FilterChain,
) -> Vec<Blurb> {
    let mut blurbs = Vec::new();
    for line in boxscore.players() {
        let player = match league.player(&line.player_id, boxscore.date.date_naive()) {
            Ok(player) => player,
            Err(err) => {
                warn!("excluding '{}' ({}): {err}", line.name, line.player_id);
                continue;
            }
        };
        if !filters.accepts(boxscore, &player, line) {
            continue; // the chain logs the exclusion
        }
        debug!("writing blurb for {}", player.name);
        let news = writers.compose(boxscore, &player, line);
        blurbs.push(Blurb { player, news });
    }
    blurbs
}

fn flag(doc: &Document, name: &str) -> bool {
    doc.get(name).and_then(Value::as_bool).unwrap_or(false)
}
