use log::debug;
use sportsref_api::{Boxscore, Player, PlayerBoxscore};

/// Eligibility predicate over one player's appearance in one game.
/// `false` means the player is not blurb-worthy; a predicate that cannot
/// evaluate because of missing data also answers `false`.
pub type Filter = fn(&Boxscore, &Player, &PlayerBoxscore) -> bool;

/// Ordered AND-combination of eligibility filters. Every filter is
/// evaluated against the same inputs; there is no short-circuiting.
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters }
    }

    pub fn accepts(&self, boxscore: &Boxscore, player: &Player, line: &PlayerBoxscore) -> bool {
        let mut keep = true;
        for filter in &self.filters {
            if !filter(boxscore, player, line) {
                keep = false;
            }
        }
        if !keep {
            debug!("filtering out {} ({})", player.name, player.id);
        }
        keep
    }
}

/// NFL: at least one meaningful recorded event — a pass attempt, rush
/// attempt, reception, or field-goal attempt.
pub fn nfl_at_least_one_attempt(_: &Boxscore, _: &Player, line: &PlayerBoxscore) -> bool {
    [line.attempted_passes, line.rush_attempts, line.receptions, line.field_goals_attempted]
        .iter()
        .flatten()
        .any(|&n| n > 0)
}

pub fn has_known_position(_: &Boxscore, player: &Player, _: &PlayerBoxscore) -> bool {
    player.position.as_deref().is_some_and(|p| !p.is_empty())
}

pub fn has_known_team(_: &Boxscore, player: &Player, _: &PlayerBoxscore) -> bool {
    player.team.as_deref().is_some_and(|t| !t.is_empty())
}

pub fn nfl_filters() -> FilterChain {
    FilterChain::new(vec![nfl_at_least_one_attempt, has_known_position, has_known_team])
}

/// Date-organized leagues have no attempt-style gate yet; identity checks only.
pub fn basic_filters() -> FilterChain {
    FilterChain::new(vec![has_known_position, has_known_team])
}
