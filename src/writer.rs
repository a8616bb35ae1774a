use crate::summary::stat_summary;
use sportsref_api::{Boxscore, Player, PlayerBoxscore};
use std::collections::HashMap;

/// Composes one player's natural-language performance summary.
pub type NewsWriter = fn(&Boxscore, &Player, &PlayerBoxscore) -> String;

/// Position tag → composition strategy, with a fallback for unmapped tags.
pub struct WriterRegistry {
    by_position: HashMap<&'static str, NewsWriter>,
    fallback: NewsWriter,
}

impl WriterRegistry {
    pub fn new(fallback: NewsWriter) -> Self {
        Self { by_position: HashMap::new(), fallback }
    }

    pub fn register(&mut self, position: &'static str, writer: NewsWriter) {
        self.by_position.insert(position, writer);
    }

    pub fn for_position(&self, position: Option<&str>) -> NewsWriter {
        position
            .and_then(|tag| self.by_position.get(tag).copied())
            .unwrap_or(self.fallback)
    }

    pub fn compose(&self, boxscore: &Boxscore, player: &Player, line: &PlayerBoxscore) -> String {
        self.for_position(player.position.as_deref())(boxscore, player, line)
    }
}

/// Generic writer for leagues and positions without a dedicated strategy.
pub fn generic_registry() -> WriterRegistry {
    WriterRegistry::new(write_generic_player_news)
}

pub fn nfl_registry() -> WriterRegistry {
    let mut registry = WriterRegistry::new(write_generic_player_news);
    registry.register("QB", write_nfl_quarterback_news);
    registry.register("RB", write_nfl_rusher_news);
    registry.register("WR", write_nfl_receiver_news);
    registry.register("TE", write_nfl_receiver_news);
    registry.register("K", write_nfl_kicker_news);
    registry
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

pub fn write_generic_player_news(boxscore: &Boxscore, player: &Player, _: &PlayerBoxscore) -> String {
    let Some((winner, loser)) = boxscore.winner().zip(boxscore.loser()) else {
        return format!("{} played.", player.name);
    };
    format!(
        "{} played in the {}'s {} win over the {} on {}.",
        player.name,
        winner.name,
        score_line(boxscore),
        loser.name,
        weekday(boxscore),
    )
}

pub fn write_nfl_quarterback_news(boxscore: &Boxscore, player: &Player, line: &PlayerBoxscore) -> String {
    let completions = count(line.completed_passes);
    let attempts = count(line.attempted_passes);
    let mut news = format!("{} completed {completions} of {attempts} pass attempts", player.name);
    let passing = passing_stat_summary(line);
    if !passing.is_empty() {
        news.push_str(&format!(" for {passing}"));
    }
    push_rushing_clause(&mut news, line);
    news.push_str(&game_result_clause(boxscore, player));
    news
}

pub fn write_nfl_rusher_news(boxscore: &Boxscore, player: &Player, line: &PlayerBoxscore) -> String {
    let carries = count(line.rush_attempts);
    let mut news = format!("{} rushed {carries} times", player.name);
    let rushing = rushing_stat_summary(line);
    if !rushing.is_empty() {
        news.push_str(&format!(" for {rushing}"));
    }
    if count(line.receptions) > 0 {
        news.push_str(&format!(
            " while catching {} of {} targets",
            count(line.receptions),
            count(line.targets)
        ));
        let receiving = receiving_stat_summary(line);
        if !receiving.is_empty() {
            news.push_str(&format!(" for {receiving}"));
        }
    }
    news.push_str(&game_result_clause(boxscore, player));
    news
}

pub fn write_nfl_receiver_news(boxscore: &Boxscore, player: &Player, line: &PlayerBoxscore) -> String {
    let mut news = format!(
        "{} caught {} of {} targets",
        player.name,
        count(line.receptions),
        count(line.targets)
    );
    let receiving = receiving_stat_summary(line);
    if !receiving.is_empty() {
        news.push_str(&format!(" for {receiving}"));
    }
    push_rushing_clause(&mut news, line);
    news.push_str(&game_result_clause(boxscore, player));
    news
}

pub fn write_nfl_kicker_news(boxscore: &Boxscore, player: &Player, line: &PlayerBoxscore) -> String {
    let fga = count(line.field_goals_attempted);
    let xpa = count(line.extra_points_attempted);
    let mut clauses = Vec::new();
    if fga > 0 {
        clauses.push(format!("made {} of {fga} field goals", count(line.field_goals_made)));
    }
    if xpa > 0 {
        clauses.push(format!("went {} for {xpa} on PATs", count(line.extra_points_made)));
    }
    let body = if clauses.is_empty() {
        "did not attempt a field goal or extra point".to_owned()
    } else {
        clauses.join(" and ")
    };
    format!("{} {body}{}", player.name, game_result_clause(boxscore, player))
}

// ---------------------------------------------------------------------------
// Clause helpers
// ---------------------------------------------------------------------------

fn passing_stat_summary(line: &PlayerBoxscore) -> String {
    stat_summary(
        &[
            (yards(line.passing_yards), "yard"),
            (count(line.passing_touchdowns), "touchdown"),
            (count(line.interceptions), "interception"),
        ],
        false,
    )
}

fn rushing_stat_summary(line: &PlayerBoxscore) -> String {
    stat_summary(
        &[
            (yards(line.rush_yards), "yard"),
            (count(line.rush_touchdowns), "touchdown"),
            (count(line.fumbles_lost), "lost fumble"),
        ],
        false,
    )
}

fn receiving_stat_summary(line: &PlayerBoxscore) -> String {
    stat_summary(
        &[
            (yards(line.receiving_yards), "yard"),
            (count(line.receiving_touchdowns), "touchdown"),
        ],
        false,
    )
}

fn push_rushing_clause(news: &mut String, line: &PlayerBoxscore) {
    if count(line.rush_attempts) > 0 {
        news.push_str(&format!(" while rushing {} times", count(line.rush_attempts)));
        let rushing = rushing_stat_summary(line);
        if !rushing.is_empty() {
            news.push_str(&format!(" for {rushing}"));
        }
    }
}

/// Closing clause framed from the described player's own side: their team's
/// win or loss, not a fixed home/away angle. Empty while the game is live.
fn game_result_clause(boxscore: &Boxscore, player: &Player) -> String {
    let Some((winner, loser)) = boxscore.winner().zip(boxscore.loser()) else {
        return String::new();
    };
    let score = score_line(boxscore);
    let day = weekday(boxscore);
    match player.team.as_deref() {
        Some(team) if team.eq_ignore_ascii_case(&winner.abbreviation) => {
            format!(" in a {score} win over the {} on {day}.", loser.name)
        }
        Some(team) if team.eq_ignore_ascii_case(&loser.abbreviation) => {
            format!(" in a {score} loss to the {} on {day}.", winner.name)
        }
        _ => format!(" in the {}'s {score} win over the {} on {day}.", winner.name, loser.name),
    }
}

fn score_line(boxscore: &Boxscore) -> String {
    format!(
        "{}-{}",
        boxscore.away.points.unwrap_or(0),
        boxscore.home.points.unwrap_or(0)
    )
}

fn weekday(boxscore: &Boxscore) -> String {
    boxscore.date.format("%A").to_string()
}

// Missing stat fields read as zero for display; composition never fails.
fn count(value: Option<u16>) -> i64 {
    i64::from(value.unwrap_or(0))
}

fn yards(value: Option<i32>) -> i64 {
    i64::from(value.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sportsref_api::TeamLine;

    // 2008-06-15 was a Sunday.
    fn boxscore() -> Boxscore {
        Boxscore {
            id: "200806150mel".into(),
            date: Utc.with_ymd_and_hms(2008, 6, 15, 17, 0, 0).unwrap(),
            home: TeamLine { name: "Melonheads".into(), abbreviation: "MEL".into(), points: Some(7) },
            away: TeamLine { name: "Wombats".into(), abbreviation: "WOM".into(), points: Some(4) },
            ..Default::default()
        }
    }

    fn player(position: &str, team: &str) -> Player {
        Player {
            id: "SanchPa00".into(),
            name: "Pablo Sanchez".into(),
            position: Some(position.into()),
            team: Some(team.into()),
        }
    }

    #[test]
    fn generic_news_frames_the_game_from_the_winner() {
        let news = write_generic_player_news(&boxscore(), &player("C", "MEL"), &PlayerBoxscore::default());
        assert_eq!(
            news,
            "Pablo Sanchez played in the Melonheads's 4-7 win over the Wombats on Sunday."
        );
    }

    #[test]
    fn generic_news_for_a_live_game_has_no_result() {
        let mut live = boxscore();
        live.home.points = None;
        let news = write_generic_player_news(&live, &player("C", "MEL"), &PlayerBoxscore::default());
        assert_eq!(news, "Pablo Sanchez played.");
    }

    #[test]
    fn quarterback_news_without_rushes_has_no_rushing_clause() {
        let line = PlayerBoxscore {
            completed_passes: Some(20),
            attempted_passes: Some(35),
            passing_yards: Some(300),
            passing_touchdowns: Some(2),
            interceptions: Some(0),
            rush_attempts: Some(0),
            ..Default::default()
        };
        let news = write_nfl_quarterback_news(&boxscore(), &player("QB", "MEL"), &line);
        assert!(news.starts_with("Pablo Sanchez completed 20 of 35 pass attempts"));
        assert!(news.contains("300 yards and 2 touchdowns"));
        assert!(!news.contains("rush"));
        assert!(news.ends_with("in a 4-7 win over the Wombats on Sunday."));
    }

    #[test]
    fn quarterback_news_with_rushes_adds_the_secondary_clause() {
        let line = PlayerBoxscore {
            completed_passes: Some(15),
            attempted_passes: Some(25),
            passing_yards: Some(150),
            passing_touchdowns: Some(0),
            interceptions: Some(2),
            fumbles_lost: Some(1),
            rush_attempts: Some(5),
            rush_yards: Some(10),
            rush_touchdowns: Some(0),
            ..Default::default()
        };
        let news = write_nfl_quarterback_news(&boxscore(), &player("QB", "WOM"), &line);
        assert!(news.contains("150 yards and 2 interceptions"));
        assert!(news.contains("while rushing 5 times for 10 yards and a lost fumble"));
        assert!(news.ends_with("in a 4-7 loss to the Melonheads on Sunday."));
    }

    #[test]
    fn rusher_news_adds_receiving_only_when_catches_happened() {
        let pure_runner = PlayerBoxscore {
            rush_attempts: Some(15),
            rush_yards: Some(95),
            rush_touchdowns: Some(1),
            receptions: Some(0),
            ..Default::default()
        };
        let news = write_nfl_rusher_news(&boxscore(), &player("RB", "MEL"), &pure_runner);
        assert!(news.starts_with("Pablo Sanchez rushed 15 times for 95 yards and a touchdown"));
        assert!(!news.contains("catching"));

        let dual_threat = PlayerBoxscore {
            rush_attempts: Some(12),
            rush_yards: Some(55),
            fumbles_lost: Some(1),
            targets: Some(3),
            receptions: Some(2),
            receiving_yards: Some(25),
            ..Default::default()
        };
        let news = write_nfl_rusher_news(&boxscore(), &player("RB", "MEL"), &dual_threat);
        assert!(news.contains("rushed 12 times for 55 yards and a lost fumble"));
        assert!(news.contains("while catching 2 of 3 targets for 25 yards"));
    }

    #[test]
    fn receiver_news_covers_wide_receivers_and_tight_ends() {
        let line = PlayerBoxscore {
            targets: Some(10),
            receptions: Some(8),
            receiving_yards: Some(150),
            receiving_touchdowns: Some(2),
            rush_attempts: Some(0),
            ..Default::default()
        };
        for position in ["WR", "TE"] {
            let news = nfl_registry().compose(&boxscore(), &player(position, "MEL"), &line);
            assert!(news.starts_with("Pablo Sanchez caught 8 of 10 targets for 150 yards and 2 touchdowns"));
            assert!(!news.contains("rush"));
        }
    }

    #[test]
    fn receiver_news_with_carries_adds_the_rushing_clause() {
        let line = PlayerBoxscore {
            targets: Some(5),
            receptions: Some(3),
            receiving_yards: Some(31),
            rush_attempts: Some(2),
            rush_yards: Some(10),
            ..Default::default()
        };
        let news = write_nfl_receiver_news(&boxscore(), &player("WR", "MEL"), &line);
        assert!(news.contains("caught 3 of 5 targets for 31 yards"));
        assert!(news.contains("while rushing 2 times for 10 yards"));
    }

    #[test]
    fn kicker_news_reports_each_attempted_kind() {
        let both = PlayerBoxscore {
            field_goals_attempted: Some(3),
            field_goals_made: Some(2),
            extra_points_attempted: Some(2),
            extra_points_made: Some(2),
            ..Default::default()
        };
        let news = write_nfl_kicker_news(&boxscore(), &player("K", "MEL"), &both);
        assert!(news.contains("made 2 of 3 field goals and went 2 for 2 on PATs"));

        let pats_only = PlayerBoxscore {
            extra_points_attempted: Some(2),
            extra_points_made: Some(1),
            ..Default::default()
        };
        let news = write_nfl_kicker_news(&boxscore(), &player("K", "MEL"), &pats_only);
        assert!(!news.contains("field goals"));
        assert!(news.contains("went 1 for 2 on PATs"));
    }

    #[test]
    fn kicker_with_no_attempts_gets_an_explicit_clause() {
        let news = write_nfl_kicker_news(&boxscore(), &player("K", "MEL"), &PlayerBoxscore::default());
        assert!(news.contains("did not attempt a field goal or extra point"));
    }

    #[test]
    fn unmapped_positions_fall_back_to_the_generic_writer() {
        let registry = nfl_registry();
        let news = registry.compose(&boxscore(), &player("DST", "MEL"), &PlayerBoxscore::default());
        assert!(news.starts_with("Pablo Sanchez played in the Melonheads's"));
        let no_position = Player { position: None, ..player("QB", "MEL") };
        let news = registry.compose(&boxscore(), &no_position, &PlayerBoxscore::default());
        assert!(news.starts_with("Pablo Sanchez played"));
    }

    #[test]
    fn unknown_team_keeps_neutral_framing() {
        let line = PlayerBoxscore { rush_attempts: Some(1), ..Default::default() };
        let mut traded = player("RB", "MEL");
        traded.team = None;
        let news = write_nfl_rusher_news(&boxscore(), &traded, &line);
        assert!(news.contains("in the Melonheads's 4-7 win over the Wombats on Sunday."));
    }

    #[test]
    fn composition_never_fails_on_missing_stats() {
        let empty = PlayerBoxscore::default();
        for position in ["QB", "RB", "WR", "TE", "K"] {
            let news = nfl_registry().compose(&boxscore(), &player(position, "MEL"), &empty);
            assert!(news.starts_with("Pablo Sanchez"));
            assert!(news.ends_with("on Sunday."));
        }
    }
}
