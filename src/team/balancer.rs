//! Snake-draft team balancing
//!
//! This module partitions a roster into two squads of near-equal
//! aggregate skill. Players are ranked by overall score and dealt in
//! blocks of four (ranks 1,4,5,8,... to side A; ranks 2,3,6,7,... to
//! side B), which keeps the cumulative skill sums closer than a naive
//! alternating split when skill is heavy-tailed.

use crate::types::Player;
use std::cmp::Ordering;

/// Split a roster into two disjoint squads covering all input players.
///
/// The sort is stable and descending by overall score, so ties keep the
/// input order and the split is deterministic. An empty roster yields
/// two empty squads.
pub fn balance(players: &[Player]) -> (Vec<Player>, Vec<Player>) {
    let mut ranked: Vec<Player> = players.to_vec();
    ranked.sort_by(|a, b| b.overall.partial_cmp(&a.overall).unwrap_or(Ordering::Equal));

    let mut team_a = Vec::with_capacity(ranked.len().div_ceil(2));
    let mut team_b = Vec::with_capacity(ranked.len() / 2);

    for (i, player) in ranked.into_iter().enumerate() {
        // Snake draft in blocks of four: positions 0 and 3 of each block
        // go to A, positions 1 and 2 to B.
        if i % 4 == 0 || i % 4 == 3 {
            team_a.push(player);
        } else {
            team_b.push(player);
        }
    }

    (team_a, team_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SkillScores;
    use proptest::prelude::*;

    fn player_with_overall(name: &str, overall: f64) -> Player {
        let mut player = Player::new(
            name.to_string(),
            String::new(),
            format!("{}@example.com", name),
            None,
        );
        player.skills = SkillScores::new(overall, overall, overall, overall, overall);
        player.overall = overall;
        player
    }

    #[test]
    fn test_empty_roster_yields_empty_teams() {
        let (team_a, team_b) = balance(&[]);
        assert!(team_a.is_empty());
        assert!(team_b.is_empty());
    }

    #[test]
    fn test_eight_players_snake_split() {
        // Named by rank: p1 is the strongest.
        let players: Vec<Player> = (1..=8)
            .map(|rank| player_with_overall(&format!("p{}", rank), 10.0 - rank as f64))
            .collect();

        let (team_a, team_b) = balance(&players);

        let names_a: Vec<&str> = team_a.iter().map(|p| p.name.as_str()).collect();
        let names_b: Vec<&str> = team_b.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names_a, vec!["p1", "p4", "p5", "p8"]);
        assert_eq!(names_b, vec!["p2", "p3", "p6", "p7"]);
    }

    #[test]
    fn test_odd_roster_is_still_covering() {
        let players: Vec<Player> = (1..=5)
            .map(|rank| player_with_overall(&format!("p{}", rank), rank as f64))
            .collect();

        let (team_a, team_b) = balance(&players);
        assert_eq!(team_a.len() + team_b.len(), 5);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let players = vec![
            player_with_overall("first", 5.0),
            player_with_overall("second", 5.0),
            player_with_overall("third", 5.0),
        ];

        let (team_a, team_b) = balance(&players);
        assert_eq!(team_a[0].name, "first");
        assert_eq!(team_b[0].name, "second");
        assert_eq!(team_b[1].name, "third");
    }

    #[test]
    fn test_star_surplus_sets_the_gap_on_skewed_scores() {
        // Heavy-tailed roster: one star, the rest even.
        let mut players = vec![player_with_overall("star", 10.0)];
        for i in 0..7 {
            players.push(player_with_overall(&format!("even{}", i), 4.0));
        }

        let (team_a, team_b) = balance(&players);
        let sum_a: f64 = team_a.iter().map(|p| p.overall).sum();
        let sum_b: f64 = team_b.iter().map(|p| p.overall).sum();

        // Every non-star player is interchangeable, so the star's side
        // leads by exactly the star's surplus over an even player.
        assert_eq!(team_a[0].name, "star");
        assert_eq!(sum_a - sum_b, 6.0);
    }

    proptest! {
        #[test]
        fn prop_balance_is_total_and_disjoint(overalls in proptest::collection::vec(0.0f64..10.0, 0..24)) {
            let players: Vec<Player> = overalls
                .iter()
                .enumerate()
                .map(|(i, overall)| player_with_overall(&format!("p{}", i), *overall))
                .collect();

            let (team_a, team_b) = balance(&players);

            prop_assert_eq!(team_a.len() + team_b.len(), players.len());
            for a in &team_a {
                prop_assert!(team_b.iter().all(|b| b.id != a.id));
            }
        }
    }
}
