//! Incremental aggregation of skill ratings into player averages
//!
//! The aggregator is an online mean: each per-skill average is updated
//! from the previous average and the matches-played counter alone, which
//! is mathematically equivalent to recomputing the mean over the full
//! rating history without retaining it. A consequence is that a rating
//! can never be retracted once folded in.
//!
//! Both functions are pure, synchronous and deterministic; input
//! validation (score bounds) happens at the request boundary.

use crate::types::{Player, SkillScores};

/// Fold one incoming skill vector into a player's rolling averages.
///
/// With `n` = the player's current matches-played counter, each skill
/// moves to `(old * n + incoming) / (n + 1)`; the counter then
/// increments and the overall score is recomputed as the mean of the
/// five skills. For a fresh player (`n == 0`) the averages collapse to
/// the incoming values.
///
/// Callers are responsible for invoking this exactly once per
/// (player, match) pair: the counter increments on every call, so
/// feeding the same match twice silently corrupts both the counter and
/// the averages.
pub fn apply_skill_rating(player: &mut Player, incoming: &SkillScores) {
    let n = player.matches_played as f64;

    player.skills.attack = (player.skills.attack * n + incoming.attack) / (n + 1.0);
    player.skills.defense = (player.skills.defense * n + incoming.defense) / (n + 1.0);
    player.skills.physical = (player.skills.physical * n + incoming.physical) / (n + 1.0);
    player.skills.passing = (player.skills.passing * n + incoming.passing) / (n + 1.0);
    player.skills.vision = (player.skills.vision * n + incoming.vision) / (n + 1.0);

    player.matches_played += 1;
    player.overall = player.skills.overall();
}

/// Reduce all ratings a player received in one match to a single skill
/// vector by taking the unweighted per-skill mean across raters.
///
/// This is the match-level reduction step: its result is fed to
/// [`apply_skill_rating`] once, so a match's net effect on a player is
/// applied once regardless of how many teammates rated them. Returns
/// `None` for an empty slice.
pub fn average_ratings(vectors: &[SkillScores]) -> Option<SkillScores> {
    if vectors.is_empty() {
        return None;
    }

    let count = vectors.len() as f64;
    let mut sum = SkillScores::default();
    for v in vectors {
        sum.attack += v.attack;
        sum.defense += v.defense;
        sum.physical += v.physical;
        sum.passing += v.passing;
        sum.vision += v.vision;
    }

    Some(SkillScores::new(
        sum.attack / count,
        sum.defense / count,
        sum.physical / count,
        sum.passing / count,
        sum.vision / count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scores_roughly_equal;
    use proptest::prelude::*;

    fn test_player() -> Player {
        Player::new(
            "Bruno".to_string(),
            "Sosa".to_string(),
            "bruno@example.com".to_string(),
            None,
        )
    }

    #[test]
    fn test_first_rating_collapses_to_incoming() {
        let mut player = test_player();
        let incoming = SkillScores::new(8.0, 7.0, 6.0, 9.0, 5.0);

        apply_skill_rating(&mut player, &incoming);

        assert_eq!(player.skills.as_array(), incoming.as_array());
        assert_eq!(player.matches_played, 1);
        assert_eq!(player.overall, 7.0);
    }

    #[test]
    fn test_second_rating_is_weighted_average() {
        let mut player = test_player();
        apply_skill_rating(&mut player, &SkillScores::new(8.0, 8.0, 8.0, 8.0, 8.0));
        apply_skill_rating(&mut player, &SkillScores::new(4.0, 4.0, 4.0, 4.0, 4.0));

        assert_eq!(player.matches_played, 2);
        for score in player.skills.as_array() {
            assert!(scores_roughly_equal(score, 6.0));
        }
        assert!(scores_roughly_equal(player.overall, 6.0));
    }

    #[test]
    fn test_matches_equivalent_full_history_mean() {
        let history = [
            SkillScores::new(5.0, 6.0, 7.0, 8.0, 9.0),
            SkillScores::new(3.0, 3.0, 3.0, 3.0, 3.0),
            SkillScores::new(10.0, 0.0, 5.0, 2.0, 8.0),
        ];

        let mut player = test_player();
        for vector in &history {
            apply_skill_rating(&mut player, vector);
        }

        let expected_attack = history.iter().map(|v| v.attack).sum::<f64>() / 3.0;
        assert!(scores_roughly_equal(player.skills.attack, expected_attack));
        assert_eq!(player.matches_played, 3);
    }

    #[test]
    fn test_average_ratings_single_rater() {
        let only = SkillScores::new(8.0, 7.0, 6.0, 9.0, 5.0);
        let averaged = average_ratings(&[only]).unwrap();
        assert_eq!(averaged.as_array(), only.as_array());
    }

    #[test]
    fn test_average_ratings_across_raters() {
        let averaged = average_ratings(&[
            SkillScores::new(10.0, 8.0, 6.0, 4.0, 2.0),
            SkillScores::new(0.0, 2.0, 4.0, 6.0, 8.0),
        ])
        .unwrap();

        assert_eq!(averaged.as_array(), [5.0, 5.0, 5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_average_ratings_empty_is_none() {
        assert!(average_ratings(&[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_update_follows_online_mean_formula(
            old in 0.0f64..10.0,
            incoming in 0.0f64..10.0,
            n in 0u32..200,
        ) {
            let mut player = test_player();
            player.matches_played = n;
            player.skills = SkillScores::new(old, old, old, old, old);

            apply_skill_rating(&mut player, &SkillScores::new(incoming, incoming, incoming, incoming, incoming));

            let expected = (old * n as f64 + incoming) / (n as f64 + 1.0);
            prop_assert!(scores_roughly_equal(player.skills.attack, expected));
            prop_assert_eq!(player.matches_played, n + 1);
        }

        #[test]
        fn prop_overall_always_mean_of_skills(
            scores in proptest::array::uniform5(0.0f64..10.0),
            rounds in 1usize..10,
        ) {
            let mut player = test_player();
            let incoming = SkillScores::new(scores[0], scores[1], scores[2], scores[3], scores[4]);

            for _ in 0..rounds {
                apply_skill_rating(&mut player, &incoming);
                prop_assert!(scores_roughly_equal(player.overall, player.skills.overall()));
            }
        }
    }
}
