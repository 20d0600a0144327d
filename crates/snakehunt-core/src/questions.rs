//! Question selection for checkpoints.
//!
//! A checkpoint reached by landing on a snake draws from the snake pool;
//! every other checkpoint draws from the regular pool. Inside a pool the
//! question kind is drawn by weight, then a question of that kind uniformly.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::Question;
use crate::types::QuestionKind;

/// Relative draw weight per question kind. Missing kinds weigh zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindWeights(BTreeMap<QuestionKind, u32>);

impl KindWeights {
    pub fn new(weights: impl IntoIterator<Item = (QuestionKind, u32)>) -> Self {
        KindWeights(weights.into_iter().collect())
    }

    pub fn weight(&self, kind: QuestionKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }
}

impl Default for KindWeights {
    fn default() -> Self {
        KindWeights::new([
            (QuestionKind::Trivia, 4),
            (QuestionKind::Riddle, 3),
            (QuestionKind::Coding, 2),
            (QuestionKind::Physical, 1),
        ])
    }
}

impl fmt::Display for KindWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, w)| format!("{k}={w}")).collect();
        f.write_str(&parts.join(","))
    }
}

/// Parses `"trivia=4,riddle=3"`. Whitespace around items is ignored.
impl FromStr for KindWeights {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut weights = BTreeMap::new();
        for item in s.split(',').map(str::trim).filter(|i| !i.is_empty()) {
            let (kind, weight) = item.split_once('=').ok_or_else(|| CoreError::InvalidWeights {
                reason: format!("expected kind=weight, got '{item}'"),
            })?;
            let kind: QuestionKind = kind.trim().parse()?;
            let weight: u32 = weight.trim().parse().map_err(|_| CoreError::InvalidWeights {
                reason: format!("weight for {kind} is not a non-negative integer"),
            })?;
            if weights.insert(kind, weight).is_some() {
                return Err(CoreError::InvalidWeights {
                    reason: format!("{kind} listed twice"),
                });
            }
        }
        if weights.is_empty() {
            return Err(CoreError::InvalidWeights {
                reason: "no kinds given".to_string(),
            });
        }
        Ok(KindWeights(weights))
    }
}

/// A selected question and how it was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionPick<'a> {
    pub question: &'a Question,
    /// A snake checkpoint had to draw from the regular pool.
    pub fell_back: bool,
}

/// Selects a question for a checkpoint.
///
/// `candidates` must already exclude inactive questions and questions the
/// team has seen. Returns `None` when no question qualifies.
pub fn select_question<'a, R: Rng + ?Sized>(
    candidates: &'a [Question],
    is_snake: bool,
    weights: &KindWeights,
    rng: &mut R,
) -> Option<QuestionPick<'a>> {
    let pool_of = |snake: bool| -> Vec<&'a Question> {
        candidates.iter().filter(|q| q.is_snake == snake).collect()
    };

    let (pool, fell_back) = if is_snake {
        let snake_pool = pool_of(true);
        if snake_pool.is_empty() {
            (pool_of(false), true)
        } else {
            (snake_pool, false)
        }
    } else {
        (pool_of(false), false)
    };

    let question = draw_weighted(&pool, weights, rng)?;
    Some(QuestionPick { question, fell_back })
}

fn draw_weighted<'a, R: Rng + ?Sized>(
    pool: &[&'a Question],
    weights: &KindWeights,
    rng: &mut R,
) -> Option<&'a Question> {
    let kinds: Vec<QuestionKind> = QuestionKind::ALL
        .iter()
        .copied()
        .filter(|k| pool.iter().any(|q| q.kind == *k))
        .collect();

    let chosen_kind = match WeightedIndex::new(kinds.iter().map(|k| weights.weight(*k))) {
        Ok(index) => Some(kinds[index.sample(rng)]),
        // Empty pool or all weights zero.
        Err(_) => None,
    };

    let of_kind: Vec<&'a Question> = match chosen_kind {
        Some(kind) => pool.iter().copied().filter(|q| q.kind == kind).collect(),
        None => pool.to_vec(),
    };
    of_kind.choose(rng).copied()
}

/// Loose answer comparison used to pre-screen submissions for the marking
/// admin: case and runs of whitespace are ignored.
pub fn answers_match(expected: &str, given: &str) -> bool {
    fn normalize(s: &str) -> String {
        s.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }
    let given = normalize(given);
    !given.is_empty() && normalize(expected) == given
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::id::QuestionId;

    fn question(id: i64, kind: QuestionKind, is_snake: bool) -> Question {
        Question {
            id: QuestionId(id),
            kind,
            prompt: format!("q{id}"),
            answer: "a".into(),
            hint: None,
            is_snake,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn answers_match_ignores_case_and_spacing() {
        assert!(answers_match("Grand Piano", "  grand   piano "));
        assert!(!answers_match("piano", "organ"));
        assert!(!answers_match("", "   "));
    }

    #[test]
    fn parses_weights() {
        let w: KindWeights = "trivia=5, coding=1".parse().unwrap();
        assert_eq!(w.weight(QuestionKind::Trivia), 5);
        assert_eq!(w.weight(QuestionKind::Coding), 1);
        assert_eq!(w.weight(QuestionKind::Riddle), 0);
        assert_eq!(w.to_string(), "trivia=5,coding=1");
    }

    #[test]
    fn rejects_bad_weights() {
        assert!("trivia".parse::<KindWeights>().is_err());
        assert!("trivia=-1".parse::<KindWeights>().is_err());
        assert!("dance=2".parse::<KindWeights>().is_err());
        assert!("trivia=1,trivia=2".parse::<KindWeights>().is_err());
        assert!("".parse::<KindWeights>().is_err());
    }

    #[test]
    fn default_round_trips_through_text() {
        let text = KindWeights::default().to_string();
        assert_eq!(text, "trivia=4,riddle=3,coding=2,physical=1");
        assert_eq!(text.parse::<KindWeights>().unwrap(), KindWeights::default());
    }

    #[test]
    fn snake_checkpoint_uses_snake_pool() {
        let qs = vec![
            question(1, QuestionKind::Trivia, false),
            question(2, QuestionKind::Trivia, true),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let pick = select_question(&qs, true, &KindWeights::default(), &mut rng).unwrap();
            assert_eq!(pick.question.id, QuestionId(2));
            assert!(!pick.fell_back);
        }
    }

    #[test]
    fn regular_checkpoint_never_gets_snake_question() {
        let qs = vec![
            question(1, QuestionKind::Riddle, false),
            question(2, QuestionKind::Trivia, true),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let pick = select_question(&qs, false, &KindWeights::default(), &mut rng).unwrap();
            assert_eq!(pick.question.id, QuestionId(1));
        }
    }

    #[test]
    fn empty_snake_pool_falls_back() {
        let qs = vec![question(1, QuestionKind::Coding, false)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let pick = select_question(&qs, true, &KindWeights::default(), &mut rng).unwrap();
        assert_eq!(pick.question.id, QuestionId(1));
        assert!(pick.fell_back);
    }

    #[test]
    fn none_without_candidates() {
        let qs = vec![question(1, QuestionKind::Coding, true)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(select_question(&qs, false, &KindWeights::default(), &mut rng).is_none());
        assert!(select_question(&[], true, &KindWeights::default(), &mut rng).is_none());
    }

    #[test]
    fn zero_weight_kind_is_skipped_when_others_exist() {
        let qs = vec![
            question(1, QuestionKind::Physical, false),
            question(2, QuestionKind::Trivia, false),
        ];
        let weights = KindWeights::new([(QuestionKind::Trivia, 1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let pick = select_question(&qs, false, &weights, &mut rng).unwrap();
            assert_eq!(pick.question.kind, QuestionKind::Trivia);
        }
    }

    #[test]
    fn all_zero_weights_draw_uniformly() {
        let qs = vec![question(1, QuestionKind::Physical, false)];
        let weights = KindWeights::new([(QuestionKind::Trivia, 1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let pick = select_question(&qs, false, &weights, &mut rng).unwrap();
        assert_eq!(pick.question.id, QuestionId(1));
    }

    #[test]
    fn weights_shape_the_distribution() {
        let qs = vec![
            question(1, QuestionKind::Trivia, false),
            question(2, QuestionKind::Riddle, false),
        ];
        let weights = KindWeights::new([(QuestionKind::Trivia, 9), (QuestionKind::Riddle, 1)]);
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut counts: HashMap<QuestionKind, u32> = HashMap::new();
        for _ in 0..2000 {
            let pick = select_question(&qs, false, &weights, &mut rng).unwrap();
            *counts.entry(pick.question.kind).or_default() += 1;
        }
        let trivia = counts[&QuestionKind::Trivia];
        assert!(trivia > 1600 && trivia < 1950, "trivia drawn {trivia} times");
    }
}
