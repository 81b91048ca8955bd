use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::gateway::Record;
use crate::shared::constants::TABLE_PROMPT_RATINGS;

/// One submitted star rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRating {
    pub id: String,
    pub prompt_id: String,
    pub stars: i16,
    pub created_at: DateTime<Utc>,
}

impl Record for PromptRating {
    const TABLE: &'static str = TABLE_PROMPT_RATINGS;
}

/// Star rating aggregate, independent of the legacy favorite flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StarRating {
    pub average: f64,
    pub count: u32,
}

impl StarRating {
    /// Aggregate a set of scores; `None` when there are none
    pub fn from_scores<I: IntoIterator<Item = i16>>(scores: I) -> Option<Self> {
        let (sum, count) = scores
            .into_iter()
            .fold((0i64, 0u32), |(sum, count), s| (sum + i64::from(s), count + 1));

        if count == 0 {
            return None;
        }

        Some(Self {
            average: sum as f64 / f64::from(count),
            count,
        })
    }

    /// `current` with one more score folded in
    pub fn including(current: Option<Self>, stars: i16) -> Self {
        match current {
            Some(current) => {
                let count = current.count + 1;
                Self {
                    average: (current.average * f64::from(current.count) + f64::from(stars))
                        / f64::from(count),
                    count,
                }
            }
            None => Self {
                average: f64::from(stars),
                count: 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_including_folds_one_score() {
        let first = StarRating::including(None, 5);
        assert_eq!(first, StarRating { average: 5.0, count: 1 });

        let second = StarRating::including(Some(first), 2);
        assert_eq!(second.count, 2);
        assert!((second.average - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_scores() {
        let rating = StarRating::from_scores([5, 4, 3]).unwrap();
        assert_eq!(rating.count, 3);
        assert!((rating.average - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_scores_empty() {
        assert!(StarRating::from_scores(Vec::new()).is_none());
    }
}
