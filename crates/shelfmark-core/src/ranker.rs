//! "Two newest, rest shuffled" selection.

use shelfmark_catalog::{QueryPlan, SortDirection};

use crate::composer::BookQueryComposer;
use crate::criteria::{QueryCriteria, SortKind};

/// Rows fetched (newest first) before ranking.
pub const OVER_FETCH_LIMIT: usize = 100;

/// Leading records kept in date order.
pub const FRESH_COUNT: usize = 2;

/// Keeps the freshest records first and shuffles the remainder.
#[derive(Debug, Clone, Default)]
pub struct FreshnessShuffleRanker {
    seed: Option<u64>,
}

impl FreshnessShuffleRanker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic shuffles, for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// The over-fetch plan: `criteria` sorted newest first with a limit of
    /// [`OVER_FETCH_LIMIT`]. The caller's offset is kept.
    pub fn over_fetch_plan(criteria: &QueryCriteria) -> QueryPlan {
        let over_fetch = criteria
            .clone()
            .sorted_by(SortKind::Newest, SortDirection::Desc)
            .with_limit(OVER_FETCH_LIMIT);
        BookQueryComposer::compose(&over_fetch)
    }

    /// Rank date-sorted `records`: keep the first [`FRESH_COUNT`], shuffle the
    /// rest, drop repeated values (first occurrence wins), take `limit`.
    pub fn rank<T: PartialEq>(&self, records: Vec<T>, limit: usize) -> Vec<T> {
        if records.is_empty() {
            return records;
        }

        let mut rng = match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let mut records = records;
        let split = records.len().min(FRESH_COUNT);
        rng.shuffle(&mut records[split..]);

        let mut ranked: Vec<T> = Vec::with_capacity(limit.min(records.len()));
        for record in records {
            if ranked.len() == limit {
                break;
            }
            if !ranked.contains(&record) {
                ranked.push(record);
            }
        }
        ranked
    }
}

#[cfg(test)]
mod tests {
    use shelfmark_catalog::OrderBy;

    use super::*;
    use crate::criteria::Filter;

    #[test]
    fn two_freshest_lead_for_any_seed() {
        let records: Vec<u32> = (0..10).collect();

        for seed in 0..50 {
            let ranked = FreshnessShuffleRanker::with_seed(seed).rank(records.clone(), 5);
            assert_eq!(ranked.len(), 5);
            assert_eq!(&ranked[..2], &[0, 1]);
            assert!(ranked[2..].iter().all(|value| *value >= 2));
        }
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let ranked = FreshnessShuffleRanker::with_seed(7).rank(vec!["a", "b", "a", "a", "b"], 5);
        assert_eq!(ranked, vec!["a", "b"]);
    }

    #[test]
    fn empty_and_short_inputs() {
        let ranker = FreshnessShuffleRanker::new();
        assert!(ranker.rank(Vec::<u8>::new(), 5).is_empty());
        assert_eq!(ranker.rank(vec![3_u8], 5), vec![3]);
        assert_eq!(ranker.rank(vec![3_u8, 4], 1), vec![3]);
    }

    #[test]
    fn over_fetch_plan_sorts_newest_first_and_keeps_offset() {
        let criteria = QueryCriteria::new()
            .with_filter(Filter::Genre(String::from("fiction")))
            .with_offset(10)
            .with_limit(5);
        let plan = FreshnessShuffleRanker::over_fetch_plan(&criteria);

        assert_eq!(plan.limit(), Some(OVER_FETCH_LIMIT));
        assert_eq!(plan.offset(), 10);
        assert!(matches!(plan.order(), OrderBy::Columns(terms) if terms.len() == 2));
    }
}
