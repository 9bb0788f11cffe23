use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::SearchError;

/// How a fan-out stage runs. Both policies produce the same results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPolicy {
    #[default]
    #[serde(alias = "seq")]
    Sequential,
    #[serde(alias = "par")]
    Parallel,
}

impl ExecutionPolicy {
    /// Run `f` on every item, returning once all calls are done.
    pub(crate) fn for_each<T, F>(self, items: &[T], f: F)
    where
        T: Sync,
        F: Fn(&T) + Sync + Send,
    {
        match self {
            ExecutionPolicy::Sequential => items.iter().for_each(f),
            ExecutionPolicy::Parallel => items.par_iter().for_each(f),
        }
    }

    pub(crate) fn any<T, F>(self, items: &[T], f: F) -> bool
    where
        T: Sync,
        F: Fn(&T) -> bool + Sync + Send,
    {
        match self {
            ExecutionPolicy::Sequential => items.iter().any(f),
            ExecutionPolicy::Parallel => items.par_iter().any(f),
        }
    }

    /// Keep the items matching `f`, preserving input order.
    pub(crate) fn filter<T, F>(self, items: Vec<T>, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&T) -> bool + Sync + Send,
    {
        match self {
            ExecutionPolicy::Sequential => items.into_iter().filter(f).collect(),
            ExecutionPolicy::Parallel => items.into_par_iter().filter(f).collect(),
        }
    }

    /// Stable sort.
    pub(crate) fn sort_by<T, F>(self, items: &mut [T], compare: F)
    where
        T: Send,
        F: Fn(&T, &T) -> std::cmp::Ordering + Sync,
    {
        match self {
            ExecutionPolicy::Sequential => items.sort_by(compare),
            ExecutionPolicy::Parallel => items.par_sort_by(compare),
        }
    }
}

impl FromStr for ExecutionPolicy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seq" | "sequential" => Ok(ExecutionPolicy::Sequential),
            "par" | "parallel" => Ok(ExecutionPolicy::Parallel),
            _ => Err(SearchError::InvalidArgument(format!("unknown execution policy {s:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn both_policies_visit_every_item() {
        let items: Vec<usize> = (1..=100).collect();
        for policy in [ExecutionPolicy::Sequential, ExecutionPolicy::Parallel] {
            let sum = AtomicUsize::new(0);
            policy.for_each(&items, |i| {
                sum.fetch_add(*i, Ordering::Relaxed);
            });
            assert_eq!(sum.into_inner(), 5050);
        }
    }

    #[test]
    fn filter_preserves_order() {
        let items: Vec<i32> = (0..50).collect();
        let seq = ExecutionPolicy::Sequential.filter(items.clone(), |i| i % 3 == 0);
        let par = ExecutionPolicy::Parallel.filter(items, |i| i % 3 == 0);
        assert_eq!(seq, par);
    }

    #[test]
    fn parses_short_and_long_names() {
        assert_eq!("par".parse::<ExecutionPolicy>().unwrap(), ExecutionPolicy::Parallel);
        assert_eq!("sequential".parse::<ExecutionPolicy>().unwrap(), ExecutionPolicy::Sequential);
        let err = "fast".parse::<ExecutionPolicy>().unwrap_err();
        assert!(matches!(err, SearchError::InvalidArgument(_)));
        assert_eq!(err.to_string(), "invalid argument: unknown execution policy \"fast\"");
    }
}
