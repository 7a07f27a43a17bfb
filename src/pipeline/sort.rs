//! Sort functions for job results.
//!
//! Both comparators rely on the standard library's stable sort: jobs that
//! compare equal keep their fetch order.

use std::str::FromStr;

use crate::error::DevscoutError;
use crate::types::JobSummary;

/// Sort mode for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    #[default]
    Relevant,
    Recent,
}

impl SortMode {
    /// All valid string representations of this enum.
    pub const ALL_STRINGS: &[&str] = &["relevant", "recent"];
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::Relevant => write!(f, "relevant"),
            SortMode::Recent => write!(f, "recent"),
        }
    }
}

impl FromStr for SortMode {
    type Err = DevscoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "relevant" => Ok(SortMode::Relevant),
            "recent" => Ok(SortMode::Recent),
            _ => Err(DevscoutError::InvalidSortMode(s.to_string())),
        }
    }
}

/// Sort jobs by relevance score (highest first).
pub fn sort_by_relevance(jobs: &mut [JobSummary]) {
    jobs.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}

/// Sort jobs by recency (fewest days ago first).
pub fn sort_by_recency(jobs: &mut [JobSummary]) {
    jobs.sort_by(|a, b| a.days_ago.cmp(&b.days_ago));
}

/// Sort jobs by the specified mode.
pub fn sort_jobs_by(jobs: &mut [JobSummary], sort_by: SortMode) {
    match sort_by {
        SortMode::Relevant => sort_by_relevance(jobs),
        SortMode::Recent => sort_by_recency(jobs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: u64, relevance_score: f64, days_ago: u32) -> JobSummary {
        JobSummary {
            id,
            badge_letters: "XX".to_string(),
            title: format!("Job {id}"),
            company: "Example Co".to_string(),
            days_ago,
            relevance_score,
            date: "2024-01-01".to_string(),
        }
    }

    fn ids(jobs: &[JobSummary]) -> Vec<u64> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[test]
    fn test_sort_by_relevance() {
        let mut jobs = vec![job(1, 10.0, 5), job(2, 30.0, 2), job(3, 20.0, 1)];
        sort_by_relevance(&mut jobs);
        assert_eq!(ids(&jobs), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_by_recency() {
        let mut jobs = vec![job(1, 10.0, 5), job(2, 30.0, 2), job(3, 20.0, 1)];
        sort_by_recency(&mut jobs);
        assert_eq!(ids(&jobs), vec![3, 2, 1]);
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let mut jobs = vec![job(7, 10.0, 3), job(8, 10.0, 3), job(9, 10.0, 3)];
        sort_by_relevance(&mut jobs);
        assert_eq!(ids(&jobs), vec![7, 8, 9]);
        sort_by_recency(&mut jobs);
        assert_eq!(ids(&jobs), vec![7, 8, 9]);
    }

    #[test]
    fn test_sorting_sorted_input_is_identical() {
        let mut jobs = vec![job(2, 30.0, 2), job(3, 20.0, 1), job(1, 10.0, 5)];
        sort_by_relevance(&mut jobs);
        let once = ids(&jobs);
        sort_by_relevance(&mut jobs);
        assert_eq!(ids(&jobs), once);
    }

    #[test]
    fn test_sort_jobs_by_dispatches() {
        let mut by_relevance = vec![job(1, 10.0, 5), job(2, 30.0, 2)];
        sort_jobs_by(&mut by_relevance, SortMode::Relevant);
        assert_eq!(ids(&by_relevance), vec![2, 1]);

        let mut by_recency = vec![job(1, 10.0, 5), job(2, 30.0, 2)];
        sort_jobs_by(&mut by_recency, SortMode::Recent);
        assert_eq!(ids(&by_recency), vec![2, 1]);
    }

    #[test]
    fn test_sort_mode_from_str() {
        assert_eq!("relevant".parse::<SortMode>().unwrap(), SortMode::Relevant);
        assert_eq!("recent".parse::<SortMode>().unwrap(), SortMode::Recent);
        assert_eq!("Relevant".parse::<SortMode>().unwrap(), SortMode::Relevant);
        assert_eq!("RECENT".parse::<SortMode>().unwrap(), SortMode::Recent);
        assert!("newest".parse::<SortMode>().is_err());
        assert!("".parse::<SortMode>().is_err());
    }

    #[test]
    fn test_sort_mode_display_and_default() {
        assert_eq!(SortMode::Relevant.to_string(), "relevant");
        assert_eq!(SortMode::Recent.to_string(), "recent");
        assert_eq!(SortMode::default(), SortMode::Relevant);
    }
}
