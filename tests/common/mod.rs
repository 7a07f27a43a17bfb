//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use devscout::{DevscoutError, JobApi, JobDetail, JobSummary, Result};
use tokio::time::sleep;

pub fn summary(id: u64, relevance_score: f64, days_ago: u32) -> JobSummary {
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

pub fn detail(id: u64) -> JobDetail {
    JobDetail {
        summary: summary(id, 1.0, 1),
        description: "Build and ship things.".to_string(),
        qualifications: vec!["Rust".to_string(), "Tokio".to_string()],
        duration: "Full-time".to_string(),
        reviews: vec!["Great team".to_string()],
        salary: "100k".to_string(),
        location: "Remote".to_string(),
        cover_img_url: "https://example.com/cover.png".to_string(),
        company_url: "https://example.com".to_string(),
    }
}

/// Counting in-memory job API. Clones share the counters, so a test can
/// keep one clone for assertions after handing the other to an `App`.
///
/// Search results: `"react"` returns A (id 1, score 10, 5 days old) and
/// B (id 2, score 20, 1 day old); `"many"` returns ids 1..=10; anything
/// else returns no results. Detail fetches fail for id 42 with the API's
/// 404 error shape.
#[derive(Clone)]
pub struct MockJobApi {
    search_calls: Arc<AtomicUsize>,
    detail_calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl MockJobApi {
    pub fn new() -> Self {
        Self {
            search_calls: Arc::new(AtomicUsize::new(0)),
            detail_calls: Arc::new(AtomicUsize::new(0)),
            delay: Duration::from_millis(10),
        }
    }

    pub fn search_count(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_count(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

impl JobApi for MockJobApi {
    async fn search_jobs(&self, text: &str) -> Result<Vec<JobSummary>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.delay).await;
        match text {
            "react" => Ok(vec![summary(1, 10.0, 5), summary(2, 20.0, 1)]),
            "many" => Ok((1..=10).map(|id| summary(id, id as f64, 1)).collect()),
            _ => Ok(vec![]),
        }
    }

    async fn job_detail(&self, id: u64) -> Result<JobDetail> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.delay).await;
        if id == 42 {
            return Err(DevscoutError::Api {
                status: 404,
                message: "Not found".to_string(),
            });
        }
        Ok(detail(id))
    }
}
