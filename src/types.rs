//! Wire data model for the job API.
//!
//! Field names on the wire are camelCase (`badgeLetters`, `relevanceScore`,
//! `coverImgURL`, ...); the structs below carry the snake_case Rust names.
//! Summaries come back from search, details are fetched lazily per id, and
//! both are immutable once fetched — the cache hands out shared references
//! and nothing downstream may mutate them.

use serde::{Deserialize, Serialize};

/// Summary job record as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    /// Unique, stable job id.
    pub id: u64,
    /// Short company initials rendered as a badge.
    pub badge_letters: String,
    pub title: String,
    pub company: String,
    /// Days since the posting went up.
    pub days_ago: u32,
    pub relevance_score: f64,
    pub date: String,
}

/// Full job record, fetched lazily per id.
///
/// A detail record is a superset of its summary; the summary fields are
/// flattened so the wire shape stays a single flat object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub summary: JobSummary,
    pub description: String,
    pub qualifications: Vec<String>,
    pub duration: String,
    pub reviews: Vec<String>,
    pub salary: String,
    pub location: String,
    #[serde(rename = "coverImgURL")]
    pub cover_img_url: String,
    #[serde(rename = "companyURL")]
    pub company_url: String,
}

impl JobDetail {
    /// Unique, stable job id.
    pub fn id(&self) -> u64 {
        self.summary.id
    }
}

/// Success envelope of `GET <base>?search=<text>`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub job_items: Vec<JobSummary>,
}

/// Success envelope of `GET <base>/<id>`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailResponse {
    pub job_item: JobDetail,
}

/// Error envelope the API uses for non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub description: String,
}
