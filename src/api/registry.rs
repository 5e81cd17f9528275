use serde::{Deserialize, Serialize};

use crate::api::{check, ApiClient};
use crate::error::AppResult;

/// One row of the reported-username registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    pub telegram_username: String,
    pub is_scammer: bool,
    pub report_count: i64,
    pub description: String,
    pub evidence_url: Option<String>,
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Report>,
}

#[derive(Debug, Serialize)]
struct NewReportRequest<'a> {
    telegram_username: &'a str,
    is_scammer: bool,
    description: &'a str,
    evidence_url: &'a str,
    reported_by: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingKind {
    Like,
    Dislike,
}

#[derive(Debug, Serialize)]
struct RatingRequest {
    report_id: i64,
    user_id: i64,
    rating_type: RatingKind,
}

/// Authoritative vote counts returned after a rating is recorded.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RatingTally {
    pub likes: i64,
    pub dislikes: i64,
}

impl ApiClient {
    /// Substring search over reported usernames.
    pub async fn search_reports(&self, username: &str) -> AppResult<Vec<Report>> {
        let res = self
            .client
            .get(&self.endpoints.registry)
            .query(&[("username", username)])
            .send()
            .await?;

        let res = check(res, "Search failed").await?;
        Ok(res.json::<SearchResponse>().await?.results)
    }

    /// File a new scam report. The backend either inserts a fresh row or
    /// bumps the count on an existing one; the client does not care which.
    pub async fn submit_report(
        &self,
        telegram_username: &str,
        description: &str,
        evidence_url: &str,
        reported_by: i64,
    ) -> AppResult<()> {
        let res = self
            .client
            .post(&self.endpoints.registry)
            .json(&NewReportRequest {
                telegram_username,
                is_scammer: true,
                description,
                evidence_url,
                reported_by,
            })
            .send()
            .await?;

        check(res, "Failed to submit report").await?;
        Ok(())
    }

    /// Record a like/dislike and return the recomputed tallies.
    pub async fn rate_report(
        &self,
        report_id: i64,
        user_id: i64,
        rating_type: RatingKind,
    ) -> AppResult<RatingTally> {
        let res = self
            .client
            .put(&self.endpoints.registry)
            .json(&RatingRequest {
                report_id,
                user_id,
                rating_type,
            })
            .send()
            .await?;

        let res = check(res, "Failed to rate report").await?;
        Ok(res.json::<RatingTally>().await?)
    }
}
