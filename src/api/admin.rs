use serde::{Deserialize, Serialize};

use crate::api::{check, ApiClient};
use crate::error::AppResult;

/// Privileged calls identify the caller through this header. The backend is
/// the authority on whether that id may act; the client just forwards it.
pub const HEADER_USER_ID: &str = "X-User-Id";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub user_id: String,
    pub email: String,
    pub is_creator: bool,
    pub avatar_url: Option<String>,
    pub created_at: Option<String>,
}

/// A pending abuse report between two users, denormalized with both parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbuseReport {
    pub id: i64,
    pub reporter_id: i64,
    pub reported_user_id: i64,
    pub reason: String,
    pub created_at: Option<String>,
    pub status: String,
    pub reporter_user_id: String,
    pub reporter_email: String,
    pub reported_user_id_str: String,
    pub reported_email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSnapshot {
    #[serde(default)]
    pub users: Vec<AdminUser>,
    #[serde(default)]
    pub reports: Vec<AbuseReport>,
}

#[derive(Debug, Serialize)]
struct ToggleCreatorRequest {
    action: &'static str,
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct ToggleCreatorResponse {
    is_creator: bool,
}

#[derive(Debug, Serialize)]
struct DeleteReportRequest {
    action: &'static str,
    report_id: i64,
}

impl ApiClient {
    /// Combined users+reports snapshot for the admin screen.
    pub async fn admin_snapshot(&self, acting_user_id: &str) -> AppResult<AdminSnapshot> {
        let res = self
            .client
            .get(&self.endpoints.registry)
            .header(HEADER_USER_ID, acting_user_id)
            .send()
            .await?;

        let res = check(res, "Failed to load admin data").await?;
        Ok(res.json::<AdminSnapshot>().await?)
    }

    /// Flip a user's creator flag; returns the new value.
    pub async fn admin_toggle_creator(
        &self,
        acting_user_id: &str,
        user_id: i64,
    ) -> AppResult<bool> {
        let res = self
            .client
            .post(&self.endpoints.registry)
            .header(HEADER_USER_ID, acting_user_id)
            .json(&ToggleCreatorRequest {
                action: "toggle_creator",
                user_id,
            })
            .send()
            .await?;

        let res = check(res, "Failed to toggle creator status").await?;
        Ok(res.json::<ToggleCreatorResponse>().await?.is_creator)
    }

    pub async fn admin_delete_report(
        &self,
        acting_user_id: &str,
        report_id: i64,
    ) -> AppResult<()> {
        let res = self
            .client
            .post(&self.endpoints.registry)
            .header(HEADER_USER_ID, acting_user_id)
            .json(&DeleteReportRequest {
                action: "delete_report",
                report_id,
            })
            .send()
            .await?;

        check(res, "Failed to delete report").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::api::test_support::client_against;
    use crate::error::AppErrorCode;

    use super::*;

    fn require_admin_header(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
        match headers.get("x-user-id").and_then(|v| v.to_str().ok()) {
            Some("1001") => Ok(()),
            _ => Err((
                StatusCode::FORBIDDEN,
                Json(json!({"error": "Not authorized"})),
            )),
        }
    }

    fn snapshot_body() -> Value {
        json!({
            "users": [{
                "id": 7,
                "user_id": "#1007",
                "email": "a@b.com",
                "is_creator": false,
                "avatar_url": null,
                "created_at": "2025-01-01T00:00:00"
            }],
            "reports": [{
                "id": 1,
                "reporter_id": 7,
                "reported_user_id": 8,
                "reason": "spam",
                "created_at": "2025-01-02T00:00:00",
                "status": "pending",
                "reporter_user_id": "#1007",
                "reporter_email": "a@b.com",
                "reported_user_id_str": "#1008",
                "reported_email": "z@b.com"
            }]
        })
    }

    #[tokio::test]
    async fn snapshot_rides_the_identity_header() {
        let router = Router::new().route(
            "/registry",
            get(|headers: HeaderMap| async move {
                require_admin_header(&headers)?;
                Ok::<_, (StatusCode, Json<Value>)>(Json(snapshot_body()))
            }),
        );
        let api = client_against(router).await;

        let snapshot = api.admin_snapshot("1001").await.expect("snapshot");
        assert_eq!(snapshot.users.len(), 1);
        assert_eq!(snapshot.reports.len(), 1);
        assert_eq!(snapshot.reports[0].status, "pending");

        let err = api
            .admin_snapshot("1002")
            .await
            .expect_err("non-admin id must be rejected by the backend");
        assert_eq!(err.code, AppErrorCode::Api);
        assert_eq!(err.message, "Not authorized");
    }

    #[tokio::test]
    async fn toggle_creator_reports_the_new_flag() {
        let router = Router::new().route(
            "/registry",
            get(|| async { Json(json!({})) }).post(
                |headers: HeaderMap, Json(body): Json<Value>| async move {
                    require_admin_header(&headers)?;
                    assert_eq!(body["action"], "toggle_creator");
                    assert_eq!(body["user_id"], 7);
                    Ok::<_, (StatusCode, Json<Value>)>(Json(
                        json!({ "success": true, "is_creator": true }),
                    ))
                },
            ),
        );
        let api = client_against(router).await;

        let is_creator = api
            .admin_toggle_creator("1001", 7)
            .await
            .expect("toggle creator");
        assert!(is_creator);
    }

    #[tokio::test]
    async fn delete_report_posts_the_report_id() {
        let router = Router::new().route(
            "/registry",
            get(|| async { Json(json!({})) }).post(
                |headers: HeaderMap, Json(body): Json<Value>| async move {
                    require_admin_header(&headers)?;
                    assert_eq!(body["action"], "delete_report");
                    assert_eq!(body["report_id"], 5);
                    Ok::<_, (StatusCode, Json<Value>)>(Json(json!({ "success": true })))
                },
            ),
        );
        let api = client_against(router).await;

        api.admin_delete_report("1001", 5)
            .await
            .expect("delete report");
    }
}
