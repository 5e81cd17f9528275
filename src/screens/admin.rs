use std::sync::Arc;

use crate::api::admin::{AbuseReport, AdminUser};
use crate::api::ApiClient;
use crate::config::ADMIN_USER_ID;
use crate::error::AppResult;
use crate::session::Session;

/// Gate decision for the admin screen. `Denied` means route back to the
/// landing screen: nothing is rendered and nothing is loaded. The gate only
/// hides the affordance; the backend checks the identity header on every
/// privileged request regardless.
pub enum AdminAccess {
    Granted(AdminScreen),
    Denied,
}

/// Controller for the admin screen: a combined users+reports snapshot and
/// two mutations, each followed by a full reload.
pub struct AdminScreen {
    api: Arc<ApiClient>,
    acting_user_id: String,
    users: Vec<AdminUser>,
    reports: Vec<AbuseReport>,
    loading: bool,
}

impl AdminScreen {
    /// Compare the cached session's display id against the privileged id.
    pub fn enter(api: Arc<ApiClient>, session: Option<&Session>) -> AdminAccess {
        match session {
            Some(session) if session.user_id == ADMIN_USER_ID => {
                AdminAccess::Granted(Self {
                    api,
                    acting_user_id: session.user_id.clone(),
                    users: Vec::new(),
                    reports: Vec::new(),
                    loading: true,
                })
            }
            _ => AdminAccess::Denied,
        }
    }

    /// Load the snapshot. The loading flag clears whichever way this ends.
    pub async fn load(&mut self) -> AppResult<()> {
        let outcome = self.api.admin_snapshot(&self.acting_user_id).await;
        self.loading = false;

        let snapshot = outcome?;
        self.users = snapshot.users;
        self.reports = snapshot.reports;
        Ok(())
    }

    pub async fn toggle_creator(&mut self, user_id: i64) -> AppResult<()> {
        self.api
            .admin_toggle_creator(&self.acting_user_id, user_id)
            .await?;
        self.load().await
    }

    pub async fn delete_report(&mut self, report_id: i64) -> AppResult<()> {
        self.api
            .admin_delete_report(&self.acting_user_id, report_id)
            .await?;
        self.load().await
    }

    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    pub fn reports(&self) -> &[AbuseReport] {
        &self.reports
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::HeaderMap;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::api::test_support::client_against;

    use super::*;

    fn admin_session() -> Session {
        Session {
            id: 1,
            user_id: "1001".to_string(),
            email: "root@scamkadr.dev".to_string(),
            is_creator: true,
            avatar_url: None,
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
                "id": 5,
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
    async fn gate_denies_every_id_but_the_privileged_one() {
        let api = client_against(Router::new()).await;

        let other = Session {
            user_id: "#1007".to_string(),
            ..admin_session()
        };
        assert!(matches!(
            AdminScreen::enter(api.clone(), Some(&other)),
            AdminAccess::Denied
        ));
        assert!(matches!(AdminScreen::enter(api.clone(), None), AdminAccess::Denied));
        assert!(matches!(
            AdminScreen::enter(api, Some(&admin_session())),
            AdminAccess::Granted(_)
        ));
    }

    #[tokio::test]
    async fn granted_entry_loads_the_snapshot() {
        let router = Router::new().route(
            "/registry",
            get(|headers: HeaderMap| async move {
                assert_eq!(
                    headers.get("x-user-id").and_then(|v| v.to_str().ok()),
                    Some("1001")
                );
                Json(snapshot_body())
            }),
        );
        let api = client_against(router).await;

        let mut screen = match AdminScreen::enter(api, Some(&admin_session())) {
            AdminAccess::Granted(screen) => screen,
            AdminAccess::Denied => panic!("admin id must pass the gate"),
        };

        assert!(screen.is_loading());
        screen.load().await.expect("load snapshot");
        assert!(!screen.is_loading());
        assert_eq!(screen.users().len(), 1);
        assert_eq!(screen.reports().len(), 1);
    }

    #[tokio::test]
    async fn mutations_reload_instead_of_patching() {
        static SNAPSHOTS: AtomicUsize = AtomicUsize::new(0);

        let router = Router::new().route(
            "/registry",
            get(|| async {
                SNAPSHOTS.fetch_add(1, Ordering::SeqCst);
                Json(snapshot_body())
            })
            .post(|Json(body): Json<Value>| async move {
                match body["action"].as_str() {
                    Some("toggle_creator") => {
                        Json(json!({ "success": true, "is_creator": true }))
                    }
                    Some("delete_report") => Json(json!({ "success": true })),
                    other => panic!("unexpected action {:?}", other),
                }
            }),
        );
        let api = client_against(router).await;

        let mut screen = match AdminScreen::enter(api, Some(&admin_session())) {
            AdminAccess::Granted(screen) => screen,
            AdminAccess::Denied => panic!("admin id must pass the gate"),
        };

        screen.load().await.expect("initial load");
        screen.toggle_creator(7).await.expect("toggle creator");
        screen.delete_report(5).await.expect("delete report");

        // one initial snapshot plus one reload per mutation
        assert_eq!(SNAPSHOTS.load(Ordering::SeqCst), 3);
    }
}
