use serde::Serialize;

use crate::api::{check, ApiClient};
use crate::error::AppResult;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Login,
    Register,
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    action: AuthMode,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// POST the credentials; the backend answers with the full session row
    /// for both login and registration.
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        email: &str,
        password: &str,
    ) -> AppResult<Session> {
        let res = self
            .client
            .post(&self.endpoints.auth)
            .json(&AuthRequest {
                action: mode,
                email,
                password,
            })
            .send()
            .await?;

        let res = check(res, "Authentication failed").await?;
        Ok(res.json::<Session>().await?)
    }
}
