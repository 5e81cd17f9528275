use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

use crate::api::{check, ApiClient};
use crate::error::AppResult;
use crate::session::Session;

#[derive(Debug, Serialize)]
struct UpdateAvatarRequest<'a> {
    user_id: i64,
    avatar_url: &'a str,
}

impl ApiClient {
    /// Fetch the caller's own profile row.
    pub async fn fetch_profile(&self, user_id: i64) -> AppResult<Session> {
        let res = self
            .client
            .get(&self.endpoints.profile)
            .query(&[("user_id", user_id.to_string())])
            .send()
            .await?;

        let res = check(res, "Failed to load profile").await?;
        Ok(res.json::<Session>().await?)
    }

    /// Point the avatar at a URL. The backend answers with the full updated
    /// session row, which replaces the cached one wholesale.
    pub async fn update_avatar_url(&self, user_id: i64, avatar_url: &str) -> AppResult<Session> {
        let res = self
            .client
            .put(&self.endpoints.profile)
            .json(&UpdateAvatarRequest {
                user_id,
                avatar_url,
            })
            .send()
            .await?;

        let res = check(res, "Failed to update avatar").await?;
        Ok(res.json::<Session>().await?)
    }

    /// Upload raw image bytes, encoded for transport as a data URL.
    pub async fn update_avatar_image(&self, user_id: i64, image: &[u8]) -> AppResult<Session> {
        let avatar_url = format!("data:image/jpeg;base64,{}", BASE64.encode(image));
        self.update_avatar_url(user_id, &avatar_url).await
    }
}
