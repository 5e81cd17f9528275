use serde::{Deserialize, Serialize};

use crate::api::{check, ApiClient};
use crate::error::AppResult;

/// A row of the caller's friends list. `status` is `"pending"` for an
/// incoming request and `"accepted"` for an established friend;
/// `friendship_id` is only present while the request is actionable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friend {
    pub id: i64,
    pub user_id: String,
    pub email: String,
    pub is_creator: bool,
    pub avatar_url: Option<String>,
    pub status: String,
    pub friendship_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct FriendsResponse {
    #[serde(default)]
    friends: Vec<Friend>,
}

#[derive(Debug, Serialize)]
struct AddFriendRequest<'a> {
    user_id: i64,
    friend_user_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AddFriendResponse {
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendRequestAction {
    Accept,
    Reject,
}

#[derive(Debug, Serialize)]
struct RespondRequest {
    friendship_id: i64,
    action: FriendRequestAction,
}

impl ApiClient {
    pub async fn list_friends(&self, user_id: i64) -> AppResult<Vec<Friend>> {
        let res = self
            .client
            .get(&self.endpoints.friends)
            .query(&[("user_id", user_id.to_string())])
            .send()
            .await?;

        let res = check(res, "Failed to load friends").await?;
        Ok(res.json::<FriendsResponse>().await?.friends)
    }

    /// Send a friend request addressed by display id. The optional message
    /// is the backend's confirmation text.
    pub async fn add_friend(
        &self,
        user_id: i64,
        friend_user_id: &str,
    ) -> AppResult<Option<String>> {
        let res = self
            .client
            .post(&self.endpoints.friends)
            .json(&AddFriendRequest {
                user_id,
                friend_user_id,
            })
            .send()
            .await?;

        let res = check(res, "Failed to add friend").await?;
        Ok(res.json::<AddFriendResponse>().await?.message)
    }

    pub async fn respond_friend_request(
        &self,
        friendship_id: i64,
        action: FriendRequestAction,
    ) -> AppResult<()> {
        let res = self
            .client
            .put(&self.endpoints.friends)
            .json(&RespondRequest {
                friendship_id,
                action,
            })
            .send()
            .await?;

        check(res, "Failed to update friend request").await?;
        Ok(())
    }
}
