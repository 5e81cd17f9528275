use std::time::Duration;

use url::Url;

/// Privileged display id allowed into the admin screen. The backend applies
/// the same check to every request carrying `X-User-Id`; the client-side
/// comparison only decides whether admin UI is shown at all.
pub const ADMIN_USER_ID: &str = "1001";

/// Fixed refresh period for the messages of an open chat.
pub const CHAT_POLL_INTERVAL: Duration = Duration::from_secs(3);

const AUTH_URL: &str = "https://functions.poehali.dev/f1d05e6d-925e-4fa1-83fa-e8b2c8ab171a";
const REGISTRY_URL: &str = "https://functions.poehali.dev/0769ac85-d5d6-4db8-bb26-69a446ef51d9";
const FRIENDS_URL: &str = "https://functions.poehali.dev/2f80e002-f06f-423f-a633-a2c26f5c4cf8";
const PROFILE_URL: &str = "https://functions.poehali.dev/1de1e77d-129c-4a35-83e8-5e53edd71c52";
const CHAT_URL: &str = "https://functions.poehali.dev/1643f5ec-0f6e-4d2a-8b6e-0e65754bc836";

/// Table mapping each logical backend function to its endpoint URL.
///
/// The backend is deployed as independent serverless functions, so every
/// concern gets its own URL rather than a path under one base.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub auth: String,
    pub registry: String,
    pub friends: String,
    pub profile: String,
    pub chat: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            auth: AUTH_URL.to_string(),
            registry: REGISTRY_URL.to_string(),
            friends: FRIENDS_URL.to_string(),
            profile: PROFILE_URL.to_string(),
            chat: CHAT_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Baked-in table with per-function environment overrides. An override
    /// that is empty or not an absolute URL is ignored in favor of the
    /// default.
    pub fn from_env() -> Self {
        Self {
            auth: env_url("SCAMKADR_AUTH_URL", AUTH_URL),
            registry: env_url("SCAMKADR_REGISTRY_URL", REGISTRY_URL),
            friends: env_url("SCAMKADR_FRIENDS_URL", FRIENDS_URL),
            profile: env_url("SCAMKADR_PROFILE_URL", PROFILE_URL),
            chat: env_url("SCAMKADR_CHAT_URL", CHAT_URL),
        }
    }
}

fn env_url(name: &str, default: &str) -> String {
    let raw = match std::env::var(name) {
        Ok(value) => value,
        Err(_) => return default.to_string(),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default.to_string();
    }

    match Url::parse(trimmed) {
        Ok(_) => trimmed.to_string(),
        Err(err) => {
            tracing::warn!(
                component = "config",
                var = name,
                error = %err,
                "ignoring invalid endpoint override"
            );
            default.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_override_replaces_default() {
        std::env::set_var("SCAMKADR_TEST_VALID_URL", "http://127.0.0.1:9000/auth");
        assert_eq!(
            env_url("SCAMKADR_TEST_VALID_URL", AUTH_URL),
            "http://127.0.0.1:9000/auth"
        );
    }

    #[test]
    fn invalid_override_falls_back() {
        std::env::set_var("SCAMKADR_TEST_BROKEN_URL", "not a url");
        assert_eq!(env_url("SCAMKADR_TEST_BROKEN_URL", AUTH_URL), AUTH_URL);
    }

    #[test]
    fn missing_override_falls_back() {
        assert_eq!(env_url("SCAMKADR_TEST_UNSET_URL", CHAT_URL), CHAT_URL);
    }
}
