use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::api::auth::AuthMode;
use crate::api::chat::{Chat, Message};
use crate::api::friends::{Friend, FriendRequestAction};
use crate::api::registry::{RatingKind, Report};
use crate::api::ApiClient;
use crate::config;
use crate::error::{AppError, AppResult};
use crate::poller::Poller;
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Profile,
    Friends,
}

/// Where the screen is in its lifecycle. Tab state only exists once
/// authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Anonymous,
    Authenticating,
    Authenticated(Tab),
}

/// Search result display state. `Idle` means nothing was searched yet;
/// `NotFound` means a real query matched nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Searching,
    Found(Vec<Report>),
    NotFound,
}

/// The scam-report form. Cleared and closed as one unit after a
/// successful submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportForm {
    pub open: bool,
    pub username: String,
    pub description: String,
    pub evidence_url: String,
}

struct OpenChat {
    chat_id: i64,
    messages: Arc<Mutex<Vec<Message>>>,
    poller: Poller,
}

struct LandingState {
    phase: Phase,
    session: Option<Session>,
    search_query: String,
    search_generation: u64,
    search: SearchState,
    report_form: ReportForm,
    friends: Vec<Friend>,
    chats: Vec<Chat>,
    open_chat: Option<OpenChat>,
}

/// Controller for the landing screen: authentication, registry search,
/// report submission, ratings, friends and direct messages.
///
/// State lives behind a lock that is never held across a network call, so a
/// superseded action's response can land after a newer one; stale search
/// responses are dropped by generation, and a closed chat's poll responses
/// land in a buffer nothing reads anymore.
#[derive(Clone)]
pub struct LandingScreen {
    api: Arc<ApiClient>,
    store: SessionStore,
    poll_interval: Duration,
    state: Arc<Mutex<LandingState>>,
}

impl LandingScreen {
    /// Restore any cached session and start on the matching phase.
    pub fn new(api: Arc<ApiClient>, store: SessionStore) -> Self {
        let session = store.restore();
        let phase = if session.is_some() {
            Phase::Authenticated(Tab::Search)
        } else {
            Phase::Anonymous
        };

        Self {
            api,
            store,
            poll_interval: config::CHAT_POLL_INTERVAL,
            state: Arc::new(Mutex::new(LandingState {
                phase,
                session,
                search_query: String::new(),
                search_generation: 0,
                search: SearchState::Idle,
                report_form: ReportForm::default(),
                friends: Vec::new(),
                chats: Vec::new(),
                open_chat: None,
            })),
        }
    }

    pub fn with_poll_interval(mut self, period: Duration) -> Self {
        self.poll_interval = period;
        self
    }

    // --- auth ---

    pub async fn authenticate(
        &self,
        mode: AuthMode,
        email: &str,
        password: &str,
    ) -> AppResult<Session> {
        {
            self.state.lock().await.phase = Phase::Authenticating;
        }

        let outcome = self.api.authenticate(mode, email, password).await;

        let mut st = self.state.lock().await;
        match outcome {
            Ok(session) => {
                if let Err(err) = self.store.save(&session) {
                    st.phase = Phase::Anonymous;
                    return Err(err.into());
                }
                st.session = Some(session.clone());
                st.phase = Phase::Authenticated(Tab::Search);
                tracing::info!(
                    component = "auth",
                    user_id = %session.user_id,
                    "signed in"
                );
                Ok(session)
            }
            Err(err) => {
                st.phase = Phase::Anonymous;
                Err(err)
            }
        }
    }

    /// Drop the session everywhere: open chat closed, lists emptied, durable
    /// entry removed.
    pub async fn log_out(&self) -> AppResult<()> {
        {
            let mut st = self.state.lock().await;
            st.open_chat.take();
            st.session = None;
            st.phase = Phase::Anonymous;
            st.friends.clear();
            st.chats.clear();
            st.search = SearchState::Idle;
            st.search_query.clear();
        }

        self.store.clear()?;
        tracing::info!(component = "auth", "signed out");
        Ok(())
    }

    async fn current_session(&self) -> AppResult<Session> {
        self.state
            .lock()
            .await
            .session
            .clone()
            .ok_or_else(|| AppError::auth("Not authenticated"))
    }

    // --- tabs ---

    /// Pure local transition, except that entering Friends refreshes the
    /// friends and chats lists (failures there are logged, not surfaced).
    pub async fn set_tab(&self, tab: Tab) -> AppResult<()> {
        {
            let mut st = self.state.lock().await;
            if st.session.is_none() {
                return Err(AppError::auth("Not authenticated"));
            }
            st.phase = Phase::Authenticated(tab);
        }

        if tab == Tab::Friends {
            if let Err(err) = self.refresh_friends().await {
                tracing::warn!(component = "friends", error = %err, "friends refresh failed");
            }
            if let Err(err) = self.refresh_chats().await {
                tracing::warn!(component = "chat", error = %err, "chats refresh failed");
            }
        }
        Ok(())
    }

    // --- search ---

    pub async fn set_search_query(&self, value: impl Into<String>) {
        self.state.lock().await.search_query = value.into();
    }

    /// Run the current query against the registry. An empty query is a local
    /// validation failure and never reaches the network. Responses from
    /// superseded searches are dropped: last issued wins.
    pub async fn search(&self) -> AppResult<()> {
        let (query, generation) = {
            let mut st = self.state.lock().await;
            let query = st.search_query.trim().to_string();
            if query.is_empty() {
                return Err(AppError::validation("Enter a username to search"));
            }
            st.search_generation += 1;
            st.search = SearchState::Searching;
            (query, st.search_generation)
        };

        let outcome = self.api.search_reports(&query).await;

        let mut st = self.state.lock().await;
        if st.search_generation != generation {
            // a newer search owns the display now
            return Ok(());
        }

        match outcome {
            Ok(results) if results.is_empty() => {
                st.search = SearchState::NotFound;
                Ok(())
            }
            Ok(results) => {
                st.search = SearchState::Found(results);
                Ok(())
            }
            Err(err) => {
                st.search = SearchState::Idle;
                Err(err)
            }
        }
    }

    // --- scam reports ---

    pub async fn toggle_report_form(&self) {
        let mut st = self.state.lock().await;
        st.report_form.open = !st.report_form.open;
    }

    pub async fn set_report_draft(&self, username: &str, description: &str, evidence_url: &str) {
        let mut st = self.state.lock().await;
        st.report_form.username = username.to_string();
        st.report_form.description = description.to_string();
        st.report_form.evidence_url = evidence_url.to_string();
    }

    /// Submit the drafted report. All three fields are required before any
    /// request is made; success clears and closes the form.
    pub async fn submit_report(&self) -> AppResult<()> {
        let session = self.current_session().await?;
        let draft = self.state.lock().await.report_form.clone();

        if draft.username.trim().is_empty()
            || draft.description.trim().is_empty()
            || draft.evidence_url.trim().is_empty()
        {
            return Err(AppError::validation(
                "Fill in every field and attach evidence",
            ));
        }

        self.api
            .submit_report(
                draft.username.trim(),
                &draft.description,
                &draft.evidence_url,
                session.id,
            )
            .await?;

        self.state.lock().await.report_form = ReportForm::default();
        Ok(())
    }

    /// Record a vote. Nothing is applied optimistically; the rated row takes
    /// the authoritative tallies from the response and no other row moves.
    pub async fn rate(&self, report_id: i64, kind: RatingKind) -> AppResult<()> {
        let session = self.current_session().await?;
        let tally = self.api.rate_report(report_id, session.id, kind).await?;

        let mut st = self.state.lock().await;
        if let SearchState::Found(results) = &mut st.search {
            for report in results.iter_mut().filter(|r| r.id == report_id) {
                report.likes = tally.likes;
                report.dislikes = tally.dislikes;
            }
        }
        Ok(())
    }

    // --- friends ---

    pub async fn refresh_friends(&self) -> AppResult<()> {
        let session = self.current_session().await?;
        let friends = self.api.list_friends(session.id).await?;
        self.state.lock().await.friends = friends;
        Ok(())
    }

    /// Send a friend request by display id, then reload the list. A reload
    /// failure after a successful request is logged, not surfaced.
    pub async fn add_friend(&self, friend_user_id: &str) -> AppResult<Option<String>> {
        let session = self.current_session().await?;
        let friend_user_id = friend_user_id.trim();
        if friend_user_id.is_empty() {
            return Err(AppError::validation("Enter a user id"));
        }

        let message = self.api.add_friend(session.id, friend_user_id).await?;

        if let Err(err) = self.refresh_friends().await {
            tracing::warn!(component = "friends", error = %err, "friends refresh failed");
        }
        Ok(message)
    }

    pub async fn respond_friend_request(
        &self,
        friendship_id: i64,
        action: FriendRequestAction,
    ) -> AppResult<()> {
        self.api
            .respond_friend_request(friendship_id, action)
            .await?;

        if let Err(err) = self.refresh_friends().await {
            tracing::warn!(component = "friends", error = %err, "friends refresh failed");
        }
        Ok(())
    }

    // --- profile ---

    pub async fn update_avatar_url(&self, avatar_url: &str) -> AppResult<()> {
        let session = self.current_session().await?;
        let updated = self.api.update_avatar_url(session.id, avatar_url).await?;
        self.replace_session(updated).await
    }

    pub async fn update_avatar_image(&self, image: &[u8]) -> AppResult<()> {
        let session = self.current_session().await?;
        let updated = self.api.update_avatar_image(session.id, image).await?;
        self.replace_session(updated).await
    }

    async fn replace_session(&self, session: Session) -> AppResult<()> {
        self.store.save(&session)?;
        self.state.lock().await.session = Some(session);
        Ok(())
    }

    // --- chats ---

    pub async fn refresh_chats(&self) -> AppResult<()> {
        let session = self.current_session().await?;
        let chats = self.api.list_chats(session.id).await?;
        self.state.lock().await.chats = chats;
        Ok(())
    }

    /// Create (or get) the DM with a friend, switch to the Friends tab and
    /// open it.
    pub async fn start_chat(&self, friend_id: i64) -> AppResult<i64> {
        let session = self.current_session().await?;
        let chat_id = self.api.create_chat(session.id, friend_id).await?;

        self.install_chat(chat_id).await;
        {
            let mut st = self.state.lock().await;
            st.phase = Phase::Authenticated(Tab::Friends);
        }
        if let Err(err) = self.refresh_chats().await {
            tracing::warn!(component = "chat", error = %err, "chats refresh failed");
        }
        Ok(chat_id)
    }

    /// Open an already-listed chat.
    pub async fn open_chat(&self, chat_id: i64) -> AppResult<()> {
        self.current_session().await?;
        self.install_chat(chat_id).await;
        Ok(())
    }

    /// Close the open chat. Dropping the entry aborts its poll task, so no
    /// refresh fires past this point.
    pub async fn close_chat(&self) {
        self.state.lock().await.open_chat.take();
    }

    async fn install_chat(&self, chat_id: i64) {
        let messages = Arc::new(Mutex::new(Vec::new()));

        let api = self.api.clone();
        let buffer = messages.clone();
        let poller = Poller::spawn(self.poll_interval, move || {
            let api = api.clone();
            let buffer = buffer.clone();
            async move {
                match api.list_messages(chat_id).await {
                    Ok(list) => *buffer.lock().await = list,
                    Err(err) => {
                        tracing::debug!(
                            component = "chat.poll",
                            chat_id,
                            error = %err,
                            "message refresh failed"
                        );
                    }
                }
            }
        });

        // replacing an open chat drops its poller with it
        self.state.lock().await.open_chat = Some(OpenChat {
            chat_id,
            messages,
            poller,
        });
    }

    /// Send a message into the open chat, then refresh its messages and the
    /// chat list. Empty input and no-open-chat are quiet no-ops.
    pub async fn send_message(&self, text: &str) -> AppResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let session = self.current_session().await?;
        let (chat_id, buffer) = {
            let st = self.state.lock().await;
            match &st.open_chat {
                Some(chat) => (chat.chat_id, chat.messages.clone()),
                None => return Ok(()),
            }
        };

        self.api.send_message(chat_id, session.id, text).await?;

        match self.api.list_messages(chat_id).await {
            Ok(list) => *buffer.lock().await = list,
            Err(err) => {
                tracing::debug!(component = "chat", error = %err, "message refresh failed")
            }
        }
        if let Err(err) = self.refresh_chats().await {
            tracing::warn!(component = "chat", error = %err, "chats refresh failed");
        }
        Ok(())
    }

    // --- render state ---

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }

    pub async fn session(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    pub async fn search_query(&self) -> String {
        self.state.lock().await.search_query.clone()
    }

    pub async fn search_state(&self) -> SearchState {
        self.state.lock().await.search.clone()
    }

    pub async fn report_form(&self) -> ReportForm {
        self.state.lock().await.report_form.clone()
    }

    pub async fn friends(&self) -> Vec<Friend> {
        self.state.lock().await.friends.clone()
    }

    /// Incoming requests awaiting a response.
    pub async fn pending_requests(&self) -> Vec<Friend> {
        let st = self.state.lock().await;
        st.friends
            .iter()
            .filter(|f| f.status == "pending")
            .cloned()
            .collect()
    }

    pub async fn accepted_friends(&self) -> Vec<Friend> {
        let st = self.state.lock().await;
        st.friends
            .iter()
            .filter(|f| f.status == "accepted")
            .cloned()
            .collect()
    }

    pub async fn chats(&self) -> Vec<Chat> {
        self.state.lock().await.chats.clone()
    }

    pub async fn open_chat_id(&self) -> Option<i64> {
        self.state.lock().await.open_chat.as_ref().map(|c| c.chat_id)
    }

    pub async fn chat_poll_active(&self) -> bool {
        let st = self.state.lock().await;
        st.open_chat
            .as_ref()
            .map(|c| c.poller.is_active())
            .unwrap_or(false)
    }

    pub async fn messages(&self) -> Vec<Message> {
        let buffer = {
            let st = self.state.lock().await;
            match &st.open_chat {
                Some(chat) => chat.messages.clone(),
                None => return Vec::new(),
            }
        };
        let messages = buffer.lock().await;
        messages.clone()
    }
}
