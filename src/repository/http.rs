//! REST adapter for the user repository.

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::ops::Range;
use tracing::{debug, info, instrument, warn};

use super::UserRepository;
use crate::config::{ApiConfig, ConfigError};
use crate::domain::{CreateUserInput, UpdateUserInput, User, UserId};
use crate::error::{UserError, UserResult};

/// Id echoed by JSONPlaceholder-style demo backends for every created record.
pub const PLACEHOLDER_ID: UserId = 11;

const SYNTHETIC_ID_RANGE: Range<UserId> = 1_000..1_000_000;

/// How the adapter settles the id of a freshly created user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdAssignment {
    /// Trust the id returned by the backend.
    #[default]
    Server,
    /// The backend answers every create with the same id; swap it for a
    /// random one so created records stay distinguishable.
    ReplacePlaceholder { placeholder: UserId },
}

impl IdAssignment {
    pub fn placeholder() -> Self {
        Self::ReplacePlaceholder { placeholder: PLACEHOLDER_ID }
    }

    fn apply(self, mut user: User) -> User {
        if let Self::ReplacePlaceholder { placeholder } = self {
            if user.id == placeholder {
                let id = rand::thread_rng().gen_range(SYNTHETIC_ID_RANGE);
                debug!(placeholder, user_id = id, "Replaced placeholder id");
                user.id = id;
            }
        }
        user
    }
}

/// Shape of the resource paths the backend routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PathStyle {
    /// `{base}/users` and `{base}/users/{id}`.
    #[default]
    Bare,
    /// `{base}/users/` and `{base}/users/{id}/`. Backends that redirect
    /// slash-less paths would turn a POST or PUT into a GET.
    TrailingSlash,
}

impl PathStyle {
    fn finish(self, path: String) -> String {
        match self {
            Self::Bare => path,
            Self::TrailingSlash => path + "/",
        }
    }
}

/// Error body convention of the user API (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// User repository backed by a REST collection at `{base_url}/users`.
#[derive(Debug, Clone)]
pub struct HttpUserRepository {
    http: Client,
    base_url: String,
    id_assignment: IdAssignment,
    path_style: PathStyle,
}

impl HttpUserRepository {
    /// Wraps an existing HTTP client. Trailing slashes on `base_url` are trimmed.
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            id_assignment: IdAssignment::Server,
            path_style: PathStyle::Bare,
        }
    }

    pub fn with_id_assignment(mut self, id_assignment: IdAssignment) -> Self {
        self.id_assignment = id_assignment;
        self
    }

    pub fn with_path_style(mut self, path_style: PathStyle) -> Self {
        self.path_style = path_style;
        self
    }

    /// Builds a client with the configured timeout and JSON defaults.
    pub fn from_config(config: &ApiConfig, id_assignment: IdAssignment) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(format!("user-manager/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self::new(http, config.base_url.clone()).with_id_assignment(id_assignment))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        self.path_style.finish(format!("{}/users", self.base_url))
    }

    fn item_url(&self, id: UserId) -> String {
        self.path_style.finish(format!("{}/users/{}", self.base_url, id))
    }

    /// Fetches a single user, telling a missing record (`Ok(None)`) apart
    /// from a failed request.
    #[instrument(skip(self))]
    pub async fn fetch_by_id(&self, id: UserId) -> UserResult<Option<User>> {
        let url = self.item_url(id);
        debug!(url = %url, "Sending request");

        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("User not found");
            return Ok(None);
        }

        let user = ensure_success(response).await?.json().await?;
        Ok(Some(user))
    }
}

#[async_trait]
impl UserRepository for HttpUserRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> UserResult<Vec<User>> {
        let url = self.collection_url();
        debug!(url = %url, "Sending request");

        let response = self.http.get(&url).send().await?;
        let users: Vec<User> = ensure_success(response).await?.json().await?;

        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: UserId) -> Option<User> {
        match self.fetch_by_id(id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Fetching user failed, treating as absent");
                None
            }
        }
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    async fn create(&self, input: CreateUserInput) -> UserResult<User> {
        let url = self.collection_url();
        debug!(url = %url, "Sending request");

        let response = self.http.post(&url).json(&input).send().await?;
        let user: User = ensure_success(response).await?.json().await?;
        let user = self.id_assignment.apply(user);

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self, input), fields(user_id = input.id))]
    async fn update(&self, input: UpdateUserInput) -> UserResult<User> {
        let url = self.item_url(input.id);
        debug!(url = %url, "Sending request");

        // `UpdateUserInput` never serializes its id.
        let response = self.http.put(&url).json(&input).send().await?;
        let user: User = ensure_success(response).await?.json().await?;

        info!("User updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> UserResult<()> {
        let url = self.item_url(id);
        debug!(url = %url, "Sending request");

        let response = self.http.delete(&url).send().await?;
        ensure_success(response).await?;

        info!("User deleted");
        Ok(())
    }
}

async fn ensure_success(response: Response) -> UserResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(UserError::transport(Some(status.as_u16()), error_message(status, &body)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody { detail }) = serde_json::from_str(body) {
        return detail;
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    status.canonical_reason().unwrap_or("request failed").to_string()
}
