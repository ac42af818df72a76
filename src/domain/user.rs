use serde::{Deserialize, Serialize};

/// Server-assigned user identifier.
pub type UserId = i64;

/// Represents a user record as stored by the remote collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Payload for creating a new user. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Partial update for an existing user.
///
/// `id` selects the target and travels in the request path, so it is never
/// serialized. Absent fields are left unchanged by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateUserInput {
    #[serde(skip_serializing)]
    pub id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl CreateUserInput {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            username: username.into(),
            phone: None,
            website: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }
}

impl UpdateUserInput {
    /// Creates an update for `id` with no fields set.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    /// True when at least one field besides `id` is present.
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.email.is_some()
            || self.username.is_some()
            || self.phone.is_some()
            || self.website.is_some()
    }
}

/// Treats a partial update as a creation payload.
///
/// Missing required fields become empty strings so that create-time
/// validation rejects them.
impl From<UpdateUserInput> for CreateUserInput {
    fn from(update: UpdateUserInput) -> Self {
        Self {
            name: update.name.unwrap_or_default(),
            email: update.email.unwrap_or_default(),
            username: update.username.unwrap_or_default(),
            phone: update.phone,
            website: update.website,
        }
    }
}
