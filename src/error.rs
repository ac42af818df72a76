use thiserror::Error;

/// Errors surfaced by the user use-cases and repositories.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    /// Rejected before any request was sent.
    #[error("User validation error: {0}")]
    Validation(String),
    /// The backing store failed or refused the request.
    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status carried by a transport failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            Self::Validation(_) => None,
        }
    }
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Transport error ({code}): {message}"),
        None => format!("Transport error: {message}"),
    }
}

impl From<reqwest::Error> for UserError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            UserError::validation("invalid email format").to_string(),
            "User validation error: invalid email format"
        );
        assert_eq!(
            UserError::transport(Some(404), "Not found.").to_string(),
            "Transport error (404): Not found."
        );
        assert_eq!(
            UserError::transport(None, "connection refused").to_string(),
            "Transport error: connection refused"
        );
    }

    #[test]
    fn test_status() {
        assert_eq!(UserError::transport(Some(500), "boom").status(), Some(500));
        assert_eq!(UserError::validation("x").status(), None);
    }
}
