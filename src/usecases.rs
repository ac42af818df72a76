//! Business rules for reading and mutating users.
//!
//! [`UserUseCases`] is the only path presentation code takes to the
//! repository. Input is validated here, before anything is sent.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

use crate::domain::{CreateUserInput, UpdateUserInput, User, UserId};
use crate::error::{UserError, UserResult};
use crate::repository::UserRepository;

pub const MISSING_REQUIRED_FIELD: &str = "missing required field";
pub const INVALID_EMAIL_FORMAT: &str = "invalid email format";

/// `local@domain.tld`: non-whitespace segments, one `@`, a dot in the domain.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Returns true when `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn validate_create(input: &CreateUserInput) -> UserResult<()> {
    let required = [&input.name, &input.email, &input.username];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(UserError::validation(MISSING_REQUIRED_FIELD));
    }
    validate_email(&input.email)
}

/// An empty email counts as absent and is not checked.
fn validate_update(input: &UpdateUserInput) -> UserResult<()> {
    match input.email.as_deref() {
        Some(email) if !email.is_empty() => validate_email(email),
        _ => Ok(()),
    }
}

fn validate_email(email: &str) -> UserResult<()> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(UserError::validation(INVALID_EMAIL_FORMAT))
    }
}

/// Service layer for User business logic
#[derive(Clone)]
pub struct UserUseCases<R: UserRepository> {
    repository: R,
}

impl<R: UserRepository> UserUseCases<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn get_all_users(&self) -> UserResult<Vec<User>> {
        self.repository.get_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_id(&self, id: UserId) -> Option<User> {
        self.repository.get_by_id(id).await
    }

    /// Creates a user after checking required fields and email format.
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: CreateUserInput) -> UserResult<User> {
        if let Err(e) = validate_create(&input) {
            warn!(error = %e, "Rejected create");
            return Err(e);
        }
        debug!("Input valid, delegating to repository");
        self.repository.create(input).await
    }

    /// Applies a partial update. Only a present email is validated.
    #[instrument(skip(self, input), fields(user_id = input.id))]
    pub async fn update_user(&self, input: UpdateUserInput) -> UserResult<User> {
        if let Err(e) = validate_update(&input) {
            warn!(error = %e, "Rejected update");
            return Err(e);
        }
        debug!("Input valid, delegating to repository");
        self.repository.update(input).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: UserId) -> UserResult<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use mockall::predicate::eq;

    fn stored(id: UserId, input: &CreateUserInput) -> User {
        User {
            id,
            name: input.name.clone(),
            email: input.email.clone(),
            username: input.username.clone(),
            phone: input.phone.clone(),
            website: input.website.clone(),
        }
    }

    #[test]
    fn test_email_pattern() {
        for good in ["a@b.com", "first.last@mail.example.org", "x+tag@sub.domain.io"] {
            assert!(is_valid_email(good), "{good} should be accepted");
        }
        for bad in ["not-an-email", "a@b", "@b.com", "a@.", "a b@c.com", "a@b@c.com", "a@b.", ""] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_create_user_delegates_when_valid() {
        let mut mock_repo = MockUserRepository::new();
        let input = CreateUserInput::new("A", "a@b.com", "a");
        let expected = stored(1, &input);

        let returned = expected.clone();
        mock_repo
            .expect_create()
            .with(eq(input.clone()))
            .times(1)
            .returning(move |_| Ok(returned.clone()));

        let use_cases = UserUseCases::new(mock_repo);
        assert_eq!(use_cases.create_user(input).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_create_user_requires_fields_without_calling_repository() {
        let cases = [
            CreateUserInput::new("", "a@b.com", "a"),
            CreateUserInput::new("A", "", "a"),
            CreateUserInput::new("A", "a@b.com", ""),
            CreateUserInput::new("   ", "a@b.com", "a"),
        ];

        for input in cases {
            let mut mock_repo = MockUserRepository::new();
            mock_repo.expect_create().never();

            let use_cases = UserUseCases::new(mock_repo);
            let err = use_cases.create_user(input).await.unwrap_err();
            assert_eq!(err, UserError::validation(MISSING_REQUIRED_FIELD));
        }
    }

    #[tokio::test]
    async fn test_create_user_rejects_bad_email_without_calling_repository() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_create().never();

        let use_cases = UserUseCases::new(mock_repo);
        let err = use_cases
            .create_user(CreateUserInput::new("A", "not-an-email", "a"))
            .await
            .unwrap_err();

        assert_eq!(err, UserError::validation(INVALID_EMAIL_FORMAT));
    }

    #[tokio::test]
    async fn test_update_user_validates_present_email() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_update().never();

        let use_cases = UserUseCases::new(mock_repo);
        for email in ["broken", " ", "a@b"] {
            let err = use_cases
                .update_user(UpdateUserInput::new(5).email(email))
                .await
                .unwrap_err();
            assert_eq!(err, UserError::validation(INVALID_EMAIL_FORMAT));
        }
    }

    #[tokio::test]
    async fn test_update_user_with_empty_email_skips_validation() {
        let mut mock_repo = MockUserRepository::new();
        let input = UpdateUserInput::new(5).email("");
        mock_repo
            .expect_update()
            .with(eq(input.clone()))
            .times(1)
            .returning(|input| {
                Ok(User {
                    id: input.id,
                    name: "Chelsey Dietrich".into(),
                    email: "kept@x.com".into(),
                    username: "Kamren".into(),
                    phone: None,
                    website: None,
                })
            });

        let use_cases = UserUseCases::new(mock_repo);
        let updated = use_cases.update_user(input).await.unwrap();
        assert_eq!(updated.email, "kept@x.com");
    }

    #[tokio::test]
    async fn test_update_user_without_email_skips_validation() {
        let mut mock_repo = MockUserRepository::new();
        // Non-email fields are never validated.
        let input = UpdateUserInput::new(5).name("");
        mock_repo
            .expect_update()
            .with(eq(input.clone()))
            .times(1)
            .returning(|input| {
                Ok(User {
                    id: input.id,
                    name: String::new(),
                    email: "kept@x.com".into(),
                    username: "kept".into(),
                    phone: None,
                    website: None,
                })
            });

        let use_cases = UserUseCases::new(mock_repo);
        let updated = use_cases.update_user(input).await.unwrap();
        assert_eq!(updated.id, 5);
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through_unchanged() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo
            .expect_delete()
            .with(eq(404))
            .returning(|_| Err(UserError::transport(Some(404), "Not found.")));
        mock_repo
            .expect_get_all()
            .returning(|| Err(UserError::transport(None, "connection refused")));

        let use_cases = UserUseCases::new(mock_repo);
        assert_eq!(
            use_cases.delete_user(404).await,
            Err(UserError::transport(Some(404), "Not found."))
        );
        assert_eq!(
            use_cases.get_all_users().await,
            Err(UserError::transport(None, "connection refused"))
        );
    }

    #[tokio::test]
    async fn test_get_user_by_id_passes_absence_through() {
        let mut mock_repo = MockUserRepository::new();
        mock_repo.expect_get_by_id().with(eq(99)).returning(|_| None);

        let use_cases = UserUseCases::new(mock_repo);
        assert_eq!(use_cases.get_user_by_id(99).await, None);
    }
}
