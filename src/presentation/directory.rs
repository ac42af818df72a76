use tracing::{debug, error, info, instrument};

use super::notification::{Notification, Notifier};
use crate::domain::{CreateUserInput, UpdateUserInput, User, UserId};
use crate::error::UserResult;
use crate::repository::UserRepository;
use crate::usecases::UserUseCases;

/// Form submission coming from the editing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(CreateUserInput),
    Update(UpdateUserInput),
}

/// Owns the local copy of the user list and the current selection.
///
/// The remote store stays authoritative: the list is replaced on load and
/// patched from the result of every mutation. All failures are reported
/// through the [`Notifier`]; create and update failures are also returned
/// so the caller can keep the pending input.
pub struct UserDirectory<R: UserRepository, N: Notifier> {
    use_cases: UserUseCases<R>,
    notifier: N,
    users: Vec<User>,
    selected: Option<User>,
    is_loading: bool,
}

impl<R: UserRepository, N: Notifier> UserDirectory<R, N> {
    pub fn new(use_cases: UserUseCases<R>, notifier: N) -> Self {
        Self {
            use_cases,
            notifier,
            users: Vec::new(),
            selected: None,
            is_loading: false,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn selected(&self) -> Option<&User> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn use_cases(&self) -> &UserUseCases<R> {
        &self.use_cases
    }

    /// Replaces the local list with the store's. Returns false on failure,
    /// leaving the previous list in place.
    #[instrument(skip(self))]
    pub async fn load_users(&mut self) -> bool {
        self.is_loading = true;
        let result = self.use_cases.get_all_users().await;
        self.is_loading = false;

        match result {
            Ok(users) => {
                info!(count = users.len(), "Users loaded");
                self.users = users;
                true
            }
            Err(e) => {
                error!(error = %e, "Loading users failed");
                self.notifier.notify(Notification::error("Failed to load users"));
                false
            }
        }
    }

    /// Routes a submission to update when a user is selected, otherwise to create.
    pub async fn submit(&mut self, submission: Submission) -> UserResult<User> {
        match submission {
            Submission::Update(input) if self.selected.is_some() => self.update_user(input).await,
            Submission::Update(input) => {
                debug!(user_id = input.id, "No user selected, submitting as create");
                self.create_user(input.into()).await
            }
            Submission::Create(input) => self.create_user(input).await,
        }
    }

    pub fn edit_user(&mut self, user: User) {
        debug!(user_id = user.id, "Selected user for editing");
        self.selected = Some(user);
    }

    pub fn cancel_edit(&mut self) {
        self.selected = None;
    }

    /// Removes the user locally, then asks the store. On failure the previous
    /// list is restored and false is returned; the error is not propagated.
    #[instrument(skip(self))]
    pub async fn delete_user(&mut self, id: UserId) -> bool {
        let snapshot = self.users.clone();
        self.users.retain(|u| u.id != id);

        match self.use_cases.delete_user(id).await {
            Ok(()) => {
                self.notifier.notify(Notification::success("User deleted successfully"));
                true
            }
            Err(e) => {
                error!(error = %e, "Deleting user failed");
                self.users = snapshot;
                self.notifier.notify(Notification::error("Failed to delete user"));
                false
            }
        }
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    async fn create_user(&mut self, input: CreateUserInput) -> UserResult<User> {
        match self.use_cases.create_user(input).await {
            Ok(user) => {
                self.users.insert(0, user.clone());
                self.notifier.notify(Notification::success("User created successfully"));
                Ok(user)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    #[instrument(skip(self, input), fields(user_id = input.id))]
    async fn update_user(&mut self, input: UpdateUserInput) -> UserResult<User> {
        match self.use_cases.update_user(input).await {
            Ok(user) => {
                if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
                    *slot = user.clone();
                }
                self.selected = None;
                self.notifier.notify(Notification::success("User updated successfully"));
                Ok(user)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }
}
