use crate::actor_framework::Entity;
use crate::domain::{CreateUserInput, UpdateUserInput, User, UserId};

impl Entity for User {
    type Id = UserId;
    type CreatePayload = CreateUserInput;
    type Patch = UpdateUserInput;

    fn id(&self) -> &UserId { &self.id }

    fn from_create(id: UserId, payload: CreateUserInput) -> Result<Self, String> {
        Ok(Self {
            id,
            name: payload.name,
            email: payload.email,
            username: payload.username,
            phone: payload.phone,
            website: payload.website,
        })
    }

    /// Applies the fields present in the patch. The patch id is ignored;
    /// the actor has already selected the target by key.
    fn on_update(&mut self, patch: UpdateUserInput) -> Result<(), String> {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(username) = patch.username {
            self.username = username;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(website) = patch.website {
            self.website = Some(website);
        }
        Ok(())
    }
}
