//! Identity
//!
//! Who is shopping: a logged-in user or a guest. Resolved once from the
//! persisted session rather than re-derived at each use.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{self, KeyValueStore, StorageError};

/// Key the logged-in user is persisted under.
pub const USER_KEY: &str = "user";

const LEGACY_GUEST_EMAIL: &str = "guest@truekicks.com";
const LEGACY_GUEST_NAME: &str = "Guest";

/// A registered user as returned by login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: i64,

    /// Display name
    pub full_name: String,

    /// Login email
    pub email: String,
}

impl User {
    fn is_legacy_guest(&self) -> bool {
        self.email.eq_ignore_ascii_case(LEGACY_GUEST_EMAIL) || self.full_name == LEGACY_GUEST_NAME
    }
}

/// The current shopper.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Identity {
    /// Logged in
    Authenticated(User),

    /// Not logged in
    #[default]
    Guest,
}

impl Identity {
    /// Resolve the shopper from persisted state. Missing, corrupt or legacy
    /// guest records resolve to [`Identity::Guest`].
    pub fn resolve<S>(store: &S) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        let user: Option<User> = storage::load_json(store, USER_KEY);

        match user {
            Some(user) if !user.is_legacy_guest() => Identity::Authenticated(user),
            _ => Identity::Guest,
        }
    }

    /// Persist `user` as the logged-in shopper.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store could not be written.
    pub fn login<S>(store: &mut S, user: User) -> Result<Self, StorageError>
    where
        S: KeyValueStore + ?Sized,
    {
        storage::save_json(store, USER_KEY, &user)?;

        Ok(Identity::Authenticated(user))
    }

    /// Forget the logged-in shopper.
    ///
    /// # Errors
    ///
    /// Returns a `StorageError` if the store could not be written.
    pub fn logout<S>(store: &mut S) -> Result<Self, StorageError>
    where
        S: KeyValueStore + ?Sized,
    {
        store.remove(USER_KEY)?;

        Ok(Identity::Guest)
    }

    /// The user, when logged in
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::Authenticated(user) => Some(user),
            Identity::Guest => None,
        }
    }

    /// Whether this is a guest
    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest)
    }

    /// User id as the order endpoints receive it; empty for guests.
    pub fn user_id_param(&self) -> String {
        self.user().map(|user| user.id.to_string()).unwrap_or_default()
    }
}

/// Reasons a profile update is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// The user id is not an integer.
    #[error("invalid user id")]
    InvalidUserId,

    /// The name is blank.
    #[error("name is required")]
    MissingName,
}

/// A validated profile change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// User being updated
    pub user_id: i64,

    /// Trimmed, non-empty name
    pub full_name: String,
}

impl ProfileUpdate {
    /// Validate raw input.
    ///
    /// # Errors
    ///
    /// Returns a `ProfileError` if the id is not numeric or the name is blank.
    pub fn parse(user_id: &str, full_name: &str) -> Result<Self, ProfileError> {
        let user_id = user_id
            .trim()
            .parse()
            .map_err(|_invalid| ProfileError::InvalidUserId)?;

        let full_name = full_name.trim();
        if full_name.is_empty() {
            return Err(ProfileError::MissingName);
        }

        Ok(Self {
            user_id,
            full_name: full_name.to_string(),
        })
    }

    /// Apply to a user record.
    pub fn apply(&self, user: &mut User) {
        if user.id == self.user_id {
            user.full_name.clone_from(&self.full_name);
        }
    }
}
