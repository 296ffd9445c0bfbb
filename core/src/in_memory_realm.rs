// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;

use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::sync::Mutex;
use unicase::UniCase;
use uuid::Uuid;

/// One provisioned user as the fake realm stores it.
#[derive(Clone, Debug)]
pub struct StoredUser {
    pub id: String,
    pub representation: UserRepresentation,
    /// Set by the reset-password call; `None` until then.
    pub credential: Option<CredentialRepresentation>,
}

impl StoredUser {
    fn as_realm_user(&self) -> RealmUser {
        RealmUser {
            id: self.id.clone(),
            username: self.representation.username.clone(),
            email: Some(self.representation.email.clone()),
            enabled: self.representation.enabled,
        }
    }
}

/// Every admin call made against the fake, in arrival order. Calls are
/// recorded before validation, so rejected attempts show up too.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminCall {
    CreateUser { username: String },
    ResetPassword { user_id: String, value: String },
    ListUsers,
    DeleteUser { user_id: String },
}

#[derive(Clone, Debug)]
pub struct InMemoryRealmState {
    pub users: BTreeMap<String, StoredUser>,
    pub calls: Vec<AdminCall>,
}

/// A non-optimized realm admin implementation for use with tests
pub struct InMemoryRealm {
    state: Mutex<InMemoryRealmState>,
}

impl Default for InMemoryRealm {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRealm {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(InMemoryRealmState {
                users: BTreeMap::new(),
                calls: Vec::new(),
            }),
        }
    }

    pub fn state(&self) -> InMemoryRealmState {
        self.state.lock().unwrap().clone()
    }

    /// The recorded calls alone, for sequence assertions.
    pub fn calls(&self) -> Vec<AdminCall> {
        self.state.lock().unwrap().calls.clone()
    }
}

fn user_not_found(op: &'static str) -> Error {
    Error::remote(op, StatusCode::NOT_FOUND, "User not found")
}

#[async_trait]
impl RealmAdmin for InMemoryRealm {
    async fn create_user(
        &self,
        user: &UserRepresentation,
    ) -> Result<String, Error> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(AdminCall::CreateUser { username: user.username.clone() });

        // Usernames are unique per realm, case-insensitively.
        if state.users.values().any(|stored| {
            UniCase::new(&stored.representation.username)
                == UniCase::new(&user.username)
        }) {
            return Err(Error::remote(
                "create user",
                StatusCode::CONFLICT,
                "User exists with same username",
            ));
        }

        let id = Uuid::new_v4().to_string();

        let new_user = StoredUser {
            id: id.clone(),
            representation: user.clone(),
            credential: None,
        };

        let existing = state.users.insert(id.clone(), new_user);
        assert!(existing.is_none());

        Ok(id)
    }

    async fn reset_password(
        &self,
        user_id: &str,
        credential: &CredentialRepresentation,
    ) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(AdminCall::ResetPassword {
            user_id: user_id.to_string(),
            value: credential.value.clone(),
        });

        let stored = state
            .users
            .get_mut(user_id)
            .ok_or(user_not_found("reset password"))?;
        stored.credential = Some(credential.clone());

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<RealmUser>, Error> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(AdminCall::ListUsers);

        Ok(state.users.values().map(StoredUser::as_realm_user).collect())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), Error> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push(AdminCall::DeleteUser { user_id: user_id.to_string() });

        match state.users.remove(user_id) {
            Some(_) => Ok(()),
            None => Err(user_not_found("delete user")),
        }
    }
}
