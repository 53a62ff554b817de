use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::AuthError;
use crate::storage::{KeyValueStore, KitchenState, SESSION_KEY};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

struct MockAccount {
    id: u32,
    email: &'static str,
    password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role: Role,
}

const MOCK_ACCOUNTS: [MockAccount; 2] = [
    MockAccount {
        id: 1,
        email: "admin@aichef.com",
        password: "admin123",
        first_name: "Admin",
        last_name: "User",
        role: Role::Admin,
    },
    MockAccount {
        id: 2,
        email: "john.doe@example.com",
        password: "user123",
        first_name: "John",
        last_name: "Doe",
        role: Role::User,
    },
];

impl MockAccount {
    fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.to_string(),
            first_name: self.first_name.to_string(),
            last_name: self.last_name.to_string(),
            role: self.role,
            is_active: true,
            profile_image_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn login<S: KeyValueStore>(
    state: &mut KitchenState<S>,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    let email = email.trim();
    let Some(account) = MOCK_ACCOUNTS
        .iter()
        .find(|account| account.email == email && account.password == password)
    else {
        warn!(email, "rejected sign-in");
        return Err(AuthError::InvalidCredentials);
    };
    let user = account.to_user();
    state.write_json(SESSION_KEY, &user)?;
    info!(email, role = %user.role, "signed in");
    Ok(user)
}

pub fn logout<S: KeyValueStore>(state: &mut KitchenState<S>) -> Result<(), AuthError> {
    state.store_mut().remove(SESSION_KEY)?;
    Ok(())
}

pub fn register<S: KeyValueStore>(
    state: &mut KitchenState<S>,
    registration: &Registration,
) -> Result<User, AuthError> {
    let email = registration.email.trim();
    if email.is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if registration.password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    if registration.first_name.trim().is_empty() {
        return Err(AuthError::MissingField("first name"));
    }
    if registration.last_name.trim().is_empty() {
        return Err(AuthError::MissingField("last name"));
    }
    if MOCK_ACCOUNTS.iter().any(|account| account.email == email) {
        return Err(AuthError::EmailTaken(email.to_string()));
    }
    let user = User {
        id: MOCK_ACCOUNTS.len() as u32 + 1,
        email: email.to_string(),
        first_name: registration.first_name.trim().to_string(),
        last_name: registration.last_name.trim().to_string(),
        role: Role::User,
        is_active: true,
        profile_image_url: None,
    };
    state.write_json(SESSION_KEY, &user)?;
    info!(email, id = user.id, "registered");
    Ok(user)
}

pub fn current_user<S: KeyValueStore>(state: &KitchenState<S>) -> Result<Option<User>, AuthError> {
    Ok(state.read_json(SESSION_KEY)?)
}

pub fn require_user<S: KeyValueStore>(state: &KitchenState<S>) -> Result<User, AuthError> {
    current_user(state)?.ok_or(AuthError::NotSignedIn)
}

pub fn require_admin<S: KeyValueStore>(state: &KitchenState<S>) -> Result<User, AuthError> {
    let user = require_user(state)?;
    if !user.is_admin() {
        return Err(AuthError::Forbidden);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn state() -> KitchenState<MemoryStore> {
        KitchenState::new(MemoryStore::new())
    }

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Cook".to_string(),
        }
    }

    #[test]
    fn admin_login_persists_session_without_password() {
        let mut state = state();
        let user = login(&mut state, "admin@aichef.com", "admin123").expect("login");
        assert!(user.is_admin());
        let raw = state.store().get(SESSION_KEY).unwrap().expect("session");
        assert!(!raw.contains("admin123"));
        assert_eq!(require_admin(&state).expect("admin").id, 1);
    }

    #[test]
    fn wrong_password_is_rejected() {
        let mut state = state();
        assert!(matches!(
            login(&mut state, "john.doe@example.com", "admin123"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(current_user(&state).unwrap().is_none());
    }

    #[test]
    fn regular_user_is_not_admin() {
        let mut state = state();
        login(&mut state, "john.doe@example.com", "user123").expect("login");
        assert!(matches!(require_admin(&state), Err(AuthError::Forbidden)));
        logout(&mut state).unwrap();
        assert!(matches!(require_user(&state), Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn register_creates_user_session() {
        let mut state = state();
        let user = register(&mut state, &registration("ada@example.com")).expect("register");
        assert_eq!(user.id, 3);
        assert_eq!(user.role, Role::User);
        assert_eq!(current_user(&state).unwrap(), Some(user));
        assert_eq!(MOCK_ACCOUNTS.len(), 2);
    }

    #[test]
    fn register_validates_fields() {
        let mut state = state();
        assert!(matches!(
            register(&mut state, &registration("  ")),
            Err(AuthError::MissingField("email"))
        ));
        assert!(matches!(
            register(&mut state, &registration("admin@aichef.com")),
            Err(AuthError::EmailTaken(_))
        ));
    }
}
