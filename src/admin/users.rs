use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Role;
use crate::error::{AdminError, StorageError};
use crate::storage::{KeyValueStore, KitchenState, ADMIN_USERS_KEY};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminUser {
    pub id: u32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recipes_count: u32,
}

impl AdminUser {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDraft {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub email_verified: bool,
}

impl UserDraft {
    fn validate(&self) -> Result<(), AdminError> {
        if !self.email.contains('@') {
            return Err(AdminError::Invalid(format!(
                "invalid email address: {}",
                self.email
            )));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(AdminError::Invalid(
                "first and last name are required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub admins: usize,
    pub unverified: usize,
}

fn default_role() -> Role {
    Role::User
}

fn default_true() -> bool {
    true
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

pub fn seed_users() -> Vec<AdminUser> {
    vec![
        AdminUser {
            id: 1,
            email: "admin@aichef.com".to_string(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            role: Role::Admin,
            is_active: true,
            email_verified: true,
            created_at: at(2024, 1, 1, 10, 0),
            last_login: Some(at(2024, 2, 25, 14, 30)),
            recipes_count: 0,
        },
        AdminUser {
            id: 2,
            email: "john.doe@example.com".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: Role::User,
            is_active: true,
            email_verified: true,
            created_at: at(2024, 1, 15, 14, 30),
            last_login: Some(at(2024, 2, 24, 9, 15)),
            recipes_count: 12,
        },
        AdminUser {
            id: 3,
            email: "jane.smith@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            role: Role::User,
            is_active: true,
            email_verified: false,
            created_at: at(2024, 2, 1, 9, 15),
            last_login: Some(at(2024, 2, 23, 16, 45)),
            recipes_count: 8,
        },
        AdminUser {
            id: 4,
            email: "mike.wilson@example.com".to_string(),
            first_name: "Mike".to_string(),
            last_name: "Wilson".to_string(),
            role: Role::User,
            is_active: false,
            email_verified: true,
            created_at: at(2024, 1, 20, 11, 20),
            last_login: Some(at(2024, 2, 10, 13, 22)),
            recipes_count: 3,
        },
    ]
}

#[derive(Debug, Clone)]
pub struct UserCatalog {
    users: Vec<AdminUser>,
}

impl UserCatalog {
    pub fn new(users: Vec<AdminUser>) -> Self {
        Self { users }
    }

    pub fn load<S: KeyValueStore>(state: &KitchenState<S>) -> Result<Self, StorageError> {
        let users = state.read_json(ADMIN_USERS_KEY)?.unwrap_or_else(seed_users);
        Ok(Self::new(users))
    }

    pub fn save<S: KeyValueStore>(&self, state: &mut KitchenState<S>) -> Result<(), StorageError> {
        state.write_json(ADMIN_USERS_KEY, &self.users)
    }

    pub fn users(&self) -> &[AdminUser] {
        &self.users
    }

    pub fn get(&self, id: u32) -> Option<&AdminUser> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn search(&self, term: &str) -> Vec<&AdminUser> {
        let term = term.trim().to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                user.first_name.to_lowercase().contains(&term)
                    || user.last_name.to_lowercase().contains(&term)
                    || user.email.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn create(&mut self, draft: UserDraft) -> Result<AdminUser, AdminError> {
        draft.validate()?;
        let id = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = AdminUser {
            id,
            email: draft.email.trim().to_string(),
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            role: draft.role,
            is_active: draft.is_active,
            email_verified: draft.email_verified,
            created_at: Utc::now(),
            last_login: None,
            recipes_count: 0,
        };
        info!(id, email = %user.email, "admin created user");
        self.users.insert(0, user.clone());
        Ok(user)
    }

    pub fn update(&mut self, id: u32, draft: UserDraft) -> Result<AdminUser, AdminError> {
        draft.validate()?;
        let user = self.find_mut(id)?;
        user.email = draft.email.trim().to_string();
        user.first_name = draft.first_name.trim().to_string();
        user.last_name = draft.last_name.trim().to_string();
        user.role = draft.role;
        user.is_active = draft.is_active;
        user.email_verified = draft.email_verified;
        Ok(user.clone())
    }

    pub fn delete(&mut self, id: u32) -> Result<AdminUser, AdminError> {
        let position = self
            .users
            .iter()
            .position(|user| user.id == id)
            .ok_or(AdminError::NotFound { entity: "user", id })?;
        Ok(self.users.remove(position))
    }

    pub fn toggle_active(&mut self, id: u32) -> Result<AdminUser, AdminError> {
        let user = self.find_mut(id)?;
        user.is_active = !user.is_active;
        Ok(user.clone())
    }

    pub fn stats(&self) -> UserStats {
        UserStats {
            total: self.users.len(),
            active: self.users.iter().filter(|u| u.is_active).count(),
            admins: self.users.iter().filter(|u| u.role == Role::Admin).count(),
            unverified: self.users.iter().filter(|u| !u.email_verified).count(),
        }
    }

    fn find_mut(&mut self, id: u32) -> Result<&mut AdminUser, AdminError> {
        self.users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or(AdminError::NotFound { entity: "user", id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn draft(email: &str) -> UserDraft {
        UserDraft {
            email: email.to_string(),
            first_name: "Sam".to_string(),
            last_name: "Baker".to_string(),
            role: Role::User,
            is_active: true,
            email_verified: false,
        }
    }

    #[test]
    fn seeded_stats() {
        let catalog = UserCatalog::new(seed_users());
        assert_eq!(
            catalog.stats(),
            UserStats {
                total: 4,
                active: 3,
                admins: 1,
                unverified: 1
            }
        );
    }

    #[test]
    fn search_matches_names_and_email() {
        let catalog = UserCatalog::new(seed_users());
        assert_eq!(catalog.search("SMITH").len(), 1);
        assert_eq!(catalog.search("example.com").len(), 3);
        assert_eq!(catalog.search("").len(), 4);
    }

    #[test]
    fn create_prepends_with_next_id() {
        let mut catalog = UserCatalog::new(seed_users());
        let created = catalog.create(draft("sam@example.com")).expect("created");
        assert_eq!(created.id, 5);
        assert_eq!(catalog.users()[0].id, 5);
        assert!(matches!(
            catalog.create(draft("not-an-email")),
            Err(AdminError::Invalid(_))
        ));
    }

    #[test]
    fn update_toggle_delete() {
        let mut catalog = UserCatalog::new(seed_users());
        let updated = catalog.update(3, draft("jane@example.com")).expect("updated");
        assert_eq!(updated.first_name, "Sam");
        assert_eq!(updated.created_at, seed_users()[2].created_at);

        assert!(!catalog.toggle_active(2).expect("toggled").is_active);
        catalog.delete(4).expect("deleted");
        assert!(matches!(
            catalog.delete(4),
            Err(AdminError::NotFound { entity: "user", id: 4 })
        ));
    }

    #[test]
    fn persists_through_state() {
        let mut state = KitchenState::new(MemoryStore::new());
        let mut catalog = UserCatalog::load(&state).expect("seeded");
        catalog.toggle_active(4).expect("toggled");
        catalog.save(&mut state).expect("saved");
        let reloaded = UserCatalog::load(&state).expect("reloaded");
        assert!(reloaded.get(4).expect("user").is_active);
    }
}
