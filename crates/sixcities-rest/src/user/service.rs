//! In-memory user store.

use super::dto::CreateUserDto;
use super::password::{hash_password, verify_password};
use crate::ids::new_id;
use parking_lot::RwLock;
use sixcities_auth::{TokenSubject, UserType};
use sixcities_core::{AppError, AppResult};
use std::fmt;

/// A stored user.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Entity id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email, unique, compared case-insensitively.
    pub email: String,
    /// Avatar file name; empty when unset.
    pub avatar: String,
    /// Account tier.
    pub user_type: UserType,
    password_hash: String,
}

impl User {
    /// Claims identifying this user in a token.
    pub fn token_subject(&self) -> TokenSubject {
        TokenSubject::new(&self.id, &self.email, &self.name, self.user_type)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("user_type", &self.user_type)
            .finish_non_exhaustive()
    }
}

/// Users keyed by id, with salted password digests.
pub struct UserService {
    users: RwLock<Vec<User>>,
    salt: String,
}

impl UserService {
    /// Creates an empty store hashing passwords with `salt`.
    pub fn new(salt: impl Into<String>) -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            salt: salt.into(),
        }
    }

    /// Stores a new user.
    ///
    /// # Errors
    ///
    /// 409 when the email is already registered.
    pub fn create(&self, dto: CreateUserDto) -> AppResult<User> {
        let user = self.new_user(dto);

        let mut users = self.users.write();
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(AppError::conflict(format!(
                "User with email «{}» exists.",
                user.email
            ))
            .with_origin("UserService"));
        }
        users.push(user.clone());
        drop(users);

        tracing::debug!(user_id = %user.id, "user created");
        Ok(user)
    }

    fn new_user(&self, dto: CreateUserDto) -> User {
        User {
            id: new_id(),
            name: dto.name.trim().to_string(),
            email: dto.email.trim().to_string(),
            avatar: String::new(),
            user_type: dto.user_type,
            password_hash: hash_password(&dto.password, &self.salt),
        }
    }

    /// The user with `email`.
    pub fn find_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.users
            .read()
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    /// The user with `id`.
    pub fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    /// Whether `candidate` is the user's password.
    pub fn verify_password(&self, user: &User, candidate: &str) -> bool {
        verify_password(candidate, &self.salt, &user.password_hash)
    }

    /// Records `filename` as the user's avatar.
    pub fn update_avatar(&self, id: &str, filename: &str) -> Option<User> {
        let mut users = self.users.write();
        let user = users.iter_mut().find(|u| u.id == id)?;
        user.avatar = filename.to_string();
        Some(user.clone())
    }

    /// Returns the id of the user with `email`, creating it when absent.
    ///
    /// The created account gets a random password nobody knows.
    pub fn ensure_user(&self, email: &str, name: &str) -> String {
        let candidate = self.new_user(CreateUserDto {
            name: name.to_string(),
            email: email.to_string(),
            password: uuid::Uuid::new_v4().to_string(),
            user_type: UserType::Standard,
        });

        let mut users = self.users.write();
        if let Some(existing) = users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(&candidate.email))
        {
            return existing.id.clone();
        }
        users.push(candidate.clone());
        candidate.id
    }
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService")
            .field("users", &self.users.read().len())
            .finish_non_exhaustive()
    }
}
