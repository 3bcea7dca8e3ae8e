use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Entrepreneur,
    Investor,
    Admin,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Entrepreneur => "Entrepreneur",
            UserType::Investor => "Investor",
            UserType::Admin => "Admin",
        }
    }

    /// Roles a client may pick for itself at registration.
    pub fn is_self_registrable(&self) -> bool {
        matches!(self, UserType::Entrepreneur | UserType::Investor)
    }

    pub fn can_create_projects(&self) -> bool {
        matches!(self, UserType::Entrepreneur | UserType::Admin)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "entrepreneur" => Ok(UserType::Entrepreneur),
            "investor" => Ok(UserType::Investor),
            "admin" => Ok(UserType::Admin),
            other => Err(format!("Unknown user type '{other}'")),
        }
    }
}

pub const ACCOUNT_ACTIVE: &str = "active";

/// Column list shared by every query that loads a full user row.
pub const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, user_type, \
    (balance)::FLOAT8 AS balance, account_status, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    pub balance: f64,
    pub account_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.account_status == ACCOUNT_ACTIVE
    }
}

/// Failed guesses after which a reset token stops being accepted.
pub const MAX_RESET_ATTEMPTS: i32 = 5;

#[derive(Debug, sqlx::FromRow)]
pub struct PasswordReset {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub attempts: i32,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_user_types_case_insensitively() {
        assert_eq!("Investor".parse::<UserType>().unwrap(), UserType::Investor);
        assert_eq!("entrepreneur".parse::<UserType>().unwrap(), UserType::Entrepreneur);
        assert_eq!(" ADMIN ".parse::<UserType>().unwrap(), UserType::Admin);
        assert!("Banker".parse::<UserType>().is_err());
    }

    #[test]
    fn admin_cannot_self_register() {
        assert!(UserType::Investor.is_self_registrable());
        assert!(UserType::Entrepreneur.is_self_registrable());
        assert!(!UserType::Admin.is_self_registrable());
    }

    #[test]
    fn only_entrepreneurs_and_admins_create_projects() {
        assert!(UserType::Entrepreneur.can_create_projects());
        assert!(UserType::Admin.can_create_projects());
        assert!(!UserType::Investor.can_create_projects());
    }
}
