use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::present;
use crate::error::AppError;
use crate::models::user::{User, UserType};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Deserialize)]
pub struct RegisterUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub user_type: Option<String>,
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
}

impl RegisterUserRequest {
    pub fn validate(self) -> Result<NewUser, AppError> {
        let (Some(username), Some(email), Some(first_name), Some(last_name), Some(user_type)) = (
            present(self.username),
            present(self.email),
            present(self.first_name),
            present(self.last_name),
            present(self.user_type),
        ) else {
            return Err(AppError::validation("All fields are required"));
        };
        // Passwords are not trimmed
        let password = match self.password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(AppError::validation("All fields are required")),
        };

        let user_type: UserType = user_type
            .parse()
            .map_err(|_| AppError::validation("Invalid user type"))?;
        if !user_type.is_self_registrable() {
            return Err(AppError::validation("Invalid user type"));
        }
        validate_username(&username)?;
        validate_email(&email)?;
        validate_new_password(&password)?;

        Ok(NewUser { username, email, password, first_name, last_name, user_type })
    }
}

/// Usernames may not look like emails, so a login identifier maps to one account.
fn validate_username(username: &str) -> Result<(), AppError> {
    if username.contains('@') {
        return Err(AppError::validation("Username cannot contain '@'"));
    }
    Ok(())
}

pub(crate) fn validate_new_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), AppError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace) => Ok(()),
        _ => Err(AppError::validation("Invalid email address")),
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub identifier: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    /// Returns `(identifier, password)`.
    pub fn validate(self) -> Result<(String, String), AppError> {
        match (present(self.identifier), self.password.filter(|p| !p.is_empty())) {
            (Some(identifier), Some(password)) => Ok((identifier, password)),
            _ => Err(AppError::validation("Email/Username and password are required")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: i64,
    pub username: String,
    pub user_type: UserType,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    pub user_type: UserType,
    pub user_data: SessionUser,
    pub token: String,
    pub expires_in_seconds: i64,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UpdateProfileRequest {
    pub fn validate(self) -> Result<ProfileUpdate, AppError> {
        let (Some(username), Some(email), Some(first_name), Some(last_name)) = (
            present(self.username),
            present(self.email),
            present(self.first_name),
            present(self.last_name),
        ) else {
            return Err(AppError::validation("All fields are required"));
        };
        validate_username(&username)?;
        validate_email(&email)?;
        Ok(ProfileUpdate { username, email, first_name, last_name })
    }
}

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

impl PasswordResetRequest {
    pub fn validate(self) -> Result<String, AppError> {
        present(self.email).ok_or_else(|| AppError::validation("Email is required"))
    }
}

/// Identical for known and unknown emails.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequested {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_token: Option<String>,
    pub expires_in_seconds: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    pub reset_token: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug)]
pub struct PasswordResetFields {
    pub email: String,
    pub reset_token: String,
    pub new_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(self) -> Result<PasswordResetFields, AppError> {
        let (Some(email), Some(reset_token)) = (present(self.email), present(self.reset_token)) else {
            return Err(AppError::validation("All fields are required"));
        };
        let new_password = match self.new_password {
            Some(p) if !p.is_empty() => p,
            _ => return Err(AppError::validation("All fields are required")),
        };
        validate_new_password(&new_password)?;
        Ok(PasswordResetFields { email, reset_token, new_password })
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    pub balance: f64,
    pub account_status: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            user_type: u.user_type,
            balance: u.balance,
            account_status: u.account_status,
            created_at: u.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct UserEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(json: &str) -> Result<NewUser, AppError> {
        serde_json::from_str::<RegisterUserRequest>(json).unwrap().validate()
    }

    const VALID: &str = r#"{"username":" ana ","email":"ana@example.com","password":"secret1",
        "first_name":"Ana","last_name":"Lim","user_type":"Investor"}"#;

    #[test]
    fn accepts_complete_registration_and_trims() {
        let user = register(VALID).unwrap();
        assert_eq!(user.username, "ana");
        assert_eq!(user.user_type, UserType::Investor);
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        let err = register(r#"{"username":"ana","email":"ana@example.com","password":"secret1"}"#).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m == "All fields are required"));

        let err = register(&VALID.replace("\"Lim\"", "\"  \"")).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[test]
    fn rejects_admin_and_unknown_roles() {
        assert!(register(&VALID.replace("Investor", "Admin")).is_err());
        assert!(register(&VALID.replace("Investor", "Banker")).is_err());
    }

    #[test]
    fn rejects_short_password_and_bad_email() {
        assert!(register(&VALID.replace("secret1", "abc")).is_err());
        assert!(register(&VALID.replace("ana@example.com", "ana.example.com")).is_err());
        assert!(register(&VALID.replace("ana@example.com", "@example.com")).is_err());
    }

    #[test]
    fn usernames_cannot_contain_at_sign() {
        let err = register(&VALID.replace("\" ana \"", "\"victim@x.com\"")).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m == "Username cannot contain '@'"));

        let req: UpdateProfileRequest = serde_json::from_str(
            r#"{"username":"bo@corp","email":"bo@corp.com","first_name":"Bo","last_name":"Li"}"#,
        )
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn reset_uses_client_field_names_and_registration_length_rule() {
        let req: ResetPasswordRequest = serde_json::from_str(
            r#"{"email":"ana@example.com","resetToken":"abc","newPassword":"longenough"}"#,
        )
        .unwrap();
        let fields = req.validate().unwrap();
        assert_eq!(fields.reset_token, "abc");

        let req: ResetPasswordRequest =
            serde_json::from_str(r#"{"email":"ana@example.com","resetToken":"abc","newPassword":"short"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: ResetPasswordRequest = serde_json::from_str(r#"{"email":"ana@example.com"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn reset_token_is_omitted_when_not_exposed() {
        let body = serde_json::to_value(PasswordResetRequested {
            success: true,
            message: "m",
            reset_token: None,
            expires_in_seconds: 1800,
        })
        .unwrap();
        assert!(body.get("resetToken").is_none());
        assert_eq!(body["expiresInSeconds"], 1800);
    }

    #[test]
    fn login_requires_both_fields() {
        let req: LoginRequest = serde_json::from_str(r#"{"identifier":"ana"}"#).unwrap();
        assert!(req.validate().is_err());
        let req: LoginRequest = serde_json::from_str(r#"{"identifier":"ana@example.com","password":"x"}"#).unwrap();
        assert_eq!(req.validate().unwrap().0, "ana@example.com");
    }

    #[test]
    fn login_response_uses_client_field_names() {
        let body = serde_json::to_value(LoginResponse {
            success: true,
            message: "Login successful",
            user_type: UserType::Entrepreneur,
            user_data: SessionUser { id: 1, username: "bo".into(), user_type: UserType::Entrepreneur },
            token: "t".into(),
            expires_in_seconds: 3600,
        })
        .unwrap();
        assert_eq!(body["userType"], "Entrepreneur");
        assert_eq!(body["userData"]["id"], 1);
        assert_eq!(body["userData"]["user_type"], "Entrepreneur");
        assert_eq!(body["token"], "t");
    }
}
