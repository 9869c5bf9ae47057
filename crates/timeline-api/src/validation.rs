use timeline_types::api::{FieldError, RegisterRequest};
use timeline_types::models::Role;

use crate::error::ApiError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 32;
pub const PASSWORD_MIN: usize = 6;
pub const CONTENT_MAX: usize = 10_000;

/// A registration that passed validation. Username and full name are
/// trimmed; the password is kept as sent.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
}

pub fn registration(req: RegisterRequest) -> Result<NewUser, ApiError> {
    let mut errors = Vec::new();

    let username = req.username.trim().to_string();
    let username_len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len) {
        errors.push(field_error(
            "username",
            format!("Username must be {USERNAME_MIN} to {USERNAME_MAX} characters"),
        ));
    }

    if req.password.chars().count() < PASSWORD_MIN {
        errors.push(field_error(
            "password",
            format!("Password must be at least {PASSWORD_MIN} characters"),
        ));
    }

    let full_name = required(&req.full_name, "full_name", "Full name is required", &mut errors);

    let role = match req.role.trim().parse::<Role>() {
        Ok(role) => Some(role),
        Err(_) => {
            errors.push(field_error("role", "Role must be user or admin"));
            None
        }
    };

    match role {
        Some(role) if errors.is_empty() => Ok(NewUser {
            username,
            password: req.password,
            full_name,
            role,
        }),
        _ => Err(ApiError::Validation(errors)),
    }
}

/// Trimmed non-empty username and non-empty password.
pub fn login(username: &str, password: &str) -> Result<String, ApiError> {
    let mut errors = Vec::new();
    let username = required(username, "username", "Username is required", &mut errors);
    if password.is_empty() {
        errors.push(field_error("password", "Password is required"));
    }

    if errors.is_empty() {
        Ok(username)
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Post or comment body: trimmed, non-empty, bounded.
pub fn content(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::field("content", "Content is required"));
    }
    if trimmed.chars().count() > CONTENT_MAX {
        return Err(ApiError::field(
            "content",
            format!("Content must be at most {CONTENT_MAX} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn full_name(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::field("full_name", "Full name is required"));
    }
    Ok(trimmed.to_string())
}

pub fn role(raw: &str) -> Result<Role, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::field("role", "Role must be user or admin"))
}

fn required(raw: &str, field: &str, message: &str, errors: &mut Vec<FieldError>) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(field_error(field, message));
    }
    trimmed.to_string()
}

fn field_error(field: &str, message: impl Into<String>) -> FieldError {
    FieldError {
        field: field.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(username: &str, password: &str, full_name: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            password: password.into(),
            full_name: full_name.into(),
            role: role.into(),
        }
    }

    fn fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_registration_is_trimmed() {
        let user = registration(request("  alice ", "secret1", " Alice ", "admin")).unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.full_name, "Alice");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn every_bad_field_is_reported() {
        let err = registration(request("al", "123", "  ", "root")).unwrap_err();
        assert_eq!(fields(err), vec!["username", "password", "full_name", "role"]);
    }

    #[test]
    fn missing_role_is_rejected() {
        let err = registration(request("alice", "secret1", "Alice", "")).unwrap_err();
        assert_eq!(fields(err), vec!["role"]);
    }

    #[test]
    fn content_rules() {
        assert_eq!(content("  hi  ").unwrap(), "hi");
        assert_eq!(fields(content(" \n ").unwrap_err()), vec!["content"]);
        assert!(content(&"x".repeat(CONTENT_MAX + 1)).is_err());
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(login(" bob ", "pw").unwrap(), "bob");
        assert_eq!(fields(login("", "").unwrap_err()), vec!["username", "password"]);
    }
}
