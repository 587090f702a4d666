use crate::domain::enums::UserType;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllUsers {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Matches username or email.
    pub search: Option<String>,
    pub user_type: Option<UserType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    #[validate(length(max = 15, message = "Phone must be at most 15 characters"))]
    pub phone: Option<String>,

    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "New passwords don't match"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    #[validate(length(max = 15, message = "Phone must be at most 15 characters"))]
    pub phone: Option<String>,

    pub address: Option<String>,

    pub user_type: Option<UserType>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateAdminRequest {
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub password_confirm: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,

    #[validate(length(max = 15, message = "Phone must be at most 15 characters"))]
    pub phone: Option<String>,

    pub address: Option<String>,
}

/// Row to insert once the password has been hashed.
#[derive(Debug, Clone)]
pub struct CreateUserRecord {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_type: UserType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_password_requires_confirmation() {
        let req = ChangePasswordRequest {
            old_password: "old-password".into(),
            new_password: "new-password".into(),
            confirm_password: "other-password".into(),
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("confirm_password"));
    }

    #[test]
    fn profile_update_checks_email_only_when_present() {
        assert!(UpdateProfileRequest::default().validate().is_ok());

        let bad = UpdateProfileRequest {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
