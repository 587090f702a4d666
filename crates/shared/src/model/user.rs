use crate::domain::enums::UserType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_type: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct UserCounts {
    pub total_users: i64,
    pub admin_users: i64,
    pub customer_users: i64,
}

impl User {
    pub fn kind(&self) -> UserType {
        self.user_type.parse().unwrap_or(UserType::Customer)
    }

    pub fn is_admin(&self) -> bool {
        self.kind() == UserType::Admin
    }

    /// First and last name, or the username when both are blank.
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn profile_complete(&self) -> bool {
        !self.first_name.trim().is_empty()
            && !self.last_name.trim().is_empty()
            && !self.email.trim().is_empty()
            && self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}
