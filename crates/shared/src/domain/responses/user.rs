use crate::{domain::enums::UserType, model::User};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_type: UserType,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        UserResponse {
            user_type: value.kind(),
            id: value.id,
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            address: value.address,
            is_active: value.is_active,
            date_joined: value.date_joined,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProfileResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub user_type: UserType,
    pub date_joined: NaiveDateTime,
    pub last_login: Option<NaiveDateTime>,
    pub is_admin: bool,
    pub is_customer: bool,
    pub is_active: bool,
    pub is_staff: bool,
    pub full_name: String,
}

impl From<User> for ProfileResponse {
    fn from(value: User) -> Self {
        let user_type = value.kind();
        let full_name = value.full_name();

        ProfileResponse {
            id: value.id,
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            address: value.address,
            user_type,
            date_joined: value.date_joined,
            last_login: value.last_login,
            is_admin: user_type == UserType::Admin,
            is_customer: user_type == UserType::Customer,
            is_active: value.is_active,
            is_staff: value.is_staff,
            full_name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ProfileStatsResponse {
    pub user_id: i32,
    pub username: String,
    pub user_type: UserType,
    pub days_since_joined: i64,
    pub is_active: bool,
    pub last_login: Option<NaiveDateTime>,
    pub date_joined: NaiveDateTime,
    pub full_name: String,
    pub profile_complete: bool,
}

impl ProfileStatsResponse {
    pub fn from_user(user: &User, now: NaiveDateTime) -> Self {
        ProfileStatsResponse {
            user_id: user.id,
            username: user.username.clone(),
            user_type: user.kind(),
            days_since_joined: (now - user.date_joined).num_days().max(0),
            is_active: user.is_active,
            last_login: user.last_login,
            date_joined: user.date_joined,
            full_name: user.full_name(),
            profile_complete: user.profile_complete(),
        }
    }
}

impl From<&User> for ProfileStatsResponse {
    fn from(user: &User) -> Self {
        Self::from_user(user, Utc::now().naive_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user_fixtures::user;
    use chrono::Duration;

    #[test]
    fn profile_flags_follow_user_type() {
        let profile = ProfileResponse::from(user(1, "boss", UserType::Admin));
        assert!(profile.is_admin);
        assert!(!profile.is_customer);
        assert!(profile.is_staff);
        assert_eq!(profile.full_name, "boss");
    }

    #[test]
    fn stats_count_days_since_joined() {
        let jane = user(2, "jane", UserType::Customer);
        let now = jane.date_joined + Duration::days(45) + Duration::hours(3);

        let stats = ProfileStatsResponse::from_user(&jane, now);
        assert_eq!(stats.days_since_joined, 45);
        assert!(!stats.profile_complete);
    }
}
