use crate::{domain::enums::UserType, model::User};
use serde::{Deserialize, Serialize};

/// The authenticated caller, resolved once per request by the auth
/// middleware.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: i32,
    pub username: String,
    pub email: String,
    pub user_type: UserType,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn is_customer(&self) -> bool {
        self.user_type == UserType::Customer
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Session {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            user_type: user.kind(),
        }
    }
}
