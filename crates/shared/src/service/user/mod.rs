mod admin;
mod dashboard;
mod profile;

pub use self::admin::{UserService, UserServiceDeps};
pub use self::dashboard::DashboardService;
pub use self::profile::{ProfileService, ProfileServiceDeps, SESSION_TTL_MINUTES};
