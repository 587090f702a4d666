mod auth;
mod cache;
mod cart;
mod category;
mod order;
mod product;
mod user;

#[cfg(test)]
pub(crate) mod fakes;

pub use self::auth::{AuthService, AuthServiceDeps, LOGIN_LOCKOUT_MINUTES, MAX_LOGIN_ATTEMPTS};
pub use self::cache::CacheAdminService;
pub use self::cart::{CartService, CartServiceDeps, merged_quantity};
pub use self::category::{CategoryCommandService, CategoryCommandServiceDeps, CategoryQueryService};
pub use self::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService};
pub use self::product::{ProductCommandService, ProductCommandServiceDeps, ProductQueryService};
pub use self::user::{
    DashboardService, ProfileService, ProfileServiceDeps, SESSION_TTL_MINUTES, UserService,
    UserServiceDeps,
};
