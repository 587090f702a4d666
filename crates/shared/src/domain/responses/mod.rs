mod api;
mod cache;
mod cart;
mod category;
mod dashboard;
mod order;
mod pagination;
mod product;
mod session;
mod token;
mod user;

pub use self::api::{ApiResponse, ApiResponsePagination};
pub use self::cache::{CacheLookup, CacheStatsResponse};
pub use self::cart::{CartItemResponse, CartResponse};
pub use self::category::CategoryResponse;
pub use self::dashboard::{AdminDashboardResponse, CustomerDashboardResponse};
pub use self::order::{OrderItemResponse, OrderResponse};
pub use self::pagination::Pagination;
pub use self::product::{ProductListResponse, ProductResponse};
pub use self::session::Session;
pub use self::token::{LoginResponse, RefreshResponse};
pub use self::user::{ProfileResponse, ProfileStatsResponse, UserResponse};
