mod auth;
mod cache;
mod cart;
mod category;
mod order;
mod product;
mod query;
mod user;

pub use self::auth::{LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest};
pub use self::cache::InvalidateCacheRequest;
pub use self::cart::{AddToCartRequest, UpdateCartItemRequest};
pub use self::category::{CreateCategoryRequest, FindAllCategories, UpdateCategoryRequest};
pub use self::order::{
    CreateOrderRequest, FindAllOrders, PlaceOrder, PlaceOrderLine, UpdateOrderStatusRequest,
};
pub use self::product::{
    CreateProductRequest, FindAllProducts, UpdateProductRequest, UpdateStockRequest,
    validate_price,
};
pub use self::query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, SortOrder, like_pattern};
pub use self::user::{
    ChangePasswordRequest, CreateAdminRequest, CreateUserRecord, FindAllUsers,
    UpdateProfileRequest, UpdateUserRequest,
};
