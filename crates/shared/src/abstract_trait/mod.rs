mod auth;
mod cache;
mod category;
mod cart;
mod hashing;
mod jwt;
mod notification;
mod order;
mod product;
mod refresh_token;
mod user;

pub use self::auth::{AuthServiceTrait, DynAuthService};
pub use self::cache::{
    CacheAdminServiceTrait, CacheBackendTrait, DynCacheAdminService, DynCacheBackend,
};
pub use self::cart::{
    CartCommandRepositoryTrait, CartQueryRepositoryTrait, CartServiceTrait,
    DynCartCommandRepository, DynCartQueryRepository, DynCartService,
};
pub use self::category::{
    CategoryCommandRepositoryTrait, CategoryCommandServiceTrait, CategoryQueryRepositoryTrait,
    CategoryQueryServiceTrait, DynCategoryCommandRepository, DynCategoryCommandService,
    DynCategoryQueryRepository, DynCategoryQueryService,
};
pub use self::hashing::{DynHashing, HashingTrait};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
pub use self::notification::{DynNotifier, NotifierTrait};
pub use self::order::{
    DynOrderCommandRepository, DynOrderCommandService, DynOrderQueryRepository,
    DynOrderQueryService, OrderCommandRepositoryTrait, OrderCommandServiceTrait,
    OrderQueryRepositoryTrait, OrderQueryServiceTrait,
};
pub use self::product::{
    DynProductCommandRepository, DynProductCommandService, DynProductQueryRepository,
    DynProductQueryService, ProductCommandRepositoryTrait, ProductCommandServiceTrait,
    ProductQueryRepositoryTrait, ProductQueryServiceTrait,
};
pub use self::refresh_token::{
    DynRefreshTokenCommandRepository, DynRefreshTokenQueryRepository,
    RefreshTokenCommandRepositoryTrait, RefreshTokenQueryRepositoryTrait,
};
pub use self::user::{
    DashboardServiceTrait, DynDashboardService, DynProfileService, DynUserCommandRepository,
    DynUserQueryRepository, DynUserService, ProfileServiceTrait, UserCommandRepositoryTrait,
    UserQueryRepositoryTrait, UserServiceTrait,
};
