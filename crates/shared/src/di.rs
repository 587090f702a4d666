use crate::{
    abstract_trait::{
        DynAuthService, DynCacheAdminService, DynCartService, DynCategoryCommandService,
        DynCategoryQueryService, DynDashboardService, DynHashing, DynJwtService, DynNotifier,
        DynOrderCommandService, DynOrderQueryService, DynProductCommandService,
        DynProductQueryService, DynProfileService, DynUserService,
    },
    cache::CacheStore,
    config::ConnectionPool,
    repository::{
        CartRepository, CategoryRepository, OrderRepository, ProductRepository,
        RefreshTokenRepository, UserRepository,
    },
    service::{
        AuthService, AuthServiceDeps, CacheAdminService, CartService, CartServiceDeps,
        CategoryCommandService, CategoryCommandServiceDeps, CategoryQueryService,
        DashboardService, OrderCommandService, OrderCommandServiceDeps, OrderQueryService,
        ProductCommandService, ProductCommandServiceDeps, ProductQueryService, ProfileService,
        ProfileServiceDeps, UserService, UserServiceDeps,
    },
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: DynAuthService,
    pub profile_service: DynProfileService,
    pub user_service: DynUserService,
    pub dashboard_service: DynDashboardService,
    pub category_query: DynCategoryQueryService,
    pub category_command: DynCategoryCommandService,
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
    pub cart_service: DynCartService,
    pub order_query: DynOrderQueryService,
    pub order_command: DynOrderCommandService,
    pub cache_admin: DynCacheAdminService,
    pub notifier: DynNotifier,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"<AuthService>")
            .field("profile_service", &"<ProfileService>")
            .field("user_service", &"<UserService>")
            .field("dashboard_service", &"<DashboardService>")
            .field("category_query", &"<CategoryQueryService>")
            .field("category_command", &"<CategoryCommandService>")
            .field("product_query", &"<ProductQueryService>")
            .field("product_command", &"<ProductCommandService>")
            .field("cart_service", &"<CartService>")
            .field("order_query", &"<OrderQueryService>")
            .field("order_command", &"<OrderCommandService>")
            .field("cache_admin", &"<CacheAdminService>")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub pool: ConnectionPool,
    pub hash: DynHashing,
    pub jwt_config: DynJwtService,
    pub cache: CacheStore,
    pub notifier: DynNotifier,
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Result<Self> {
        let DependenciesInjectDeps {
            pool,
            hash,
            jwt_config,
            cache,
            notifier,
        } = deps;

        let user_repository = UserRepository::new(pool.clone());
        let refresh_token = RefreshTokenRepository::new(pool.clone());
        let category_repository = CategoryRepository::new(pool.clone());
        let product_repository = ProductRepository::new(pool.clone());
        let cart_repository = CartRepository::new(pool.clone());
        let order_repository = OrderRepository::new(pool);

        let auth_service = Arc::new(AuthService::new(
            AuthServiceDeps {
                user_query: user_repository.query.clone(),
                user_command: user_repository.command.clone(),
                token_query: refresh_token.query,
                token_command: refresh_token.command,
                hashing: hash.clone(),
                jwt: jwt_config,
                cache: cache.clone(),
            },
            registry,
        )) as DynAuthService;

        let profile_service = Arc::new(ProfileService::new(
            ProfileServiceDeps {
                query: user_repository.query.clone(),
                command: user_repository.command.clone(),
                hashing: hash.clone(),
                cache: cache.clone(),
            },
            registry,
        )) as DynProfileService;

        let user_service = Arc::new(UserService::new(
            UserServiceDeps {
                query: user_repository.query.clone(),
                command: user_repository.command,
                hashing: hash,
                cache: cache.clone(),
            },
            registry,
        )) as DynUserService;

        let dashboard_service =
            Arc::new(DashboardService::new(user_repository.query, registry)) as DynDashboardService;

        let category_query = Arc::new(CategoryQueryService::new(
            category_repository.query.clone(),
            cache.clone(),
            registry,
        )) as DynCategoryQueryService;

        let category_command = Arc::new(CategoryCommandService::new(
            CategoryCommandServiceDeps {
                command: category_repository.command,
                cache: cache.clone(),
            },
            registry,
        )) as DynCategoryCommandService;

        let product_query = Arc::new(ProductQueryService::new(
            product_repository.query.clone(),
            cache.clone(),
            registry,
        )) as DynProductQueryService;

        let product_command = Arc::new(ProductCommandService::new(
            ProductCommandServiceDeps {
                command: product_repository.command,
                category_query: category_repository.query,
                cache: cache.clone(),
            },
            registry,
        )) as DynProductCommandService;

        let cart_service = Arc::new(CartService::new(
            CartServiceDeps {
                query: cart_repository.query.clone(),
                command: cart_repository.command,
                product_query: product_repository.query,
            },
            registry,
        )) as DynCartService;

        let order_query = Arc::new(OrderQueryService::new(
            order_repository.query.clone(),
            registry,
        )) as DynOrderQueryService;

        let order_command = Arc::new(OrderCommandService::new(
            OrderCommandServiceDeps {
                query: order_repository.query,
                command: order_repository.command,
                cart_query: cart_repository.query,
                cache: cache.clone(),
                notifier: notifier.clone(),
            },
            registry,
        )) as DynOrderCommandService;

        let cache_admin =
            Arc::new(CacheAdminService::new(cache, registry)) as DynCacheAdminService;

        Ok(Self {
            auth_service,
            profile_service,
            user_service,
            dashboard_service,
            category_query,
            category_command,
            product_query,
            product_command,
            cart_service,
            order_query,
            order_command,
            cache_admin,
            notifier,
        })
    }
}
