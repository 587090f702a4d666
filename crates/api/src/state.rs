use anyhow::{Context, Result, anyhow};
use chrono::Duration;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynCacheBackend, DynHashing, DynJwtService, DynNotifier},
    cache::{CacheStore, MemoryCacheBackend, RedisCacheBackend},
    config::{
        AdminBootstrap, CacheBackendKind, Config, ConnectionPool, Hashing, JwtConfig, RedisClient,
    },
    di::{DependenciesInject, DependenciesInjectDeps},
    domain::requests::CreateAdminRequest,
    errors::ServiceError,
    events::NotificationHub,
    utils::{SystemMetrics, run_metrics_collector},
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;
use tracing::{info, warn};
use validator::Validate;

const MEMORY_CACHE_CAPACITY: u64 = 10_000;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
    pub system_metrics: Arc<SystemMetrics>,
    /// `max-age` advertised on public catalogue responses.
    pub public_max_age: i64,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("jwt_config", &"<JwtService>")
            .field("registry", &"<Registry>")
            .field("system_metrics", &self.system_metrics)
            .field("public_max_age", &self.public_max_age)
            .finish()
    }
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let jwt_config = Arc::new(JwtConfig::with_lifetimes(
            &config.jwt_secret,
            Duration::minutes(config.access_token_minutes),
            Duration::days(config.refresh_token_days),
        )) as DynJwtService;

        let hashing = Arc::new(Hashing::new(config.bcrypt_cost)) as DynHashing;

        let backend = build_cache_backend(config).await?;
        let cache = CacheStore::new(backend, Duration::seconds(config.cache_ttl_seconds));

        let notifier = Arc::new(NotificationHub::new()) as DynNotifier;

        let mut registry = Registry::default();
        let system_metrics = Arc::new(SystemMetrics::new());

        let di_container = DependenciesInject::new(
            DependenciesInjectDeps {
                pool,
                hash: hashing,
                jwt_config: jwt_config.clone(),
                cache,
                notifier,
            },
            &mut registry,
        )
        .context("Failed to initialize dependency injection container")?;

        system_metrics.register(&mut registry);

        tokio::spawn(run_metrics_collector(system_metrics.clone()));

        Ok(Self {
            di_container,
            jwt_config,
            registry: Arc::new(Mutex::new(registry)),
            system_metrics,
            public_max_age: config.cache_ttl_seconds,
        })
    }

    /// Creates the configured administrator unless the username is taken.
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> Result<()> {
        let request = CreateAdminRequest {
            username: admin.username.clone(),
            email: admin.email.clone(),
            password: admin.password.clone(),
            password_confirm: admin.password.clone(),
            first_name: String::new(),
            last_name: String::new(),
            phone: None,
            address: None,
        };

        request
            .validate()
            .map_err(|e| anyhow!("Invalid ADMIN_* settings: {e}"))?;

        match self.di_container.user_service.create_admin(&request).await {
            Ok(_) => {
                info!("👤 Bootstrap admin '{}' created", admin.username);
                Ok(())
            }
            Err(ServiceError::Validation(_)) => {
                info!(
                    "👤 Bootstrap admin '{}' already exists, skipping",
                    admin.username
                );
                Ok(())
            }
            Err(e) => Err(anyhow!("Failed to create bootstrap admin: {e}")),
        }
    }
}

async fn build_cache_backend(config: &Config) -> Result<DynCacheBackend> {
    match config.cache_backend {
        CacheBackendKind::Redis => {
            info!("Initializing Redis cache backend");

            let redis = RedisClient::new(&config.redis).context("Failed to create Redis client")?;
            redis
                .ping()
                .await
                .context("Failed to ping Redis server")?;

            Ok(Arc::new(RedisCacheBackend::new(redis.pool)) as DynCacheBackend)
        }
        CacheBackendKind::Memory => {
            warn!("Using in-process cache backend, entries are not shared between instances");

            Ok(Arc::new(MemoryCacheBackend::new(MEMORY_CACHE_CAPACITY)) as DynCacheBackend)
        }
    }
}
