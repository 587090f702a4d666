use anyhow::{Context, Result};
use deadpool_redis::{Pool, Runtime};
use tracing::info;

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: u8,
    pub password: Option<String>,
}

impl RedisConfig {
    pub fn new(host: String, port: u16, db: u8, password: Option<String>) -> Self {
        Self {
            host,
            port,
            db,
            password,
        }
    }

    pub fn url(&self) -> String {
        match &self.password {
            Some(pw) => format!("redis://:{}@{}:{}/{}", pw, self.host, self.port, self.db),
            None => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

#[derive(Clone)]
pub struct RedisClient {
    pub pool: Pool,
}

impl RedisClient {
    pub fn new(config: &RedisConfig) -> Result<Self> {
        info!("Creating redis pool for {}:{}", config.host, config.port);

        let pool = deadpool_redis::Config::from_url(config.url())
            .create_pool(Some(Runtime::Tokio1))
            .context("Failed to create redis pool")?;

        Ok(Self { pool })
    }

    pub async fn ping(&self) -> Result<()> {
        let mut conn = self
            .pool
            .get()
            .await
            .context("Failed to get redis connection")?;

        info!("Pinging redis");

        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        info!("Pinged redis");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_url_with_and_without_password() {
        let plain = RedisConfig::new("localhost".into(), 6379, 1, None);
        assert_eq!(plain.url(), "redis://localhost:6379/1");

        let secured = RedisConfig::new("redis".into(), 6380, 0, Some("secret".into()));
        assert_eq!(secured.url(), "redis://:secret@redis:6380/0");
    }
}
