mod command;
mod query;

use self::command::RefreshTokenCommandRepository;
use self::query::RefreshTokenQueryRepository;

use crate::{
    abstract_trait::{DynRefreshTokenCommandRepository, DynRefreshTokenQueryRepository},
    config::ConnectionPool,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct RefreshTokenRepository {
    pub query: DynRefreshTokenQueryRepository,
    pub command: DynRefreshTokenCommandRepository,
}

impl RefreshTokenRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query = Arc::new(RefreshTokenQueryRepository::new(pool.clone())) as DynRefreshTokenQueryRepository;
        let command =
            Arc::new(RefreshTokenCommandRepository::new(pool.clone())) as DynRefreshTokenCommandRepository;

        Self { query, command }
    }
}
