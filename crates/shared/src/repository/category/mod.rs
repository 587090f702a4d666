mod command;
mod query;

use self::command::CategoryCommandRepository;
use self::query::CategoryQueryRepository;

use crate::{
    abstract_trait::{DynCategoryCommandRepository, DynCategoryQueryRepository},
    config::ConnectionPool,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct CategoryRepository {
    pub query: DynCategoryQueryRepository,
    pub command: DynCategoryCommandRepository,
}

impl CategoryRepository {
    pub fn new(pool: ConnectionPool) -> Self {
        let query = Arc::new(CategoryQueryRepository::new(pool.clone())) as DynCategoryQueryRepository;
        let command =
            Arc::new(CategoryCommandRepository::new(pool.clone())) as DynCategoryCommandRepository;

        Self { query, command }
    }
}
