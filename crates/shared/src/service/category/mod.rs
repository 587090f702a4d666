mod command;
mod query;

pub use self::command::{CategoryCommandService, CategoryCommandServiceDeps};
pub use self::query::CategoryQueryService;
