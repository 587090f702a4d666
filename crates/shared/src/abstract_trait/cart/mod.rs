mod command;
mod query;

pub use self::command::{
    CartCommandRepositoryTrait, CartServiceTrait, DynCartCommandRepository, DynCartService,
};
pub use self::query::{CartQueryRepositoryTrait, DynCartQueryRepository};
