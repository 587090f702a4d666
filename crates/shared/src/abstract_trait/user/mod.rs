mod command;
mod query;
mod service;

pub use self::command::{DynUserCommandRepository, UserCommandRepositoryTrait};
pub use self::query::{DynUserQueryRepository, UserQueryRepositoryTrait};
pub use self::service::{
    DashboardServiceTrait, DynDashboardService, DynProfileService, DynUserService,
    ProfileServiceTrait, UserServiceTrait,
};
