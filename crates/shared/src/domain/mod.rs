pub mod enums;
pub mod event;
pub mod requests;
pub mod responses;
