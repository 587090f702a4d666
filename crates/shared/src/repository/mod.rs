mod cart;
mod category;
mod order;
mod product;
mod refresh_token;
mod user;

pub use self::cart::CartRepository;
pub use self::category::CategoryRepository;
pub use self::order::OrderRepository;
pub use self::product::ProductRepository;
pub use self::refresh_token::RefreshTokenRepository;
pub use self::user::UserRepository;
