mod cart;
mod category;
mod order;
mod product;
mod refresh_token;
mod user;

pub use self::cart::{Cart, CartItem};
pub use self::category::Category;
pub use self::order::{Order, OrderItem, OrderStatusChange};
pub use self::product::Product;
pub use self::refresh_token::RefreshToken;
pub use self::user::{User, UserCounts};

#[cfg(test)]
pub(crate) use self::user::fixtures as user_fixtures;
