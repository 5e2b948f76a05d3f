pub mod catalog;
pub mod database;
pub mod error;
pub mod members;
pub mod orders;
pub mod seed;
pub mod teams;

pub type ShopResult<T> = std::result::Result<T, error::ShopError>;
