pub mod item;
pub mod member;
pub mod order;
pub mod team;
pub mod types;
