pub mod connection;
pub mod error;
pub mod migration;
pub mod models;
pub mod query;
pub mod repository;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_utils;
