pub mod annotations;
pub mod config;
pub mod error;
pub mod paths;

#[cfg(test)]
pub mod test_utils;
