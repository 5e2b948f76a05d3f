//! Error types for minishop-core.

use miette::Diagnostic;
use minishop_config::error::ConfigError;
use minishop_db::error::DbError;
use thiserror::Error;

/// Core error type for minishop operations.
#[derive(Error, Diagnostic, Debug)]
pub enum ShopError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error("Error while {action}")]
    #[diagnostic(code(minishop::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Member {0} not found")]
    #[diagnostic(
        code(minishop::member_not_found),
        help("Run 'minishop member search' to list members")
    )]
    MemberNotFound(i32),

    #[error("Item {0} not found")]
    #[diagnostic(
        code(minishop::item_not_found),
        help("Run 'minishop item list' to see the catalog")
    )]
    ItemNotFound(i32),

    #[error("Order {0} not found")]
    #[diagnostic(code(minishop::order_not_found))]
    OrderNotFound(i32),

    #[error("Team '{0}' not found")]
    #[diagnostic(
        code(minishop::team_not_found),
        help("Create it first with 'minishop team add'")
    )]
    TeamNotFound(String),

    #[error("Not enough stock for '{name}': requested {requested}, available {available}")]
    #[diagnostic(code(minishop::insufficient_stock))]
    InsufficientStock {
        name: String,
        requested: i32,
        available: i32,
    },

    #[error("Order {0} has already been delivered")]
    #[diagnostic(
        code(minishop::already_delivered),
        help("Delivered orders cannot be cancelled")
    )]
    AlreadyDelivered(i32),

    #[error("Order {0} is already cancelled")]
    #[diagnostic(code(minishop::already_cancelled))]
    AlreadyCancelled(i32),

    #[error("An order needs at least one item")]
    #[diagnostic(code(minishop::empty_order), help("Pass one or more --item ID:QTY"))]
    EmptyOrder,

    #[error("Invalid quantity {quantity} for item {item_id}")]
    #[diagnostic(
        code(minishop::invalid_quantity),
        help("Quantities must be positive")
    )]
    InvalidQuantity { item_id: i32, quantity: i32 },

    #[error("Thread lock poison error")]
    #[diagnostic(
        code(minishop::poison),
        help("This is an internal error, please report it")
    )]
    PoisonError,

    #[error("{0}")]
    #[diagnostic(code(minishop::error))]
    Custom(String),
}

impl From<diesel::result::Error> for ShopError {
    fn from(err: diesel::result::Error) -> Self {
        Self::Database(DbError::from(err))
    }
}

impl<T> From<std::sync::PoisonError<T>> for ShopError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::PoisonError
    }
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, ShopError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, ShopError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            ShopError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diesel_not_found_maps_to_database_error() {
        let err = ShopError::from(diesel::result::Error::NotFound);
        assert!(matches!(err, ShopError::Database(DbError::NotFound(_))));
    }

    #[test]
    fn test_io_context() {
        let result: std::io::Result<()> = Err(std::io::Error::other("boom"));
        let err = result.with_context(|| "writing export".to_string()).unwrap_err();

        assert_eq!(err.to_string(), "Error while writing export");
    }
}
