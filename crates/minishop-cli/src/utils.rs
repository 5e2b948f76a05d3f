use std::{
    fmt::Display,
    io::{self, Write},
    sync::{LazyLock, RwLock},
};

use minishop_core::{
    error::{ErrorContext, ShopError},
    ShopResult,
};
use nu_ansi_term::Color;
use serde::Serialize;

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));
pub static JSON: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(false));

pub fn json_enabled() -> bool {
    JSON.read().map(|json| *json).unwrap_or(false)
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = COLOR.read().map(|c| *c).unwrap_or(true);
        if color {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Writes `value` to `out` as one JSON document followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> ShopResult<()> {
    serde_json::to_writer(&mut *out, value)
        .map_err(|e| ShopError::Custom(format!("serializing output: {e}")))?;
    writeln!(out).with_context(|| "writing output".to_string())
}

/// Prints `value` to stdout as a single JSON document, bypassing the log
/// formatter.
pub fn print_json<T: Serialize>(value: &T) -> ShopResult<()> {
    write_json(&mut io::stdout().lock(), value)
}

pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
