use std::path::{Path, PathBuf};

use crate::config::CONFIG_PATH;

/// Runs `f` with the given variables set (`Some`) or removed (`None`),
/// restoring the previous environment afterwards.
pub fn with_env<F>(vars: &[(&str, Option<&str>)], f: F)
where
    F: FnOnce(),
{
    let saved: Vec<_> = vars
        .iter()
        .map(|(key, _)| (*key, std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }

    f();

    for (key, previous) in saved {
        match previous {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Writes `contents` to `config.toml` inside `dir` and returns its path as a string.
pub fn write_config(dir: &Path, contents: &str) -> String {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

/// Runs `f` with [`CONFIG_PATH`] pointed at `path`, restoring it afterwards.
pub fn with_config_path<F>(path: impl Into<PathBuf>, f: F)
where
    F: FnOnce(),
{
    let previous = std::mem::replace(&mut *CONFIG_PATH.write().unwrap(), path.into());
    f();
    *CONFIG_PATH.write().unwrap() = previous;
}
