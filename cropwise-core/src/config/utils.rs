//! Configuration utility functions
//!
//! Helpers for reading override values from the environment. Each helper
//! takes a lookup function so callers (and tests) can substitute the source
//! of variables; `env_lookup` reads the real process environment.

/// Reads a variable from the process environment.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a boolean value from a variable or use the default.
///
/// Accepts `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off` in any case;
/// anything else keeps the default.
pub fn get_env_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(val) = lookup(key) else {
        return default;
    };
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => default,
    }
}

/// Get a f32 value from a variable or use the default
pub fn get_env_f32<F>(lookup: &F, key: &str, default: f32) -> f32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(default)
}

/// Get a u32 value from a variable or use the default
pub fn get_env_u32<F>(lookup: &F, key: &str, default: u32) -> u32
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(default)
}
