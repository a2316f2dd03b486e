//! Centralized reader for SYNCTEX_JUMP_* environment variables.
//!
//! Environment variable names are defined as private constants here;
//! external code accesses values through the `EnvVars` struct.

const LOG: &str = "SYNCTEX_JUMP_LOG";

/// Snapshot of all SYNCTEX_JUMP_* environment variables at load time.
pub struct EnvVars {
    /// Filter directive for the `--log` file (EnvFilter syntax, default: debug).
    pub log_filter: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvVars {
    /// Read all SYNCTEX_JUMP_* environment variables from the current process.
    pub fn load() -> Self {
        Self {
            log_filter: non_empty_var(LOG),
        }
    }
}
