//! History file location for the shell.
//!
//! Defaults to `~/.oakdb_history`; the `OAKDB_HISTORY` environment variable
//! overrides the path, and setting it to an empty string disables history
//! persistence. rustyline handles the actual file I/O.

use std::env;
use std::path::PathBuf;

const DEFAULT_HISTORY_FILE: &str = ".oakdb_history";
const HISTORY_ENV_VAR: &str = "OAKDB_HISTORY";

pub fn history_path() -> Option<PathBuf> {
    if let Ok(custom_path) = env::var(HISTORY_ENV_VAR) {
        if custom_path.is_empty() {
            return None;
        }
        return Some(PathBuf::from(custom_path));
    }

    env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(DEFAULT_HISTORY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_history_path_from_env() {
        env::set_var(HISTORY_ENV_VAR, "/custom/path");
        let path = history_path();
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(path, Some(PathBuf::from("/custom/path")));
    }

    #[test]
    fn empty_env_disables_history() {
        env::set_var(HISTORY_ENV_VAR, "");
        let path = history_path();
        env::remove_var(HISTORY_ENV_VAR);

        assert_eq!(path, None);
    }
}
