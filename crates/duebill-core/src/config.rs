//! Filesystem locations and environment-sourced notify descriptors.

use std::path::PathBuf;

/// Environment variables with this prefix each contribute one notify
/// target descriptor (the variable's value).
pub const ENV_DESCRIPTOR_PREFIX: &str = "DUEBILL_NOTIFY_";

/// Data directory, `~/.duebill`.
pub fn data_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".duebill")
}

/// Database path. `DUEBILL_DB` overrides the default
/// `~/.duebill/duebill.db` (handy for tests and scripting).
pub fn db_path() -> PathBuf {
    match std::env::var("DUEBILL_DB") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => data_dir().join("duebill.db"),
    }
}

/// Collect notify target descriptors from `DUEBILL_NOTIFY_*` environment
/// variables, sorted by variable name so the channel order is stable.
pub fn env_descriptors() -> Vec<String> {
    let mut vars: Vec<(String, String)> = std::env::vars()
        .filter(|(key, _)| key.starts_with(ENV_DESCRIPTOR_PREFIX))
        .collect();
    vars.sort_by(|a, b| a.0.cmp(&b.0));
    vars.into_iter()
        .map(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_dir_ends_with_dot_duebill() {
        assert!(data_dir().ends_with(".duebill"));
    }

    #[test]
    fn test_db_path_env_override() {
        // Serialize env mutation against other tests in this module.
        unsafe { std::env::set_var("DUEBILL_DB", "/tmp/custom.db") };
        assert_eq!(db_path(), PathBuf::from("/tmp/custom.db"));
        unsafe { std::env::remove_var("DUEBILL_DB") };
        assert!(db_path().ends_with("duebill.db"));
    }
}
