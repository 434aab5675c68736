//! Settings resolution: command-line flags over environment over defaults.
//!
//! - `WORDTREE_DB_PATH`: SQLite database file path (default: "wordtree.db")
//! - `WORDTREE_ROOT_NAME`: name given to a lazily created root (default: "Menu")

use wordtree_engine::EngineConfig;

pub const DB_PATH_VAR: &str = "WORDTREE_DB_PATH";
pub const ROOT_NAME_VAR: &str = "WORDTREE_ROOT_NAME";
pub const DEFAULT_DB_PATH: &str = "wordtree.db";

/// Where the menu lives for this invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backing {
    File(String),
    /// A private SQLite database that vanishes on exit.
    InMemory,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub backing: Backing,
    pub engine: EngineConfig,
}

impl Settings {
    /// Resolves settings from flags, falling back to `lookup` for the
    /// environment.
    pub fn resolve<F>(db_flag: Option<String>, in_memory: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let backing = if in_memory {
            Backing::InMemory
        } else {
            Backing::File(
                db_flag
                    .or_else(|| lookup(DB_PATH_VAR))
                    .unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            )
        };

        let mut engine = EngineConfig::default();
        if let Some(name) = lookup(ROOT_NAME_VAR).filter(|n| !n.trim().is_empty()) {
            engine = engine.with_root_name(name);
        }

        Settings { backing, engine }
    }

    pub fn from_env(db_flag: Option<String>, in_memory: bool) -> Self {
        Self::resolve(db_flag, in_memory, |key| std::env::var(key).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let pairs: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        }
    }

    #[test]
    fn defaults_without_env() {
        let settings = Settings::resolve(None, false, env(&[]));
        assert_eq!(settings.backing, Backing::File("wordtree.db".to_string()));
        assert_eq!(settings.engine.root_name, "Menu");
    }

    #[test]
    fn env_overrides_defaults() {
        let settings = Settings::resolve(
            None,
            false,
            env(&[(DB_PATH_VAR, "/tmp/menu.db"), (ROOT_NAME_VAR, "Main")]),
        );
        assert_eq!(settings.backing, Backing::File("/tmp/menu.db".to_string()));
        assert_eq!(settings.engine.root_name, "Main");
    }

    #[test]
    fn flags_override_env() {
        let lookup = env(&[(DB_PATH_VAR, "/tmp/menu.db")]);
        let settings = Settings::resolve(Some("local.db".to_string()), false, &lookup);
        assert_eq!(settings.backing, Backing::File("local.db".to_string()));

        let settings = Settings::resolve(Some("local.db".to_string()), true, &lookup);
        assert_eq!(settings.backing, Backing::InMemory);
    }

    #[test]
    fn blank_root_name_is_ignored() {
        let settings = Settings::resolve(None, false, env(&[(ROOT_NAME_VAR, "  ")]));
        assert_eq!(settings.engine.root_name, "Menu");
    }
}
