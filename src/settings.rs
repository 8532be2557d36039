//! Settings for the registry and the demo binary.
//!
//! Sources are layered: built-in defaults, then an optional `intermark.toml` in the
//! working directory, then `INTERMARK_*` environment variables
//! (e.g. `INTERMARK_TRACE_EVALUATIONS=true`).

use serde::Deserialize;

use crate::error::Result;

pub const CONFIG_FILE: &str = "intermark";
pub const ENV_PREFIX: &str = "INTERMARK";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Default tracing directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Emit a trace event for every "is-a" evaluation. Off by default since evaluation
    /// is the hot path.
    #[serde(default)]
    pub trace_evaluations: bool,
    /// Initial capacity of the registry's binding map.
    #[serde(default = "default_registry_capacity")]
    pub registry_capacity: usize,
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_registry_capacity() -> usize {
    64
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            trace_evaluations: false,
            registry_capacity: default_registry_capacity(),
        }
    }
}

impl Settings {
    /// Load settings from all sources.
    pub fn load() -> Result<Self> {
        Self::load_from(config::File::with_name(CONFIG_FILE).required(false))
    }

    /// Load settings with `file` taking the place of the default config file.
    pub fn load_from<S>(file: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_missing_keys() {
        let source = config::File::from_str("", config::FileFormat::Toml);
        let settings = Settings::load_from(source).expect("settings");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.registry_capacity, 64);
    }

    #[test]
    fn file_values_override_defaults() {
        let source = config::File::from_str(
            "log_level = \"debug\"\ntrace_evaluations = true\nregistry_capacity = 8\n",
            config::FileFormat::Toml,
        );
        let settings = Settings::load_from(source).expect("settings");
        assert_eq!(
            settings,
            Settings {
                log_level: String::from("debug"),
                trace_evaluations: true,
                registry_capacity: 8,
            }
        );
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let source = config::File::from_str("registry_capacity = \"many\"", config::FileFormat::Toml);
        let err = Settings::load_from(source).unwrap_err();
        assert!(format!("{}", err).starts_with("Config error"));
    }
}
