//! Configuration management for the CLI
//!
//! Sources, lowest precedence first: built-in defaults, the per-user file,
//! an explicit `--config` file, `VMDASH_*` environment variables, flags.

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use dashboard_lib::{ForecastOptions, GrowthScenario, NodeSize, DEFAULT_TITLE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "VMDASH";

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Report title
    pub title: String,
    /// conservative, typical, aggressive or a percentage
    pub growth_scenario: String,
    /// small, medium or large
    pub node_size: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Values given on the command line; `None` leaves lower layers in charge
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub title: Option<String>,
    pub growth_scenario: Option<String>,
    pub node_size: Option<String>,
    pub log_json: bool,
}

impl Settings {
    /// Load every layer, looking for the user file in the platform config dir
    pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        Self::load_from(user_config_path().as_deref(), explicit, overrides)
    }

    pub fn load_from(
        user_file: Option<&Path>,
        explicit: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("title", DEFAULT_TITLE)?
            .set_default("growth_scenario", GrowthScenario::default().key())?
            .set_default("node_size", NodeSize::default().key())?
            .set_default("log_json", false)?;

        if let Some(path) = user_file {
            builder = builder.add_source(File::from(path).required(false));
        }
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(anyhow!("config file not found: {}", path.display()));
            }
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        if let Some(title) = &overrides.title {
            builder = builder.set_override("title", title.as_str())?;
        }
        if let Some(scenario) = &overrides.growth_scenario {
            builder = builder.set_override("growth_scenario", scenario.as_str())?;
        }
        if let Some(size) = &overrides.node_size {
            builder = builder.set_override("node_size", size.as_str())?;
        }
        if overrides.log_json {
            builder = builder.set_override("log_json", true)?;
        }

        builder
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Parse the forecast settings into their typed form
    pub fn forecast_options(&self) -> Result<ForecastOptions> {
        let scenario = self
            .growth_scenario
            .parse::<GrowthScenario>()
            .map_err(|e| anyhow!(e))
            .context("Invalid growth scenario")?;
        let node_size = self
            .node_size
            .parse::<NodeSize>()
            .map_err(|e| anyhow!(e))
            .context("Invalid node size")?;
        Ok(ForecastOptions {
            scenario,
            node_size,
        })
    }
}

/// `<config dir>/vmdash/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|dir| dir.join("vmdash").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("none.toml");
        let settings = Settings::load_from(Some(missing.as_path()), None, &Overrides::default()).unwrap();

        assert_eq!(settings.title, DEFAULT_TITLE);
        assert_eq!(settings.growth_scenario, "typical");
        assert_eq!(settings.node_size, "medium");
        assert!(!settings.log_json);
        assert_eq!(settings.forecast_options().unwrap(), ForecastOptions::default());
    }

    #[test]
    fn test_layer_precedence() {
        let dir = TempDir::new().unwrap();
        let user = write(
            &dir,
            "user.toml",
            "title = \"User Title\"\ngrowth_scenario = \"conservative\"\nnode_size = \"small\"\n",
        );
        let explicit = write(&dir, "run.toml", "growth_scenario = \"aggressive\"\n");
        let overrides = Overrides {
            node_size: Some("large".into()),
            ..Default::default()
        };

        let settings = Settings::load_from(Some(user.as_path()), Some(explicit.as_path()), &overrides).unwrap();
        assert_eq!(settings.title, "User Title");
        assert_eq!(settings.growth_scenario, "aggressive");
        assert_eq!(settings.node_size, "large");

        let options = settings.forecast_options().unwrap();
        assert_eq!(options.scenario, GrowthScenario::Aggressive);
        assert_eq!(options.node_size, NodeSize::Large);
    }

    #[test]
    fn test_custom_rate_from_flag() {
        let overrides = Overrides {
            growth_scenario: Some("12.5".into()),
            log_json: true,
            ..Default::default()
        };
        let settings = Settings::load_from(None, None, &overrides).unwrap();
        assert!(settings.log_json);
        assert_eq!(
            settings.forecast_options().unwrap().scenario,
            GrowthScenario::Custom(12.5)
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");
        let err = Settings::load_from(None, Some(missing.as_path()), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let overrides = Overrides {
            node_size: Some("huge".into()),
            ..Default::default()
        };
        let settings = Settings::load_from(None, None, &overrides).unwrap();
        assert!(settings.forecast_options().is_err());
    }
}
