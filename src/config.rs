use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::model::AvocadoType;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "AVOCADO_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "avocado-analytics.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Settings read at startup.  Every field has a default, so a config file
/// only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Table loaded at startup.
    pub data_path: PathBuf,
    /// Initially selected region.
    pub region: String,
    /// Initially selected avocado type.
    pub kind: AvocadoType,
    pub window: WindowConfig,
}

/// Initial native window size, in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./datasets/avocadodataset/avocado.csv"),
            region: "Albany".to_string(),
            kind: AvocadoType::Conventional,
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file.
    pub fn from_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Pick the config source: explicit path, then `$AVOCADO_CONFIG`, then
    /// `avocado-analytics.json` inside `cwd`, else defaults.
    pub fn resolve(explicit: Option<&Path>, env: Option<PathBuf>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_json(path);
        }
        if let Some(path) = env {
            return Self::from_json(&path);
        }
        let local = cwd.join(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_json(&local);
        }
        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Avocado price dashboard.
#[derive(Debug, Clone, Default, PartialEq, Parser)]
#[command(name = "avocado-analytics")]
#[command(about = "Avocado price and volume dashboard")]
#[command(version)]
pub struct CliArgs {
    /// Config file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the initial view as JSON instead of opening a window
    #[arg(long)]
    pub print_view: bool,

    /// Table to load instead of the configured `data_path`
    pub data_file: Option<PathBuf>,
}

impl CliArgs {
    /// Apply command line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut DashboardConfig) {
        if let Some(path) = &self.data_file {
            config.data_path = path.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{ "region": "Boston", "kind": "organic" }"#).unwrap();
        assert_eq!(config.region, "Boston");
        assert_eq!(config.kind, AvocadoType::Organic);
        assert_eq!(config.data_path, DashboardConfig::default().data_path);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn resolve_prefers_explicit_then_env_then_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.json");
        let env = dir.path().join("env.json");
        std::fs::write(&explicit, r#"{ "region": "Explicit" }"#).unwrap();
        std::fs::write(&env, r#"{ "region": "Env" }"#).unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), r#"{ "region": "Local" }"#).unwrap();

        let pick = |explicit: Option<&Path>, env: Option<PathBuf>| {
            DashboardConfig::resolve(explicit, env, dir.path()).unwrap().region
        };
        assert_eq!(pick(Some(&explicit), Some(env.clone())), "Explicit");
        assert_eq!(pick(None, Some(env)), "Env");
        assert_eq!(pick(None, None), "Local");
    }

    #[test]
    fn resolve_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::resolve(None, None, dir.path()).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn broken_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ region: ").unwrap();
        assert!(DashboardConfig::from_json(&path).is_err());
    }

    #[test]
    fn parses_flags_and_data_file() {
        let args = CliArgs::try_parse_from([
            "avocado-analytics",
            "--config",
            "cfg.json",
            "--print-view",
            "avocado.csv",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(args.data_file, Some(PathBuf::from("avocado.csv")));
        assert!(args.print_view);

        let short = CliArgs::try_parse_from(["avocado-analytics", "-c", "cfg.json"]).unwrap();
        assert_eq!(short.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(short.data_file, None);

        let mut config = DashboardConfig::default();
        args.apply(&mut config);
        assert_eq!(config.data_path, PathBuf::from("avocado.csv"));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_files() {
        assert!(CliArgs::try_parse_from(["avocado-analytics", "--verbose"]).is_err());
        assert!(CliArgs::try_parse_from(["avocado-analytics", "a.csv", "b.csv"]).is_err());
        assert!(CliArgs::try_parse_from(["avocado-analytics", "--config"]).is_err());
    }
}
