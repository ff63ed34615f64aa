use anyhow::{Context, Result};
use config as cfg;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Tuning for the design-instant search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Solar arc between the design moment and birth
    #[serde(default = "SolverConfig::default_design_arc")]
    pub design_arc_degrees: f64,
    /// Mean daily solar motion used for the initial estimate
    #[serde(default = "SolverConfig::default_mean_motion")]
    pub mean_solar_motion: f64,
    /// Maximum distance from the estimate the bracket scan may walk
    #[serde(default = "SolverConfig::default_scan_window_days")]
    pub scan_window_days: f64,
    #[serde(default = "SolverConfig::default_scan_step_hours")]
    pub scan_step_hours: f64,
    /// Bisection stops once the bracket is narrower than this
    #[serde(default = "SolverConfig::default_tolerance_seconds")]
    pub tolerance_seconds: f64,
    #[serde(default = "SolverConfig::default_max_iterations")]
    pub max_iterations: usize,
}

impl SolverConfig {
    fn default_design_arc() -> f64 {
        88.0
    }

    fn default_mean_motion() -> f64 {
        0.9856
    }

    fn default_scan_window_days() -> f64 {
        30.0
    }

    fn default_scan_step_hours() -> f64 {
        12.0
    }

    fn default_tolerance_seconds() -> f64 {
        30.0
    }

    fn default_max_iterations() -> usize {
        64
    }

    /// Number of scan steps that fit inside the window.
    pub fn max_scan_steps(&self) -> usize {
        (self.scan_window_days * 24.0 / self.scan_step_hours).ceil() as usize
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            design_arc_degrees: Self::default_design_arc(),
            mean_solar_motion: Self::default_mean_motion(),
            scan_window_days: Self::default_scan_window_days(),
            scan_step_hours: Self::default_scan_step_hours(),
            tolerance_seconds: Self::default_tolerance_seconds(),
            max_iterations: Self::default_max_iterations(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Defaults, then the optional file, then `BODYGRAPH__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = cfg::Config::builder();
        if let Some(path) = path {
            info!("Loading configuration from {:?}", path);
            builder = builder.add_source(cfg::File::from(path).required(true));
        }
        builder = builder.add_source(
            cfg::Environment::with_prefix("BODYGRAPH")
                .separator("__")
                .try_parsing(true),
        );

        let config: EngineConfig = builder
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(s).context("parsing TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing configuration")
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.solver;
        anyhow::ensure!(
            s.design_arc_degrees > 0.0 && s.design_arc_degrees < 360.0,
            "solver.design_arc_degrees must be in (0, 360)"
        );
        anyhow::ensure!(
            s.mean_solar_motion > 0.0 && s.mean_solar_motion.is_finite(),
            "solver.mean_solar_motion must be finite and > 0"
        );
        anyhow::ensure!(
            s.scan_step_hours > 0.0,
            "solver.scan_step_hours must be > 0"
        );
        anyhow::ensure!(
            s.scan_window_days.is_finite(),
            "solver.scan_window_days must be finite"
        );
        anyhow::ensure!(
            s.scan_window_days * 24.0 > s.scan_step_hours,
            "solver.scan_window_days must cover at least one scan step"
        );
        anyhow::ensure!(
            s.tolerance_seconds > 0.0 && s.tolerance_seconds.is_finite(),
            "solver.tolerance_seconds must be finite and > 0"
        );
        anyhow::ensure!(s.max_iterations > 0, "solver.max_iterations must be > 0");
        anyhow::ensure!(
            !self.logging.level.trim().is_empty(),
            "logging.level cannot be empty"
        );
        Ok(())
    }
}
