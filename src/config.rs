use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::plot::assembler::DEFAULT_SERIES_PREFIX;
use crate::plot::filter::DEFAULT_PROCESS;
use crate::plot::{PlotOptions, ProcessFilter, SeriesNaming};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub plot: PlotConfig,
    pub report: ReportConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Exact process names to track.
    pub names: Vec<String>,
    /// Regex on the process name; wins over `names` when set.
    pub pattern: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            names: vec![DEFAULT_PROCESS.to_string()],
            pattern: None,
        }
    }
}

impl FilterConfig {
    pub fn to_filter(&self) -> Result<ProcessFilter, regex::Error> {
        match &self.pattern {
            Some(pattern) => ProcessFilter::pattern(pattern),
            None => Ok(ProcessFilter::names(self.names.iter().cloned())),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub series_prefix: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            series_prefix: DEFAULT_SERIES_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: "mdbtop".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    pub interval_secs: u64,
    pub theme: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        WatchConfig {
            interval_secs: 3,
            theme: "dark".to_string(),
        }
    }
}

impl Config {
    pub fn plot_options(&self) -> Result<PlotOptions, regex::Error> {
        Ok(PlotOptions {
            filter: self.filter.to_filter()?,
            naming: SeriesNaming {
                prefix: self.plot.series_prefix.clone(),
            },
        })
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mdbtop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            Config::default()
        }),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
            Config::default()
        }
    }
}
