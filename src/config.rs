use std::collections::BTreeMap;
use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::AbundanceError;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_OUTPUT_NAME: &str = "species_abundance";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportingMode {
    /// Only the most abundant taxon, under unsuffixed keys.
    MostAbundant,
    /// The `top_n` most abundant taxa.
    #[default]
    TopN,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub mode: Option<ReportingMode>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub output_name: Option<String>,
    #[serde(default)]
    pub version_modes: BTreeMap<String, ReportingMode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub default_top_n: usize,
    pub output_name: String,
    pub version_top_n: BTreeMap<String, usize>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            version_top_n: BTreeMap::new(),
        }
    }
}

impl ResolvedConfig {
    /// Number of ranked rows reported for a given workflow version.
    pub fn top_n_for_version(&self, version: &str) -> usize {
        self.version_top_n
            .get(version)
            .copied()
            .unwrap_or(self.default_top_n)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&Utf8Path>) -> Result<ResolvedConfig, AbundanceError> {
        let Some(path) = path else {
            return Ok(ResolvedConfig::default());
        };

        let content = fs::read_to_string(path.as_std_path())
            .map_err(|_| AbundanceError::ConfigRead(path.to_path_buf()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| AbundanceError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, AbundanceError> {
        let top_n = config.top_n.unwrap_or(DEFAULT_TOP_N);
        if top_n == 0 {
            return Err(AbundanceError::InvalidTopN(top_n));
        }
        let top_n_for = |mode: ReportingMode| match mode {
            ReportingMode::MostAbundant => 1,
            ReportingMode::TopN => top_n,
        };

        let default_top_n = top_n_for(config.mode.unwrap_or_default());
        let version_top_n = config
            .version_modes
            .into_iter()
            .map(|(version, mode)| (version, top_n_for(mode)))
            .collect();

        Ok(ResolvedConfig {
            default_top_n,
            output_name: config
                .output_name
                .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string()),
            version_top_n,
        })
    }
}
