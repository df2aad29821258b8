use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One county auction site, e.g. `manatee.realforeclose.com`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountyConfig {
    /// Display name written into every cleaned row, e.g. `"Manatee"`.
    pub name: String,
    /// Bare hostname of the county's auction site.
    pub host: String,
    pub notes: Option<String>,
}

impl CountyConfig {
    /// Builds a county entry from a bare hostname, deriving the display name
    /// from the first DNS label (`manatee.realforeclose.com` → `Manatee`).
    #[must_use]
    pub fn from_host(host: &str) -> Self {
        let label = host.split('.').next().unwrap_or(host);
        let mut chars = label.chars();
        let name = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self {
            name,
            host: host.to_string(),
            notes: None,
        }
    }

    /// Generate a filesystem-safe slug from the county name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct CountiesFile {
    pub counties: Vec<CountyConfig>,
}

impl CountiesFile {
    /// Case-insensitive lookup by display name or slug.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&CountyConfig> {
        let wanted = name.trim().to_lowercase();
        self.counties
            .iter()
            .find(|c| c.name.to_lowercase() == wanted || c.slug() == wanted)
    }
}

/// Load and validate the county list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_counties(path: &Path) -> Result<CountiesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CountiesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let counties_file: CountiesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CountiesFileParse)?;

    validate_counties(&counties_file)?;

    Ok(counties_file)
}

fn validate_counties(counties_file: &CountiesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for county in &counties_file.counties {
        if county.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "county name must be non-empty".to_string(),
            ));
        }

        let host = county.host.trim();
        if host.is_empty() || host.contains("://") || host.contains('/') {
            return Err(ConfigError::Validation(format!(
                "county '{}' has invalid host '{}'; expected a bare hostname",
                county.name, county.host
            )));
        }

        if !seen_names.insert(county.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate county name: '{}'",
                county.name
            )));
        }

        let slug = county.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate county slug: '{}' (from county '{}')",
                slug, county.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "counties_test.rs"]
mod tests;
