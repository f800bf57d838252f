//! Classifier configuration: the role keyword table, the fulfillment rule's
//! target column, and the value sample size.
//!
//! Everything has a built-in default so the tool works without a file. A YAML
//! file may override any part; roles it leaves out keep their default keywords
//! and a role mapped to an empty list is switched off.

use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::BufReader,
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roles::SemanticRole;

pub const DEFAULT_SAMPLE_ROWS: usize = 2000;
pub const DEFAULT_REMAINING_QUANTITY_COLUMN: &str = "QuantityRem1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Reading configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Role {role} lists an empty keyword")]
    EmptyKeyword { role: SemanticRole },
    #[error("Fulfillment rule column name cannot be empty")]
    EmptySentinel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FulfillmentConfig {
    /// Exact column name holding the outstanding quantity of an order line.
    pub column: String,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_REMAINING_QUANTITY_COLUMN.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Rows profiled per column (0 scans everything).
    pub sample_rows: usize,
    pub roles: BTreeMap<SemanticRole, Vec<String>>,
    pub fulfillment: FulfillmentConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let roles = SemanticRole::BASE
            .iter()
            .map(|role| (*role, default_keywords(*role)))
            .collect();
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
            roles,
            fulfillment: FulfillmentConfig::default(),
        }
    }
}

fn default_keywords(role: SemanticRole) -> Vec<String> {
    role.default_keywords()
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl ClassifierConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed: ClassifierConfig = serde_yaml::from_reader(BufReader::new(file))?;
        parsed.finalize()
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        let parsed: ClassifierConfig = serde_yaml::from_str(input)?;
        parsed.finalize()
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = self.to_yaml_string()?;
        fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Keywords for `role` as stored. Unknown roles have none.
    pub fn keywords(&self, role: SemanticRole) -> &[String] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Base roles plus any extra role the table defines, in role order.
    pub fn classified_roles(&self) -> Vec<SemanticRole> {
        let mut roles = SemanticRole::BASE.to_vec();
        roles.extend(self.roles.keys().copied());
        roles.sort();
        roles.dedup();
        roles
    }

    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = sample_rows;
        self
    }

    /// Restores defaults for omitted base roles, normalizes keywords and
    /// validates the result.
    fn finalize(mut self) -> Result<Self, ConfigError> {
        for role in SemanticRole::BASE {
            self.roles
                .entry(role)
                .or_insert_with(|| default_keywords(role));
        }
        for (role, keywords) in self.roles.iter_mut() {
            for keyword in keywords.iter_mut() {
                let normalized = keyword.trim().to_lowercase();
                if normalized.is_empty() {
                    return Err(ConfigError::EmptyKeyword { role: *role });
                }
                *keyword = normalized;
            }
        }
        self.fulfillment.column = self.fulfillment.column.trim().to_string();
        if self.fulfillment.column.is_empty() {
            return Err(ConfigError::EmptySentinel);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_every_base_role() {
        let config = ClassifierConfig::default();
        for role in SemanticRole::BASE {
            assert!(!config.keywords(role).is_empty(), "{role} has no keywords");
        }
        assert_eq!(config.fulfillment.column, "QuantityRem1");
        assert_eq!(config.sample_rows, DEFAULT_SAMPLE_ROWS);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_missing_roles() {
        let yaml = "roles:\n  Status: [Phase, ' LIFECYCLE ']\nfulfillment:\n  column: OpenQty\n";
        let config = ClassifierConfig::from_yaml_str(yaml).expect("parse config");
        assert_eq!(config.keywords(SemanticRole::Status), ["phase", "lifecycle"]);
        assert_eq!(
            config.keywords(SemanticRole::Date),
            ["date", "datum", "termin", "deadline"]
        );
        assert_eq!(config.fulfillment.column, "OpenQty");
        assert_eq!(config.sample_rows, DEFAULT_SAMPLE_ROWS);
    }

    #[test]
    fn empty_list_disables_a_role() {
        let config = ClassifierConfig::from_yaml_str("roles:\n  Date: []\n").unwrap();
        assert!(config.keywords(SemanticRole::Date).is_empty());
        assert!(config.classified_roles().contains(&SemanticRole::Date));
    }

    #[test]
    fn extra_roles_join_the_classified_set() {
        let yaml = "roles:\n  RemainingQuantity: [rest, offen]\n";
        let config = ClassifierConfig::from_yaml_str(yaml).unwrap();
        let roles = config.classified_roles();
        assert_eq!(roles.len(), 6);
        assert_eq!(roles.last(), Some(&SemanticRole::RemainingQuantity));
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let err = ClassifierConfig::from_yaml_str("roles:\n  Quantity: ['  ']\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::EmptyKeyword {
                role: SemanticRole::Quantity
            }
        ));
    }

    #[test]
    fn blank_sentinel_is_rejected() {
        let err = ClassifierConfig::from_yaml_str("fulfillment:\n  column: ''\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptySentinel));
    }

    #[test]
    fn yaml_round_trip_preserves_table() {
        let config = ClassifierConfig::default();
        let yaml = config.to_yaml_string().unwrap();
        assert!(yaml.contains("QuantityRem1"));
        assert_eq!(ClassifierConfig::from_yaml_str(&yaml).unwrap(), config);
    }
}
