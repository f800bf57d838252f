//! Table-driven column role classification.
//!
//! For every role the classifier scans the header in declaration order and
//! keeps each column whose lowercased name contains one of the role's keywords
//! (`ArtikelNr`, `item_code` and `MATERIAL` all match an article keyword).
//! Roles are independent: one column may be a candidate for several roles.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    config::ClassifierConfig,
    dataset::TabularDataset,
    profile::{ColumnProfile, profile_column},
    roles::SemanticRole,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub column: String,
    /// Zero-based position in the header; disambiguates duplicate names.
    pub position: usize,
    pub matched_keywords: Vec<String>,
    pub profile: ColumnProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnClassification {
    role: SemanticRole,
    candidates: Vec<Candidate>,
    chosen: Option<Candidate>,
}

impl ColumnClassification {
    /// The first candidate becomes the chosen column.
    pub fn new(role: SemanticRole, candidates: Vec<Candidate>) -> Self {
        let chosen = candidates.first().cloned();
        Self {
            role,
            candidates,
            chosen,
        }
    }

    pub fn role(&self) -> SemanticRole {
        self.role
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn chosen(&self) -> Option<&Candidate> {
        self.chosen.as_ref()
    }

    pub fn candidate_names(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.column.as_str()).collect()
    }
}

pub type Classifications = BTreeMap<SemanticRole, ColumnClassification>;

#[derive(Debug, Clone)]
pub struct ColumnClassifier<'a> {
    config: &'a ClassifierConfig,
}

impl<'a> ColumnClassifier<'a> {
    pub fn new(config: &'a ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, dataset: &TabularDataset) -> Classifications {
        let lowered = dataset
            .columns()
            .iter()
            .map(|name| name.to_lowercase())
            .collect::<Vec<_>>();
        let mut profiles: Vec<Option<ColumnProfile>> = vec![None; lowered.len()];

        let mut result = BTreeMap::new();
        for role in self.config.classified_roles() {
            let keywords = self
                .config
                .keywords(role)
                .iter()
                .map(|keyword| keyword.trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect::<Vec<_>>();
            let mut candidates = Vec::new();
            for (position, name) in lowered.iter().enumerate() {
                let matched = matching_keywords(name, &keywords);
                if matched.is_empty() {
                    continue;
                }
                let profile = profiles[position]
                    .get_or_insert_with(|| {
                        profile_column(dataset, position, self.config.sample_rows)
                    })
                    .clone();
                candidates.push(Candidate {
                    column: dataset.columns()[position].clone(),
                    position,
                    matched_keywords: matched,
                    profile,
                });
            }
            debug!(
                "{}: role {role} matched {} column(s)",
                dataset.label(),
                candidates.len()
            );
            result.insert(role, ColumnClassification::new(role, candidates));
        }
        result
    }
}

/// Keywords contained in `lowered_name`, in table order.
pub fn matching_keywords(lowered_name: &str, keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .filter(|keyword| lowered_name.contains(keyword.as_str()))
        .cloned()
        .collect()
}

/// Classifies `dataset` with `config`.
pub fn classify(dataset: &TabularDataset, config: &ClassifierConfig) -> Classifications {
    ColumnClassifier::new(config).classify(dataset)
}
