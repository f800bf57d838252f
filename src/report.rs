use serde::{Deserialize, Serialize};

use crate::{
    classifier::{ColumnClassifier, Classifications},
    config::ClassifierConfig,
    dataset::TabularDataset,
    roles::SemanticRole,
    rules::{BusinessRuleEngine, RuleFindings},
};

/// Everything learned about one dataset, ready for a reporter to print or
/// serialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaReport {
    file_label: String,
    row_count: usize,
    column_count: usize,
    classifications: Classifications,
    rule_findings: RuleFindings,
}

impl SchemaReport {
    pub fn assemble(
        dataset: &TabularDataset,
        classifications: Classifications,
        rule_findings: RuleFindings,
    ) -> Self {
        Self {
            file_label: dataset.label().to_string(),
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            classifications,
            rule_findings,
        }
    }

    pub fn file_label(&self) -> &str {
        &self.file_label
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn classifications(&self) -> &Classifications {
        &self.classifications
    }

    pub fn rule_findings(&self) -> &RuleFindings {
        &self.rule_findings
    }

    /// Column chosen for `role`, if any.
    pub fn chosen_column(&self, role: SemanticRole) -> Option<&str> {
        self.classifications
            .get(&role)
            .and_then(|c| c.chosen())
            .map(|c| c.column.as_str())
    }
}

/// Classifies `dataset`, evaluates the configured rules and assembles the
/// report.
pub fn analyze(dataset: &TabularDataset, config: &ClassifierConfig) -> SchemaReport {
    let classifications = ColumnClassifier::new(config).classify(dataset);
    let findings = BusinessRuleEngine::from_config(config).apply_rules(dataset, &classifications);
    SchemaReport::assemble(dataset, classifications, findings)
}
