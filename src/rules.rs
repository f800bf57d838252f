//! Business rules evaluated on top of a classification.
//!
//! Rules only measure. They never drop or rewrite rows; a consumer that wants
//! the filtered data materializes it from the finding (see [`crate::filter`]).

use std::collections::BTreeMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    classifier::{Candidate, Classifications},
    config::ClassifierConfig,
    data::Value,
    dataset::TabularDataset,
    roles::SemanticRole,
};

pub const REMAINING_QUANTITY_RULE: &str = "remaining_quantity_filter";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleFinding {
    Fulfillment(FulfillmentFinding),
}

/// Split of order lines into already fulfilled (remaining quantity 0) and
/// pending (remaining quantity above 0).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FulfillmentFinding {
    pub role: SemanticRole,
    pub column: String,
    pub position: usize,
    pub zero_count: usize,
    pub positive_count: usize,
    pub total: usize,
    pub percent_zero: f64,
    pub percent_positive: f64,
    pub policy: String,
}

impl FulfillmentFinding {
    pub const POLICY: &'static str = "Rows with a remaining quantity of 0 are already fulfilled and should be excluded; rows above 0 are pending and retained.";

    /// Remaining quantity `value` marks a pending line.
    pub fn is_pending(value: Option<&Value>) -> bool {
        matches!(value.and_then(Value::as_number), Some(n) if n > 0.0)
    }

    /// Rows counted in neither bucket (null, negative, or non-numeric).
    pub fn unclassified_count(&self) -> usize {
        self.total - self.zero_count - self.positive_count
    }
}

pub trait BusinessRule: Send + Sync {
    fn name(&self) -> &str;

    /// `None` when the rule does not apply to this dataset.
    fn evaluate(
        &self,
        dataset: &TabularDataset,
        classifications: &Classifications,
    ) -> Option<RuleFinding>;
}

/// Counts fulfilled and pending lines in the quantity column whose name is
/// exactly the configured sentinel.
#[derive(Debug, Clone)]
pub struct RemainingQuantityRule {
    column: String,
}

impl RemainingQuantityRule {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    /// First quantity candidate whose name equals the sentinel exactly.
    pub fn target<'c>(&self, classifications: &'c Classifications) -> Option<&'c Candidate> {
        classifications
            .get(&SemanticRole::Quantity)?
            .candidates()
            .iter()
            .find(|candidate| candidate.column == self.column)
    }
}

impl BusinessRule for RemainingQuantityRule {
    fn name(&self) -> &str {
        REMAINING_QUANTITY_RULE
    }

    fn evaluate(
        &self,
        dataset: &TabularDataset,
        classifications: &Classifications,
    ) -> Option<RuleFinding> {
        let Some(target) = self.target(classifications) else {
            debug!(
                "{}: no quantity column named '{}', skipping {}",
                dataset.label(),
                self.column,
                REMAINING_QUANTITY_RULE
            );
            return None;
        };

        let mut zero_count = 0usize;
        let mut positive_count = 0usize;
        for value in dataset.column_values(target.position) {
            match value.and_then(Value::as_number) {
                Some(n) if n == 0.0 => zero_count += 1,
                Some(n) if n > 0.0 => positive_count += 1,
                _ => {}
            }
        }
        let total = dataset.row_count();
        info!(
            "{}: '{}' has {zero_count} fulfilled and {positive_count} pending line(s) of {total}",
            dataset.label(),
            target.column
        );
        Some(RuleFinding::Fulfillment(FulfillmentFinding {
            role: SemanticRole::RemainingQuantity,
            column: target.column.clone(),
            position: target.position,
            zero_count,
            positive_count,
            total,
            percent_zero: percent(zero_count, total),
            percent_positive: percent(positive_count, total),
            policy: FulfillmentFinding::POLICY.to_string(),
        }))
    }
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

pub type RuleFindings = BTreeMap<String, RuleFinding>;

pub struct BusinessRuleEngine {
    rules: Vec<Box<dyn BusinessRule>>,
}

impl BusinessRuleEngine {
    pub fn new(rules: Vec<Box<dyn BusinessRule>>) -> Self {
        Self { rules }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(vec![Box::new(RemainingQuantityRule::new(
            config.fulfillment.column.clone(),
        ))])
    }

    pub fn apply_rules(
        &self,
        dataset: &TabularDataset,
        classifications: &Classifications,
    ) -> RuleFindings {
        self.rules
            .iter()
            .filter_map(|rule| {
                rule.evaluate(dataset, classifications)
                    .map(|finding| (rule.name().to_string(), finding))
            })
            .collect()
    }
}
