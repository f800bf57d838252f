mod common;

use column_roles::{
    classifier::{Classifications, classify},
    config::ClassifierConfig,
    data::Value,
    dataset::TabularDataset,
    report::analyze,
    roles::SemanticRole,
    rules::{
        BusinessRule, BusinessRuleEngine, FulfillmentFinding, REMAINING_QUANTITY_RULE,
        RuleFinding, RemainingQuantityRule,
    },
};
use proptest::prelude::*;

use common::{dataset, number, text};

fn fulfillment(dataset: &TabularDataset, config: &ClassifierConfig) -> Option<FulfillmentFinding> {
    let classifications = classify(dataset, config);
    BusinessRuleEngine::from_config(config)
        .apply_rules(dataset, &classifications)
        .remove(REMAINING_QUANTITY_RULE)
        .map(|finding| match finding {
            RuleFinding::Fulfillment(f) => f,
        })
}

#[test]
fn open_and_closed_lines_split_evenly() {
    let data = dataset(
        &["ArtikelNr", "QuantityRem1", "Status"],
        vec![
            vec![text("A1"), number(0.0), text("closed")],
            vec![text("A2"), number(5.0), text("open")],
        ],
    );
    let config = ClassifierConfig::default();
    let report = analyze(&data, &config);
    assert_eq!(report.chosen_column(SemanticRole::ArticleNumber), Some("ArtikelNr"));
    assert_eq!(report.chosen_column(SemanticRole::Quantity), Some("QuantityRem1"));
    assert_eq!(report.chosen_column(SemanticRole::Status), Some("Status"));

    let finding = fulfillment(&data, &config).expect("finding");
    assert_eq!(finding.column, "QuantityRem1");
    assert_eq!(finding.role, SemanticRole::RemainingQuantity);
    assert_eq!(
        (finding.zero_count, finding.positive_count, finding.total),
        (1, 1, 2)
    );
    assert_eq!(finding.percent_zero, 50.0);
    assert_eq!(finding.percent_positive, 50.0);
}

#[test]
fn all_null_sentinel_counts_nothing() {
    let data = dataset(
        &["ArtikelNr", "QuantityRem1"],
        vec![vec![text("A1"), None], vec![text("A2"), None], vec![text("A3"), None]],
    );
    let finding = fulfillment(&data, &ClassifierConfig::default()).expect("finding");
    assert_eq!(finding.zero_count, 0);
    assert_eq!(finding.positive_count, 0);
    assert_eq!(finding.total, 3);
    assert_eq!(finding.percent_zero, 0.0);
    assert_eq!(finding.percent_positive, 0.0);
    assert_eq!(finding.unclassified_count(), 3);
}

#[test]
fn empty_dataset_reports_zero_percentages() {
    let data = dataset(&["QuantityRem1"], Vec::new());
    let finding = fulfillment(&data, &ClassifierConfig::default()).expect("finding");
    assert_eq!(finding.total, 0);
    assert_eq!((finding.percent_zero, finding.percent_positive), (0.0, 0.0));
}

#[test]
fn rem_keyword_alone_does_not_trigger_the_rule() {
    let data = dataset(&["QtyRemaining"], vec![vec![number(0.0)]]);
    let config = ClassifierConfig::default();
    let report = analyze(&data, &config);
    assert_eq!(report.chosen_column(SemanticRole::Quantity), Some("QtyRemaining"));
    assert!(report.rule_findings().is_empty());
}

#[test]
fn sentinel_name_comes_from_configuration() {
    let config = ClassifierConfig::from_yaml_str("fulfillment:\n  column: OffeneMenge\n")
        .expect("config");
    let data = dataset(
        &["QuantityRem1", "OffeneMenge"],
        vec![vec![number(0.0), number(3.0)], vec![number(0.0), number(0.0)]],
    );
    let finding = fulfillment(&data, &config).expect("finding");
    assert_eq!(finding.column, "OffeneMenge");
    assert_eq!(finding.position, 1);
    assert_eq!((finding.zero_count, finding.positive_count), (1, 1));
}

#[test]
fn negative_and_textual_values_fall_outside_both_buckets() {
    let data = dataset(
        &["QuantityRem1"],
        vec![
            vec![number(-2.0)],
            vec![text("n/a")],
            vec![number(0.0)],
            vec![number(0.5)],
        ],
    );
    let finding = fulfillment(&data, &ClassifierConfig::default()).expect("finding");
    assert_eq!((finding.zero_count, finding.positive_count), (1, 1));
    assert_eq!(finding.unclassified_count(), 2);
    assert!(FulfillmentFinding::is_pending(Some(&Value::Number(0.5))));
    assert!(!FulfillmentFinding::is_pending(Some(&Value::Number(0.0))));
    assert!(!FulfillmentFinding::is_pending(None));
}

struct SkippingRule;

impl BusinessRule for SkippingRule {
    fn name(&self) -> &str {
        "always_skips"
    }

    fn evaluate(&self, _: &TabularDataset, _: &Classifications) -> Option<RuleFinding> {
        None
    }
}

#[test]
fn engine_keeps_only_applicable_findings() {
    let data = dataset(&["QuantityRem1"], vec![vec![number(4.0)]]);
    let config = ClassifierConfig::default();
    let classifications = classify(&data, &config);
    let engine = BusinessRuleEngine::new(vec![
        Box::new(SkippingRule),
        Box::new(RemainingQuantityRule::new("QuantityRem1")),
    ]);
    let findings = engine.apply_rules(&data, &classifications);
    assert_eq!(
        findings.keys().map(String::as_str).collect::<Vec<_>>(),
        vec![REMAINING_QUANTITY_RULE]
    );
}

fn remaining_value() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Number(0.0))),
        (-50.0f64..50.0).prop_map(|n| Some(Value::Number(n))),
        "[a-z]{1,4}".prop_map(|s| Some(Value::Text(s))),
    ]
}

proptest! {
    #[test]
    fn counts_never_exceed_total(values in proptest::collection::vec(remaining_value(), 0..60)) {
        let rows = values.into_iter().map(|v| vec![v]).collect();
        let data = dataset(&["QuantityRem1"], rows);
        let finding = fulfillment(&data, &ClassifierConfig::default()).expect("finding");
        prop_assert_eq!(finding.total, data.row_count());
        prop_assert!(finding.zero_count + finding.positive_count <= finding.total);
        prop_assert!(finding.percent_zero + finding.percent_positive <= 100.0 + 1e-9);
        prop_assert!(finding.percent_zero >= 0.0 && finding.percent_positive >= 0.0);
    }
}
