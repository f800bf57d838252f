//! Materializes the pending order lines described by a fulfillment finding.
//!
//! This is the consumer side of [`crate::rules::RemainingQuantityRule`]: the
//! rule reports how many lines are fulfilled, this module drops them.

use std::io::Write;

use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{
    cli::FilterArgs,
    config::ClassifierConfig,
    dataset::TabularDataset,
    io_utils, loader,
    report::{SchemaReport, analyze},
    rules::{FulfillmentFinding, REMAINING_QUANTITY_RULE, RuleFinding},
};

pub fn execute(args: &FilterArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ClassifierConfig::load(path)
            .with_context(|| format!("Loading configuration from {path:?}"))?,
        None => ClassifierConfig::default(),
    };
    let options = loader::LoadOptions {
        label: None,
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        sheet: args.sheet.clone(),
    };
    let dataset = loader::load_dataset(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    let report = analyze(&dataset, &config);
    let finding = fulfillment_finding(&report).ok_or_else(|| {
        anyhow!(
            "No quantity column named '{}' in {:?}; nothing to filter",
            config.fulfillment.column,
            args.input
        )
    })?;

    let pending = pending_rows(&dataset, finding);
    let output_delimiter = args.output_delimiter.unwrap_or(b',');
    let mut writer = io_utils::open_csv_writer(args.output.as_deref(), output_delimiter)?;
    write_dataset(&pending, &mut writer)?;
    writer.flush().context("Flushing filtered output")?;
    info!(
        "Kept {} pending row(s) of {} from {:?} ({} fulfilled, {} without a usable quantity)",
        pending.row_count(),
        dataset.row_count(),
        args.input,
        finding.zero_count,
        finding.unclassified_count()
    );
    Ok(())
}

pub fn fulfillment_finding(report: &SchemaReport) -> Option<&FulfillmentFinding> {
    match report.rule_findings().get(REMAINING_QUANTITY_RULE)? {
        RuleFinding::Fulfillment(finding) => Some(finding),
    }
}

/// Rows whose remaining quantity is strictly positive.
pub fn pending_rows(dataset: &TabularDataset, finding: &FulfillmentFinding) -> TabularDataset {
    dataset.retain_rows(|row| {
        FulfillmentFinding::is_pending(row.get(finding.position).and_then(|v| v.as_ref()))
    })
}

pub fn write_dataset<W: Write>(
    dataset: &TabularDataset,
    writer: &mut csv::Writer<W>,
) -> Result<()> {
    writer
        .write_record(dataset.columns())
        .context("Writing header")?;
    for (idx, row) in dataset.rows().iter().enumerate() {
        let record = row
            .iter()
            .map(|value| value.as_ref().map(|v| v.as_display()).unwrap_or_default());
        writer
            .write_record(record)
            .with_context(|| format!("Writing row {}", idx + 2))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    fn sales() -> TabularDataset {
        TabularDataset::new(
            "sales",
            vec!["ArtikelNr".to_string(), "QuantityRem1".to_string()],
            vec![
                vec![Some(Value::Text("A1".into())), Some(Value::Number(0.0))],
                vec![Some(Value::Text("A2".into())), Some(Value::Number(5.0))],
                vec![Some(Value::Text("A3".into())), None],
            ],
        )
        .unwrap()
    }

    #[test]
    fn pending_rows_drop_fulfilled_and_unusable_lines() {
        let dataset = sales();
        let report = analyze(&dataset, &ClassifierConfig::default());
        let finding = fulfillment_finding(&report).expect("finding");
        let pending = pending_rows(&dataset, finding);
        assert_eq!(pending.row_count(), 1);
        assert_eq!(pending.rows()[0][0], Some(Value::Text("A2".into())));
    }

    #[test]
    fn write_dataset_renders_nulls_as_empty_fields() {
        let dataset = sales();
        let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
        write_dataset(&dataset, &mut writer).unwrap();
        let bytes = writer.into_inner().map_err(|err| err.into_error()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "ArtikelNr,QuantityRem1\nA1,0\nA2,5\nA3,\n");
    }
}
