use anyhow::{Context, Result};
use log::info;

use crate::{cli::PreviewArgs, dataset::TabularDataset, io_utils, loader, table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let options = loader::LoadOptions {
        label: None,
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        sheet: args.sheet.clone(),
    };
    let dataset = loader::load_dataset(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    let (headers, rows) = preview_rows(&dataset, args.rows);
    table::print_table(&headers, &rows, Some(args.width));
    info!(
        "Displayed {} of {} row(s) across {} column(s) from {:?}",
        rows.len(),
        dataset.row_count(),
        dataset.column_count(),
        args.input
    );
    Ok(())
}

/// Header with 1-based positions plus the first `limit` rows as display text.
pub fn preview_rows(dataset: &TabularDataset, limit: usize) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = dataset
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| format!("{}. {name}", idx + 1))
        .collect();
    let rows = dataset
        .rows()
        .iter()
        .take(limit)
        .map(|row| {
            row.iter()
                .map(|value| value.as_ref().map(|v| v.as_display()).unwrap_or_default())
                .collect()
        })
        .collect();
    (headers, rows)
}
