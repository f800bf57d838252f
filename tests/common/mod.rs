#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use column_roles::{data::Value, dataset::TabularDataset};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file");
        path
    }
}

pub fn text(value: &str) -> Option<Value> {
    Some(Value::Text(value.to_string()))
}

pub fn number(value: f64) -> Option<Value> {
    Some(Value::Number(value))
}

pub fn dataset(columns: &[&str], rows: Vec<Vec<Option<Value>>>) -> TabularDataset {
    TabularDataset::new(
        "fixture",
        columns.iter().map(|c| c.to_string()).collect(),
        rows,
    )
    .expect("valid dataset")
}

/// Sales export shaped like the open-deliveries report.
pub const SALES_CSV: &str = "\
ArtikelNr,Bezeichnung,Auftragsnummer,QuantityRem1,Liefertermin,Status
A-100,Schraube M8,P-2025-01,0,2025-09-30,closed
A-101,Mutter M8,P-2025-01,12,2025-10-15,open
A-102,Scheibe,P-2025-02,5,2025-10-20,open
A-103,Winkel,P-2025-03,,2025-11-01,open
";
