use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::export::rows::{call_rows, error_rows, report_rows};
use crate::export::Exporter;
use crate::pipeline::BatchOutcome;

/// Writes `reports.json`, `calls.json` and `errors.json` into `out_dir`.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }
}

fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let data = serde_json::to_string_pretty(rows)?;
    fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))
}

impl Exporter for JsonExporter {
    fn export(&self, batch: &BatchOutcome) -> Result<()> {
        fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("failed to create {}", self.out_dir.display()))?;

        let reports = report_rows(batch);
        let calls = call_rows(batch);
        let errors = error_rows(batch);
        write_json(&self.out_dir.join("reports.json"), &reports)?;
        write_json(&self.out_dir.join("calls.json"), &calls)?;
        write_json(&self.out_dir.join("errors.json"), &errors)?;

        info!(
            out_dir = %self.out_dir.display(),
            reports = reports.len(),
            calls = calls.len(),
            errors = errors.len(),
            "batch exported"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    use crate::core::error::ExtractError;
    use crate::pipeline::{DocumentFailure, DocumentOutcome};

    fn temp_output_dir(prefix: &str) -> PathBuf {
        let mut out = std::env::temp_dir();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        let pid = std::process::id();
        out.push(format!("{prefix}-{pid}-{now}"));
        out
    }

    #[test]
    fn writes_all_three_tables() -> Result<()> {
        let output = temp_output_dir("refreport-export");
        let batch = BatchOutcome {
            documents: vec![DocumentOutcome::Failed(DocumentFailure {
                name: "notes.pdf".to_string(),
                error: ExtractError::MalformedReportName {
                    name: "notes.pdf".to_string(),
                    reason: "expected prefix, teams, month, day and year".to_string(),
                },
            })],
        };

        JsonExporter::new(output.clone()).export(&batch)?;

        assert_eq!(fs::read_to_string(output.join("reports.json"))?, "[]");
        assert_eq!(fs::read_to_string(output.join("calls.json"))?, "[]");
        let errors: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output.join("errors.json"))?)?;
        assert_eq!(errors[0]["document"], "notes.pdf");
        assert_eq!(errors[0]["fatal"], true);

        let _ = fs::remove_dir_all(&output);
        Ok(())
    }
}
