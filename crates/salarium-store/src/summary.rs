//! Model evaluation summary: an optional comma-separated table shown verbatim.
//!
//! Every column is read as `Utf8` so cells keep their exact text. Empty cells
//! become nulls and are written back as empty cells, so exporting and
//! re-parsing gives back an equal table.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use tracing::{info, warn};

use crate::StoreError;

/// Parsed evaluation summary table.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSummary {
    table: RecordBatch,
}

impl EvaluationSummary {
    /// Read and parse the summary file at `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let bytes = fs::read(path).map_err(|e| StoreError::SummaryUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let summary = Self::from_csv_bytes(&bytes).map_err(|e| StoreError::SummaryUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(
            path = %path.display(),
            rows = summary.num_rows(),
            "loaded evaluation summary"
        );
        Ok(summary)
    }

    /// Like [`load`](Self::load), but a missing or unreadable file is only a
    /// warning.
    pub fn load_or_warn(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!(%err, "model evaluation summary unavailable");
                None
            }
        }
    }

    /// Parse comma-separated bytes with a header row.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let schema = text_schema(bytes)?;
        let reader = ReaderBuilder::new(Arc::clone(&schema))
            .with_header(true)
            .build(bytes)?;
        let batches = reader.collect::<Result<Vec<_>, _>>()?;
        let table = arrow::compute::concat_batches(&schema, &batches)?;
        Ok(Self { table })
    }

    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.table
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Cell text at `(row, column)`; `None` for empty cells or out-of-range.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.table.column_by_name(column)?;
        let strings = col.as_any().downcast_ref::<StringArray>()?;
        if row >= strings.len() || strings.is_null(row) {
            return None;
        }
        Some(strings.value(row))
    }

    /// Render as a boxed text table for terminal display.
    pub fn render(&self) -> Result<String, StoreError> {
        let table = arrow::util::pretty::pretty_format_batches(std::slice::from_ref(&self.table))?;
        Ok(table.to_string())
    }

    /// Re-export as comma-separated bytes with a header row.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, StoreError> {
        let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
        writer.write(&self.table)?;
        Ok(writer.into_inner())
    }
}

/// Header names from the first line; every column typed as nullable text.
fn text_schema(bytes: &[u8]) -> Result<SchemaRef, StoreError> {
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(bytes, Some(0))?;
    if inferred.fields().is_empty() {
        return Err(StoreError::Arrow(arrow::error::ArrowError::CsvError(
            "summary has no header row".into(),
        )));
    }
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    Ok(Arc::new(Schema::new(fields)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "Model,R2 Score,MAE,RMSE\n\
        Random Forest,0.91,10234.55,15012.3\n\
        XGBoost,0.93,9876.12,14201.8\n\
        Linear Regression,0.78,15432.0,21011.7\n";

    #[test]
    fn parses_header_and_rows_as_text() {
        let summary = EvaluationSummary::from_csv_bytes(SUMMARY.as_bytes()).unwrap();
        assert_eq!(summary.num_rows(), 3);
        assert_eq!(summary.column_names(), vec!["Model", "R2 Score", "MAE", "RMSE"]);
        assert_eq!(summary.cell(1, "Model"), Some("XGBoost"));
        // Kept verbatim, not reformatted as a float.
        assert_eq!(summary.cell(2, "MAE"), Some("15432.0"));
    }

    #[test]
    fn canonical_input_exports_byte_identical() {
        let summary = EvaluationSummary::from_csv_bytes(SUMMARY.as_bytes()).unwrap();
        let exported = summary.to_csv_bytes().unwrap();
        assert_eq!(String::from_utf8(exported).unwrap(), SUMMARY);
    }

    #[test]
    fn export_then_reparse_gives_equal_table() {
        let input = "Model,Notes,Score\n\
            \"Forest, tuned\",,0.9\n\
            XGBoost,\"said \"\"best\"\"\",0.93\n";
        let summary = EvaluationSummary::from_csv_bytes(input.as_bytes()).unwrap();
        assert_eq!(summary.cell(0, "Model"), Some("Forest, tuned"));
        assert_eq!(summary.cell(0, "Notes"), None);
        assert_eq!(summary.cell(1, "Notes"), Some("said \"best\""));

        let exported = summary.to_csv_bytes().unwrap();
        let reparsed = EvaluationSummary::from_csv_bytes(&exported).unwrap();
        assert_eq!(reparsed, summary);
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let summary = EvaluationSummary::from_csv_bytes(b"Model,R2 Score\n").unwrap();
        assert_eq!(summary.num_rows(), 0);
        assert_eq!(summary.column_names(), vec!["Model", "R2 Score"]);
    }

    #[test]
    fn render_shows_every_cell() {
        let summary = EvaluationSummary::from_csv_bytes(SUMMARY.as_bytes()).unwrap();
        let rendered = summary.render().unwrap();
        assert!(rendered.contains("Linear Regression"));
        assert!(rendered.contains("R2 Score"));
        assert!(rendered.contains("9876.12"));
    }

    #[test]
    fn missing_file_is_summary_unavailable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("model_evaluation_summary.csv");
        assert!(matches!(
            EvaluationSummary::load(&path),
            Err(StoreError::SummaryUnavailable { .. })
        ));
        assert!(EvaluationSummary::load_or_warn(&path).is_none());
    }

    #[test]
    fn ragged_rows_are_summary_unavailable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("model_evaluation_summary.csv");
        fs::write(&path, "Model,Score\nRandom Forest,0.9,extra\n").unwrap();
        let err = EvaluationSummary::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::SummaryUnavailable { .. }));
        // The cause is the bad row, not a missing file.
        assert!(!err.to_string().contains("No such file"), "{err}");
        assert!(EvaluationSummary::load_or_warn(&path).is_none());
    }

    #[test]
    fn loads_from_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("model_evaluation_summary.csv");
        fs::write(&path, SUMMARY).unwrap();
        let summary = EvaluationSummary::load_or_warn(&path).unwrap();
        assert_eq!(summary.cell(0, "R2 Score"), Some("0.91"));
    }
}
