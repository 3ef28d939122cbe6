//! Batch prediction over an input table.
//!
//! Per batch job: validate the domain's required columns once up front
//! (missing columns fail the whole batch before any row runs), then apply
//! the engine row by row with per-row failure isolation. Rows are
//! independent, so they are processed in parallel and reassembled in input
//! order by index.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::fields::{optional_bool, optional_f64, require_f64, require_str};
use crate::domain::{Domain, Prediction, Record};
use crate::engine::PredictionEngine;
use crate::error::{ModelError, Result};
use crate::io::BatchTable;

/// Result payload for a single batch row.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RowOutcome {
    Success { prediction: Prediction },
    Failure { error: String },
}

/// One processed row: its input-order index, the outcome, and the input it
/// was computed from (coerced values on success, the raw row on failure).
#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub row_index: usize,
    #[serde(flatten)]
    pub outcome: RowOutcome,
    pub input_data: Record,
}

impl BatchRow {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RowOutcome::Success { .. })
    }
}

/// A completed, immutably closed batch job.
///
/// Summary figures are derived from the row sequence on demand rather than
/// stored, so they can never disagree with the rows themselves.
#[derive(Debug)]
pub struct BatchReport {
    pub domain: Domain,
    pub rows: Vec<BatchRow>,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.rows.len() - self.success_count()
    }

    pub fn success_rate(&self) -> f64 {
        if self.rows.is_empty() {
            0.0
        } else {
            self.success_count() as f64 / self.rows.len() as f64
        }
    }

    pub fn mean_row_time(&self) -> Duration {
        if self.rows.is_empty() {
            Duration::ZERO
        } else {
            self.elapsed / self.rows.len() as u32
        }
    }
}

pub struct BatchProcessor {
    engine: PredictionEngine,
}

impl BatchProcessor {
    pub fn new(engine: PredictionEngine) -> Self {
        BatchProcessor { engine }
    }

    /// Run one batch job. Fails as a whole only on validation; row-level
    /// failures are recorded in place and never abort the batch.
    pub fn process(&self, domain: Domain, table: &BatchTable) -> Result<BatchReport> {
        let missing = table.missing_columns(domain.required_columns());
        if !missing.is_empty() {
            return Err(ModelError::MissingColumns { columns: missing });
        }

        let started_at = Utc::now();
        let timer = Instant::now();

        let rows: Vec<BatchRow> = table
            .rows()
            .par_iter()
            .enumerate()
            .map(|(index, row)| self.process_row(domain, index, row))
            .collect();

        let report = BatchReport {
            domain,
            rows,
            started_at,
            elapsed: timer.elapsed(),
        };
        info!(
            domain = %domain,
            rows = report.rows.len(),
            failures = report.failure_count(),
            "batch completed"
        );
        Ok(report)
    }

    fn process_row(&self, domain: Domain, index: usize, row: &Record) -> BatchRow {
        let result = coerce_row(domain, row)
            .and_then(|data| self.engine.predict(domain, &data).map(|p| (p, data)));

        match result {
            Ok((prediction, data)) => BatchRow {
                row_index: index,
                outcome: RowOutcome::Success { prediction },
                input_data: data,
            },
            Err(err) => {
                warn!(domain = %domain, row = index, error = %err, "row failed");
                BatchRow {
                    row_index: index,
                    outcome: RowOutcome::Failure {
                        error: err.to_string(),
                    },
                    input_data: row.clone(),
                }
            }
        }
    }
}

/// Coerce one raw row (CSV cells are strings) into the typed record shape
/// the domain's prediction expects. Required fields must parse; optional
/// fields default the way the single-record path defaults them.
fn coerce_row(domain: Domain, row: &Record) -> Result<Record> {
    let mut data = Record::new();
    match domain {
        Domain::Packaging => {
            data.insert("product_weight".into(), json!(require_f64(row, "product_weight")?));
            data.insert("fragility".into(), json!(require_str(row, "fragility")?));
            data.insert("material_type".into(), json!(require_str(row, "material_type")?));
            data.insert("transport_mode".into(), json!(require_str(row, "transport_mode")?));
        }
        Domain::CarbonFootprint => {
            data.insert("age".into(), json!(require_f64(row, "age")?));
            data.insert("income".into(), json!(require_f64(row, "income")?));
            data.insert("location".into(), json!(require_str(row, "location")?));
            data.insert(
                "transport_preference".into(),
                json!(require_str(row, "transport_preference")?),
            );
        }
        Domain::ProductRecommendation => {
            data.insert("category".into(), json!(require_str(row, "category")?));
            data.insert("budget".into(), json!(require_f64(row, "budget")?));
            data.insert("eco_priority".into(), json!(optional_bool(row, "eco_priority", true)));
        }
        Domain::EsgScore => {
            data.insert(
                "carbon_emissions".into(),
                json!(require_f64(row, "carbon_emissions")?),
            );
            data.insert(
                "renewable_energy".into(),
                json!(require_f64(row, "renewable_energy")?),
            );
            data.insert(
                "waste_management".into(),
                json!(require_f64(row, "waste_management")?),
            );
            for (field, default) in [
                ("employee_satisfaction", 7.0),
                ("diversity_score", 6.0),
                ("community_impact", 6.0),
                ("board_independence", 60.0),
                ("transparency_score", 7.0),
                ("ethics_score", 7.0),
            ] {
                data.insert(field.into(), json!(optional_f64(row, field, default)?));
            }
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_csv_table;
    use crate::store::ModelStore;
    use serde_json::Value;
    use std::io::Write;
    use std::sync::{Arc, OnceLock};

    fn processor() -> BatchProcessor {
        static STORE: OnceLock<Arc<ModelStore>> = OnceLock::new();
        let store = STORE
            .get_or_init(|| Arc::new(ModelStore::with_eager_training()))
            .clone();
        BatchProcessor::new(PredictionEngine::new(store))
    }

    fn table(columns: &[&str], rows: &[&[&str]]) -> BatchTable {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .iter()
            .map(|cells| {
                columns
                    .iter()
                    .zip(cells.iter())
                    .map(|(c, v)| (c.clone(), Value::String(v.to_string())))
                    .collect()
            })
            .collect();
        BatchTable::new(columns, rows)
    }

    #[test]
    fn output_preserves_row_order_and_count() {
        let t = table(
            &["age", "income", "location", "transport_preference"],
            &[
                &["25", "50000", "urban", "car"],
                &["45", "80000", "suburban", "public_transport"],
                &["35", "60000", "rural", "bike"],
                &["60", "120000", "urban", "walk"],
            ],
        );
        let report = processor().process(Domain::CarbonFootprint, &t).unwrap();
        assert_eq!(report.rows.len(), t.len());
        for (i, row) in report.rows.iter().enumerate() {
            assert_eq!(row.row_index, i);
            assert!(row.is_success());
        }
        assert_eq!(report.success_rate(), 1.0);
    }

    #[test]
    fn one_bad_row_never_aborts_the_batch() {
        let t = table(
            &["product_weight", "fragility", "material_type", "transport_mode"],
            &[
                &["1.5", "low", "plastic", "ground"],
                &["heavy", "high", "glass", "air"],
                &["0.4", "medium", "metal", "sea"],
            ],
        );
        let report = processor().process(Domain::Packaging, &t).unwrap();
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert!(!report.rows[1].is_success());
        match &report.rows[1].outcome {
            RowOutcome::Failure { error } => assert!(error.contains("product_weight")),
            RowOutcome::Success { .. } => panic!("row 1 should have failed"),
        }
    }

    #[test]
    fn missing_columns_abort_before_any_row_runs() {
        let t = table(
            &["product_weight", "material_type"],
            &[&["1.5", "plastic"], &["2.0", "glass"]],
        );
        let err = processor().process(Domain::Packaging, &t).unwrap_err();
        match err {
            ModelError::MissingColumns { columns } => {
                assert_eq!(columns, vec!["fragility", "transport_mode"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn esg_optional_columns_default_but_required_cells_must_parse() {
        let t = table(
            &["carbon_emissions", "renewable_energy", "waste_management"],
            &[&["5000", "30", "5"], &["", "60", "8"]],
        );
        let report = processor().process(Domain::EsgScore, &t).unwrap();
        assert!(report.rows[0].is_success());
        // Defaults were applied to the coerced input on the success row.
        assert_eq!(report.rows[0].input_data["employee_satisfaction"], serde_json::json!(7.0));
        // Empty required cell is a row error, not a silent default.
        assert!(!report.rows[1].is_success());
    }

    #[test]
    fn product_batch_rows_carry_recommendation_lists() {
        let t = table(
            &["category", "budget"],
            &[&["electronics", "800"], &["spacecraft", "100"]],
        );
        let report = processor()
            .process(Domain::ProductRecommendation, &t)
            .unwrap();
        assert_eq!(report.rows.len(), 2);
        for row in &report.rows {
            match &row.outcome {
                RowOutcome::Success {
                    prediction: Prediction::ProductRecommendation { recommendations, count },
                } => {
                    assert_eq!(*count, recommendations.len());
                    assert!(*count <= 5);
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
    }

    #[test]
    fn empty_table_completes_with_zero_rows() {
        let t = table(&["age", "income", "location", "transport_preference"], &[]);
        let report = processor().process(Domain::CarbonFootprint, &t).unwrap();
        assert!(report.rows.is_empty());
        assert_eq!(report.success_rate(), 0.0);
        assert_eq!(report.mean_row_time(), Duration::ZERO);
    }

    #[test]
    fn csv_file_round_trips_through_a_batch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", crate::io::sample_csv(Domain::CarbonFootprint)).unwrap();

        let t = read_csv_table(file.path()).unwrap();
        let report = processor().process(Domain::CarbonFootprint, &t).unwrap();
        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.failure_count(), 0);
    }
}
