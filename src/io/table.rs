//! CSV ingest for batch prediction.
//!
//! A batch table is an ordered sequence of immutable row records plus the
//! header column names seen in the file. No validation happens here beyond CSV
//! well-formedness; required-column checks belong to the batch processor so
//! programmatically built tables go through the same gate.

use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::domain::{Domain, Record};
use crate::error::Result;

/// An ordered, immutable batch input table.
#[derive(Debug, Clone)]
pub struct BatchTable {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl BatchTable {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        BatchTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Required columns absent from this table, in the required order.
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|c| !self.columns.iter().any(|have| have == *c))
            .map(|c| c.to_string())
            .collect()
    }
}

/// Read a headered CSV file into a batch table. Every cell is kept as a
/// string value; type coercion is per-domain and happens per row later.
pub fn read_csv_table(path: &Path) -> Result<BatchTable> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Record = columns
            .iter()
            .zip(record.iter())
            .map(|(col, cell)| (col.clone(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }

    Ok(BatchTable { columns, rows })
}

/// Example CSV content (header + a few rows) for a domain, used by the CLI
/// to show callers what a batch upload should look like.
pub fn sample_csv(domain: Domain) -> String {
    match domain {
        Domain::Packaging => "\
product_weight,fragility,material_type,transport_mode
1.5,low,plastic,ground
10.0,high,glass,air
0.5,medium,metal,sea
",
        Domain::CarbonFootprint => "\
age,income,location,transport_preference
25,50000,urban,car
45,80000,suburban,public_transport
35,60000,rural,bike
",
        Domain::ProductRecommendation => "\
category,budget,eco_priority
electronics,500,true
clothing,200,false
home,1000,true
",
        Domain::EsgScore => "\
carbon_emissions,renewable_energy,waste_management,employee_satisfaction,diversity_score,community_impact
5000,30,5,7,6,6
3000,60,8,8,9,7
8000,20,3,6,5,4
",
    }
    .to_string()
}
