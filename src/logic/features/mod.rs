//! Features Module - Feature Builder
//!
//! Produces one feature row per subject, ordered by the loaded schema.
//! Two interchangeable sources implement `FeatureSource`:
//! - `synthetic` - seeded draws keyed off feature-name patterns
//! - `static_table` - known per-player values

pub mod layout;
pub mod sampling;
pub mod static_table;
pub mod subject;
pub mod synthetic;


pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT};
pub use static_table::StaticSource;
pub use subject::{Roster, Subject};
pub use synthetic::{Distribution, PatternTable, SyntheticSource};

use ndarray::{Array2, ArrayView1};

use crate::error::{PipelineError, PipelineResult};
use crate::logic::artifacts::FeatureSchema;

// ============================================================================
// FEATURE BATCH
// ============================================================================

/// Subjects and their feature rows, stamped with the schema they follow
#[derive(Debug, Clone)]
pub struct FeatureBatch {
    pub subjects: Vec<Subject>,
    pub values: Array2<f64>,
    pub layout_hash: u32,
}

impl FeatureBatch {
    /// Assemble a batch from explicit rows; every row must match the schema width
    pub fn from_rows(
        schema: &FeatureSchema,
        subjects: Vec<Subject>,
        rows: Vec<Vec<f64>>,
    ) -> PipelineResult<Self> {
        if subjects.len() != rows.len() {
            return Err(PipelineError::SchemaMismatch(format!(
                "{} subjects but {} feature rows",
                subjects.len(),
                rows.len()
            )));
        }

        let width = schema.len();
        let mut flat = Vec::with_capacity(rows.len() * width);
        for (subject, row) in subjects.iter().zip(&rows) {
            if row.len() != width {
                return Err(PipelineError::SchemaMismatch(format!(
                    "{} has {} features, schema has {}",
                    subject.name,
                    row.len(),
                    width
                )));
            }
            flat.extend_from_slice(row);
        }

        let values = Array2::from_shape_vec((rows.len(), width), flat)
            .map_err(|e| PipelineError::SchemaMismatch(e.to_string()))?;

        Ok(Self {
            subjects,
            values,
            layout_hash: schema.layout_hash(),
        })
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Fail fast when the batch was not built for `schema`
    pub fn validate_against(&self, schema: &FeatureSchema) -> PipelineResult<()> {
        if self.values.nrows() != self.subjects.len() {
            return Err(PipelineError::SchemaMismatch(format!(
                "{} subjects but {} feature rows",
                self.subjects.len(),
                self.values.nrows()
            )));
        }
        if self.values.ncols() != schema.len() {
            return Err(PipelineError::SchemaMismatch(format!(
                "feature rows have {} columns, schema has {}",
                self.values.ncols(),
                schema.len()
            )));
        }
        if self.layout_hash != schema.layout_hash() {
            return Err(PipelineError::SchemaMismatch(format!(
                "batch layout {:08x} differs from schema layout {:08x}",
                self.layout_hash,
                schema.layout_hash()
            )));
        }
        Ok(())
    }
}

// ============================================================================
// FEATURE SOURCE
// ============================================================================

/// A strategy that produces schema-ordered rows for a set of subjects
pub trait FeatureSource {
    fn name(&self) -> &'static str;
    fn build(&self, schema: &FeatureSchema) -> PipelineResult<FeatureBatch>;
}
