// Contract of the external storage/query collaborator.
//
// The dashboard never talks to a database itself; everything it knows about
// experiments comes through this trait as plain tabular rows. All calls are
// synchronous, side-effect free, and fallible.

use crate::experiment::{Caller, ExperimentId, ExperimentMetadata, OverviewRow, Technology, VariantType};
use crate::performance::PerformanceRow;
use anyhow::Result;

/// Optional restriction of the overview query to one technology and/or caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverviewFilters {
    pub technology: Option<Technology>,
    pub caller: Option<Caller>,
}

impl OverviewFilters {
    pub fn technology(technology: Technology) -> Self {
        Self {
            technology: Some(technology),
            caller: None,
        }
    }

    pub fn caller(caller: Caller) -> Self {
        Self {
            technology: None,
            caller: Some(caller),
        }
    }
}

pub trait DataSource: Send + Sync {
    /// Overview rows for the main table, optionally filtered.
    fn experiments_overview(&self, filters: OverviewFilters) -> Result<Vec<OverviewRow>>;

    /// Ids of all experiments sequenced with the given technology.
    fn experiments_by_technology(&self, technology: Technology) -> Result<Vec<ExperimentId>>;

    /// Ids of all experiments called with the given pipeline.
    fn experiments_by_caller(&self, caller: Caller) -> Result<Vec<ExperimentId>>;

    /// Performance rows for the given experiments, restricted to the given
    /// variant types. Rows for every region subset are returned; callers
    /// narrow to the whole-genome class themselves.
    fn performance_results(
        &self,
        ids: &[ExperimentId],
        variant_types: &[VariantType],
    ) -> Result<Vec<PerformanceRow>>;

    /// Full metadata for the given experiments.
    fn experiment_metadata(&self, ids: &[ExperimentId]) -> Result<Vec<ExperimentMetadata>>;
}
