// In-memory data source over plain row vectors.
//
// Stands in for the real storage collaborator in the binary and in tests;
// query semantics mirror the contract (filters combine conjunctively, an
// empty id list selects nothing, unknown ids are simply absent).

use crate::data_source::{DataSource, OverviewFilters};
use crate::experiment::{Caller, ExperimentId, ExperimentMetadata, OverviewRow, Technology, VariantType};
use crate::performance::PerformanceRow;
use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Default)]
pub struct MemoryDataSource {
    experiments: Vec<ExperimentMetadata>,
    performance: Vec<PerformanceRow>,
}

#[derive(Deserialize)]
struct Dataset {
    experiments: Vec<ExperimentMetadata>,
    performance: Vec<PerformanceRow>,
}

impl MemoryDataSource {
    pub fn new(experiments: Vec<ExperimentMetadata>, performance: Vec<PerformanceRow>) -> Self {
        Self {
            experiments,
            performance,
        }
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(data).context("parsing benchmark dataset")?;
        Ok(Self::new(dataset.experiments, dataset.performance))
    }

    /// The bundled demonstration dataset.
    pub fn demo() -> Self {
        Self::from_json_str(include_str!("../assets/demo_experiments.json"))
            .expect("Invalid bundled dataset")
    }

    /// Experiments missing either categorical dimension cannot appear in
    /// the overview table, mirroring the inner joins of the real source.
    fn overview_row(meta: &ExperimentMetadata) -> Option<OverviewRow> {
        Some(OverviewRow {
            id: meta.id,
            name: meta.name.clone(),
            technology: meta.technology?,
            platform: meta.platform_name.clone(),
            caller: meta.caller?,
            caller_version: meta.caller_version.clone(),
            chemistry: meta.chemistry_name.clone(),
            truth_set: meta.truth_set_name.clone(),
            sample: meta.truth_set_sample.clone(),
            created_at: meta.created_at.clone(),
        })
    }
}

impl DataSource for MemoryDataSource {
    fn experiments_overview(&self, filters: OverviewFilters) -> Result<Vec<OverviewRow>> {
        Ok(self
            .experiments
            .iter()
            .filter_map(Self::overview_row)
            .filter(|row| {
                filters.technology.is_none_or(|t| row.technology == t)
                    && filters.caller.is_none_or(|c| row.caller == c)
            })
            .collect())
    }

    fn experiments_by_technology(&self, technology: Technology) -> Result<Vec<ExperimentId>> {
        Ok(self
            .experiments
            .iter()
            .filter(|meta| meta.technology == Some(technology))
            .map(|meta| meta.id)
            .collect())
    }

    fn experiments_by_caller(&self, caller: Caller) -> Result<Vec<ExperimentId>> {
        Ok(self
            .experiments
            .iter()
            .filter(|meta| meta.caller == Some(caller))
            .map(|meta| meta.id)
            .collect())
    }

    fn performance_results(
        &self,
        ids: &[ExperimentId],
        variant_types: &[VariantType],
    ) -> Result<Vec<PerformanceRow>> {
        Ok(self
            .performance
            .iter()
            .filter(|row| ids.contains(&row.experiment_id))
            .filter(|row| variant_types.is_empty() || variant_types.contains(&row.variant_type))
            .cloned()
            .collect())
    }

    fn experiment_metadata(&self, ids: &[ExperimentId]) -> Result<Vec<ExperimentMetadata>> {
        Ok(self
            .experiments
            .iter()
            .filter(|meta| ids.contains(&meta.id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_dataset_loads() {
        let source = MemoryDataSource::demo();
        let overview = source.experiments_overview(OverviewFilters::default()).unwrap();
        assert!(overview.len() >= 8);
        for technology in Technology::ALL {
            assert!(
                !source.experiments_by_technology(technology).unwrap().is_empty(),
                "no demo experiment for {technology}"
            );
        }
    }

    #[test]
    fn test_overview_filters_combine() {
        let source = MemoryDataSource::demo();
        let filters = OverviewFilters {
            technology: Some(Technology::Illumina),
            caller: Some(Caller::Deepvariant),
        };
        let rows = source.experiments_overview(filters).unwrap();
        assert!(!rows.is_empty());
        for row in rows {
            assert_eq!(row.technology, Technology::Illumina);
            assert_eq!(row.caller, Caller::Deepvariant);
        }
    }

    #[test]
    fn test_performance_restricted_to_ids_and_types() {
        let source = MemoryDataSource::demo();
        let rows = source
            .performance_results(&[1, 3], &[VariantType::Snp])
            .unwrap();
        assert!(!rows.is_empty());
        for row in rows {
            assert!(row.experiment_id == 1 || row.experiment_id == 3);
            assert_eq!(row.variant_type, VariantType::Snp);
        }
        assert!(source.performance_results(&[], &VariantType::ALL).unwrap().is_empty());
    }

    #[test]
    fn test_metadata_by_ids() {
        let source = MemoryDataSource::demo();
        let metadata = source.experiment_metadata(&[2, 6]).unwrap();
        let mut ids: Vec<_> = metadata.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![2, 6]);
    }
}
