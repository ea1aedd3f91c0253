// Performance rows and the metrics aggregation step feeding the charts.

use crate::data_source::DataSource;
use crate::experiment::{Caller, ExperimentId, Technology, VariantType};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Region classes the collaborator reports as whole-genome. `*` is the raw
/// benchmark-tool spelling, `ALL_REGIONS` the normalized one.
const WHOLE_GENOME_SUBSETS: [&str; 2] = ["ALL_REGIONS", "*"];

/// One performance row as returned by the collaborator: metrics joined with
/// the experiment attributes needed for grouping and styling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceRow {
    pub experiment_id: ExperimentId,
    pub experiment_name: String,
    pub variant_type: VariantType,
    pub subset: String,
    pub recall: Option<f64>,
    pub precision: Option<f64>,
    pub f1_score: Option<f64>,
    pub technology: Technology,
    pub caller: Caller,
    pub platform_name: Option<String>,
    pub truth_total: Option<u64>,
    pub truth_tp: Option<u64>,
    pub truth_fn: Option<u64>,
    pub query_total: Option<u64>,
    pub query_tp: Option<u64>,
    pub query_fp: Option<u64>,
}

impl Default for PerformanceRow {
    fn default() -> Self {
        Self {
            experiment_id: 0,
            experiment_name: String::new(),
            variant_type: VariantType::Snp,
            subset: String::new(),
            recall: None,
            precision: None,
            f1_score: None,
            technology: Technology::Illumina,
            caller: Caller::Deepvariant,
            platform_name: None,
            truth_total: None,
            truth_tp: None,
            truth_fn: None,
            query_total: None,
            query_tp: None,
            query_fp: None,
        }
    }
}

impl PerformanceRow {
    pub fn is_whole_genome(&self) -> bool {
        WHOLE_GENOME_SUBSETS.contains(&self.subset.as_str())
    }
}

/// One chart-ready point: all three ratios defined, finite, and in `[0,1]`,
/// keyed by `(experiment_id, variant_type)`.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricPoint {
    pub experiment_id: ExperimentId,
    pub experiment_name: String,
    pub variant_type: VariantType,
    pub technology: Technology,
    pub caller: Caller,
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
    pub truth_tp: Option<u64>,
    pub truth_fn: Option<u64>,
    pub query_fp: Option<u64>,
}

impl MetricPoint {
    /// Accepts only usable rows: whole-genome subset and all three ratios
    /// defined and within bounds. Everything else is dropped silently.
    pub fn from_row(row: PerformanceRow) -> Option<Self> {
        if !row.is_whole_genome() {
            return None;
        }
        let recall = usable_ratio(row.recall)?;
        let precision = usable_ratio(row.precision)?;
        let f1 = usable_ratio(row.f1_score)?;
        Some(Self {
            experiment_id: row.experiment_id,
            experiment_name: row.experiment_name,
            variant_type: row.variant_type,
            technology: row.technology,
            caller: row.caller,
            recall,
            precision,
            f1,
            truth_tp: row.truth_tp,
            truth_fn: row.truth_fn,
            query_fp: row.query_fp,
        })
    }
}

fn usable_ratio(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && (0.0..=1.0).contains(v))
}

/// Fetch and filter the performance rows for the displayed experiment set.
/// An empty id list short-circuits to an empty result without a fetch.
pub fn aggregate_metrics(
    source: &dyn DataSource,
    ids: &[ExperimentId],
    variant_types: &[VariantType],
) -> Result<Vec<MetricPoint>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = source.performance_results(ids, variant_types)?;
    Ok(rows.into_iter().filter_map(MetricPoint::from_row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_source::MemoryDataSource;

    fn row(id: ExperimentId, subset: &str, recall: Option<f64>, precision: Option<f64>, f1: Option<f64>) -> PerformanceRow {
        PerformanceRow {
            experiment_id: id,
            experiment_name: format!("exp-{id}"),
            subset: subset.to_string(),
            recall,
            precision,
            f1_score: f1,
            ..PerformanceRow::default()
        }
    }

    #[test]
    fn test_drops_rows_with_undefined_ratios() {
        assert!(MetricPoint::from_row(row(1, "ALL_REGIONS", Some(0.9), None, Some(0.9))).is_none());
        assert!(MetricPoint::from_row(row(1, "ALL_REGIONS", Some(f64::NAN), Some(0.9), Some(0.9))).is_none());
        assert!(MetricPoint::from_row(row(1, "ALL_REGIONS", Some(0.9), Some(1.2), Some(0.9))).is_none());
        assert!(MetricPoint::from_row(row(1, "ALL_REGIONS", Some(0.9), Some(0.8), Some(-0.1))).is_none());
    }

    #[test]
    fn test_drops_stratified_subsets() {
        assert!(MetricPoint::from_row(row(1, "DIFFICULT", Some(0.9), Some(0.9), Some(0.9))).is_none());
        assert!(MetricPoint::from_row(row(1, "ALL_REGIONS", Some(0.9), Some(0.9), Some(0.9))).is_some());
        assert!(MetricPoint::from_row(row(1, "*", Some(0.9), Some(0.9), Some(0.9))).is_some());
    }

    #[test]
    fn test_empty_ids_yield_empty_result() {
        let source = MemoryDataSource::demo();
        let points = aggregate_metrics(&source, &[], &VariantType::ALL).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_aggregated_points_are_all_usable() {
        let source = MemoryDataSource::demo();
        let ids: Vec<_> = source
            .experiments_overview(Default::default())
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        let points = aggregate_metrics(&source, &ids, &VariantType::ALL).unwrap();
        assert!(!points.is_empty());
        for p in &points {
            assert!((0.0..=1.0).contains(&p.recall));
            assert!((0.0..=1.0).contains(&p.precision));
            assert!((0.0..=1.0).contains(&p.f1));
        }
    }
}
