// Central dashboard area: fetch orchestration plus the table, the two
// variant-type charts, and the performance table.

use crate::data_source::{DataSource, OverviewFilters};
use crate::experiment::{ExperimentId, OverviewRow, VariantType};
use crate::metadata_panel::MetadataPanel;
use crate::overview_table::render_overview_table;
use crate::performance::{aggregate_metrics, MetricPoint};
use crate::performance_table::render_performance_table;
use crate::render_metrics::render_variant_chart;
use crate::session::Session;
use anyhow::Result;
use eframe::egui::{self, CollapsingHeader};

#[derive(Default)]
pub struct MainArea {
    /// Id list the cached rows and points were fetched for.
    fetched_for: Option<Vec<ExperimentId>>,
    /// Id list whose fetch failed; not retried until the list changes.
    failed_for: Option<Vec<ExperimentId>>,
    overview_rows: Vec<OverviewRow>,
    metric_points: Vec<MetricPoint>,
    detail: MetadataPanel,
}

impl MainArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overview_rows(&self) -> &[OverviewRow] {
        &self.overview_rows
    }

    pub fn metric_points(&self) -> &[MetricPoint] {
        &self.metric_points
    }

    /// Re-fetch whenever the visible id list changed. A failed fetch leaves
    /// the cached state untouched and is not retried until the next state
    /// change; a result is only applied if the id list that triggered it is
    /// still the current one.
    pub fn refresh(&mut self, source: &dyn DataSource, session: &Session) -> Result<()> {
        let visible = session.visible_ids(source)?;
        let already_fetched = self.fetched_for.as_ref() == Some(&visible);
        let already_failed = self.failed_for.as_ref() == Some(&visible);
        if !already_fetched && !already_failed {
            match self.fetch(source, &visible) {
                Ok((rows, points)) => {
                    if session.visible_ids(source)? == visible {
                        self.overview_rows = rows;
                        self.metric_points = points;
                        self.fetched_for = Some(visible);
                        self.failed_for = None;
                    }
                }
                Err(err) => {
                    self.failed_for = Some(visible);
                    return Err(err);
                }
            }
        }
        self.detail.refresh(source, session.inspected_id())
    }

    fn fetch(
        &self,
        source: &dyn DataSource,
        visible: &[ExperimentId],
    ) -> Result<(Vec<OverviewRow>, Vec<MetricPoint>)> {
        let all_rows = source.experiments_overview(OverviewFilters::default())?;
        // Keep the display order of the id list, not the source order.
        let rows = visible
            .iter()
            .filter_map(|id| all_rows.iter().find(|row| row.id == *id).cloned())
            .collect();
        let points = aggregate_metrics(source, visible, &VariantType::ALL)?;
        Ok((rows, points))
    }

    pub fn render_central(&mut self, ui: &mut egui::Ui, session: &mut Session) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.strong("Experiments");
            egui::ScrollArea::horizontal().show(ui, |ui| {
                render_overview_table(ui, &self.overview_rows, session);
            });
            ui.separator();

            ui.columns(2, |columns| {
                render_variant_chart(&mut columns[0], VariantType::Snp, &self.metric_points, session);
                render_variant_chart(&mut columns[1], VariantType::Indel, &self.metric_points, session);
            });

            CollapsingHeader::new("Performance metrics")
                .default_open(true)
                .show(ui, |ui| {
                    render_performance_table(ui, &self.metric_points);
                });
        });
    }

    pub fn render_detail(&self, ui: &mut egui::Ui) {
        self.detail.render(ui);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::ComparisonMode;
    use crate::experiment::{Caller, ExperimentMetadata, Technology};
    use crate::memory_source::MemoryDataSource;
    use crate::performance::PerformanceRow;
    use anyhow::bail;

    struct FailingSource;

    impl DataSource for FailingSource {
        fn experiments_overview(&self, _filters: OverviewFilters) -> Result<Vec<OverviewRow>> {
            bail!("backend unavailable")
        }

        fn experiments_by_technology(&self, _technology: Technology) -> Result<Vec<ExperimentId>> {
            bail!("backend unavailable")
        }

        fn experiments_by_caller(&self, _caller: Caller) -> Result<Vec<ExperimentId>> {
            bail!("backend unavailable")
        }

        fn performance_results(
            &self,
            _ids: &[ExperimentId],
            _variant_types: &[VariantType],
        ) -> Result<Vec<PerformanceRow>> {
            bail!("backend unavailable")
        }

        fn experiment_metadata(&self, _ids: &[ExperimentId]) -> Result<Vec<ExperimentMetadata>> {
            bail!("backend unavailable")
        }
    }

    #[test]
    fn test_refresh_follows_manual_selection() {
        let source = MemoryDataSource::demo();
        let mut session = Session::new();
        let mut area = MainArea::new();

        area.refresh(&source, &session).unwrap();
        let browse_count = area.overview_rows().len();
        assert!(browse_count >= 8);

        // Nothing selected yet: manual mode still browses the full set.
        session.set_mode(ComparisonMode::Manual);
        area.refresh(&source, &session).unwrap();
        assert_eq!(area.overview_rows().len(), browse_count);

        session.toggle_table_row(3);
        session.toggle_table_row(5);
        area.refresh(&source, &session).unwrap();
        let ids: Vec<_> = area.overview_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 5]);
        assert!(area.metric_points().iter().all(|p| ids.contains(&p.experiment_id)));
    }

    #[test]
    fn test_failed_fetch_leaves_state_unchanged() {
        let source = MemoryDataSource::demo();
        let mut session = Session::new();
        let mut area = MainArea::new();
        area.refresh(&source, &session).unwrap();
        let rows_before = area.overview_rows().to_vec();

        let failing = FailingSource;
        assert!(area.refresh(&failing, &session).is_err());
        assert_eq!(area.overview_rows(), rows_before.as_slice());
    }

    #[test]
    fn test_failed_fetch_not_retried_until_state_changes() {
        let failing = FailingSource;
        let mut session = Session::new();
        session.set_mode(ComparisonMode::Manual);
        session.toggle_table_row(1);
        let mut area = MainArea::new();

        assert!(area.refresh(&failing, &session).is_err());
        // Same state again: the failure is terminal for that event.
        assert!(area.refresh(&failing, &session).is_ok());

        // A new user action makes the fetch eligible again.
        session.toggle_table_row(2);
        assert!(area.refresh(&failing, &session).is_err());
    }
}
