// Per-session state: the comparison mode controller and the selection store.
//
// One `Session` exists per active dashboard instance and is passed
// explicitly into every component call. Events are handled one at a time to
// completion, in arrival order; there is no shared mutation across sessions.

use crate::comparison::{resolve_comparison, ComparisonInputs, ComparisonMode, ComparisonSelection};
use crate::data_source::DataSource;
use crate::experiment::ExperimentId;
use crate::filter::BrowseFilter;
use anyhow::Result;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct Session {
    mode: ComparisonMode,
    /// Single source of truth for what tables and charts show, in first-seen
    /// order. Empty means "fall back to the browse filter".
    display_ids: Vec<ExperimentId>,
    /// Manual-mode substate mirroring the table's selected rows.
    table_selected_ids: BTreeSet<ExperimentId>,
    /// Last chart click, shared across the SNP and INDEL charts.
    inspected_id: Option<ExperimentId>,
    submitted: Option<ComparisonSelection>,
    pub inputs: ComparisonInputs,
    pub browse_filter: BrowseFilter,
    notice: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ComparisonMode {
        self.mode
    }

    pub fn display_ids(&self) -> &[ExperimentId] {
        &self.display_ids
    }

    pub fn table_selected_ids(&self) -> &BTreeSet<ExperimentId> {
        &self.table_selected_ids
    }

    pub fn is_table_selected(&self, id: ExperimentId) -> bool {
        self.table_selected_ids.contains(&id)
    }

    pub fn inspected_id(&self) -> Option<ExperimentId> {
        self.inspected_id
    }

    pub fn submitted(&self) -> Option<&ComparisonSelection> {
        self.submitted.as_ref()
    }

    /// Switch the comparison strategy. Every transition clears the display
    /// set, the manual table selection, and the previously submitted
    /// comparison, and resets the other modes' input widgets, so no
    /// parameters leak across modes. Transitions happen only here, on
    /// explicit user action.
    pub fn set_mode(&mut self, mode: ComparisonMode) {
        log::debug!("comparison mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.display_ids.clear();
        self.table_selected_ids.clear();
        self.submitted = None;
        self.inputs.reset_except(mode);
    }

    /// Toggle one table row while in manual mode. The display set mirrors
    /// the selection in the order rows were first picked.
    pub fn toggle_table_row(&mut self, id: ExperimentId) {
        if self.mode != ComparisonMode::Manual {
            return;
        }
        if self.table_selected_ids.remove(&id) {
            self.display_ids.retain(|existing| *existing != id);
        } else {
            self.table_selected_ids.insert(id);
            self.display_ids.push(id);
        }
    }

    /// Resolve and apply the current mode's comparison inputs. Does nothing
    /// when the inputs cannot be submitted; on collaborator failure the
    /// session is left exactly as it was.
    pub fn submit_comparison(&mut self, source: &dyn DataSource) -> Result<()> {
        if let Some(selection) = resolve_comparison(source, self.mode, &self.inputs)? {
            log::debug!(
                "submitted {:?} comparison, {} experiments resolved",
                selection.mode,
                selection.resolved_ids.len()
            );
            self.display_ids = selection.resolved_ids.clone();
            self.submitted = Some(selection);
        }
        Ok(())
    }

    /// The experiment set everything downstream renders. A non-empty
    /// display set always wins; the browse filter is consulted only when
    /// nothing has been pinned. This precedence is what lets a submitted
    /// comparison survive unrelated UI changes.
    pub fn visible_ids(&self, source: &dyn DataSource) -> Result<Vec<ExperimentId>> {
        if !self.display_ids.is_empty() {
            return Ok(self.display_ids.clone());
        }
        self.browse_filter.resolve(source)
    }

    /// A click on either variant-type chart lands here; last click wins
    /// regardless of which chart it came from.
    pub fn record_chart_click(&mut self, id: ExperimentId) {
        log::debug!("inspecting experiment {id}");
        self.inspected_id = Some(id);
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn set_notice(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{DataSource, OverviewFilters};
    use crate::experiment::{Caller, ExperimentMetadata, OverviewRow, Technology, VariantType};
    use crate::memory_source::MemoryDataSource;
    use crate::performance::PerformanceRow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the demo source and counts filter-resolver lookups, so tests
    /// can assert the resolver was bypassed.
    struct CountingSource {
        inner: MemoryDataSource,
        lookups: AtomicUsize,
    }

    impl CountingSource {
        fn demo() -> Self {
            Self {
                inner: MemoryDataSource::demo(),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    impl DataSource for CountingSource {
        fn experiments_overview(&self, filters: OverviewFilters) -> anyhow::Result<Vec<OverviewRow>> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            self.inner.experiments_overview(filters)
        }

        fn experiments_by_technology(&self, technology: Technology) -> anyhow::Result<Vec<i64>> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            self.inner.experiments_by_technology(technology)
        }

        fn experiments_by_caller(&self, caller: Caller) -> anyhow::Result<Vec<i64>> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            self.inner.experiments_by_caller(caller)
        }

        fn performance_results(
            &self,
            ids: &[i64],
            variant_types: &[VariantType],
        ) -> anyhow::Result<Vec<PerformanceRow>> {
            self.inner.performance_results(ids, variant_types)
        }

        fn experiment_metadata(&self, ids: &[i64]) -> anyhow::Result<Vec<ExperimentMetadata>> {
            self.inner.experiment_metadata(ids)
        }
    }

    fn session_with_manual_selection(ids: &[ExperimentId]) -> Session {
        let mut session = Session::new();
        session.set_mode(ComparisonMode::Manual);
        for id in ids {
            session.toggle_table_row(*id);
        }
        session
    }

    #[test]
    fn test_every_transition_resets_selection_state() {
        for from in ComparisonMode::ALL {
            for to in ComparisonMode::ALL {
                let mut session = Session::new();
                session.set_mode(from);
                if from == ComparisonMode::Manual {
                    session.toggle_table_row(3);
                    session.toggle_table_row(5);
                } else {
                    session.inputs.technology_varying.insert(Technology::Ont);
                }
                session.set_mode(to);
                assert!(session.display_ids().is_empty(), "{from:?} -> {to:?}");
                assert!(session.table_selected_ids().is_empty(), "{from:?} -> {to:?}");
                assert!(session.submitted().is_none(), "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn test_manual_selection_cleared_on_mode_switch() {
        let mut session = session_with_manual_selection(&[3, 5, 9]);
        assert_eq!(session.display_ids(), &[3, 5, 9]);
        session.set_mode(ComparisonMode::Technology);
        assert!(session.display_ids().is_empty());
        assert!(session.table_selected_ids().is_empty());
    }

    #[test]
    fn test_manual_toggle_removes_and_preserves_order() {
        let mut session = session_with_manual_selection(&[3, 5, 9]);
        session.toggle_table_row(5);
        assert_eq!(session.display_ids(), &[3, 9]);
        session.toggle_table_row(5);
        assert_eq!(session.display_ids(), &[3, 9, 5]);
    }

    #[test]
    fn test_manual_toggle_ignored_outside_manual_mode() {
        let mut session = Session::new();
        session.toggle_table_row(7);
        assert!(session.display_ids().is_empty());
    }

    #[test]
    fn test_display_ids_bypass_filter_resolver() {
        let source = CountingSource::demo();
        let mut session = session_with_manual_selection(&[2, 4]);
        session.browse_filter = BrowseFilter::Technology(Technology::Illumina);
        let visible = session.visible_ids(&source).unwrap();
        assert_eq!(visible, vec![2, 4]);
        assert_eq!(source.lookups.load(Ordering::Relaxed), 0);

        session.set_mode(ComparisonMode::None);
        session.browse_filter = BrowseFilter::Caller(Caller::Gatk);
        let _ = session.visible_ids(&source).unwrap();
        assert_eq!(source.lookups.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_submit_fills_display_ids_and_is_cleared_on_transition() {
        let source = MemoryDataSource::demo();
        let mut session = Session::new();
        session.set_mode(ComparisonMode::Technology);
        session.inputs.technology_varying.insert(Technology::Illumina);
        session.inputs.technology_varying.insert(Technology::Pacbio);
        session.submit_comparison(&source).unwrap();
        assert!(!session.display_ids().is_empty());
        let submitted = session.submitted().unwrap().clone();
        assert_eq!(submitted.resolved_ids, session.display_ids());

        session.set_mode(ComparisonMode::Caller);
        assert!(session.submitted().is_none());
        assert!(session.display_ids().is_empty());
    }

    #[test]
    fn test_last_chart_click_wins_across_charts() {
        let mut session = Session::new();
        session.record_chart_click(42); // SNP chart
        session.record_chart_click(7); // INDEL chart
        assert_eq!(session.inspected_id(), Some(7));
    }
}
