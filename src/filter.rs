// Browse-mode filter resolution.
//
// Only consulted while nothing is pinned to the display: a submitted
// comparison or a manual selection writes `display_ids`, and a non-empty
// `display_ids` bypasses this resolver entirely (see `Session::visible_ids`).

use crate::data_source::{DataSource, OverviewFilters};
use crate::experiment::{Caller, ExperimentId, Technology};
use anyhow::Result;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BrowseFilter {
    #[default]
    All,
    Technology(Technology),
    Caller(Caller),
}

impl BrowseFilter {
    pub fn resolve(&self, source: &dyn DataSource) -> Result<Vec<ExperimentId>> {
        match self {
            BrowseFilter::All => Ok(source
                .experiments_overview(OverviewFilters::default())?
                .into_iter()
                .map(|row| row.id)
                .collect()),
            BrowseFilter::Technology(technology) => source.experiments_by_technology(*technology),
            BrowseFilter::Caller(caller) => source.experiments_by_caller(*caller),
        }
    }

    pub fn label(&self) -> String {
        match self {
            BrowseFilter::All => "All experiments".to_string(),
            BrowseFilter::Technology(technology) => format!("Technology: {technology}"),
            BrowseFilter::Caller(caller) => format!("Caller: {caller}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_source::MemoryDataSource;

    #[test]
    fn test_resolve_matches_dedicated_lookups() {
        let source = MemoryDataSource::demo();
        let all = BrowseFilter::All.resolve(&source).unwrap();
        assert!(!all.is_empty());

        let by_tech = BrowseFilter::Technology(Technology::Ont)
            .resolve(&source)
            .unwrap();
        assert_eq!(by_tech, source.experiments_by_technology(Technology::Ont).unwrap());
        for id in &by_tech {
            assert!(all.contains(id));
        }
    }
}
