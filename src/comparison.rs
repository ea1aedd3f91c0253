// Comparison strategies: which dimension varies, what is held constant,
// and how a submitted comparison resolves to a concrete experiment set.

use crate::data_source::DataSource;
use crate::experiment::{Caller, ExperimentId, Technology};
use anyhow::Result;
use itertools::Itertools;
use std::collections::{BTreeSet, HashSet};

/// The active comparison strategy. `None` is plain filter browsing and is
/// both the initial state and re-enterable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComparisonMode {
    #[default]
    None,
    Technology,
    Caller,
    Manual,
}

impl ComparisonMode {
    pub const ALL: [ComparisonMode; 4] = [
        ComparisonMode::None,
        ComparisonMode::Technology,
        ComparisonMode::Caller,
        ComparisonMode::Manual,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ComparisonMode::None => "Browse",
            ComparisonMode::Technology => "By technology",
            ComparisonMode::Caller => "By caller",
            ComparisonMode::Manual => "Manual",
        }
    }
}

/// A submitted comparison. Created wholesale on submit and replaced
/// wholesale on the next submit or mode change, never mutated in place.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonSelection {
    pub mode: ComparisonMode,
    pub varying_values: Vec<String>,
    pub held_constant: String,
    pub resolved_ids: Vec<ExperimentId>,
}

/// Widget state of the two submit-based modes. Each mode keeps its own
/// inputs so switching back and forth cannot leak parameters; the mode
/// controller resets everything but the entered mode's inputs.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonInputs {
    pub technology_varying: BTreeSet<Technology>,
    pub technology_held_caller: Caller,
    pub caller_varying: BTreeSet<Caller>,
    pub caller_held_technology: Technology,
}

impl Default for ComparisonInputs {
    fn default() -> Self {
        Self {
            technology_varying: BTreeSet::new(),
            technology_held_caller: Caller::Deepvariant,
            caller_varying: BTreeSet::new(),
            caller_held_technology: Technology::Illumina,
        }
    }
}

impl ComparisonInputs {
    /// Restore every mode's widgets except the given one to their defaults.
    pub fn reset_except(&mut self, mode: ComparisonMode) {
        let defaults = Self::default();
        if mode != ComparisonMode::Technology {
            self.technology_varying = defaults.technology_varying;
            self.technology_held_caller = defaults.technology_held_caller;
        }
        if mode != ComparisonMode::Caller {
            self.caller_varying = defaults.caller_varying;
            self.caller_held_technology = defaults.caller_held_technology;
        }
    }

    /// A comparison needs at least two varying values; anything less keeps
    /// the submit action disabled.
    pub fn can_submit(&self, mode: ComparisonMode) -> bool {
        match mode {
            ComparisonMode::Technology => self.technology_varying.len() >= 2,
            ComparisonMode::Caller => self.caller_varying.len() >= 2,
            ComparisonMode::None | ComparisonMode::Manual => false,
        }
    }
}

/// Resolve a submitted comparison against the collaborator: for each varying
/// value, intersect its id set with the ids matching the held-constant value
/// of the other dimension, then union across the varying values in the
/// order they iterate.
pub fn resolve_comparison(
    source: &dyn DataSource,
    mode: ComparisonMode,
    inputs: &ComparisonInputs,
) -> Result<Option<ComparisonSelection>> {
    if !inputs.can_submit(mode) {
        return Ok(None);
    }
    let selection = match mode {
        ComparisonMode::Technology => {
            let held: HashSet<ExperimentId> = source
                .experiments_by_caller(inputs.technology_held_caller)?
                .into_iter()
                .collect();
            let mut resolved = Vec::new();
            for technology in &inputs.technology_varying {
                let ids = source.experiments_by_technology(*technology)?;
                resolved.extend(ids.into_iter().filter(|id| held.contains(id)));
            }
            ComparisonSelection {
                mode,
                varying_values: inputs
                    .technology_varying
                    .iter()
                    .map(|t| t.as_str().to_string())
                    .collect(),
                held_constant: inputs.technology_held_caller.as_str().to_string(),
                resolved_ids: resolved.into_iter().unique().collect(),
            }
        }
        ComparisonMode::Caller => {
            let held: HashSet<ExperimentId> = source
                .experiments_by_technology(inputs.caller_held_technology)?
                .into_iter()
                .collect();
            let mut resolved = Vec::new();
            for caller in &inputs.caller_varying {
                let ids = source.experiments_by_caller(*caller)?;
                resolved.extend(ids.into_iter().filter(|id| held.contains(id)));
            }
            ComparisonSelection {
                mode,
                varying_values: inputs
                    .caller_varying
                    .iter()
                    .map(|c| c.as_str().to_string())
                    .collect(),
                held_constant: inputs.caller_held_technology.as_str().to_string(),
                resolved_ids: resolved.into_iter().unique().collect(),
            }
        }
        ComparisonMode::None | ComparisonMode::Manual => return Ok(None),
    };
    Ok(Some(selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_source::MemoryDataSource;

    #[test]
    fn test_submit_gating() {
        let mut inputs = ComparisonInputs::default();
        assert!(!inputs.can_submit(ComparisonMode::Technology));
        inputs.technology_varying.insert(Technology::Illumina);
        assert!(!inputs.can_submit(ComparisonMode::Technology));
        inputs.technology_varying.insert(Technology::Pacbio);
        assert!(inputs.can_submit(ComparisonMode::Technology));
        assert!(!inputs.can_submit(ComparisonMode::Manual));
    }

    #[test]
    fn test_reset_except_keeps_entered_mode() {
        let mut inputs = ComparisonInputs::default();
        inputs.technology_varying.insert(Technology::Ont);
        inputs.caller_varying.insert(Caller::Gatk);
        inputs.caller_varying.insert(Caller::Clair3);
        inputs.reset_except(ComparisonMode::Technology);
        assert_eq!(inputs.technology_varying.len(), 1);
        assert!(inputs.caller_varying.is_empty());
        assert_eq!(inputs.caller_held_technology, Technology::Illumina);
    }

    #[test]
    fn test_technology_resolution_is_union_of_intersections() {
        let source = MemoryDataSource::demo();
        let mut inputs = ComparisonInputs::default();
        inputs.technology_varying.insert(Technology::Illumina);
        inputs.technology_varying.insert(Technology::Pacbio);
        inputs.technology_held_caller = Caller::Deepvariant;

        let selection = resolve_comparison(&source, ComparisonMode::Technology, &inputs)
            .unwrap()
            .unwrap();

        let deepvariant: HashSet<_> = source
            .experiments_by_caller(Caller::Deepvariant)
            .unwrap()
            .into_iter()
            .collect();
        let mut expected: Vec<ExperimentId> = Vec::new();
        for tech in [Technology::Illumina, Technology::Pacbio] {
            expected.extend(
                source
                    .experiments_by_technology(tech)
                    .unwrap()
                    .into_iter()
                    .filter(|id| deepvariant.contains(id)),
            );
        }
        assert!(!selection.resolved_ids.is_empty());
        assert_eq!(selection.resolved_ids, expected);
        assert_eq!(selection.held_constant, "DEEPVARIANT");
        assert_eq!(selection.varying_values, vec!["ILLUMINA", "PACBIO"]);
    }

    #[test]
    fn test_under_two_varying_values_resolves_to_nothing() {
        let source = MemoryDataSource::demo();
        let mut inputs = ComparisonInputs::default();
        inputs.caller_varying.insert(Caller::Gatk);
        let selection = resolve_comparison(&source, ComparisonMode::Caller, &inputs).unwrap();
        assert!(selection.is_none());
    }
}
