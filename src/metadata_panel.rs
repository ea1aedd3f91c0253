// Two-tier metadata display for the currently inspected experiment.

use crate::data_source::DataSource;
use crate::experiment::{display_or_na, ExperimentId, ExperimentMetadata};
use anyhow::Result;
use eframe::egui::{self, CollapsingHeader};

#[derive(Debug, Default)]
pub struct MetadataPanel {
    inspected: Option<ExperimentId>,
    metadata: Option<ExperimentMetadata>,
    /// Id whose fetch failed; not retried until the inspected id changes.
    failed: Option<ExperimentId>,
}

impl MetadataPanel {
    /// Fetch metadata when the inspected id changed (or became defined for
    /// the first time). Fetches before committing, so a failed call leaves
    /// the previously shown experiment intact.
    pub fn refresh(&mut self, source: &dyn DataSource, inspected: Option<ExperimentId>) -> Result<()> {
        if inspected == self.inspected || (inspected.is_some() && inspected == self.failed) {
            return Ok(());
        }
        let metadata = match inspected {
            Some(id) => match source.experiment_metadata(&[id]) {
                Ok(rows) => rows.into_iter().next(),
                Err(err) => {
                    self.failed = Some(id);
                    return Err(err);
                }
            },
            None => None,
        };
        self.inspected = inspected;
        self.metadata = metadata;
        self.failed = None;
        Ok(())
    }

    pub fn render(&self, ui: &mut egui::Ui) {
        ui.heading("Experiment details");
        let Some(meta) = &self.metadata else {
            ui.weak("Click a chart point to inspect an experiment.");
            return;
        };

        ui.strong(format!("#{} {}", meta.id, meta.name));
        if let Some(description) = &meta.description {
            ui.label(description);
        }
        ui.add_space(4.0);

        // Compact summary, always visible.
        grid(ui, "metadata_summary", &summary_rows(meta));

        // Full view; expanding and collapsing never touches the inspected id.
        CollapsingHeader::new("All metadata")
            .default_open(false)
            .show(ui, |ui| {
                for (section, rows) in detail_sections(meta) {
                    ui.add_space(4.0);
                    ui.strong(section);
                    grid(ui, section, &rows);
                }
            });
    }
}

fn grid(ui: &mut egui::Ui, id: &str, rows: &[(&'static str, String)]) {
    egui::Grid::new(id).num_columns(2).striped(true).show(ui, |ui| {
        for (label, value) in rows {
            ui.label(*label);
            ui.label(value);
            ui.end_row();
        }
    });
}

pub fn summary_rows(meta: &ExperimentMetadata) -> Vec<(&'static str, String)> {
    vec![
        ("Technology", display_or_na(meta.technology.as_ref())),
        ("Platform", display_or_na(meta.platform_name.as_ref())),
        ("Caller", display_or_na(meta.caller.as_ref())),
        ("Mean coverage", display_or_na(meta.mean_coverage.as_ref())),
    ]
}

/// Every attribute of the full view, grouped for display. Undefined values
/// come back as the literal fallback, never omitted.
pub fn detail_sections(meta: &ExperimentMetadata) -> Vec<(&'static str, Vec<(&'static str, String)>)> {
    vec![
        (
            "Sequencing",
            vec![
                ("Technology", display_or_na(meta.technology.as_ref())),
                ("Target", display_or_na(meta.target.as_ref())),
                ("Platform", display_or_na(meta.platform_name.as_ref())),
                ("Platform type", display_or_na(meta.platform_type.as_ref())),
                ("Platform version", display_or_na(meta.platform_version.as_ref())),
                ("Chemistry", display_or_na(meta.chemistry_name.as_ref())),
                ("Chemistry version", display_or_na(meta.chemistry_version.as_ref())),
            ],
        ),
        (
            "Analysis",
            vec![
                ("Caller", display_or_na(meta.caller.as_ref())),
                ("Caller type", display_or_na(meta.caller_type.as_ref())),
                ("Caller version", display_or_na(meta.caller_version.as_ref())),
                ("Caller model", display_or_na(meta.caller_model.as_ref())),
                ("Aligner", display_or_na(meta.aligner_name.as_ref())),
                ("Aligner version", display_or_na(meta.aligner_version.as_ref())),
            ],
        ),
        (
            "Truth set & benchmark",
            vec![
                ("Truth set", display_or_na(meta.truth_set_name.as_ref())),
                ("Sample", display_or_na(meta.truth_set_sample.as_ref())),
                ("Truth set version", display_or_na(meta.truth_set_version.as_ref())),
                ("Reference", display_or_na(meta.truth_set_reference.as_ref())),
                ("Benchmark tool", display_or_na(meta.benchmark_tool_name.as_ref())),
                ("Tool version", display_or_na(meta.benchmark_tool_version.as_ref())),
            ],
        ),
        (
            "Variant",
            vec![
                ("Type", display_or_na(meta.variant_type.as_ref())),
                ("Origin", display_or_na(meta.variant_origin.as_ref())),
                ("Size class", display_or_na(meta.variant_size.as_ref())),
                ("Phased", display_or_na(meta.is_phased.as_ref())),
            ],
        ),
        (
            "Quality control",
            vec![
                ("Mean coverage", display_or_na(meta.mean_coverage.as_ref())),
                ("Read length", display_or_na(meta.read_length.as_ref())),
                ("Mean read length", display_or_na(meta.mean_read_length.as_ref())),
                ("Mean insert size", display_or_na(meta.mean_insert_size.as_ref())),
            ],
        ),
        (
            "Provenance",
            vec![("Created", display_or_na(meta.created_at.as_ref()))],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_source::MemoryDataSource;

    #[test]
    fn test_refresh_only_on_change() {
        let source = MemoryDataSource::demo();
        let mut panel = MetadataPanel::default();
        panel.refresh(&source, Some(3)).unwrap();
        assert_eq!(panel.metadata.as_ref().map(|m| m.id), Some(3));
        panel.refresh(&source, Some(5)).unwrap();
        assert_eq!(panel.metadata.as_ref().map(|m| m.id), Some(5));
        panel.refresh(&source, None).unwrap();
        assert!(panel.metadata.is_none());
    }

    #[test]
    fn test_detail_rows_round_trip() {
        let source = MemoryDataSource::demo();
        let meta = source.experiment_metadata(&[1]).unwrap().remove(0);
        let rows: Vec<_> = detail_sections(&meta)
            .into_iter()
            .flat_map(|(_, rows)| rows)
            .collect();

        // Present attributes appear unmodified.
        let value_of = |label: &str| {
            rows.iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(value_of("Technology"), meta.technology.unwrap().to_string());
        assert_eq!(value_of("Platform"), meta.platform_name.clone().unwrap());
        assert_eq!(value_of("Caller version"), meta.caller_version.clone().unwrap());
        assert_eq!(value_of("Created"), meta.created_at.clone().unwrap());

        // Absent attributes fall back to the literal, never disappear.
        let blank = ExperimentMetadata {
            id: 99,
            name: "blank".to_string(),
            ..ExperimentMetadata::default()
        };
        for (_, rows) in detail_sections(&blank) {
            for (_, value) in rows {
                assert_eq!(value, "N/A");
            }
        }
    }
}
