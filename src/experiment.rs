// Experiment identity, categorical dimensions, and display projections.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type ExperimentId = i64;

/// Sequencing technology family, one of the two comparison dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Technology {
    Illumina,
    Pacbio,
    Ont,
    Mgi,
}

impl Technology {
    pub const ALL: [Technology; 4] = [
        Technology::Illumina,
        Technology::Pacbio,
        Technology::Ont,
        Technology::Mgi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Illumina => "ILLUMINA",
            Technology::Pacbio => "PACBIO",
            Technology::Ont => "ONT",
            Technology::Mgi => "MGI",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Variant-calling pipeline, the other comparison dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Caller {
    Deepvariant,
    Gatk,
    Clair3,
}

impl Caller {
    pub const ALL: [Caller; 3] = [Caller::Deepvariant, Caller::Gatk, Caller::Clair3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Caller::Deepvariant => "DEEPVARIANT",
            Caller::Gatk => "GATK",
            Caller::Clair3 => "CLAIR3",
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The two benchmarked variant classes, each rendered as its own chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VariantType {
    Snp,
    Indel,
}

impl VariantType {
    pub const ALL: [VariantType; 2] = [VariantType::Snp, VariantType::Indel];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Snp => "SNP",
            VariantType::Indel => "INDEL",
        }
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the dashboard overview table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverviewRow {
    pub id: ExperimentId,
    pub name: String,
    pub technology: Technology,
    pub platform: Option<String>,
    pub caller: Caller,
    pub caller_version: Option<String>,
    pub chemistry: Option<String>,
    pub truth_set: Option<String>,
    pub sample: Option<String>,
    pub created_at: Option<String>,
}

/// Full attribute set of one experiment, fetched for the detail panel.
///
/// Everything beyond identity is optional; the collaborator joins several
/// tables and any of them can be missing for a given experiment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentMetadata {
    pub id: ExperimentId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<String>,

    // Sequencing
    pub technology: Option<Technology>,
    pub target: Option<String>,
    pub platform_name: Option<String>,
    pub platform_type: Option<String>,
    pub platform_version: Option<String>,
    pub chemistry_name: Option<String>,
    pub chemistry_version: Option<String>,

    // Analysis
    pub caller: Option<Caller>,
    pub caller_type: Option<String>,
    pub caller_version: Option<String>,
    pub caller_model: Option<String>,
    pub aligner_name: Option<String>,
    pub aligner_version: Option<String>,

    // Truth set and benchmarking
    pub truth_set_name: Option<String>,
    pub truth_set_sample: Option<String>,
    pub truth_set_version: Option<String>,
    pub truth_set_reference: Option<String>,
    pub benchmark_tool_name: Option<String>,
    pub benchmark_tool_version: Option<String>,

    // Variant
    pub variant_type: Option<String>,
    pub variant_origin: Option<String>,
    pub variant_size: Option<String>,
    pub is_phased: Option<bool>,

    // Quality control
    pub mean_coverage: Option<f64>,
    pub read_length: Option<f64>,
    pub mean_read_length: Option<f64>,
    pub mean_insert_size: Option<f64>,
}

/// The single fallback used wherever an optional attribute is rendered.
pub fn display_or_na<T: fmt::Display>(value: Option<&T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&Technology::Pacbio).unwrap(),
            "\"PACBIO\""
        );
        assert_eq!(
            serde_json::from_str::<Caller>("\"DEEPVARIANT\"").unwrap(),
            Caller::Deepvariant
        );
        assert_eq!(
            serde_json::from_str::<VariantType>("\"INDEL\"").unwrap(),
            VariantType::Indel
        );
        for tech in Technology::ALL {
            let json = serde_json::to_string(&tech).unwrap();
            assert_eq!(json, format!("\"{}\"", tech.as_str()));
        }
    }

    #[test]
    fn test_display_or_na() {
        assert_eq!(display_or_na(Some(&"NovaSeq 6000")), "NovaSeq 6000");
        assert_eq!(display_or_na::<String>(None), "N/A");
        assert_eq!(display_or_na(Some(&34.5)), "34.5");
    }
}
