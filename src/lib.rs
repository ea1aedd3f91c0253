use contour::F1Surface;
use lazy_static::lazy_static;

pub mod app;
pub mod comparison;
pub mod contour;
pub mod data_source;
pub mod experiment;
pub mod filter;
pub mod left_panel;
pub mod main_area;
pub mod memory_source;
pub mod metadata_panel;
pub mod overview_table;
pub mod performance;
pub mod performance_table;
pub mod render_metrics;
pub mod session;

lazy_static! {
    // Iso-F1 reference surface; deterministic and parameter-free, so it is
    // computed once and shared by both variant-type charts.
    pub static ref F1_SURFACE: F1Surface = F1Surface::generate();
}
