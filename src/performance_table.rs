// Per-(experiment, variant type) metrics table shown under the charts.

use crate::experiment::display_or_na;
use crate::performance::MetricPoint;
use eframe::egui;
use egui_extras::{Column, TableBuilder};

pub fn render_performance_table(ui: &mut egui::Ui, points: &[MetricPoint]) {
    if points.is_empty() {
        ui.weak("No performance rows for the current selection.");
        return;
    }

    ui.push_id("performance_table", |ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder())
            .columns(Column::auto(), 7)
            .header(20.0, |mut header| {
                for title in [
                    "Experiment",
                    "Type",
                    "Recall",
                    "Precision",
                    "F1",
                    "Truth TP",
                    "Truth FN",
                    "Query FP",
                ] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for point in points {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label(&point.experiment_name);
                        });
                        row.col(|ui| {
                            ui.label(point.variant_type.as_str());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.4}", point.recall));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.4}", point.precision));
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.4}", point.f1));
                        });
                        row.col(|ui| {
                            ui.label(display_or_na(point.truth_tp.as_ref()));
                        });
                        row.col(|ui| {
                            ui.label(display_or_na(point.truth_fn.as_ref()));
                        });
                        row.col(|ui| {
                            ui.label(display_or_na(point.query_fp.as_ref()));
                        });
                    });
                }
            });
    });
}
