// Experiments overview table. In manual mode the leading column carries the
// selection checkboxes that feed the display set.

use crate::comparison::ComparisonMode;
use crate::experiment::{display_or_na, OverviewRow};
use crate::session::Session;
use eframe::egui;
use egui_extras::{Column, TableBuilder};

const HEADERS: [&str; 10] = [
    "ID",
    "Name",
    "Technology",
    "Platform",
    "Caller",
    "Version",
    "Chemistry",
    "Truth set",
    "Sample",
    "Created",
];

pub fn render_overview_table(ui: &mut egui::Ui, rows: &[OverviewRow], session: &mut Session) {
    if rows.is_empty() {
        ui.weak("No experiments match the current selection.");
        return;
    }
    let manual = session.mode() == ComparisonMode::Manual;
    let mut toggled = None;

    ui.push_id("overview_table", |ui| {
        let mut table = TableBuilder::new(ui).striped(true);
        if manual {
            table = table.column(Column::auto());
        }
        table = table
            .column(Column::auto())
            .column(Column::remainder())
            .columns(Column::auto(), HEADERS.len() - 2);

        table
            .header(20.0, |mut header| {
                if manual {
                    header.col(|_ui| {});
                }
                for title in HEADERS {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(18.0, |mut table_row| {
                        if manual {
                            table_row.col(|ui| {
                                let mut selected = session.is_table_selected(row.id);
                                if ui.checkbox(&mut selected, "").changed() {
                                    toggled = Some(row.id);
                                }
                            });
                        }
                        table_row.col(|ui| {
                            ui.label(row.id.to_string());
                        });
                        table_row.col(|ui| {
                            ui.label(&row.name);
                        });
                        table_row.col(|ui| {
                            ui.label(row.technology.as_str());
                        });
                        table_row.col(|ui| {
                            ui.label(display_or_na(row.platform.as_ref()));
                        });
                        table_row.col(|ui| {
                            ui.label(row.caller.as_str());
                        });
                        table_row.col(|ui| {
                            ui.label(display_or_na(row.caller_version.as_ref()));
                        });
                        table_row.col(|ui| {
                            ui.label(display_or_na(row.chemistry.as_ref()));
                        });
                        table_row.col(|ui| {
                            ui.label(display_or_na(row.truth_set.as_ref()));
                        });
                        table_row.col(|ui| {
                            ui.label(display_or_na(row.sample.as_ref()));
                        });
                        table_row.col(|ui| {
                            ui.label(display_or_na(row.created_at.as_ref()));
                        });
                    });
                }
            });
    });

    if let Some(id) = toggled {
        session.toggle_table_row(id);
    }
}
