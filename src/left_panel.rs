// Comparison controls: mode buttons, per-mode inputs, browse filters.

use crate::comparison::ComparisonMode;
use crate::data_source::DataSource;
use crate::experiment::{Caller, Technology};
use crate::filter::BrowseFilter;
use crate::session::Session;
use eframe::egui;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct LeftPanel {}

impl LeftPanel {
    pub fn render(&mut self, ui: &mut egui::Ui, session: &mut Session, source: &Arc<dyn DataSource>) {
        ui.heading("Comparison");
        ui.horizontal_wrapped(|ui| {
            for mode in ComparisonMode::ALL {
                let selected = session.mode() == mode;
                if ui.selectable_label(selected, mode.label()).clicked() && !selected {
                    session.set_mode(mode);
                }
            }
        });
        ui.separator();

        match session.mode() {
            ComparisonMode::None => self.render_browse_filter(ui, session),
            ComparisonMode::Technology => self.render_technology_inputs(ui, session, source),
            ComparisonMode::Caller => self.render_caller_inputs(ui, session, source),
            ComparisonMode::Manual => {
                ui.label("Select rows in the experiments table.");
                ui.weak(format!("{} selected", session.table_selected_ids().len()));
            }
        }

        if let Some(selection) = session.submitted() {
            ui.separator();
            ui.weak(format!(
                "Comparing {} at {}: {} experiments",
                selection.varying_values.join(", "),
                selection.held_constant,
                selection.resolved_ids.len()
            ));
        }
    }

    fn render_browse_filter(&mut self, ui: &mut egui::Ui, session: &mut Session) {
        ui.label("Filter");
        egui::ComboBox::from_id_salt("browse_filter")
            .selected_text(session.browse_filter.label())
            .show_ui(ui, |ui| {
                ui.selectable_value(
                    &mut session.browse_filter,
                    BrowseFilter::All,
                    BrowseFilter::All.label(),
                );
                for technology in Technology::ALL {
                    let filter = BrowseFilter::Technology(technology);
                    let label = filter.label();
                    ui.selectable_value(&mut session.browse_filter, filter, label);
                }
                for caller in Caller::ALL {
                    let filter = BrowseFilter::Caller(caller);
                    let label = filter.label();
                    ui.selectable_value(&mut session.browse_filter, filter, label);
                }
            });
    }

    fn render_technology_inputs(
        &mut self,
        ui: &mut egui::Ui,
        session: &mut Session,
        source: &Arc<dyn DataSource>,
    ) {
        ui.label("Technologies to compare");
        for technology in Technology::ALL {
            let mut checked = session.inputs.technology_varying.contains(&technology);
            if ui.checkbox(&mut checked, technology.as_str()).changed() {
                if checked {
                    session.inputs.technology_varying.insert(technology);
                } else {
                    session.inputs.technology_varying.remove(&technology);
                }
            }
        }
        egui::ComboBox::from_label("Caller")
            .selected_text(session.inputs.technology_held_caller.as_str())
            .show_ui(ui, |ui| {
                for caller in Caller::ALL {
                    ui.selectable_value(
                        &mut session.inputs.technology_held_caller,
                        caller,
                        caller.as_str(),
                    );
                }
            });
        self.render_submit(ui, session, source);
    }

    fn render_caller_inputs(
        &mut self,
        ui: &mut egui::Ui,
        session: &mut Session,
        source: &Arc<dyn DataSource>,
    ) {
        ui.label("Callers to compare");
        for caller in Caller::ALL {
            let mut checked = session.inputs.caller_varying.contains(&caller);
            if ui.checkbox(&mut checked, caller.as_str()).changed() {
                if checked {
                    session.inputs.caller_varying.insert(caller);
                } else {
                    session.inputs.caller_varying.remove(&caller);
                }
            }
        }
        egui::ComboBox::from_label("Technology")
            .selected_text(session.inputs.caller_held_technology.as_str())
            .show_ui(ui, |ui| {
                for technology in Technology::ALL {
                    ui.selectable_value(
                        &mut session.inputs.caller_held_technology,
                        technology,
                        technology.as_str(),
                    );
                }
            });
        self.render_submit(ui, session, source);
    }

    fn render_submit(&mut self, ui: &mut egui::Ui, session: &mut Session, source: &Arc<dyn DataSource>) {
        let can_submit = session.inputs.can_submit(session.mode());
        if !can_submit {
            ui.weak("Pick at least two values to compare.");
        }
        if ui.add_enabled(can_submit, egui::Button::new("Compare")).clicked() {
            if let Err(err) = session.submit_comparison(source.as_ref()) {
                log::warn!("comparison submit failed: {err:#}");
                session.set_notice(format!("Comparison failed: {err}"));
            }
        }
    }
}
