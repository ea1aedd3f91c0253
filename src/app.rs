use crate::data_source::DataSource;
use crate::left_panel::LeftPanel;
use crate::main_area::MainArea;
use crate::session::Session;
use eframe::egui::{self, Color32};
use std::sync::Arc;

/// One dashboard instance: the data collaborator, one session's state, and
/// the panels rendering it. Sessions never share state; a second window
/// would simply be a second `VarBenchApp`.
pub struct VarBenchApp {
    source: Arc<dyn DataSource>,
    session: Session,
    left_panel: LeftPanel,
    main_area: MainArea,
}

impl VarBenchApp {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            session: Session::new(),
            left_panel: LeftPanel::default(),
            main_area: MainArea::new(),
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.session.notice().map(str::to_string) {
            egui::TopBottomPanel::top("notice_panel").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(Color32::from_rgb(255, 100, 100), &message);
                    if ui.button("Dismiss").clicked() {
                        self.session.clear_notice();
                    }
                });
            });
        }
    }
}

impl eframe::App for VarBenchApp {
    fn ui(&mut self, ui: &mut egui::Ui, frame: &mut eframe::Frame) {
        // This eframe exposes `ui` as the required entry point; forward to the
        // existing context-based rendering, which drives its own panels.
        let ctx = ui.ctx().clone();
        #[allow(deprecated)]
        self.update(&ctx, frame);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle the frame's data needs before rendering; a collaborator
        // failure becomes a notice and the previous state stays on screen.
        if let Err(err) = self.main_area.refresh(self.source.as_ref(), &self.session) {
            log::warn!("data refresh failed: {err:#}");
            self.session.set_notice(format!("Data source error: {err}"));
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("VarBench");
                ui.separator();
                ui.weak("Variant-calling benchmark comparison");
            });
        });
        self.render_notice(ctx);

        egui::SidePanel::left("comparison_controls")
            .default_width(230.0)
            .show(ctx, |ui| {
                self.left_panel.render(ui, &mut self.session, &self.source);
            });

        egui::SidePanel::right("experiment_details")
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.main_area.render_detail(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.main_area.render_central(ui, &mut self.session);
        });
    }
}
