use eframe::{egui, NativeOptions};
use std::env;
use std::sync::Arc;
use varbench::app::VarBenchApp;
use varbench::memory_source::MemoryDataSource;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("varbench {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "VarBench",
        options,
        Box::new(move |_cc| Ok(Box::new(VarBenchApp::new(Arc::new(MemoryDataSource::demo()))))),
    )
}
