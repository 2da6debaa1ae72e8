mod app;
mod data;
mod graph;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the dataset JSON file (array of company/tool records).
    #[arg(long, default_value = "data/designtechs.json")]
    dataset: String,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "design-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::DesignGraphApp::new(cc, args.dataset.clone())))),
    )
}
