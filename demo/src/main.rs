mod app;

use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use eframe::{run_native, NativeOptions};
use egui_linkgraph::{Dataset, Settings};

const APP_NAME: &str = "Link Graph";
const SAMPLE_CASE: &str = include_str!("../../tests/fixtures/case_network.json");

#[derive(Debug, Parser)]
#[command(author, version, about = "Interactive link analysis of a case network")]
struct Args {
    /// Case network JSON as served by the case backend. Defaults to a bundled sample case.
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Settings JSON; missing fields keep their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible layout
    #[arg(long)]
    seed: Option<u64>,

    /// Where exported frames are written
    #[arg(long, default_value = "linkgraph-frame.png")]
    export_path: PathBuf,
}

fn read(path: &PathBuf) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let dataset = match &args.dataset {
        Some(path) => Dataset::from_json(&read(path)?)
            .with_context(|| format!("loading case network {}", path.display()))?,
        None => Dataset::from_json(SAMPLE_CASE).context("loading bundled sample case")?,
    };

    let mut settings = match &args.config {
        Some(path) => Settings::from_json(&read(path)?)
            .with_context(|| format!("parsing settings {}", path.display()))?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings = settings.with_seed(args.seed);
    }

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1400.0, 900.0]),
        ..Default::default()
    };
    run_native(
        APP_NAME,
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::LinkGraphApp::new(
                cc,
                dataset,
                settings,
                args.export_path,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running {APP_NAME}: {e}"))
}
