#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use app_core::backend::BackendEventLoop;
use clap::Parser;
use pcaview::{BackendAppState, Config, Dataset, EguiApp, Plotter};

const WINDOW_NAME: &str = "pcaview";
const WINDOW_WIDTH: f32 = 1340.0;
const WINDOW_HEIGHT: f32 = 960.0;
const MIN_WINDOW_WIDTH: f32 = 640.0;
const MIN_WINDOW_HEIGHT: f32 = 480.0;

/// Shows PCA results in linked scatter panels together with the image
/// behind each point.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Config file to use instead of ~/.pcaview
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset with the principal components and one label per point
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Folder holding one image per label
    #[arg(short, long)]
    images: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match Config::from_config_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) if cli.config.is_some() => {
            log::error!("{}", err);
            std::process::exit(1);
        }
        Err(err) => {
            log::warn!("unable to load config file \".pcaview\" from home directory: {err}");
            Config::default()
        }
    };
    if let Some(data) = cli.data {
        config.data_path = data;
    }
    if let Some(images) = cli.images {
        config.image_root = images;
    }

    // Nothing can be shown without the dataset and its panels.
    let dataset = match Dataset::load(&config.data_path, &config.columns) {
        Ok(dataset) => dataset,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    let mut plotter = match Plotter::render(&dataset, &config.panels, config.palette.base) {
        Ok(plotter) => plotter,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };
    plotter.marker_radius = config.marker_radius;
    plotter.plot_height = config.plot_height;
    log::info!(
        "showing {} points in {} panels",
        plotter.point_count(),
        plotter.panels().len()
    );

    // start backend loop
    let (request_tx, request_rx) = std::sync::mpsc::channel();
    let backend_state = BackendAppState::new(config.image_root.clone());
    let eventloop_handle = match BackendEventLoop::new(request_rx, backend_state).run() {
        Ok(handle) => handle,
        Err(err) => {
            log::error!("could not start backend thread: {}", err);
            std::process::exit(1);
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(|cc| {
            Ok(Box::new(EguiApp::new(
                cc,
                config,
                plotter,
                request_tx,
                eventloop_handle,
            )))
        }),
    )
}
