#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod backend_state;
pub mod dataset;
pub mod error;

pub use app::components::{
    color_array, DetailContent, MarkerColors, Palette, Panel, PanelPoint, PanelSpec, Plotter,
    PointClick, SelectionController, SelectionState, PROMPT,
};
pub use app::config::Config;
pub use app::storage;
pub use app::{DynRequestSender, EguiApp};
pub use backend_state::{display_title, image_path_for, BackendAppState, LoadedImage};
pub use dataset::{ColumnNames, Dataset, Record};
pub use error::{ConfigurationError, DataLoadError, ImageResolutionError};
