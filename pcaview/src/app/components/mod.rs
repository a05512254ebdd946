mod plotter;
mod selection;

pub use plotter::{
    color_array, MarkerColors, Panel, PanelPoint, PanelSpec, Plotter, PointClick,
    DEFAULT_MARKER_RADIUS, DEFAULT_PLOT_HEIGHT,
};
pub use selection::{DetailContent, Palette, SelectionController, SelectionState, PROMPT};
