mod logic;
mod ui;

use std::sync::Arc;

use derive_new::new;
use egui::Color32;

use crate::dataset::COMPONENTS;

pub use logic::{color_array, DEFAULT_MARKER_RADIUS, DEFAULT_PLOT_HEIGHT};

/// Renders one scatter panel per component pair. All panels share the
/// point index space of the dataset.
pub struct Plotter {
    panels: Vec<Panel>,
    /// Labels in dataset order, shared by every panel.
    labels: Arc<[String]>,
    pub marker_radius: f32,
    pub plot_height: f32,
}

/// Which components are shown on the x- and y-axis (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct PanelSpec {
    pub x: usize,
    pub y: usize,
}

pub struct Panel {
    spec: PanelSpec,
    points: Vec<[f64; 2]>,
    labels: Arc<[String]>,
    colors: MarkerColors,
}

/// Stored marker colors of a panel: a single color for every point, or
/// one color per point.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerColors {
    Uniform(Color32),
    PerPoint(Vec<Color32>),
}

/// A point of one panel, as currently drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPoint<'a> {
    pub position: [f64; 2],
    pub label: &'a str,
    pub color: Color32,
}

/// A point that was clicked in any of the panels.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct PointClick {
    pub index: usize,
    pub label: String,
}

impl PanelSpec {
    /// PC1/PC2, PC2/PC3 and PC1/PC3.
    pub fn default_set() -> Vec<PanelSpec> {
        vec![
            PanelSpec::new(0, 1),
            PanelSpec::new(1, 2),
            PanelSpec::new(0, 2),
        ]
    }

    pub fn axis_label(component: usize) -> String {
        format!("PC {}", component + 1)
    }

    fn max_component(&self) -> usize {
        self.x.max(self.y)
    }

    fn fits(&self) -> bool {
        self.max_component() < COMPONENTS
    }
}

impl std::fmt::Display for PanelSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.x + 1, self.y + 1)
    }
}
