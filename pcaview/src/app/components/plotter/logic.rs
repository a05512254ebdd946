use std::{cmp::Reverse, sync::Arc};

use egui::{Color32, Pos2};

use crate::{
    dataset::{Dataset, COMPONENTS},
    error::ConfigurationError,
};

use super::{MarkerColors, Panel, PanelPoint, PanelSpec, PointClick, Plotter};

pub const DEFAULT_MARKER_RADIUS: f32 = 4.0;
pub const DEFAULT_PLOT_HEIGHT: f32 = 400.0;

// Distance (in screen points) around a marker that still counts as a hit.
const PICK_TOLERANCE: f32 = 3.0;

/// Colors for `len` points: `base` everywhere, `accent` at `highlighted`.
pub fn color_array(
    len: usize,
    highlighted: Option<usize>,
    base: Color32,
    accent: Color32,
) -> Vec<Color32> {
    let mut colors = vec![base; len];
    if let Some(slot) = highlighted.and_then(|idx| colors.get_mut(idx)) {
        *slot = accent;
    }
    colors
}

impl Plotter {
    /// Builds one panel per spec, every point colored with `base`.
    pub fn render(
        dataset: &Dataset,
        specs: &[PanelSpec],
        base: Color32,
    ) -> Result<Self, ConfigurationError> {
        if specs.is_empty() {
            return Err(ConfigurationError::NoPanels);
        }
        if let Some((panel, spec)) = specs.iter().enumerate().find(|(_, spec)| !spec.fits()) {
            return Err(ConfigurationError::ComponentOutOfRange {
                panel,
                component: spec.max_component(),
                available: COMPONENTS,
            });
        }

        let labels: Arc<[String]> = dataset.labels().into();
        let panels = specs
            .iter()
            .map(|spec| Panel {
                spec: *spec,
                points: dataset
                    .iter()
                    .map(|record| [record.components[spec.x], record.components[spec.y]])
                    .collect(),
                labels: labels.clone(),
                colors: MarkerColors::Uniform(base),
            })
            .collect::<Vec<_>>();
        log::debug!(
            "rendered {} panels with {} points each",
            panels.len(),
            labels.len()
        );

        Ok(Self {
            panels,
            labels,
            marker_radius: DEFAULT_MARKER_RADIUS,
            plot_height: DEFAULT_PLOT_HEIGHT,
        })
    }

    pub fn point_count(&self) -> usize {
        self.labels.len()
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// The click event for `index`, carrying the label it was drawn with.
    pub fn click(&self, index: usize) -> Option<PointClick> {
        self.label(index)
            .map(|label| PointClick::new(index, label.to_owned()))
    }

    /// Replaces the marker colors of all panels. Panels that still store a
    /// single color are expanded to one color per point first.
    pub fn apply_colors(&mut self, colors: &[Color32]) -> Result<(), String> {
        let n = self.point_count();
        if colors.len() != n {
            return Err(format!(
                "color array has {} entries, but the panels show {} points",
                colors.len(),
                n
            ));
        }
        for panel in self.panels.iter_mut() {
            panel.colors.to_per_point(n).copy_from_slice(colors);
        }
        Ok(())
    }

    /// Sets every panel back to a single color for all points.
    pub fn reset_colors(&mut self, color: Color32) {
        for panel in self.panels.iter_mut() {
            panel.colors = MarkerColors::Uniform(color);
        }
    }

    pub(super) fn pick_radius(&self) -> f32 {
        self.marker_radius + PICK_TOLERANCE
    }
}

impl Panel {
    pub fn spec(&self) -> PanelSpec {
        self.spec
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn colors(&self) -> &MarkerColors {
        &self.colors
    }

    pub fn point(&self, index: usize) -> Option<PanelPoint<'_>> {
        let position = *self.points.get(index)?;
        Some(PanelPoint {
            position,
            label: self.labels.get(index)?,
            color: self.colors.color_of(index)?,
        })
    }

    /// Index of the point closest to `pointer` (screen coordinates), if it
    /// lies within `max_distance`. Ties go to the lower index.
    pub fn nearest_point(
        &self,
        pointer: Pos2,
        to_screen: impl Fn([f64; 2]) -> Pos2,
        max_distance: f32,
    ) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(idx, point)| (idx, to_screen(*point).distance_sq(pointer)))
            .filter(|(_, dist_sq)| *dist_sq <= max_distance * max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(idx, _)| idx)
    }

    /// Points grouped by color, largest group first, so that the rarer
    /// colors are painted on top.
    pub(super) fn color_buckets(&self) -> Vec<(Color32, Vec<[f64; 2]>)> {
        let mut buckets: Vec<(Color32, Vec<[f64; 2]>)> = Vec::new();
        match &self.colors {
            MarkerColors::Uniform(color) => buckets.push((*color, self.points.clone())),
            MarkerColors::PerPoint(colors) => {
                for (point, color) in self.points.iter().zip(colors) {
                    match buckets.iter_mut().find(|(c, _)| c == color) {
                        Some((_, points)) => points.push(*point),
                        None => buckets.push((*color, vec![*point])),
                    }
                }
            }
        }
        buckets.sort_by_key(|(_, points)| Reverse(points.len()));
        buckets
    }
}

impl MarkerColors {
    pub fn color_of(&self, index: usize) -> Option<Color32> {
        match self {
            MarkerColors::Uniform(color) => Some(*color),
            MarkerColors::PerPoint(colors) => colors.get(index).copied(),
        }
    }

    /// Turns a single color into one color per point and hands out the
    /// per-point colors for editing.
    pub fn to_per_point(&mut self, len: usize) -> &mut Vec<Color32> {
        if let MarkerColors::Uniform(color) = *self {
            *self = MarkerColors::PerPoint(vec![color; len]);
        }
        match self {
            MarkerColors::PerPoint(colors) => {
                colors.resize(len, colors.last().copied().unwrap_or_default());
                colors
            }
            MarkerColors::Uniform(_) => unreachable!("colors were expanded above"),
        }
    }
}
