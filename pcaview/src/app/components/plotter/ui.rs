use egui_plot::{MarkerShape, PlotPoint, Points};

use super::{PanelSpec, PointClick};

impl super::Plotter {
    /// Draws all panels side by side. `on_click` is called with the point
    /// that was clicked in any of them, at most once per frame.
    pub fn ui(&mut self, ui: &mut egui::Ui, mut on_click: impl FnMut(PointClick)) {
        let pick_radius = self.pick_radius();
        let mut clicked = None;

        ui.columns(self.panels.len(), |columns| {
            for (panel_id, (panel, ui)) in self.panels.iter().zip(columns.iter_mut()).enumerate()
            {
                let spec = panel.spec();
                let response = egui_plot::Plot::new(("pca_panel", panel_id))
                    .height(self.plot_height)
                    .x_axis_label(PanelSpec::axis_label(spec.x))
                    .y_axis_label(PanelSpec::axis_label(spec.y))
                    // The label of the hovered point is shown instead.
                    .show_x(false)
                    .show_y(false)
                    .allow_scroll(false)
                    .show(ui, |plot_ui| {
                        for (color, points) in panel.color_buckets() {
                            plot_ui.points(
                                Points::new(points)
                                    .color(color)
                                    .radius(self.marker_radius)
                                    .shape(MarkerShape::Circle)
                                    .filled(true),
                            );
                        }
                    });

                // Resolve the pointer position to a point index.
                let transform = response.transform;
                let hovered = response.response.hover_pos().and_then(|pointer| {
                    panel.nearest_point(
                        pointer,
                        |[x, y]| transform.position_from_point(&PlotPoint::new(x, y)),
                        pick_radius,
                    )
                });

                if let Some(idx) = hovered {
                    if response.response.clicked() {
                        log::debug!("point {} clicked in panel {}", idx, spec);
                        clicked = Some(idx);
                    }
                    if let Some(point) = panel.point(idx) {
                        response.response.on_hover_text(point.label);
                    }
                }
            }
        });

        if let Some(click) = clicked.and_then(|idx| self.click(idx)) {
            on_click(click);
        }
    }
}
