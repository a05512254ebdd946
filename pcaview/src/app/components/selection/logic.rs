use app_core::{
    backend::{BackendEventLoop, BackendLink},
    BACKEND_HUNG_UP_MSG,
};
use egui::Color32;

use crate::{
    app::components::{color_array, Plotter, PointClick},
    backend_state::display_title,
    BackendAppState,
};

use super::{DetailContent, Palette, SelectionController, SelectionState};

impl SelectionController {
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn detail(&self) -> &DetailContent {
        self.detail.value()
    }

    pub fn is_loading(&self) -> bool {
        !self.detail.is_up_to_date()
    }

    /// Colors of all `len` points for the current state.
    pub fn color_array(&self, len: usize) -> Vec<Color32> {
        color_array(
            len,
            self.state.highlighted(),
            self.palette.base,
            self.palette.accent,
        )
    }

    /// Selects the clicked point. Clicking the selected point again selects
    /// it again; there is no deselection.
    ///
    /// The colors of every panel are rebuilt before the image is requested,
    /// so the highlight does not depend on the image being available.
    pub fn handle_click(&mut self, click: &PointClick, plotter: &mut Plotter) -> Result<(), String> {
        let n = plotter.point_count();
        if click.index >= n {
            return Err(format!(
                "clicked point {} does not exist, the dataset has {} points",
                click.index, n
            ));
        }

        if self.state == SelectionState::Selected(click.index) {
            log::debug!("point {} ('{}') selected again", click.index, click.label);
        } else {
            log::info!("selecting point {} ('{}')", click.index, click.label);
        }
        self.state = SelectionState::Selected(click.index);

        plotter.apply_colors(&self.color_array(n))?;
        self.request_detail(&click.label);
        Ok(())
    }

    pub fn set_palette(&mut self, palette: Palette, plotter: &mut Plotter) -> Result<(), String> {
        self.palette = palette;
        self.recolor(plotter)
    }

    /// Rebuilds the panel colors from the current state.
    pub fn recolor(&self, plotter: &mut Plotter) -> Result<(), String> {
        match self.state {
            SelectionState::Idle => {
                plotter.reset_colors(self.palette.base);
                Ok(())
            }
            SelectionState::Selected(_) => {
                plotter.apply_colors(&self.color_array(plotter.point_count()))
            }
        }
    }

    /// Polls the backend for the requested image. Returns true if the detail
    /// panel changed.
    pub fn try_update(&mut self) -> bool {
        let updated = self.detail.try_update();
        if updated {
            self.texture = None;
            // The reply was lost, e.g. the backend thread ended mid-request.
            if let DetailContent::Loading { title } = self.detail.value() {
                let title = title.clone();
                self.detail.set(DetailContent::Unavailable {
                    title,
                    message: format!("Image unavailable: {}", BACKEND_HUNG_UP_MSG),
                });
            }
        }
        updated
    }

    // Replaces the detail panel with a loading note and asks the backend for
    // the image. A reply to an earlier request is cancelled by this.
    fn request_detail(&mut self, label: &str) {
        let title = display_title(label).to_owned();
        self.texture = None;
        self.detail.set(DetailContent::Loading {
            title: title.clone(),
        });

        let description = format!("load image for '{}'", label);
        let label = label.to_owned();
        let reply_title = title.clone();
        let requested = BackendLink::request_parameter_update(
            &mut self.detail,
            &description,
            move |b: &mut BackendEventLoop<BackendAppState>| match b.state.load_image(&label) {
                Ok(image) => DetailContent::Image {
                    title: reply_title.clone(),
                    image,
                },
                Err(err) => {
                    log::warn!("{}", err);
                    DetailContent::Unavailable {
                        title: reply_title.clone(),
                        message: format!("Image unavailable: {err}"),
                    }
                }
            },
            &self.request_tx,
        );

        if let Err(err) = requested {
            self.detail.set(DetailContent::Unavailable {
                title,
                message: format!("Image unavailable: {err}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::mpsc::{channel, Receiver},
    };

    use app_core::backend::BackendRequest;

    use super::*;
    use crate::{
        app::components::{MarkerColors, PanelSpec},
        dataset::Dataset,
    };

    const BASE: Color32 = Color32::BLUE;
    const ACCENT: Color32 = Color32::RED;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // Writes `a.png` (1x1), `b.png` (2x1) and `c.png` (3x1).
    fn image_store(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pcaview_sel_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for (width, label) in [(1, "a.png"), (2, "b.png"), (3, "c.png")] {
            image::RgbaImage::from_pixel(width, 1, image::Rgba([0, 0, 0, 255]))
                .save(dir.join(label))
                .unwrap();
        }
        dir
    }

    struct Fixture {
        controller: SelectionController,
        plotter: Plotter,
        backend: BackendEventLoop<BackendAppState>,
    }

    fn fixture(name: &str, labels: [&str; 3]) -> Fixture {
        init();
        let (request_tx, request_rx): (_, Receiver<Box<dyn BackendRequest<BackendAppState>>>) =
            channel();
        let backend = BackendEventLoop::new(request_rx, BackendAppState::new(image_store(name)));
        let dataset = Dataset::from(vec![
            (0.0, 0.0, 0.0, labels[0]),
            (1.0, 1.0, 1.0, labels[1]),
            (2.0, 2.0, 2.0, labels[2]),
        ]);
        let plotter = Plotter::render(&dataset, &PanelSpec::default_set(), BASE).unwrap();
        let controller = SelectionController::new(Palette::default(), request_tx);
        Fixture {
            controller,
            plotter,
            backend,
        }
    }

    impl Fixture {
        fn click(&mut self, index: usize) {
            let click = self.plotter.click(index).unwrap();
            self.controller
                .handle_click(&click, &mut self.plotter)
                .unwrap();
        }

        fn resolve(&mut self) {
            self.backend.update();
            self.controller.try_update();
        }

        fn panel_colors(&self) -> Vec<MarkerColors> {
            self.plotter
                .panels()
                .iter()
                .map(|panel| panel.colors().clone())
                .collect()
        }

        fn shown_image(&self) -> (String, [usize; 2]) {
            match self.controller.detail() {
                DetailContent::Image { title, image } => (title.clone(), image.pixels.size),
                other => panic!("expected an image, found {:?}", other.title()),
            }
        }
    }

    #[test]
    fn test_initial_state() {
        let f = fixture("initial", ["a.png", "b.png", "c.png"]);
        assert_eq!(f.controller.state(), SelectionState::Idle);
        assert!(matches!(f.controller.detail(), DetailContent::Prompt(p) if p == super::super::PROMPT));
        for colors in f.panel_colors() {
            assert_eq!(colors, MarkerColors::Uniform(BASE));
        }
    }

    #[test]
    fn test_end_to_end_selection() {
        let mut f = fixture("end_to_end", ["a.png", "b.png", "c.png"]);

        f.click(1);
        assert_eq!(f.controller.state(), SelectionState::Selected(1));
        for colors in f.panel_colors() {
            assert_eq!(colors, MarkerColors::PerPoint(vec![BASE, ACCENT, BASE]));
        }
        assert!(matches!(f.controller.detail(), DetailContent::Loading { title } if title == "b"));
        assert!(f.controller.is_loading());
        f.resolve();
        assert!(!f.controller.is_loading());
        assert_eq!(f.shown_image(), ("b".to_string(), [2, 1]));

        f.click(2);
        for colors in f.panel_colors() {
            assert_eq!(colors, MarkerColors::PerPoint(vec![BASE, BASE, ACCENT]));
        }
        f.resolve();
        assert_eq!(f.shown_image(), ("c".to_string(), [3, 1]));
    }

    #[test]
    fn test_reclick_is_idempotent() {
        let mut f = fixture("reclick", ["a.png", "b.png", "c.png"]);
        f.click(1);
        f.resolve();
        let colors_once = f.panel_colors();
        let shown_once = f.shown_image();

        f.click(1);
        f.resolve();
        assert_eq!(f.controller.state(), SelectionState::Selected(1));
        assert_eq!(f.panel_colors(), colors_once);
        assert_eq!(f.shown_image(), shown_once);
    }

    #[test]
    fn test_single_highlight_after_any_clicks() {
        let mut f = fixture("single_highlight", ["a.png", "b.png", "c.png"]);
        for index in [0, 2, 2, 1, 0, 1] {
            f.click(index);
            for panel in f.plotter.panels() {
                let accented: Vec<_> = (0..panel.len())
                    .filter(|i| panel.point(*i).unwrap().color == ACCENT)
                    .collect();
                assert_eq!(accented, vec![index]);
                assert!((0..panel.len())
                    .filter(|i| *i != index)
                    .all(|i| panel.point(i).unwrap().color == BASE));
            }
        }
    }

    #[test]
    fn test_click_after_colors_were_reset_to_single_color() {
        let mut f = fixture("normalize", ["a.png", "b.png", "c.png"]);
        f.click(0);
        f.plotter.reset_colors(BASE);
        assert_eq!(f.panel_colors()[0], MarkerColors::Uniform(BASE));

        f.click(2);
        for colors in f.panel_colors() {
            assert_eq!(colors, MarkerColors::PerPoint(vec![BASE, BASE, ACCENT]));
        }
    }

    #[test]
    fn test_stale_reply_is_discarded() {
        let mut f = fixture("stale_pending", ["a.png", "b.png", "c.png"]);
        // Both requests are queued before the backend runs.
        f.click(0);
        f.click(2);
        f.resolve();
        assert_eq!(f.shown_image(), ("c".to_string(), [3, 1]));
    }

    #[test]
    fn test_stale_reply_already_sent_is_discarded() {
        let mut f = fixture("stale_sent", ["a.png", "b.png", "c.png"]);
        f.click(0);
        // The reply for a.png is computed but not yet received ...
        f.backend.update();
        // ... when c.png is selected.
        f.click(2);
        f.resolve();
        assert_eq!(f.shown_image(), ("c".to_string(), [3, 1]));
        assert!(!f.controller.try_update());
        assert_eq!(f.shown_image(), ("c".to_string(), [3, 1]));
    }

    #[test]
    fn test_lost_reply_ends_loading() {
        let Fixture {
            mut controller,
            mut plotter,
            backend,
        } = fixture("lost_reply", ["a.png", "b.png", "c.png"]);
        let click = plotter.click(1).unwrap();
        controller.handle_click(&click, &mut plotter).unwrap();
        assert!(controller.is_loading());
        // the queued request goes down with the backend
        drop(backend);

        assert!(controller.try_update());
        assert!(!controller.is_loading());
        match controller.detail() {
            DetailContent::Unavailable { title, message } => {
                assert_eq!(title, "b");
                assert!(message.starts_with("Image unavailable"), "{message}");
            }
            other => panic!("expected an error message, found {:?}", other.title()),
        }
        assert_eq!(controller.state(), SelectionState::Selected(1));
        assert_eq!(plotter.panels()[0].point(1).unwrap().color, ACCENT);
    }

    #[test]
    fn test_absolute_label_is_not_loaded() {
        let mut f = fixture("absolute_label", ["a.png", "/etc/hostname", "c.png"]);
        f.click(1);
        f.resolve();
        match f.controller.detail() {
            DetailContent::Unavailable { message, .. } => {
                assert!(message.contains("outside the image folder"), "{message}");
            }
            other => panic!("expected an error message, found {:?}", other.title()),
        }
        assert_eq!(f.controller.state(), SelectionState::Selected(1));
    }

    #[test]
    fn test_missing_image_keeps_highlight() {
        let mut f = fixture("missing", ["a.png", "missing.png", "c.png"]);
        f.click(1);
        f.resolve();
        for colors in f.panel_colors() {
            assert_eq!(colors, MarkerColors::PerPoint(vec![BASE, ACCENT, BASE]));
        }
        match f.controller.detail() {
            DetailContent::Unavailable { title, message } => {
                assert_eq!(title, "missing");
                assert!(message.starts_with("Image unavailable"), "{message}");
            }
            other => panic!("expected an error message, found {:?}", other.title()),
        }
        assert_eq!(f.controller.state(), SelectionState::Selected(1));
    }

    #[test]
    fn test_click_out_of_range_is_rejected() {
        let mut f = fixture("out_of_range", ["a.png", "b.png", "c.png"]);
        f.click(0);
        let res = f
            .controller
            .handle_click(&PointClick::new(7, "x.png".into()), &mut f.plotter);
        assert!(res.is_err());
        assert_eq!(f.controller.state(), SelectionState::Selected(0));
        assert_eq!(
            f.panel_colors()[1],
            MarkerColors::PerPoint(vec![ACCENT, BASE, BASE])
        );
    }

    #[test]
    fn test_backend_gone_shows_error() {
        let Fixture {
            mut controller,
            mut plotter,
            backend,
        } = fixture("backend_gone", ["a.png", "b.png", "c.png"]);
        drop(backend);

        let click = plotter.click(2).unwrap();
        controller.handle_click(&click, &mut plotter).unwrap();
        assert!(matches!(controller.detail(), DetailContent::Unavailable { .. }));
        assert_eq!(plotter.panels()[0].point(2).unwrap().color, ACCENT);
    }

    #[test]
    fn test_palette_change_recolors() {
        let mut f = fixture("palette", ["a.png", "b.png", "c.png"]);
        let palette = Palette {
            base: Color32::GRAY,
            accent: Color32::YELLOW,
        };
        f.controller.set_palette(palette, &mut f.plotter).unwrap();
        assert_eq!(f.panel_colors()[0], MarkerColors::Uniform(Color32::GRAY));

        f.click(0);
        f.controller.set_palette(Palette::default(), &mut f.plotter).unwrap();
        assert_eq!(
            f.panel_colors()[2],
            MarkerColors::PerPoint(vec![ACCENT, BASE, BASE])
        );
    }
}
