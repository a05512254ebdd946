use std::path::{Path, PathBuf};

use app_core::storage::Storage;
use serde::{Deserialize, Serialize};

use crate::EguiApp;

use super::components::Palette;

// The image root lives on the backend but is mirrored in the frontend
// (app.image_root), so it is read from there when saving.
#[derive(Clone, Serialize, Deserialize)]
struct BackendStorage {
    image_root: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct FrontendStorage {
    palette: Palette,
    marker_radius: f32,
    plot_height: f32,
    image_height: f32,
}

pub fn save_json(app: &EguiApp, path: Option<&Path>) -> Result<(), String> {
    let backend_storage = BackendStorage {
        image_root: app.image_root.value().clone(),
    };
    let frontend_storage = FrontendStorage {
        palette: app.selection.palette(),
        marker_radius: app.plotter.marker_radius,
        plot_height: app.plotter.plot_height,
        image_height: app.config.image_height,
    };
    let storage = Storage::new(backend_storage, frontend_storage);
    storage.save_json(path)
}

/// Restores the view settings. The selection itself is not stored, the
/// current one is kept and recolored with the loaded palette.
pub fn load_json(app: &mut EguiApp, path: Option<&Path>) -> Result<(), String> {
    let Storage::<BackendStorage, FrontendStorage> {
        backend_storage,
        frontend_storage,
    } = Storage::load_json(path)?;

    app.plotter.marker_radius = frontend_storage.marker_radius;
    app.plotter.plot_height = frontend_storage.plot_height;
    app.config.image_height = frontend_storage.image_height;
    app.selection
        .set_palette(frontend_storage.palette, &mut app.plotter)?;
    app.set_image_root(&backend_storage.image_root)?;
    app.request_redraw();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;

    use app_core::backend::BackendEventLoop;
    use egui::Color32;

    use super::*;
    use crate::{
        app::{
            components::{MarkerColors, PanelSpec, Plotter, SelectionState},
            config::Config,
        },
        dataset::Dataset,
        BackendAppState,
    };

    #[test]
    fn test_save_and_load_view_settings() {
        let _ = env_logger::builder().is_test(true).try_init();
        let dataset = Dataset::from(vec![
            (0.0, 0.0, 0.0, "a.png"),
            (1.0, 1.0, 1.0, "b.png"),
        ]);
        let config = Config::default();
        let plotter =
            Plotter::render(&dataset, &PanelSpec::default_set(), config.palette.base).unwrap();
        let (request_tx, request_rx) = channel();
        let mut eventloop =
            BackendEventLoop::new(request_rx, BackendAppState::new(config.image_root.clone()));
        let mut app = EguiApp::from_parts(config, plotter, request_tx, None);

        let path = std::env::temp_dir().join(format!(
            "pcaview_view_settings_{}.json",
            std::process::id()
        ));
        app.plotter.marker_radius = 7.5;
        app.config.image_height = 250.0;
        save_json(&app, Some(&path)).unwrap();

        let click = app.plotter.click(1).unwrap();
        app.selection.handle_click(&click, &mut app.plotter).unwrap();
        app.plotter.marker_radius = 2.0;
        app.config.image_height = 600.0;
        app.selection
            .set_palette(
                Palette {
                    base: Color32::GRAY,
                    accent: Color32::GREEN,
                },
                &mut app.plotter,
            )
            .unwrap();

        load_json(&mut app, Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(app.plotter.marker_radius, 7.5);
        assert_eq!(app.config.image_height, 250.0);
        assert_eq!(app.selection.palette(), Palette::default());
        // the selection survives and is drawn with the restored palette
        assert_eq!(app.selection.state(), SelectionState::Selected(1));
        assert_eq!(
            app.plotter.panels()[0].colors(),
            &MarkerColors::PerPoint(vec![Color32::BLUE, Color32::RED])
        );

        // the image root round trips through the backend
        eventloop.update();
        assert!(app.image_root.try_update());
        assert_eq!(
            app.image_root.value(),
            &std::path::PathBuf::from("Galena_binary_images")
        );
    }
}
