pub(crate) mod components;
pub mod config;
mod events;
pub mod storage;

use self::components::{Plotter, SelectionController};
use crate::app::events::EventQueue;
use crate::BackendAppState;
use app_core::{
    backend::{BackendEventLoop, BackendLink, RequestSender},
    frontend::UIParameter,
};
use config::Config;
use events::{ImageRootRequested, PointClicked, SaveLoadRequested};
use storage::{load_json, save_json};

use std::{
    path::{Path, PathBuf},
    thread::JoinHandle,
    time::Duration,
};

pub type DynRequestSender = RequestSender<BackendAppState>;

// Polling interval for image replies while the frame would otherwise idle.
const LOADING_REPAINT_INTERVAL: Duration = Duration::from_millis(30);

pub struct EguiApp {
    config: Config,
    backend_thread_handle: Option<JoinHandle<()>>,
    plotter: Plotter,
    selection: SelectionController,
    image_root: UIParameter<PathBuf>,
    request_tx: DynRequestSender,
    shortcuts_modal_open: bool,
    ui_selection: UISelection,
    event_queue: EventQueue<Self>,
    request_redraw: Option<()>,
}

#[derive(Debug, PartialEq, Eq)]
enum UISelection {
    Plot,
    Preferences,
}

impl UISelection {
    fn next(&self) -> Self {
        match self {
            UISelection::Plot => Self::Preferences,
            UISelection::Preferences => Self::Plot,
        }
    }
}

impl EguiApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: Config,
        plotter: Plotter,
        request_tx: DynRequestSender,
        backend_thread_handle: JoinHandle<()>,
    ) -> Self {
        Self::from_parts(config, plotter, request_tx, Some(backend_thread_handle))
    }

    /// Builds the app without a window, the backend may be driven by hand.
    pub fn from_parts(
        config: Config,
        plotter: Plotter,
        request_tx: DynRequestSender,
        backend_thread_handle: Option<JoinHandle<()>>,
    ) -> Self {
        let selection = SelectionController::new(config.palette, request_tx.clone());
        Self {
            image_root: UIParameter::new(config.image_root.clone()),
            config,
            backend_thread_handle,
            plotter,
            selection,
            request_tx,
            shortcuts_modal_open: false,
            ui_selection: UISelection::Plot,
            event_queue: EventQueue::<Self>::new(),
            request_redraw: None,
        }
    }

    /// Points the backend at another image folder. The frontend copy is
    /// updated once the backend confirms.
    pub fn set_image_root(&mut self, path: &Path) -> Result<(), String> {
        let path = path.to_owned();
        BackendLink::request_parameter_update(
            &mut self.image_root,
            "set image root",
            move |b: &mut BackendEventLoop<BackendAppState>| {
                b.state.set_image_root(&path);
                b.state.get_image_root()
            },
            &self.request_tx,
        )
    }

    fn update_state(&mut self) {
        self.run_events();
        if self.selection.try_update() | self.image_root.try_update() {
            self.request_redraw();
        }
    }

    pub fn request_redraw(&mut self) {
        self.request_redraw = Some(());
    }

    fn queue_save_load_dialog(&mut self, should_save: bool) {
        log::debug!(
            "open dialog to select {} path",
            if should_save { "save" } else { "load" }
        );
        let handle = std::thread::spawn(move || {
            let dialog = rfd::FileDialog::new().add_filter("view settings", &["json"]);
            if should_save {
                dialog.set_file_name("pcaview_settings.json").save_file()
            } else {
                dialog.pick_file()
            }
        });
        let event = SaveLoadRequested::new(should_save, Some(handle));
        self.event_queue.queue_event(Box::new(event));
    }

    fn quick_save(&self) {
        if let Err(error) = save_json(self, None) {
            log::error!("{}", error)
        };
    }

    fn quick_load(&mut self) {
        if let Err(error) = load_json(self, None) {
            log::error!("{}", error)
        };
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.request_redraw.take().is_some() {
            ctx.request_repaint();
        }

        self.update_state();

        if self.selection.is_loading() || !self.image_root.is_up_to_date() {
            ctx.request_repaint_after(LOADING_REPAINT_INTERVAL);
        }

        let mut should_quit = false;

        // Handle keyboard input.
        ctx.input(|i| {
            // Help window.
            if i.key_pressed(egui::Key::F1) {
                self.shortcuts_modal_open = !self.shortcuts_modal_open;
            }
            // Circle main window view.
            if i.key_pressed(egui::Key::F3) {
                self.ui_selection = self.ui_selection.next();
            }
            // Quick load view settings.
            if i.key_pressed(egui::Key::F5) {
                self.quick_load();
            }
            // Quick save view settings.
            if i.key_pressed(egui::Key::F6) {
                self.quick_save();
            }
            // Close app.
            if i.key_pressed(egui::Key::F10) {
                should_quit = true;
            }
            // Open preferences.
            if i.key_pressed(egui::Key::F12) {
                self.ui_selection = UISelection::Preferences;
            }
            if i.key_pressed(egui::Key::S) && i.modifiers.ctrl {
                self.queue_save_load_dialog(true);
            }
            if i.key_pressed(egui::Key::L) && i.modifiers.ctrl {
                self.queue_save_load_dialog(false);
            }
        });

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            self.render_shortcut_modal(ctx);
            self.menu(ui, ctx);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.ui_selection {
                UISelection::Plot => self.plot_view(ui),
                UISelection::Preferences => self.preferences(ui),
            });
        });

        if should_quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Some(handle) = self.backend_thread_handle.take() {
            app_core::backend::request_stop(&self.request_tx, handle);
        }
    }
}

impl EguiApp {
    fn plot_view(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new(&self.config.title).strong());
        });
        ui.add_space(8.0);

        let event_queue = &mut self.event_queue;
        self.plotter.ui(ui, |click| {
            event_queue.queue_event(Box::new(PointClicked::new(click)));
        });

        ui.separator();
        ui.columns(2, |columns| {
            columns[0].label(&self.config.description);
            self.selection
                .detail_ui(&mut columns[1], self.config.image_height);
        });
    }

    fn preferences(&mut self, ui: &mut egui::Ui) {
        ui.heading("Preferences");
        ui.separator();

        let mut palette = self.selection.palette();
        let mut palette_changed = false;
        let mut pick_image_root = false;

        egui::Grid::new("preferences")
            .num_columns(2)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                ui.label("Point color");
                palette_changed |= ui.color_edit_button_srgba(&mut palette.base).changed();
                ui.end_row();

                ui.label("Selection color");
                palette_changed |= ui.color_edit_button_srgba(&mut palette.accent).changed();
                ui.end_row();

                ui.label("Marker radius");
                ui.add(egui::Slider::new(&mut self.plotter.marker_radius, 1.0..=15.0));
                ui.end_row();

                ui.label("Plot height");
                ui.add(egui::Slider::new(&mut self.plotter.plot_height, 150.0..=900.0));
                ui.end_row();

                ui.label("Image height");
                ui.add(egui::Slider::new(&mut self.config.image_height, 100.0..=1200.0));
                ui.end_row();

                ui.label("Image folder");
                ui.horizontal(|ui| {
                    ui.label(self.image_root.value().display().to_string());
                    if !self.image_root.is_up_to_date() {
                        ui.spinner();
                    }
                    pick_image_root = ui.button("Change…").clicked();
                });
                ui.end_row();
            });

        if palette_changed {
            if let Err(err) = self.selection.set_palette(palette, &mut self.plotter) {
                log::error!("could not apply colors: {}", err);
            }
        }

        if pick_image_root {
            log::debug!("open dialog to select image folder");
            let start = self.image_root.value().clone();
            let handle =
                std::thread::spawn(move || rfd::FileDialog::new().set_directory(start).pick_folder());
            let event = ImageRootRequested::new(Some(handle));
            self.event_queue.queue_event(Box::new(event));
        }
    }

    fn menu(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Save Settings").clicked() {
                    self.queue_save_load_dialog(true);
                }
                if ui.button("Load Settings").clicked() {
                    self.queue_save_load_dialog(false);
                }
                if ui.button("Quick Save").clicked() {
                    self.quick_save();
                }
                if ui.button("Quick Load").clicked() {
                    self.quick_load();
                }
                if ui.button("Preferences").clicked() {
                    self.ui_selection = UISelection::Preferences
                };
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            // Selection of ui view.
            ui.menu_button("View", |ui| {
                ui.selectable_value(&mut self.ui_selection, UISelection::Plot, "Plot");
                ui.selectable_value(
                    &mut self.ui_selection,
                    UISelection::Preferences,
                    "Preferences",
                );
            });

            ui.toggle_value(&mut self.shortcuts_modal_open, "Help (F1)");

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                egui::widgets::global_theme_preference_buttons(ui);
                ui.separator();
                let selected = match self.selection.detail().title() {
                    Some(title) => format!("selected: {title}"),
                    None => "nothing selected".to_string(),
                };
                ui.label(format!("{} points | {}", self.plotter.point_count(), selected));
            });
        });
    }

    fn render_shortcut_modal(&mut self, ctx: &egui::Context) {
        if self.shortcuts_modal_open
            && egui::Modal::new("shortcut_modal".into())
                .show(ctx, |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();
                    ui.label("CTRL + S = Save View Settings");
                    ui.separator();
                    ui.label("CTRL + L = Load View Settings");
                    ui.separator();
                    ui.label("F1 = Show Keyboard Shortcuts");
                    ui.separator();
                    ui.label("F3 = Cycle View");
                    ui.separator();
                    ui.label("F5 = Quick Load View Settings");
                    ui.separator();
                    ui.label("F6 = Quick Save View Settings");
                    ui.separator();
                    ui.label("F10 = Quit App");
                    ui.separator();
                    ui.label("F12 = Open Preferences");
                    ui.separator();
                })
                .should_close()
        {
            self.shortcuts_modal_open = false;
        };
    }
}
