use std::{path::PathBuf, thread::JoinHandle};

use derive_new::new;

use crate::app::{
    components::PointClick,
    storage::{load_json, save_json},
};

use super::EguiApp;
use app_core::event::{AppEvent, EventState};

// ---------------------------------------------------------------------------
//
//
// EventQueue
//
//
// ---------------------------------------------------------------------------

/// The EventQueue stores events that are processed each iteration
/// of the application GUI event loop.
pub struct EventQueue<A> {
    /// Stores events for later processing.
    queue: Vec<Box<dyn AppEvent<App = A>>>,
    /// Temporarily stores events that have not yet finished running.
    tmp_backlog: Vec<Box<dyn AppEvent<App = A>>>,
}

impl<A> EventQueue<A> {
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            tmp_backlog: Vec::new(),
        }
    }

    pub fn queue_event(&mut self, event: Box<dyn AppEvent<App = A>>) {
        self.queue.push(event);
    }
}

impl<A> Default for EventQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl EguiApp {
    pub fn run_events(&mut self) {
        // Events are applied in the order they were queued, each one to
        // completion, so clicks are handled in the order they happened.
        let events = std::mem::take(&mut self.event_queue.queue);
        for mut event in events {
            match event.apply(self) {
                Ok(EventState::Finished) => {
                    self.request_redraw();
                }
                Ok(EventState::Busy) => {
                    // Add busy event to the backlog.
                    self.event_queue.tmp_backlog.push(event);
                }
                Err(err) => {
                    log::error!("event failed: {}", err)
                }
            }
        }

        // Busy events go first next time, followed by anything queued while
        // the events above ran.
        let mut backlog = std::mem::take(&mut self.event_queue.tmp_backlog);
        backlog.append(&mut self.event_queue.queue);
        self.event_queue.queue = backlog;
    }
}

// ---------------------------------------------------------------------------
//
//
// Events
//
//
// ---------------------------------------------------------------------------

/// A point was clicked in one of the panels.
#[derive(new)]
pub struct PointClicked {
    click: PointClick,
}

/// The user picked a new image folder.
#[derive(new)]
pub struct ImageRootRequested {
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

/// Handles both, saving and loading the view settings, depending on whether
/// `should_save` is true or false.
#[derive(new)]
pub struct SaveLoadRequested {
    should_save: bool,
    thread_handle: Option<JoinHandle<Option<PathBuf>>>,
}

// ---------------------------------------------------------------------------
//
//
// apply()
//
//
// ---------------------------------------------------------------------------

impl AppEvent for PointClicked {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        app.selection.handle_click(&self.click, &mut app.plotter)?;
        Ok(EventState::Finished)
    }
}

impl AppEvent for ImageRootRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(path)) => app.set_image_root(&path)?,
                Ok(None) => (),
                Err(err) => log::error!("Unable to set new image folder: {:?}", err),
            }
            Ok(EventState::Finished)
        } else {
            Ok(EventState::Busy)
        }
    }
}

impl AppEvent for SaveLoadRequested {
    type App = EguiApp;

    fn apply(&mut self, app: &mut Self::App) -> Result<EventState, String> {
        if let Some(handle) = self.thread_handle.take_if(|handle| handle.is_finished()) {
            match handle.join() {
                Ok(Some(path)) => {
                    if self.should_save {
                        if let Err(err) = save_json(app, Some(path.as_ref())) {
                            log::error!("error while trying to save to {:?}: {:?}", &path, err)
                        };
                    } else if let Err(err) = load_json(app, Some(path.as_ref())) {
                        log::error!("error while trying to load from {:?}: {:?}", &path, err)
                    };
                }
                Ok(None) => (),
                Err(err) => {
                    let msg = if self.should_save { "save" } else { "load" };
                    log::error!("Unable to {} file: {:?}", msg, err)
                }
            };
            Ok(EventState::Finished)
        } else {
            Ok(EventState::Busy)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{channel, Receiver};

    use app_core::backend::BackendRequest;

    use super::*;
    use crate::{
        app::{
            components::{PanelSpec, Plotter, SelectionState},
            config::Config,
        },
        dataset::Dataset,
        BackendAppState,
    };

    struct Busy {
        remaining: usize,
    }

    impl AppEvent for Busy {
        type App = EguiApp;

        fn apply(&mut self, _app: &mut Self::App) -> Result<EventState, String> {
            if self.remaining == 0 {
                return Ok(EventState::Finished);
            }
            self.remaining -= 1;
            Ok(EventState::Busy)
        }
    }

    fn app() -> (
        EguiApp,
        Receiver<Box<dyn BackendRequest<BackendAppState>>>,
    ) {
        let _ = env_logger::builder().is_test(true).try_init();
        let dataset = Dataset::from(vec![
            (0.0, 0.0, 0.0, "a.png"),
            (1.0, 1.0, 1.0, "b.png"),
            (2.0, 2.0, 2.0, "c.png"),
        ]);
        let config = Config::default();
        let plotter =
            Plotter::render(&dataset, &PanelSpec::default_set(), config.palette.base).unwrap();
        let (request_tx, request_rx) = channel();
        (EguiApp::from_parts(config, plotter, request_tx, None), request_rx)
    }

    #[test]
    fn test_clicks_are_applied_in_order() {
        let (mut app, request_rx) = app();
        for index in [0, 2] {
            let click = app.plotter.click(index).unwrap();
            app.event_queue
                .queue_event(Box::new(PointClicked::new(click)));
        }
        app.run_events();

        assert_eq!(app.selection.state(), SelectionState::Selected(2));
        // one image request per click
        assert_eq!(request_rx.try_iter().count(), 2);
        assert!(app.event_queue.queue.is_empty());
    }

    #[test]
    fn test_failed_event_does_not_stop_queue() {
        let (mut app, _request_rx) = app();
        app.event_queue.queue_event(Box::new(PointClicked::new(PointClick::new(
            9,
            "nope.png".into(),
        ))));
        let click = app.plotter.click(1).unwrap();
        app.event_queue
            .queue_event(Box::new(PointClicked::new(click)));
        app.run_events();

        assert_eq!(app.selection.state(), SelectionState::Selected(1));
    }

    #[test]
    fn test_busy_events_are_kept() {
        let (mut app, _request_rx) = app();
        app.event_queue.queue_event(Box::new(Busy { remaining: 1 }));
        app.run_events();
        assert_eq!(app.event_queue.queue.len(), 1);
        app.run_events();
        assert!(app.event_queue.queue.is_empty());
    }
}
