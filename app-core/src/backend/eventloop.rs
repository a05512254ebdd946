use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info, warn};

use crate::backend::{BackendLink, BackendRequest, BackendState, LinkReceiver, RequestSender};

const BACKEND_THREAD_NAME: &str = "backend";
const STOP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct BackendEventLoop<S>
where
    S: BackendState,
{
    pub state: S,
    request_rx: Receiver<Box<dyn BackendRequest<S>>>,
    should_stop: bool,
}

impl<S: BackendState + Send + 'static> BackendEventLoop<S> {
    pub fn new(request_rx: Receiver<Box<dyn BackendRequest<S>>>, state: S) -> Self {
        info!("creating new event loop");
        Self {
            state,
            request_rx,
            should_stop: false,
        }
    }

    /// Moves the loop onto its own thread, where it waits for requests
    /// until it is asked to stop or every sender is gone.
    pub fn run(mut self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name(BACKEND_THREAD_NAME.into())
            .spawn(move || {
                while !self.wait_and_update() {}
                info!("stopping backend event loop");
            })
    }

    /// Runs every request that is currently queued, without waiting for
    /// new ones. Returns whether the loop was asked to stop.
    pub fn update(&mut self) -> bool {
        while !self.should_stop {
            match self.request_rx.try_recv() {
                Ok(request) => self.handle(request),
                Err(_) => break,
            }
        }
        self.should_stop
    }

    /// Waits for the next request, then drains the queue. A closed channel
    /// stops the loop as well.
    pub fn wait_and_update(&mut self) -> bool {
        match self.request_rx.recv() {
            Ok(request) => {
                self.handle(request);
                self.update()
            }
            Err(_) => {
                warn!("all request senders dropped");
                true
            }
        }
    }

    pub fn signal_stop(&mut self) -> bool {
        self.should_stop = true;
        true
    }

    fn handle(&mut self, request: Box<dyn BackendRequest<S>>) {
        debug!("handling request '{}'", request.describe());
        request.run_on_backend(self);
    }
}

/// Asks the backend loop to stop and waits for its thread to end.
pub fn request_stop<S: BackendState + Send + 'static>(
    request_tx: &RequestSender<S>,
    backend_thread_handle: JoinHandle<()>,
) {
    let (rx, stop_link) = BackendLink::new("stop event loop", |b: &mut BackendEventLoop<S>| {
        b.signal_stop()
    });
    info!("sending signal to end backend event loop");
    if request_tx.send(Box::new(stop_link)).is_ok() {
        if let Err(e) = rx.recv_timeout(STOP_TIMEOUT) {
            warn!("did not receive a response after {STOP_TIMEOUT:?}: {e}");
        };
    };
    match backend_thread_handle.join() {
        Ok(_) => info!("backend event loop ended"),
        Err(e) => warn!("failed to signal event loop to stop: {e:?}"),
    }
}
