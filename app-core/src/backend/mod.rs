//! The backend side of the app: a single thread that owns the backend
//! state and runs requests sent by the frontend, one after the other.

mod backend_link;
mod eventloop;

use std::sync::mpsc::Sender;

pub use self::{
    backend_link::{BackendLink, BackendRequest, LinkReceiver},
    eventloop::{request_stop, BackendEventLoop},
};

/// Marks the state owned by a [`BackendEventLoop`].
pub trait BackendState {}

/// Frontend handle for sending requests to the backend of state `S`.
pub type RequestSender<S> = Sender<Box<dyn BackendRequest<S>>>;
