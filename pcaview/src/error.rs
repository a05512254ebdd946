//! Error types of the viewer.
//!
//! Loading the dataset and building the panels happen once at startup and
//! are fatal. Resolving an image happens on every selection and only
//! degrades the detail panel.

use std::path::PathBuf;

use thiserror::Error;

/// The dataset could not be turned into records.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("could not read dataset {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed dataset {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        source: turbo_csv::ParseError,
    },

    #[error("dataset {path:?} has no column named '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("dataset {path:?}, line {line}: value '{value}' of column '{column}' is not a number")]
    InvalidNumber {
        path: PathBuf,
        line: usize,
        column: String,
        value: String,
    },

    #[error("dataset {path:?} contains no rows")]
    Empty { path: PathBuf },
}

/// The panel layout does not fit the dataset.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no panels configured")]
    NoPanels,

    #[error("panel {panel} refers to component {component}, but only {available} components exist")]
    ComponentOutOfRange {
        panel: usize,
        component: usize,
        available: usize,
    },
}

/// The image for a label could not be shown.
#[derive(Error, Debug)]
pub enum ImageResolutionError {
    #[error("label '{label}' points outside the image folder {root:?}")]
    OutsideRoot { label: String, root: PathBuf },

    #[error("no image found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("could not read image {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode image {path:?}: {source}")]
    Undecodable {
        path: PathBuf,
        source: image::ImageError,
    },
}
