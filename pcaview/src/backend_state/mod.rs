mod image_store;

use std::path::{Path, PathBuf};

use app_core::backend::BackendState;

pub use image_store::{display_title, image_path_for, LoadedImage};

use crate::error::ImageResolutionError;

/// State owned by the backend thread: where the images live.
#[derive(Debug)]
pub struct BackendAppState {
    image_root: PathBuf,
}

impl BackendState for BackendAppState {}

impl BackendAppState {
    pub fn new(image_root: PathBuf) -> Self {
        log::info!("image store root is {:?}", image_root);
        Self { image_root }
    }

    pub fn set_image_root(&mut self, image_root: &Path) {
        log::info!("changing image store root to {:?}", image_root);
        self.image_root = image_root.to_owned();
    }

    pub fn get_image_root(&self) -> PathBuf {
        self.image_root.clone()
    }

    /// Reads and decodes the image stored under `label`. Nothing is cached.
    pub fn load_image(&self, label: &str) -> Result<LoadedImage, ImageResolutionError> {
        LoadedImage::from_path(&image_path_for(&self.image_root, label)?)
    }
}
