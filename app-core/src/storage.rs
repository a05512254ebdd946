//! This module defines the `Storage` type which collects frontend and backend
//! state information and provides methods to store/load them to/from a JSON
//! file.

use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use std::path::{Path, PathBuf};

use super::string_error::ErrorStringExt;

const STORAGE_FILE: &str = "./.pcaview_settings.json";

#[derive(Serialize, Deserialize)]
pub struct Storage<B, F> {
    pub backend_storage: B,
    pub frontend_storage: F,
}

impl<F, B> Storage<B, F>
where
    for<'a> B: Serialize + Deserialize<'a>,
    for<'a> F: Serialize + Deserialize<'a>,
{
    pub fn new(backend_storage: B, frontend_storage: F) -> Self {
        Self {
            backend_storage,
            frontend_storage,
        }
    }

    pub fn save_json(&self, input_path: Option<&Path>) -> Result<(), String> {
        let output_path = storage_path(input_path);
        let file =
            std::fs::File::create(&output_path).err_to_string("could not open storage file")?;
        to_writer_pretty(file, &self).err_to_string("could not save app state to json")?;
        log::debug!("saved app state to file {:?}", output_path.canonicalize());
        Ok(())
    }

    pub fn load_json(input_path: Option<&Path>) -> Result<Storage<B, F>, String> {
        let input_path = storage_path(input_path);
        let file = std::fs::File::open(&input_path).err_to_string("could not open storage file")?;
        let storage =
            from_reader(file).err_to_string("could not load app state from storage file")?;
        log::debug!("loaded app state from file {:?}", input_path);
        Ok(storage)
    }
}

fn storage_path(input_path: Option<&Path>) -> PathBuf {
    input_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(STORAGE_FILE))
}
