use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::Arc,
};

use crate::error::ImageResolutionError;

/// Location of the image for `label`. The label is used verbatim as a
/// file name below `root`; no extension is added. Labels that would leave
/// `root` (absolute paths, drive prefixes, `..`) are rejected.
pub fn image_path_for(root: &Path, label: &str) -> Result<PathBuf, ImageResolutionError> {
    let escapes = Path::new(label).components().any(|component| {
        matches!(
            component,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        return Err(ImageResolutionError::OutsideRoot {
            label: label.to_owned(),
            root: root.to_owned(),
        });
    }
    Ok(root.join(label))
}

/// Title shown under an image: the label without its last extension.
pub fn display_title(label: &str) -> &str {
    label
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(label)
}

/// Raw bytes of an image file together with the decoded pixels.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub bytes: Arc<[u8]>,
    pub pixels: Arc<egui::ColorImage>,
}

impl LoadedImage {
    pub fn from_path(path: &Path) -> Result<Self, ImageResolutionError> {
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => ImageResolutionError::NotFound {
                path: path.to_owned(),
            },
            _ => ImageResolutionError::Unreadable {
                path: path.to_owned(),
                source,
            },
        })?;
        let decoded =
            image::load_from_memory(&bytes).map_err(|source| ImageResolutionError::Undecodable {
                path: path.to_owned(),
                source,
            })?;
        let rgba = decoded.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let pixels = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        log::debug!("loaded image {:?} ({}x{})", path, size[0], size[1]);
        Ok(Self {
            bytes: bytes.into(),
            pixels: Arc::new(pixels),
        })
    }

    /// Size of the image file, e.g. `12.5 KiB`.
    pub fn file_size_label(&self) -> String {
        const KIB: usize = 1024;
        const MIB: usize = 1024 * KIB;
        let len = self.bytes.len();
        if len < KIB {
            format!("{len} B")
        } else if len < MIB {
            format!("{:.1} KiB", len as f64 / KIB as f64)
        } else {
            format!("{:.1} MiB", len as f64 / MIB as f64)
        }
    }
}
