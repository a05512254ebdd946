use app_core::string_error::ErrorStringExt;
use egui::Color32;
use std::{
    io::Read,
    path::{Path, PathBuf},
};

use crate::{
    app::components::{Palette, PanelSpec, DEFAULT_MARKER_RADIUS, DEFAULT_PLOT_HEIGHT},
    dataset::{default_data_path, ColumnNames, COMPONENTS},
};

const CONFIG_FILE_NAME: &str = ".pcaview";

const DEFAULT_TITLE: &str = "Interactive PCA plot showing result obtained with galena grain \
                             images for the three principal components.";
const DEFAULT_DESCRIPTION: &str = "Each point is one grain image, placed by its first three \
                                   principal components. Click on a point in any panel to \
                                   highlight it in all panels and show its image.";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub image_root: PathBuf,
    pub columns: ColumnNames,
    pub panels: Vec<PanelSpec>,
    pub palette: Palette,
    pub marker_radius: f32,
    pub plot_height: f32,
    pub image_height: f32,
    pub title: String,
    pub description: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            image_root: PathBuf::from("Galena_binary_images"),
            columns: ColumnNames::default(),
            panels: PanelSpec::default_set(),
            palette: Palette::default(),
            marker_radius: DEFAULT_MARKER_RADIUS,
            plot_height: DEFAULT_PLOT_HEIGHT,
            image_height: 400.0,
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl Config {
    /// Loads `path`, or `~/.pcaview` if no path is given.
    pub fn from_config_file(path: Option<&Path>) -> Result<Self, String> {
        let path = match path {
            Some(path) => path.to_owned(),
            None => {
                #[allow(deprecated)]
                let Some(home) = std::env::home_dir() else {
                    return Err("could not determine home directory to load config file".into());
                };
                home.join(CONFIG_FILE_NAME)
            }
        };
        let config_raw = {
            let mut file =
                std::fs::File::open(&path).err_to_string("could not open config file")?;
            let mut buf = String::new();
            file.read_to_string(&mut buf)
                .err_to_string("could not load config file")?;
            buf
        };
        log::info!("loaded config file {:?}", path);
        Ok(Self::parse(&config_raw))
    }

    /// Reads `key=value` lines on top of the defaults. Values that cannot be
    /// parsed are reported and ignored.
    pub fn parse(config_raw: &str) -> Self {
        let mut config = Self::default();
        for line in config_raw.lines() {
            let line = line.trim();
            // Lines starting with "#" are considered comments.
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                log::warn!("ignoring config line without '=': {}", line);
                continue;
            };
            let (key, val) = (key.trim(), val.trim());
            match key {
                "data_path" => config.data_path = PathBuf::from(val),
                "image_root" => config.image_root = PathBuf::from(val),
                "component_columns" => {
                    let names: Vec<_> = val.split(',').map(|name| name.trim().to_string()).collect();
                    match <[String; COMPONENTS]>::try_from(names) {
                        Ok(names) => config.columns.components = names,
                        Err(_) => log::warn!(
                            "'component_columns' needs exactly {} column names",
                            COMPONENTS
                        ),
                    }
                }
                "label_column" => config.columns.label = val.to_string(),
                "panels" => match parse_panels(val) {
                    Some(panels) => config.panels = panels,
                    None => log::warn!("could not parse 'panels' (expected e.g. '1-2, 2-3')"),
                },
                "base_color" => match parse_color(val) {
                    Some(color) => config.palette.base = color,
                    None => log::warn!("could not parse 'base_color' as color"),
                },
                "accent_color" => match parse_color(val) {
                    Some(color) => config.palette.accent = color,
                    None => log::warn!("could not parse 'accent_color' as color"),
                },
                "marker_radius" => parse_size(val, "marker_radius", &mut config.marker_radius),
                "plot_height" => parse_size(val, "plot_height", &mut config.plot_height),
                "image_height" => parse_size(val, "image_height", &mut config.image_height),
                "title" => config.title = val.to_string(),
                "description" => config.description = val.to_string(),
                _ => log::warn!("unknown config key '{}'", key),
            }
        }
        config
    }
}

fn parse_size(val: &str, key: &str, target: &mut f32) {
    match val.parse::<f32>() {
        Ok(size) if size > 0.0 => *target = size,
        _ => log::warn!("could not parse '{}' as positive number", key),
    }
}

/// Parses panel specs like `1-2, 2-3, 1-3` (1-based component numbers).
/// Whether the components exist is checked when the panels are built.
pub fn parse_panels(val: &str) -> Option<Vec<PanelSpec>> {
    val.split(',')
        .map(|pair| {
            let (x, y) = pair.trim().split_once('-')?;
            let x = x.trim().parse::<usize>().ok()?.checked_sub(1)?;
            let y = y.trim().parse::<usize>().ok()?.checked_sub(1)?;
            Some(PanelSpec::new(x, y))
        })
        .collect()
}

/// Parses `#rrggbb` or one of a few color names.
pub fn parse_color(val: &str) -> Option<Color32> {
    if let Some(hex) = val.strip_prefix('#') {
        return Color32::from_hex(&format!("#{hex}")).ok();
    }
    let color = match val.to_lowercase().as_str() {
        "blue" => Color32::BLUE,
        "red" => Color32::RED,
        "green" => Color32::GREEN,
        "black" => Color32::BLACK,
        "gray" | "grey" => Color32::GRAY,
        "orange" => Color32::ORANGE,
        "yellow" => Color32::YELLOW,
        "white" => Color32::WHITE,
        _ => return None,
    };
    Some(color)
}
