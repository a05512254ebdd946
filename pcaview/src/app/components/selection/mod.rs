mod logic;
mod ui;

use app_core::frontend::UIParameter;
use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::{app::DynRequestSender, backend_state::LoadedImage};

pub const PROMPT: &str = "Click on a point to see the image";

/// Owns the one piece of selection state and keeps the panel colors and
/// the detail panel in line with it.
pub struct SelectionController {
    state: SelectionState,
    palette: Palette,
    detail: UIParameter<DetailContent>,
    /// Texture of the image currently in `detail`, created on first draw.
    texture: Option<egui::TextureHandle>,
    request_tx: DynRequestSender,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Selected(usize),
}

/// Base color for unselected points, accent color for the selected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub base: Color32,
    pub accent: Color32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Color32::BLUE,
            accent: Color32::RED,
        }
    }
}

/// What the detail panel shows.
#[derive(Debug, Clone)]
pub enum DetailContent {
    Prompt(String),
    Loading { title: String },
    Image { title: String, image: LoadedImage },
    Unavailable { title: String, message: String },
}

impl DetailContent {
    pub fn title(&self) -> Option<&str> {
        match self {
            DetailContent::Prompt(_) => None,
            DetailContent::Loading { title }
            | DetailContent::Image { title, .. }
            | DetailContent::Unavailable { title, .. } => Some(title),
        }
    }
}

impl SelectionState {
    pub fn highlighted(&self) -> Option<usize> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Selected(idx) => Some(*idx),
        }
    }
}

impl SelectionController {
    pub fn new(palette: Palette, request_tx: DynRequestSender) -> Self {
        Self {
            state: SelectionState::Idle,
            palette,
            detail: UIParameter::new(DetailContent::Prompt(PROMPT.to_owned())),
            texture: None,
            request_tx,
        }
    }
}
