// src/config/state.rs
use super::options::{AppOptions, SourceKind};

#[derive(Clone, Debug)]
pub struct GuiState {
    /// Raw text of the chapa field
    pub chapa_input: String,
    /// Raw text of the source path field
    pub source_input: String,
    pub source_kind: SourceKind,
    /// Comma-separated door labels; empty = door order
    pub priority_input: String,

    pub window_w: u32,
    pub window_h: u32,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            chapa_input: s!(),
            source_input: s!(),
            source_kind: SourceKind::default(),
            priority_input: s!(),
            window_w: 760,
            window_h: 520,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
