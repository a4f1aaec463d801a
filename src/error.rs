// src/error.rs
use std::path::PathBuf;

use thiserror::Error;

use crate::chapa::{CensoKey, Chapa};
use crate::snapshot::Door;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The user's own chapa did not normalize.
    #[error("invalid chapa: {0:?}")]
    InvalidInput(String),

    /// Missing door label(s) or an empty roster. No partial snapshot escapes.
    #[error("{}", incomplete_message(.missing_doors, .roster_len))]
    ExtractionIncomplete { missing_doors: Vec<Door>, roster_len: usize },

    #[error("user chapa {chapa} (censo {key}) is not in the current roster")]
    UserNotFound { chapa: Chapa, key: CensoKey },

    /// No rendering context passed the roster-page check.
    #[error("no context looks like the chapero: {0}")]
    NotARoster(String),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("a calculation is already running; retry later")]
    Busy,

    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

fn incomplete_message(missing: &[Door], roster_len: &usize) -> String {
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|d| d.label()).collect();
        format!("could not read doors: {}", labels.join(", "))
    } else if *roster_len == 0 {
        s!("could not read any chapa from the board")
    } else {
        format!("incomplete extraction ({} chapas)", roster_len)
    }
}
