// src/config/options.rs
use std::path::{Path, PathBuf};

use crate::distance::TieBreak;
use crate::snapshot::Door;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub source: Source,
    pub output: OutputOptions,
    pub tie_break: TieBreak,
}

/// Where the board comes from. Every request re-reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Saved page(s); each file (and each `srcdoc` frame inside) is one context.
    Html(Vec<PathBuf>),
    /// Element dump taken in a live browser.
    Dump(PathBuf),
    /// Snapshot JSON produced elsewhere; skips extraction.
    Snapshot(PathBuf),
}

impl Default for Source {
    fn default() -> Self { Source::Html(Vec::new()) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceKind {
    #[default]
    Html,
    Dump,
    Snapshot,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Html, SourceKind::Dump, SourceKind::Snapshot];

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Html => "HTML page",
            SourceKind::Dump => "Element dump",
            SourceKind::Snapshot => "Snapshot JSON",
        }
    }

    /// Build a source from GUI text. HTML accepts several paths separated by `;`.
    pub fn source_from(self, text: &str) -> Source {
        let t = text.trim();
        match self {
            SourceKind::Html => Source::Html(
                t.split(';')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect(),
            ),
            SourceKind::Dump => Source::Dump(PathBuf::from(t)),
            SourceKind::Snapshot => Source::Snapshot(PathBuf::from(t)),
        }
    }
}

impl Source {
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Html(_) => SourceKind::Html,
            Source::Dump(_) => SourceKind::Dump,
            Source::Snapshot(_) => SourceKind::Snapshot,
        }
    }

    pub fn paths(&self) -> Vec<&Path> {
        match self {
            Source::Html(v) => v.iter().map(PathBuf::as_path).collect(),
            Source::Dump(p) | Source::Snapshot(p) => vec![p.as_path()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths().iter().all(|p| p.as_os_str().is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Print the report as JSON instead of text.
    pub json: bool,
    /// Persist the snapshot that was used.
    pub save_snapshot: Option<PathBuf>,
    /// Write extraction diagnostics of the first context.
    pub diagnose: Option<PathBuf>,
}

/// `"LAB,noc-fes"` → `[Lab, NocFes]`. Unknown labels are an error.
pub fn parse_priority(text: &str) -> Result<TieBreak, String> {
    let mut doors = Vec::new();
    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let door = Door::from_label(part).ok_or_else(|| format!("unknown door label: {}", part))?;
        if !doors.contains(&door) {
            doors.push(door);
        }
    }
    if doors.is_empty() {
        Ok(TieBreak::DoorOrder)
    } else {
        Ok(TieBreak::Priority(doors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_source_splits_paths() {
        let src = SourceKind::Html.source_from(" a.html ; ;b.html ");
        assert_eq!(src, Source::Html(vec![PathBuf::from("a.html"), PathBuf::from("b.html")]));
        assert_eq!(src.kind(), SourceKind::Html);
        assert!(!src.is_empty());
        assert!(SourceKind::Dump.source_from("  ").is_empty());
    }

    #[test]
    fn priority_parsing() {
        assert_eq!(parse_priority(""), Ok(TieBreak::DoorOrder));
        assert_eq!(
            parse_priority("noc-fes, LAB,lab"),
            Ok(TieBreak::Priority(vec![Door::NocFes, Door::Lab]))
        );
        assert!(parse_priority("LAB,XYZ").is_err());
    }
}
