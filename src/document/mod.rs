// src/document/mod.rs
//! # Rendered documents
//!
//! The extractor never touches a browser. It reads a *rendered document*:
//! the page's visible text plus, for every text-bearing element, its
//! trimmed text, rendered size and a few computed style properties (its
//! own and its parent's).
//!
//! Two sources implement [`RenderedDocument`]:
//! - [`HtmlDocument`]: a saved HTML capture; styles come from inline
//!   `style` and legacy presentational attributes.
//! - [`DumpDocument`]: a JSON element dump taken from a live browser,
//!   carrying real computed styles and bounding boxes.
//!
//! Anything else that can answer the same questions (another scraper, a
//! test fixture) plugs in the same way.

use serde::Serialize;

pub use crate::core::css::{Radius, Rgb};

pub mod dump;
pub mod html;

pub use dump::DumpDocument;
pub use html::HtmlDocument;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Computed style subset used by the classifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StyleView {
    pub color: Option<Rgb>,
    pub background: Option<Rgb>,
    pub background_image: bool,
    pub radius: Radius,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ParentView {
    pub tag: String,
    pub class_name: String,
    pub style: StyleView,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ElementView {
    /// Lower-case tag name.
    pub tag: String,
    /// Trimmed text content.
    pub text: String,
    /// Trimmed text content of each direct element child.
    pub child_texts: Vec<String>,
    /// `None` when the source does not know the rendered size.
    pub size: Option<Size>,
    pub class_name: String,
    pub style: StyleView,
    pub parent: Option<ParentView>,
}

impl ElementView {
    /// Lower-cased `"own-class parent-class"`.
    pub fn class_blob(&self) -> String {
        let parent = self.parent.as_ref().map(|p| p.class_name.as_str()).unwrap_or("");
        join!(self.class_name.as_str(), " ", parent).to_lowercase()
    }
}

pub trait RenderedDocument {
    /// Human-readable origin (file path, frame url, …) for logs and errors.
    fn label(&self) -> String;

    /// Visible text with line structure (one line per block/table row).
    fn visible_text(&self) -> String;

    /// Every element in document order.
    fn elements(&self) -> Vec<ElementView>;
}

impl<T: RenderedDocument + ?Sized> RenderedDocument for &T {
    fn label(&self) -> String { (**self).label() }
    fn visible_text(&self) -> String { (**self).visible_text() }
    fn elements(&self) -> Vec<ElementView> { (**self).elements() }
}

impl<T: RenderedDocument + ?Sized> RenderedDocument for Box<T> {
    fn label(&self) -> String { (**self).label() }
    fn visible_text(&self) -> String { (**self).visible_text() }
    fn elements(&self) -> Vec<ElementView> { (**self).elements() }
}
