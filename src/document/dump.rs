// src/document/dump.rs
// Element dump captured in a live browser (computed styles + bounding boxes).
//
// {
//   "url": "https://…/InformeEspecialidadesChapSinE.asp",
//   "text": "<document.body.innerText>",
//   "elements": [
//     { "tag": "SPAN", "text": "2683", "childTexts": [], "width": 22, "height": 22,
//       "className": "", "color": "rgb(51, 51, 51)", "backgroundColor": "rgba(0, 0, 0, 0)",
//       "backgroundImage": "none", "borderRadius": "50%",
//       "parent": { "tag": "TD", "className": "c", "color": "…", "backgroundColor": "…",
//                   "backgroundImage": "none", "borderRadius": "0px" } }
//   ]
// }

use serde::Deserialize;

use crate::core::css;
use crate::error::{Error, Result};

use super::{ElementView, ParentView, RenderedDocument, Size, StyleView};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DumpStyle {
    color: String,
    background_color: String,
    background_image: String,
    border_radius: String,
}

impl DumpStyle {
    fn view(&self) -> StyleView {
        StyleView {
            color: css::parse_color(&self.color),
            background: css::parse_color(&self.background_color),
            background_image: css::is_background_image(&self.background_image),
            radius: css::parse_radius(&self.border_radius),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DumpParent {
    tag: String,
    class_name: String,
    #[serde(flatten)]
    style: DumpStyle,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DumpElement {
    tag: String,
    text: String,
    child_texts: Vec<String>,
    width: Option<f32>,
    height: Option<f32>,
    class_name: String,
    #[serde(flatten)]
    style: DumpStyle,
    parent: Option<DumpParent>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
struct DumpFile {
    url: Option<String>,
    text: String,
    elements: Vec<DumpElement>,
}

pub struct DumpDocument {
    label: String,
    dump: DumpFile,
}

impl DumpDocument {
    pub fn from_json(label: impl Into<String>, text: &str) -> Result<Self> {
        let dump: DumpFile = serde_json::from_str(text)?;
        if dump.text.trim().is_empty() && dump.elements.is_empty() {
            return Err(Error::InvalidSnapshot(s!("element dump has neither text nor elements")));
        }
        let label = match &dump.url {
            Some(u) if !u.is_empty() => u.clone(),
            _ => label.into(),
        };
        logd!("Dump: {} elements={} text_len={}", label, dump.elements.len(), dump.text.len());
        Ok(Self { label, dump })
    }
}

impl RenderedDocument for DumpDocument {
    fn label(&self) -> String { self.label.clone() }

    fn visible_text(&self) -> String { self.dump.text.clone() }

    fn elements(&self) -> Vec<ElementView> {
        self.dump
            .elements
            .iter()
            .map(|e| ElementView {
                tag: e.tag.to_ascii_lowercase(),
                text: s!(e.text.trim()),
                child_texts: e.child_texts.iter().map(|t| s!(t.trim())).collect(),
                size: match (e.width, e.height) {
                    (Some(width), Some(height)) => Some(Size { width, height }),
                    _ => None,
                },
                class_name: e.class_name.clone(),
                style: e.style.view(),
                parent: e.parent.as_ref().map(|p| ParentView {
                    tag: p.tag.to_ascii_lowercase(),
                    class_name: p.class_name.clone(),
                    style: p.style.view(),
                }),
            })
            .collect()
    }
}
