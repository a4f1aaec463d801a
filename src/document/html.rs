// src/document/html.rs

use crate::core::css::{self, Radius, Rgb};
use crate::core::html::{self as html_tree, NodeKind, Tree, ROOT};
use crate::core::sanitize::normalize_ws;

use super::{ElementView, ParentView, RenderedDocument, Size, StyleView};

/// Tags that start and end a line in the visible text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "dd", "div", "dl", "dt", "fieldset",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main",
    "nav", "ol", "p", "pre", "section", "table", "tbody", "tfoot", "thead", "tr", "ul", "caption",
];

/// Never rendered.
const HIDDEN_TAGS: &[&str] = &[
    "head", "script", "style", "title", "noscript", "template", "textarea", "iframe", "object",
];

/// Computed values a browser reports when nothing is declared:
/// initial `color` is black, initial `background-color` is `rgba(0, 0, 0, 0)`.
const INITIAL_COLOR: Rgb = Rgb::new(0, 0, 0);
const INITIAL_BACKGROUND: Rgb = Rgb::new(0, 0, 0);

/// A saved HTML page (or an inline frame's `srcdoc`).
pub struct HtmlDocument {
    label: String,
    tree: Tree,
    // per node: own declarations, resolved once
    styles: Vec<Vec<(String, String)>>,
}

impl HtmlDocument {
    pub fn parse(label: impl Into<String>, html: &str) -> Self {
        let tree = html_tree::parse(html);
        let styles = (0..tree.len()).map(|i| own_declarations(&tree, i)).collect();
        Self { label: label.into(), tree, styles }
    }

    /// This document followed by every `<iframe srcdoc>` inside it (recursively).
    pub fn into_contexts(self) -> Vec<HtmlDocument> {
        let mut out = Vec::new();
        let frames: Vec<(usize, String)> = self
            .tree
            .elements()
            .filter(|&i| self.tree.tag(i) == Some("iframe"))
            .filter_map(|i| self.tree.attr(i, "srcdoc").map(|s| (i, s!(s))))
            .filter(|(_, s)| !s.trim().is_empty())
            .collect();
        let base = self.label.clone();
        out.push(self);
        for (n, (_, srcdoc)) in frames.into_iter().enumerate() {
            let child = HtmlDocument::parse(format!("{}#frame{}", base, n + 1), &srcdoc);
            out.extend(child.into_contexts());
        }
        out
    }

    fn decl(&self, i: usize, prop: &str) -> Option<&str> {
        // last declaration wins, like the cascade within one style attribute
        self.styles[i]
            .iter()
            .rev()
            .find(|(k, _)| k == prop)
            .map(|(_, v)| v.as_str())
    }

    fn is_hidden_here(&self, i: usize) -> bool {
        if let Some(tag) = self.tree.tag(i) {
            if HIDDEN_TAGS.contains(&tag) {
                return true;
            }
        }
        if self.tree.attr(i, "hidden").is_some() {
            return true;
        }
        let display_none = self.decl(i, "display").is_some_and(|v| v.eq_ignore_ascii_case("none"));
        let invisible = self
            .decl(i, "visibility")
            .is_some_and(|v| v.eq_ignore_ascii_case("hidden") || v.eq_ignore_ascii_case("collapse"));
        display_none || invisible
    }

    fn is_hidden(&self, i: usize) -> bool {
        let mut cur = Some(i);
        while let Some(n) = cur {
            if n == ROOT {
                break;
            }
            if self.is_hidden_here(n) {
                return true;
            }
            cur = self.tree.node(n).parent;
        }
        false
    }

    /// `color` inherits; walk up until someone sets it.
    fn color(&self, i: usize) -> Rgb {
        let mut cur = Some(i);
        while let Some(n) = cur {
            if n == ROOT {
                break;
            }
            if let Some(v) = self.decl(n, "color") {
                if let Some(c) = css::parse_color(v) {
                    return c;
                }
            }
            cur = self.tree.node(n).parent;
        }
        INITIAL_COLOR
    }

    fn style(&self, i: usize) -> StyleView {
        let background = self
            .decl(i, "background-color")
            .and_then(css::parse_color)
            .or_else(|| self.decl(i, "background").and_then(css::color_in_shorthand))
            .unwrap_or(INITIAL_BACKGROUND);
        let background_image = self.decl(i, "background-image").is_some_and(css::is_background_image)
            || self.decl(i, "background").is_some_and(|v| v.to_ascii_lowercase().contains("url("));
        let radius = self.decl(i, "border-radius").map(css::parse_radius).unwrap_or(Radius::None);
        StyleView { color: Some(self.color(i)), background: Some(background), background_image, radius }
    }

    fn size(&self, i: usize) -> Option<Size> {
        if self.is_hidden(i) {
            return Some(Size { width: 0.0, height: 0.0 });
        }
        let w = self.decl(i, "width").and_then(css::parse_length)?;
        let h = self.decl(i, "height").and_then(css::parse_length)?;
        Some(Size { width: w, height: h })
    }

    fn class_of(&self, i: usize) -> String {
        s!(self.tree.attr(i, "class").unwrap_or(""))
    }

    fn render_text(&self, i: usize, out: &mut String) {
        let node = self.tree.node(i);
        match &node.kind {
            NodeKind::Text(t) => {
                let collapsed: String = {
                    let mut s = String::with_capacity(t.len());
                    let mut prev_space = false;
                    for ch in t.chars() {
                        if ch.is_whitespace() {
                            if !prev_space { s.push(' '); }
                            prev_space = true;
                        } else {
                            s.push(ch);
                            prev_space = false;
                        }
                    }
                    s
                };
                out.push_str(&collapsed);
            }
            NodeKind::Element { tag, .. } => {
                if i != ROOT && self.is_hidden_here(i) {
                    return;
                }
                let tag = tag.as_str();
                if tag == "br" {
                    out.push('\n');
                    return;
                }
                let block = BLOCK_TAGS.contains(&tag);
                if block {
                    out.push('\n');
                }
                for &c in &node.children {
                    self.render_text(c, out);
                }
                if tag == "td" || tag == "th" {
                    out.push('\t');
                }
                if block {
                    out.push('\n');
                }
            }
        }
    }
}

/// Inline `style` plus the presentational attributes old table layouts use.
fn own_declarations(t: &Tree, i: usize) -> Vec<(String, String)> {
    let mut decls = Vec::new();
    if t.tag(i).is_none() {
        return decls;
    }
    if let Some(bg) = t.attr(i, "bgcolor") {
        decls.push((s!("background-color"), s!(bg)));
    }
    if t.tag(i) == Some("font") {
        if let Some(c) = t.attr(i, "color") {
            decls.push((s!("color"), s!(c)));
        }
    }
    if let Some(bg) = t.attr(i, "background") {
        decls.push((s!("background-image"), format!("url({})", bg)));
    }
    for dim in ["width", "height"] {
        if let Some(v) = t.attr(i, dim) {
            decls.push((s!(dim), s!(v)));
        }
    }
    if let Some(style) = t.attr(i, "style") {
        decls.extend(css::declarations(style));
    }
    decls
}

impl RenderedDocument for HtmlDocument {
    fn label(&self) -> String { self.label.clone() }

    fn visible_text(&self) -> String {
        let mut raw = String::new();
        self.render_text(ROOT, &mut raw);
        // tidy: trim each line, drop blank ones, keep tabs between cells
        raw.lines()
            .map(|l| l.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\u{a0}'))
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn elements(&self) -> Vec<ElementView> {
        self.tree
            .elements()
            .map(|i| {
                let parent = self.tree.parent_element(i).map(|p| ParentView {
                    tag: s!(self.tree.tag(p).unwrap_or("")),
                    class_name: self.class_of(p),
                    style: self.style(p),
                });
                ElementView {
                    tag: s!(self.tree.tag(i).unwrap_or("")),
                    text: normalize_ws(&self.tree.text_content(i)),
                    child_texts: self
                        .tree
                        .element_children(i)
                        .map(|c| normalize_ws(&self.tree.text_content(c)))
                        .collect(),
                    size: self.size(i),
                    class_name: self.class_of(i),
                    style: self.style(i),
                    parent,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(els: &'a [ElementView], text: &str) -> &'a ElementView {
        els.iter().find(|e| e.text == text).unwrap()
    }

    #[test]
    fn visible_text_breaks_rows_and_tabs_cells() {
        let doc = HtmlDocument::parse(
            "t",
            "<div>LAB <b>2636</b></div><table><tr><td>101</td><td>102</td></tr><tr><td>103</td></tr></table>",
        );
        assert_eq!(doc.visible_text(), "LAB 2636\n101\t102\n103");
    }

    #[test]
    fn hidden_content_is_not_visible() {
        let doc = HtmlDocument::parse(
            "t",
            r#"<head><title>9999</title></head><p>a</p><p style="display:none">1234</p><script>5678</script><p>b</p>"#,
        );
        assert_eq!(doc.visible_text(), "a\nb");
        let els = doc.elements();
        let hidden = find(&els, "1234");
        assert_eq!(hidden.size, Some(Size { width: 0.0, height: 0.0 }));
    }

    #[test]
    fn styles_come_from_inline_and_legacy_attrs() {
        let doc = HtmlDocument::parse(
            "t",
            r##"<td bgcolor="#cccccc" class="row"><font color="#333"><span style="width:20px;height:20px;border-radius:50%">2683</span></font></td>"##,
        );
        let els = doc.elements();
        let span = els.iter().find(|e| e.tag == "span").unwrap();
        assert_eq!(span.size, Some(Size { width: 20.0, height: 20.0 }));
        assert_eq!(span.style.radius, Radius::Percent(50.0));
        assert_eq!(span.style.color, Some(Rgb::new(0x33, 0x33, 0x33)));
        assert_eq!(span.style.background, Some(Rgb::new(0, 0, 0)));
        let parent = span.parent.as_ref().unwrap();
        assert_eq!(parent.tag, "font");

        let td = els.iter().find(|e| e.tag == "td").unwrap();
        assert_eq!(td.style.background, Some(Rgb::new(0xcc, 0xcc, 0xcc)));
        assert_eq!(td.class_name, "row");
        assert_eq!(td.child_texts, vec!["2683"]);
        assert_eq!(td.size, None);
    }

    #[test]
    fn unset_colors_read_like_computed_style() {
        let doc = HtmlDocument::parse("t", "<table><tr><td><span>101</span></td></tr></table>");
        let els = doc.elements();
        let span = els.iter().find(|e| e.tag == "span").unwrap();
        assert_eq!(span.style.color, Some(Rgb::new(0, 0, 0)));
        assert_eq!(span.style.background, Some(Rgb::new(0, 0, 0)));
        let parent = span.parent.as_ref().unwrap();
        assert_eq!(parent.style.background, Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn srcdoc_frames_become_contexts() {
        let doc = HtmlDocument::parse(
            "page.html",
            r#"<p>outer</p><iframe srcdoc="&lt;p&gt;inner 1234&lt;/p&gt;"></iframe>"#,
        );
        let ctxs = doc.into_contexts();
        assert_eq!(ctxs.len(), 2);
        assert_eq!(ctxs[0].visible_text(), "outer");
        assert_eq!(ctxs[1].label(), "page.html#frame1");
        assert_eq!(ctxs[1].visible_text(), "inner 1234");
    }
}
