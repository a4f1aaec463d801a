// src/core/html.rs
// Tolerant, std-only HTML tree scanner for captured pages.
// Not a conforming parser: it knows void elements, raw-text elements,
// comments, and the handful of implied end tags that table-heavy pages rely on.

use super::sanitize::decode_entities;

pub const ROOT: usize = 0;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];
const RAW_TEXT_TAGS: &[&str] = &["script", "style", "textarea", "title", "noscript", "template"];

#[derive(Clone, Debug)]
pub enum NodeKind {
    Element { tag: String, attrs: Vec<(String, String)> },
    Text(String),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

/// Arena of nodes; index 0 is a synthetic `#root` element.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn node(&self, i: usize) -> &Node { &self.nodes[i] }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.len() <= 1 }

    pub fn tag(&self, i: usize) -> Option<&str> {
        match &self.nodes[i].kind {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Attribute lookup; names are stored lower-cased.
    pub fn attr(&self, i: usize, name: &str) -> Option<&str> {
        match &self.nodes[i].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            NodeKind::Text(_) => None,
        }
    }

    /// Parent element, skipping the synthetic root.
    pub fn parent_element(&self, i: usize) -> Option<usize> {
        self.nodes[i].parent.filter(|&p| p != ROOT)
    }

    pub fn element_children(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[i]
            .children
            .iter()
            .copied()
            .filter(|&c| matches!(self.nodes[c].kind, NodeKind::Element { .. }))
    }

    /// Element indices in document order (root excluded).
    pub fn elements(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.nodes.len()).filter(|&i| matches!(self.nodes[i].kind, NodeKind::Element { .. }))
    }

    /// Concatenated descendant text (like DOM `textContent`).
    pub fn text_content(&self, i: usize) -> String {
        let mut out = String::new();
        self.collect_text(i, &mut out);
        out
    }

    fn collect_text(&self, i: usize, out: &mut String) {
        match &self.nodes[i].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { .. } => {
                for &c in &self.nodes[i].children {
                    self.collect_text(c, out);
                }
            }
        }
    }

    fn push(&mut self, kind: NodeKind, parent: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node { kind, parent: Some(parent), children: Vec::new() });
        self.nodes[parent].children.push(id);
        id
    }
}

/// Parse a whole document. Never fails; garbage in yields a shallow tree.
pub fn parse(html: &str) -> Tree {
    let mut tree = Tree {
        nodes: vec![Node {
            kind: NodeKind::Element { tag: s!("#root"), attrs: Vec::new() },
            parent: None,
            children: Vec::new(),
        }],
    };
    // open-element stack of (node id, tag)
    let mut stack: Vec<(usize, String)> = vec![(ROOT, s!("#root"))];
    let b = html.as_bytes();
    let n = b.len();
    let mut i = 0usize;
    let mut text_start = 0usize;

    macro_rules! flush_text {
        ($end:expr) => {
            if $end > text_start {
                let raw = &html[text_start..$end];
                let top = stack.last().map(|(id, _)| *id).unwrap_or(ROOT);
                tree.push(NodeKind::Text(decode_entities(raw)), top);
            }
        };
    }

    while i < n {
        if b[i] != b'<' {
            i += 1;
            continue;
        }
        let rest = &html[i..];

        // <!-- comment -->
        if rest.starts_with("<!--") {
            flush_text!(i);
            i = rest.find("-->").map(|e| i + e + 3).unwrap_or(n);
            text_start = i;
            continue;
        }
        // <!DOCTYPE ...>, <?xml ...>
        if rest.starts_with("<!") || rest.starts_with("<?") {
            flush_text!(i);
            i = rest.find('>').map(|e| i + e + 1).unwrap_or(n);
            text_start = i;
            continue;
        }
        // </tag>
        if rest.starts_with("</") {
            flush_text!(i);
            let close = rest.find('>').map(|e| i + e).unwrap_or(n);
            let name = html[i + 2..close].trim().to_ascii_lowercase();
            if let Some(pos) = stack.iter().rposition(|(_, t)| *t == name) {
                if pos > 0 {
                    stack.truncate(pos);
                }
            }
            i = (close + 1).min(n);
            text_start = i;
            continue;
        }
        // <tag ...>
        if rest.len() > 1 && rest.as_bytes()[1].is_ascii_alphabetic() {
            flush_text!(i);
            let (tag, attrs, self_closing, end) = read_open_tag(html, i);
            auto_close(&mut stack, &tag);
            let parent = stack.last().map(|(id, _)| *id).unwrap_or(ROOT);
            let id = tree.push(NodeKind::Element { tag: tag.clone(), attrs }, parent);
            i = end;

            if RAW_TEXT_TAGS.contains(&tag.as_str()) {
                // keep raw content as a single text child; never parse into it
                let close = format!("</{}", tag);
                let body_end = find_ci(&html[i..], &close).map(|e| i + e).unwrap_or(n);
                if body_end > i {
                    tree.push(NodeKind::Text(decode_entities(&html[i..body_end])), id);
                }
                i = html[body_end..].find('>').map(|e| body_end + e + 1).unwrap_or(n);
            } else if !self_closing && !VOID_TAGS.contains(&tag.as_str()) {
                stack.push((id, tag));
            }
            text_start = i;
            continue;
        }
        // stray '<' is text
        i += 1;
    }
    flush_text!(n);
    tree
}

/// Implied end tags for tables, lists and paragraphs.
fn auto_close(stack: &mut Vec<(usize, String)>, opening: &str) {
    let closes: &[&str] = match opening {
        "tr" => &["td", "th", "tr"],
        "td" | "th" => &["td", "th"],
        "li" => &["li"],
        "p" => &["p"],
        "option" => &["option"],
        _ => return,
    };
    // never pop past the enclosing table/list
    let fence: &[&str] = &["table", "ul", "ol", "select", "#root"];
    while let Some((_, top)) = stack.last() {
        if fence.contains(&top.as_str()) || !closes.contains(&top.as_str()) {
            break;
        }
        stack.pop();
    }
}

fn read_open_tag(html: &str, start: usize) -> (String, Vec<(String, String)>, bool, usize) {
    let b = html.as_bytes();
    let n = b.len();
    let mut i = start + 1;
    while i < n && !(b[i].is_ascii_whitespace() || b[i] == b'>' || b[i] == b'/') {
        i += 1;
    }
    let tag = html[start + 1..i].to_ascii_lowercase();
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        while i < n && b[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= n {
            break;
        }
        match b[i] {
            b'>' => {
                i += 1;
                break;
            }
            b'/' => {
                self_closing = html[i + 1..].trim_start().starts_with('>');
                i += 1;
                continue;
            }
            _ => {}
        }
        let name_start = i;
        while i < n && !(b[i].is_ascii_whitespace() || b[i] == b'=' || b[i] == b'>' || b[i] == b'/') {
            i += 1;
        }
        let name = html[name_start..i].to_ascii_lowercase();
        while i < n && b[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < n && (b[i] == b'"' || b[i] == b'\'') {
                let q = b[i];
                let v_start = i + 1;
                i = v_start;
                while i < n && b[i] != q {
                    i += 1;
                }
                value = decode_entities(&html[v_start..i]);
                i = (i + 1).min(n);
            } else {
                let v_start = i;
                while i < n && !(b[i].is_ascii_whitespace() || b[i] == b'>') {
                    i += 1;
                }
                value = decode_entities(&html[v_start..i]);
            }
        }
        if !name.is_empty() {
            attrs.push((name, value));
        } else if i == name_start {
            // lone '=': skip it so the loop always advances
            i += 1;
        }
    }
    (tag, attrs, self_closing, i)
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let nd = needle.as_bytes();
    if nd.is_empty() || h.len() < nd.len() {
        return None;
    }
    (0..=h.len() - nd.len()).find(|&i| h[i..i + nd.len()].eq_ignore_ascii_case(nd))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(tree: &Tree) -> Vec<String> {
        tree.elements().filter_map(|i| tree.tag(i).map(String::from)).collect()
    }

    #[test]
    fn builds_nested_elements_with_attrs() {
        let t = parse(r#"<div class="a b" id=x><span style='color:red'>12&amp;3</span></div>"#);
        assert_eq!(tags(&t), vec!["div", "span"]);
        let span = t.elements().nth(1).unwrap();
        assert_eq!(t.attr(span, "style"), Some("color:red"));
        assert_eq!(t.text_content(span), "12&3");
        let div = t.parent_element(span).unwrap();
        assert_eq!(t.attr(div, "class"), Some("a b"));
        assert_eq!(t.attr(div, "id"), Some("x"));
        assert_eq!(t.parent_element(div), None);
    }

    #[test]
    fn implied_cell_and_row_ends() {
        let t = parse("<table><tr><td>1<td>2<tr><td>3</table>");
        let table = t.elements().next().unwrap();
        let rows: Vec<usize> = t.element_children(table).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(t.element_children(rows[0]).count(), 2);
        assert_eq!(t.text_content(rows[1]), "3");
    }

    #[test]
    fn skips_comments_and_keeps_script_opaque() {
        let t = parse("<p>a<!-- <b>no</b> --><script>if (a<b) {}</script>c</p>");
        assert_eq!(tags(&t), vec!["p", "script"]);
        let p = t.elements().next().unwrap();
        assert!(t.text_content(p).starts_with('a'));
        assert!(t.text_content(p).ends_with('c'));
    }

    #[test]
    fn void_and_self_closing_do_not_nest() {
        let t = parse("<div>a<br>b<img src=x.png/><i/>c</div>");
        let div = t.elements().next().unwrap();
        assert_eq!(t.element_children(div).count(), 3);
        assert_eq!(t.text_content(div), "abc");
    }

    #[test]
    fn stray_closers_are_ignored() {
        let t = parse("<div></span>x</div><p>y</p>");
        assert_eq!(tags(&t), vec!["div", "p"]);
        let p = t.elements().nth(1).unwrap();
        assert_eq!(t.parent_element(p), None);
    }
}
