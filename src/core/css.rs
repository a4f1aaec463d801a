// src/core/css.rs
// Just enough CSS value parsing for the badge heuristic: colors, radii, lengths.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Channel spread (max - min). Low spread reads as gray.
    pub fn spread(&self) -> u8 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        max - min
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub enum Radius {
    #[default]
    None,
    Percent(f32),
    Length(f32),
}

const NAMED: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("silver", Rgb::new(192, 192, 192)),
    ("lightgray", Rgb::new(211, 211, 211)),
    ("lightgrey", Rgb::new(211, 211, 211)),
    ("darkgray", Rgb::new(169, 169, 169)),
    ("darkgrey", Rgb::new(169, 169, 169)),
    ("dimgray", Rgb::new(105, 105, 105)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("navy", Rgb::new(0, 0, 128)),
];

/// `rgb(..)`/`rgba(..)` (alpha ignored), `#rgb`, `#rrggbb`, or a basic named color.
/// `transparent`, `inherit` and anything unrecognized give `None`.
pub fn parse_color(value: &str) -> Option<Rgb> {
    let v = value.trim().to_ascii_lowercase();
    if let Some(rest) = v.strip_prefix("rgba(").or_else(|| v.strip_prefix("rgb(")) {
        let mut chans = rest
            .trim_end_matches(')')
            .split(|c: char| c == ',' || c.is_whitespace() || c == '/')
            .filter(|p| !p.is_empty())
            .map(|p| p.parse::<f32>().ok().map(|f| f.clamp(0.0, 255.0) as u8));
        let r = chans.next()??;
        let g = chans.next()??;
        let b = chans.next()??;
        return Some(Rgb::new(r, g, b));
    }
    if let Some(hex) = v.strip_prefix('#') {
        return parse_hex(hex);
    }
    NAMED.iter().find(|(n, _)| *n == v).map(|(_, c)| *c)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let chan = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 | 4 => {
            let b = hex.as_bytes();
            let dbl = |i: usize| chan(&format!("{0}{0}", b[i] as char));
            Some(Rgb::new(dbl(0)?, dbl(1)?, dbl(2)?))
        }
        6 | 8 => Some(Rgb::new(chan(&hex[0..2])?, chan(&hex[2..4])?, chan(&hex[4..6])?)),
        _ => None,
    }
}

/// First color found in a `background` shorthand.
pub fn color_in_shorthand(value: &str) -> Option<Rgb> {
    if let Some(c) = parse_color(value) {
        return Some(c);
    }
    let lower = value.to_ascii_lowercase();
    if let Some(start) = lower.find("rgb") {
        let end = lower[start..].find(')').map(|e| start + e + 1).unwrap_or(lower.len());
        return parse_color(&lower[start..end]);
    }
    lower.split_whitespace().find_map(parse_color)
}

/// Leading number of a length (`12px`, `12`, `12.5pt` → 12.x).
pub fn parse_length(value: &str) -> Option<f32> {
    let v = value.trim();
    let end = v
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .map(|(i, _)| i)
        .unwrap_or(v.len());
    v[..end].parse::<f32>().ok()
}

/// Any `%` makes it a percentage radius; otherwise the leading length.
pub fn parse_radius(value: &str) -> Radius {
    let v = value.trim();
    if v.is_empty() {
        return Radius::None;
    }
    if v.contains('%') {
        return Radius::Percent(parse_length(v).unwrap_or(0.0));
    }
    parse_length(v).map(Radius::Length).unwrap_or(Radius::None)
}

pub fn is_background_image(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && !v.eq_ignore_ascii_case("none")
}

/// Split an inline `style` attribute into lower-cased `(property, value)` pairs.
pub fn declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (k, v) = decl.split_once(':')?;
            let k = k.trim().to_ascii_lowercase();
            let v = v.trim().trim_end_matches("!important").trim();
            if k.is_empty() { None } else { Some((k, s!(v))) }
        })
        .collect()
}
