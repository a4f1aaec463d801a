// src/scrape/classify.rs
//! "No contratado" detection for one rendered element.
//!
//! The board marks vacant slots with a small round badge and, only
//! sometimes, a semantic class name. The decision is a fixed-precedence
//! cascade of named rules; the first rule with an opinion decides:
//!
//! 1. `class-no-contratado`: class blob looks like `nco` / `no-contrat` → yes
//! 2. `class-other-status`: class blob names another status (doble,
//!    antigüedad, excepción, contratado) → no
//! 3. `badge-visual`: badge-sized, rounded, and gray / dark / image-backed → yes/no
//!
//! Each rule is a plain `fn` so it can be exercised on its own.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::config::consts::{
    BADGE_MAX_SIZE, BADGE_MIN_RADIUS, BADGE_MIN_SIZE, DARK_CHANNEL_MAX, GRAY_TOLERANCE,
};
use crate::document::{ElementView, Radius, Rgb, Size, StyleView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    NoContratado,
    Contratado,
    Undecided,
}

/// Everything the rules look at, borrowed from one element.
pub struct Signals<'a> {
    pub text: &'a str,
    pub size: Option<Size>,
    pub style: &'a StyleView,
    pub parent: Option<&'a StyleView>,
    pub class_blob: String,
}

impl<'a> Signals<'a> {
    pub fn from_element(el: &'a ElementView) -> Self {
        Self {
            text: &el.text,
            size: el.size,
            style: &el.style,
            parent: el.parent.as_ref().map(|p| &p.style),
            class_blob: el.class_blob(),
        }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub eval: fn(&Signals) -> Verdict,
}

pub static RULES: &[Rule] = &[
    Rule { name: "class-no-contratado", eval: class_no_contratado },
    Rule { name: "class-other-status", eval: class_other_status },
    Rule { name: "badge-visual", eval: badge_visual },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub no_contratado: bool,
    /// Name of the deciding rule, `"default"` if none decided.
    pub rule: &'static str,
}

pub fn classify(sig: &Signals) -> Classification {
    for rule in RULES {
        match (rule.eval)(sig) {
            Verdict::NoContratado => return Classification { no_contratado: true, rule: rule.name },
            Verdict::Contratado => return Classification { no_contratado: false, rule: rule.name },
            Verdict::Undecided => {}
        }
    }
    Classification { no_contratado: false, rule: "default" }
}

pub fn is_no_contratado(el: &ElementView) -> bool {
    classify(&Signals::from_element(el)).no_contratado
}

/* ---------------- rules ---------------- */

fn no_contratado_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"nco|nocontrat|no.?contrat").expect("static regex"))
}

fn other_status_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"dob|ant|exc|con(?-u:\b)|contrat").expect("static regex"))
}

pub fn class_no_contratado(sig: &Signals) -> Verdict {
    if no_contratado_re().is_match(&sig.class_blob) {
        Verdict::NoContratado
    } else {
        Verdict::Undecided
    }
}

pub fn class_other_status(sig: &Signals) -> Verdict {
    if other_status_re().is_match(&sig.class_blob) {
        Verdict::Contratado
    } else {
        Verdict::Undecided
    }
}

pub fn badge_visual(sig: &Signals) -> Verdict {
    let parent = sig.parent;

    let badge_sized = sig.size.is_some_and(|s| {
        (BADGE_MIN_SIZE..=BADGE_MAX_SIZE).contains(&s.width)
            && (BADGE_MIN_SIZE..=BADGE_MAX_SIZE).contains(&s.height)
    });
    let rounded = is_rounded(sig.style.radius) || parent.is_some_and(|p| is_rounded(p.radius));

    let image = sig.style.background_image || parent.is_some_and(|p| p.background_image);
    let gray = is_gray(sig.style.color)
        || is_gray(sig.style.background)
        || is_gray(parent.and_then(|p| p.background));
    let dark = sig.style.color.is_some_and(is_dark);

    if badge_sized && rounded && (image || gray || dark) {
        Verdict::NoContratado
    } else {
        Verdict::Contratado
    }
}

fn is_rounded(r: Radius) -> bool {
    match r {
        Radius::Percent(_) => true,
        Radius::Length(v) => v > BADGE_MIN_RADIUS,
        Radius::None => false,
    }
}

fn is_gray(c: Option<Rgb>) -> bool {
    c.is_some_and(|c| c.spread() <= GRAY_TOLERANCE)
}

fn is_dark(c: Rgb) -> bool {
    c.r < DARK_CHANNEL_MAX && c.g < DARK_CHANNEL_MAX && c.b < DARK_CHANNEL_MAX
}
