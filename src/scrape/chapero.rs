// src/scrape/chapero.rs
//! Snapshot extraction from the "chapero por especialidades" board.
//!
//! Ground truth is split across two views of the same page:
//! - **order** comes from the visible text: dense rows (≥ 10 three-to-five
//!   digit tokens) are the roster matrix, read row by row, left to right;
//! - **status** comes from the rendered elements: every element whose text
//!   is a bare 3–5 digit number is classified, and a number counts as
//!   "no contratado" if any of its renderings says so.
//!
//! Door references are read from the text (`LAB 2636`, `NOC-FES 1803`, …).
//!
//! Nothing here caches: the board changes between calls.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::chapa;
use crate::config::consts::{
    CANDIDATE_TAGS, DENSE_ROW_MIN_TOKENS, DIAG_MIN_SIZE, DIAG_SAMPLE, MIN_CANDIDATE_SIZE,
    TOKEN_MAX_DIGITS, TOKEN_MIN_DIGITS,
};
use crate::document::{ElementView, RenderedDocument, Rgb};
use crate::error::{Error, Result};
use crate::snapshot::{Door, DoorMap, Roster, RosterEntry, Snapshot};

use super::classify::{self, Signals};

/// One classified rendering of a roster number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub raw: String,
    pub no_contratado: bool,
}

/// Unvalidated extraction result.
#[derive(Clone, Debug, Default)]
pub struct Scan {
    pub doors: DoorMap,
    pub ordered: Roster,
}

/// Extract and validate a snapshot.
pub fn extract<D: RenderedDocument + ?Sized>(doc: &D) -> Result<Snapshot> {
    validate(scan(doc))
}

/// Run every extraction step, without the completeness check.
pub fn scan<D: RenderedDocument + ?Sized>(doc: &D) -> Scan {
    let label = doc.label();
    let text = doc.visible_text();

    let doors = find_doors(&text);
    logd!("Extract[{}]: doors found={} missing={:?}", label, doors.len(), doors.missing());

    let candidates = collect_candidates(&doc.elements());
    let status = status_map(&candidates);
    let flagged = status.values().filter(|v| **v).count();
    logd!(
        "Extract[{}]: candidates={} distinct={} flagged={}",
        label, candidates.len(), status.len(), flagged
    );

    let tokens = dense_row_tokens(&text);
    let ordered = merge_roster(&tokens, &status);
    logf!(
        "Extract[{}]: roster={} (tokens={}) no_contratadas={}",
        label, ordered.len(), tokens.len(), ordered.no_contratado_count()
    );

    Scan { doors, ordered }
}

/// All four doors and at least one roster entry, or nothing.
pub fn validate(scan: Scan) -> Result<Snapshot> {
    let missing = scan.doors.missing();
    if !missing.is_empty() || scan.ordered.is_empty() {
        return Err(Error::ExtractionIncomplete {
            missing_doors: missing,
            roster_len: scan.ordered.len(),
        });
    }
    Ok(Snapshot::new(scan.doors, scan.ordered))
}

/* ---------------- doors ---------------- */

fn door_re(door: Door) -> &'static Regex {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    let all = RES.get_or_init(|| {
        Door::ALL
            .iter()
            .map(|d| {
                // Label must not be the tail of a longer label ("FES" inside "NOC-FES").
                let pat = format!(r"(?i)(?:^|[^A-Za-z0-9-]){}\s*([0-9]{{3,5}})", regex::escape(d.label()));
                Regex::new(&pat).expect("static regex")
            })
            .collect()
    });
    &all[door.index()]
}

/// First `LABEL <3–5 digits>` per door, normalized.
pub fn find_doors(text: &str) -> DoorMap {
    let mut doors = DoorMap::new();
    for door in Door::ALL {
        let hit = door_re(door)
            .captures(text)
            .and_then(|c| c.get(1))
            .and_then(|m| chapa::normalize(m.as_str()));
        if let Some(c) = hit {
            doors.insert(door, c);
        }
    }
    doors
}

/* ---------------- candidates ---------------- */

fn is_number_token(s: &str) -> bool {
    (TOKEN_MIN_DIGITS..=TOKEN_MAX_DIGITS).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// A wrapper whose child carries the same number is skipped; the child is
/// the one that gets classified.
fn duplicates_a_child(el: &ElementView) -> bool {
    el.child_texts.iter().any(|t| *t == el.text)
}

fn too_small(el: &ElementView, floor: f32) -> bool {
    el.size.is_some_and(|s| s.width < floor || s.height < floor)
}

/// Classify every text-leaf-like element whose text is a bare roster number.
pub fn collect_candidates(elements: &[ElementView]) -> Vec<Candidate> {
    elements
        .iter()
        .filter(|el| CANDIDATE_TAGS.contains(&el.tag.as_str()))
        .filter(|el| is_number_token(&el.text))
        .filter(|el| !duplicates_a_child(el))
        .filter(|el| !too_small(el, MIN_CANDIDATE_SIZE))
        .map(|el| Candidate { raw: el.text.clone(), no_contratado: classify::is_no_contratado(el) })
        .collect()
}

/// raw text → "ever seen as no contratado".
pub fn status_map(candidates: &[Candidate]) -> HashMap<String, bool> {
    let mut map: HashMap<String, bool> = HashMap::new();
    for c in candidates {
        let seen = map.entry(c.raw.clone()).or_insert(false);
        *seen |= c.no_contratado;
    }
    map
}

/* ---------------- order ---------------- */

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?-u:\b)[0-9]{3,5}(?-u:\b)").expect("static regex"))
}

/// Distinct tokens of the dense rows, in reading order.
pub fn dense_row_tokens(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut rows = 0usize;
    for line in text.lines() {
        let tokens: Vec<&str> = token_re().find_iter(line).map(|m| m.as_str()).collect();
        // header/legend lines carry a few numbers; matrix rows carry many
        if tokens.len() < DENSE_ROW_MIN_TOKENS {
            continue;
        }
        rows += 1;
        for tk in tokens {
            if seen.insert(tk) {
                out.push(s!(tk));
            }
        }
    }
    logd!("Extract: dense rows={} distinct tokens={}", rows, out.len());
    out
}

/// Normalize, attach status, OR-merge duplicates.
pub fn merge_roster(tokens: &[String], status: &HashMap<String, bool>) -> Roster {
    Roster::from_entries(tokens.iter().filter_map(|tk| {
        let flag = status.get(tk).copied().unwrap_or(false);
        RosterEntry::new(tk.as_str(), flag)
    }))
}

/* ---------------- diagnostics ---------------- */

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTrace {
    pub text: String,
    pub norm: Option<String>,
    pub tag: String,
    pub class_name: String,
    pub parent_tag: String,
    pub parent_class: String,
    pub color: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub bg_image: bool,
    pub parent_bg: Option<Rgb>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub is_no_contratado: bool,
    pub rule: &'static str,
}

/// Heuristic tuning aid: what the classifier saw and decided.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub label: String,
    pub total: usize,
    /// Style signature → count.
    pub grouped: std::collections::BTreeMap<String, usize>,
    pub sample: Vec<CandidateTrace>,
    pub doors: DoorMap,
    pub dense_tokens: usize,
    pub body_sample: String,
}

/// Looser than extraction on purpose: any tag, 6-unit floor.
pub fn diagnose<D: RenderedDocument + ?Sized>(doc: &D) -> Diagnostics {
    let text = doc.visible_text();
    let fmt_rgb = |c: Option<Rgb>| c.map(|c| format!("rgb({}, {}, {})", c.r, c.g, c.b)).unwrap_or_default();

    let mut grouped = std::collections::BTreeMap::new();
    let mut traces = Vec::new();
    for el in doc.elements() {
        if !is_number_token(&el.text) || too_small(&el, DIAG_MIN_SIZE) {
            continue;
        }
        let verdict = classify::classify(&Signals::from_element(&el));
        let (parent_tag, parent_class, parent_bg) = match &el.parent {
            Some(p) => (p.tag.clone(), p.class_name.clone(), p.style.background),
            None => (s!(), s!(), None),
        };
        let key = [
            el.tag.as_str(),
            el.class_name.as_str(),
            parent_class.as_str(),
            fmt_rgb(el.style.color).as_str(),
            fmt_rgb(el.style.background).as_str(),
            if el.style.background_image { "img" } else { "" },
            fmt_rgb(parent_bg).as_str(),
        ]
        .join("|");
        *grouped.entry(key).or_insert(0usize) += 1;

        traces.push(CandidateTrace {
            norm: chapa::normalize(&el.text).map(|c| s!(c.as_str())),
            text: el.text.clone(),
            tag: el.tag.clone(),
            class_name: el.class_name.clone(),
            parent_tag,
            parent_class,
            color: el.style.color,
            bg: el.style.background,
            bg_image: el.style.background_image,
            parent_bg,
            width: el.size.map(|s| s.width),
            height: el.size.map(|s| s.height),
            is_no_contratado: verdict.no_contratado,
            rule: verdict.rule,
        });
    }

    let total = traces.len();
    traces.truncate(DIAG_SAMPLE);
    Diagnostics {
        label: doc.label(),
        total,
        grouped,
        sample: traces,
        doors: find_doors(&text),
        dense_tokens: dense_row_tokens(&text).len(),
        body_sample: text.chars().take(2000).collect(),
    }
}
