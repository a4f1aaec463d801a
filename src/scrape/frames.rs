// src/scrape/frames.rs
//! The board is usually framed: the outer page, a menu frame and the
//! roster frame all get scanned. Only one of them is the roster.

use crate::config::consts::{ROSTER_MIN_DOORS, ROSTER_MIN_ENTRIES};
use crate::document::RenderedDocument;
use crate::error::{Error, Result};
use crate::progress::Progress;
use crate::snapshot::Snapshot;

use super::chapero;

/// Stricter than extraction: enough entries and doors to be the real board.
pub fn looks_like_roster(snap: &Snapshot) -> std::result::Result<(), String> {
    let entries = snap.ordered().len();
    let doors = snap.doors().len();
    if entries < ROSTER_MIN_ENTRIES {
        return Err(format!("only {} chapas (need {})", entries, ROSTER_MIN_ENTRIES));
    }
    if doors < ROSTER_MIN_DOORS {
        return Err(format!("only {} doors", doors));
    }
    Ok(())
}

/// Extract every context and keep the biggest roster that passes
/// [`looks_like_roster`]. Ties go to the earlier context.
pub fn pick_authoritative<D: RenderedDocument>(
    docs: &[D],
    mut progress: Option<&mut dyn Progress>,
) -> Result<Snapshot> {
    let mut best: Option<(String, Snapshot)> = None;
    let mut rejected: Vec<String> = Vec::new();

    for doc in docs {
        let label = doc.label();
        let verdict = chapero::extract(doc)
            .map_err(|e| e.to_string())
            .and_then(|snap| looks_like_roster(&snap).map(|_| snap));

        match verdict {
            Ok(snap) => {
                logd!("Frames: {} qualifies with {} chapas", label, snap.ordered().len());
                let better = best
                    .as_ref()
                    .is_none_or(|(_, b)| snap.ordered().len() > b.ordered().len());
                if better {
                    best = Some((label.clone(), snap));
                }
            }
            Err(why) => {
                logd!("Frames: {} rejected: {}", label, why);
                rejected.push(format!("{}: {}", label, why));
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&label);
        }
    }

    match best {
        Some((label, snap)) => {
            logf!("Frames: using {} ({} chapas, {} contexts scanned)", label, snap.ordered().len(), docs.len());
            Ok(snap)
        }
        None if docs.is_empty() => Err(Error::NotARoster(s!("no rendering contexts"))),
        None => Err(Error::NotARoster(rejected.join("; "))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;

    fn board(chapas: std::ops::Range<u32>) -> String {
        let cells: String = chapas.map(|c| format!("<td>{}</td>", c)).collect();
        let rows: String = cells
            .split_inclusive("</td>")
            .collect::<Vec<_>>()
            .chunks(10)
            .map(|ch| format!("<tr>{}</tr>", ch.concat()))
            .collect();
        format!("<p>LAB 2001 FES 2002 NOC 2003 NOC-FES 2004</p><table>{}</table>", rows)
    }

    #[test]
    fn picks_largest_qualifying_context() {
        let docs = vec![
            HtmlDocument::parse("menu", "<p>Inicio</p>"),
            HtmlDocument::parse("small", &board(2001..2021)),
            HtmlDocument::parse("big", &board(2001..2041)),
            HtmlDocument::parse("same", &board(3001..3041)),
        ];
        let snap = pick_authoritative(&docs, None).unwrap();
        assert_eq!(snap.ordered().len(), 40);
        assert_eq!(snap.ordered().entries()[0].raw, "2001");
    }

    #[test]
    fn short_roster_is_not_the_board() {
        let docs = vec![HtmlDocument::parse("tiny", &board(2001..2011))];
        match pick_authoritative(&docs, None) {
            Err(Error::NotARoster(why)) => assert!(why.contains("tiny: only 10 chapas")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn reasons_list_every_context() {
        let docs = vec![
            HtmlDocument::parse("a", "<p>nothing</p>"),
            HtmlDocument::parse("b", "<p>LAB 2001</p>"),
        ];
        let Err(Error::NotARoster(why)) = pick_authoritative(&docs, None) else {
            panic!("expected NotARoster");
        };
        assert!(why.starts_with("a: could not read doors"));
        assert!(why.contains("; b: could not read doors: FES, NOC, NOC-FES"));
    }
}
