// src/runner.rs
use std::sync::{Mutex, TryLockError};

use crate::{
    chapa,
    config::options::{AppOptions, Source},
    distance::{self, DistanceReport, TieBreak},
    document::{DumpDocument, HtmlDocument, RenderedDocument},
    error::{Error, Result},
    file,
    progress::Progress,
    scrape::{self, Diagnostics},
    snapshot::Snapshot,
};

/// One "which door do I pick" question.
#[derive(Clone, Debug)]
pub struct Request {
    pub chapa: String,
    pub source: Source,
    pub tie_break: TieBreak,
}

impl Request {
    /// Ask for `chapa` using the source and tie-break currently in `options`.
    pub fn new(chapa: impl Into<String>, options: &AppOptions) -> Self {
        Self { chapa: chapa.into(), source: options.source.clone(), tie_break: options.tie_break.clone() }
    }
}

/// What a request produced: the snapshot it was answered from and the answer.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub snapshot: Snapshot,
    pub report: DistanceReport,
}

/// Serializes requests: at most one extraction+computation in flight.
/// The core underneath is stateless; this gate is the only shared state.
#[derive(Debug, Default)]
pub struct Pipeline {
    gate: Mutex<()>,
}

impl Pipeline {
    pub fn new() -> Self { Self::default() }

    pub fn is_busy(&self) -> bool {
        matches!(self.gate.try_lock(), Err(TryLockError::WouldBlock))
    }

    /// Validate, extract fresh, compute. A concurrent call fails with [`Error::Busy`].
    pub fn run(&self, req: &Request, mut progress: Option<&mut dyn Progress>) -> Result<Outcome> {
        if chapa::normalize(&req.chapa).is_none() {
            return Err(Error::InvalidInput(s!(req.chapa.trim())));
        }

        let _guard = match self.gate.try_lock() {
            Ok(g) => g,
            // a panicked request left nothing behind worth protecting
            Err(TryLockError::Poisoned(p)) => p.into_inner(),
            Err(TryLockError::WouldBlock) => {
                logd!("Runner: rejected request for {}, busy", req.chapa.trim());
                return Err(Error::Busy);
            }
        };

        let result = answer(req, progress.as_deref_mut().map(|p| p as &mut dyn Progress));
        match &result {
            Ok(o) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!(
                        "{} chapas, {} no contratadas",
                        o.report.meta.total_chapas, o.report.meta.no_contratadas
                    ));
                }
            }
            Err(e) => loge!("Runner: {}", e),
        }
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        result
    }
}

fn answer(req: &Request, mut progress: Option<&mut dyn Progress>) -> Result<Outcome> {
    let snapshot = load_snapshot(&req.source, progress.as_deref_mut().map(|p| p as &mut dyn Progress))?;
    if let Some(p) = progress.as_deref_mut() {
        p.log("Computing distances…");
    }
    let report = distance::compute_distances_with(&req.chapa, &snapshot, &req.tie_break)?;
    Ok(Outcome { snapshot, report })
}

/// Read the source and produce the snapshot it describes.
pub fn load_snapshot(source: &Source, mut progress: Option<&mut dyn Progress>) -> Result<Snapshot> {
    match source {
        Source::Snapshot(path) => {
            if let Some(p) = progress.as_deref_mut() {
                p.begin(1);
                p.log(&format!("Reading snapshot {}", path.display()));
            }
            let snap = Snapshot::from_json(&file::read_text(path)?)?;
            if let Some(p) = progress.as_deref_mut() {
                p.item_done(&path.display().to_string());
            }
            Ok(snap)
        }
        Source::Html(_) => {
            let docs = html_contexts(source)?;
            if let Some(p) = progress.as_deref_mut() {
                p.begin(docs.len());
                p.log(&format!("Scanning {} rendering contexts…", docs.len()));
            }
            scrape::pick_authoritative(&docs, progress)
        }
        Source::Dump(_) => {
            let docs = dump_contexts(source)?;
            if let Some(p) = progress.as_deref_mut() {
                p.begin(docs.len());
                p.log("Scanning element dump…");
            }
            scrape::pick_authoritative(&docs, progress)
        }
    }
}

/// Extraction diagnostics of the first context of an HTML or dump source.
pub fn diagnose_source(source: &Source) -> Result<Diagnostics> {
    match source {
        Source::Html(_) => first_diagnostics(&html_contexts(source)?),
        Source::Dump(_) => first_diagnostics(&dump_contexts(source)?),
        Source::Snapshot(_) => Err(Error::InvalidInput(s!("diagnostics need an HTML page or an element dump"))),
    }
}

fn first_diagnostics<D: RenderedDocument>(docs: &[D]) -> Result<Diagnostics> {
    docs.first()
        .map(scrape::diagnose)
        .ok_or_else(|| Error::InvalidInput(s!("no HTML file given")))
}

fn html_contexts(source: &Source) -> Result<Vec<HtmlDocument>> {
    let mut docs = Vec::new();
    for path in source.paths() {
        let text = file::read_text(path)?;
        docs.extend(HtmlDocument::parse(path.display().to_string(), &text).into_contexts());
    }
    logd!("Runner: {} HTML contexts", docs.len());
    Ok(docs)
}

fn dump_contexts(source: &Source) -> Result<Vec<DumpDocument>> {
    let mut docs = Vec::new();
    for path in source.paths() {
        let text = file::read_text(path)?;
        docs.push(DumpDocument::from_json(path.display().to_string(), &text)?);
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn req(chapa: &str) -> Request {
        Request {
            chapa: s!(chapa),
            source: Source::Snapshot(PathBuf::from("missing.json")),
            tie_break: TieBreak::DoorOrder,
        }
    }

    #[test]
    fn request_takes_source_and_tie_break_from_options() {
        let mut opts = AppOptions::default();
        opts.source = Source::Dump(PathBuf::from("dump.json"));
        opts.tie_break = TieBreak::Priority(vec![crate::snapshot::Door::Noc]);
        let r = Request::new("2683", &opts);
        assert_eq!(r.chapa, "2683");
        assert_eq!(r.source, opts.source);
        assert_eq!(r.tie_break, opts.tie_break);
    }

    #[test]
    fn invalid_chapa_fails_before_the_gate() {
        let p = Pipeline::new();
        let _held = p.gate.lock().unwrap();
        assert!(matches!(p.run(&req("no digits"), None), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn concurrent_request_is_busy() {
        let p = Pipeline::new();
        let held = p.gate.lock().unwrap();
        assert!(p.is_busy());
        assert!(matches!(p.run(&req("2683"), None), Err(Error::Busy)));
        drop(held);
        assert!(!p.is_busy());
        // gate free again: now it gets as far as reading the file
        assert!(matches!(p.run(&req("2683"), None), Err(Error::Io { .. })));
    }

    #[derive(Default)]
    struct Recorder {
        total: usize,
        lines: Vec<String>,
        done: Vec<String>,
        finished: bool,
    }

    impl Progress for Recorder {
        fn begin(&mut self, total: usize) { self.total = total; }
        fn log(&mut self, msg: &str) { self.lines.push(s!(msg)); }
        fn item_done(&mut self, label: &str) { self.done.push(s!(label)); }
        fn finish(&mut self) { self.finished = true; }
    }

    #[test]
    fn progress_sees_the_whole_request() {
        let dir = std::env::temp_dir().join(format!("chapero-runner-{}", std::process::id()));
        let path = dir.join("snap.json");
        crate::file::write_text(
            &path,
            r#"{ "doors": { "LAB": "10001" },
                 "ordered": [ { "raw": "10001" }, { "raw": "10002", "isNoContratado": true }, { "raw": "10003" } ] }"#,
        )
        .unwrap();

        let req = Request { chapa: s!("10003"), source: Source::Snapshot(path.clone()), tie_break: TieBreak::DoorOrder };
        let mut rec = Recorder::default();
        let out = Pipeline::new().run(&req, Some(&mut rec)).unwrap();

        assert_eq!(out.report.recommended.unwrap().distance, Some(1));
        assert_eq!(rec.total, 1);
        assert_eq!(rec.done, vec![path.display().to_string()]);
        assert!(rec.lines.iter().any(|l| l.starts_with("Computing")));
        assert_eq!(rec.lines.last().map(String::as_str), Some("3 chapas, 1 no contratadas"));
        assert!(rec.finished);

        // errors still close the progress
        let mut rec = Recorder::default();
        let missing = Request { source: Source::Snapshot(dir.join("gone.json")), ..req };
        assert!(Pipeline::new().run(&missing, Some(&mut rec)).is_err());
        assert!(rec.finished);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn snapshot_sources_have_no_diagnostics() {
        assert!(diagnose_source(&Source::Snapshot(PathBuf::from("x.json"))).is_err());
    }
}
