// tests/pipeline.rs
//
// File-backed requests through the runner and the CLI, like the binaries do.
mod common;

use std::path::PathBuf;
use std::sync::{Arc, Barrier};
use std::thread;

use chapero::config::options::Source;
use chapero::runner::{self, Pipeline, Request};
use chapero::{cli, Door, Error, Snapshot, TieBreak};

use common::*;

fn write(dir: &std::path::Path, name: &str, text: &str) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, text).unwrap();
    p
}

#[test]
fn html_request_end_to_end() {
    let dir = scratch_dir("html");
    let menu = write(&dir, "menu.html", "<p>Inicio · Consultas</p>");
    let board = write(&dir, "board.html", &standard_board());

    let req = Request {
        chapa: "2013".into(),
        source: Source::Html(vec![menu, board]),
        tie_break: TieBreak::DoorOrder,
    };
    let out = Pipeline::new().run(&req, None).unwrap();
    assert_eq!(out.snapshot.ordered().len(), 40);

    // user 2013 at 12; FES 2011 at 10 → only 2012 between → 0 flags
    let rep = &out.report;
    assert_eq!(rep.recommended.as_ref().unwrap().door, Door::Fes);
    assert_eq!(rep.recommended.as_ref().unwrap().distance, Some(0));
    // LAB 2001 at 0 → 2002..2012: 2005, 2010 → 2
    assert_eq!(rep.results[0].distance, Some(2));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn saved_snapshot_reloads_identically() {
    let dir = scratch_dir("snap");
    let board = write(&dir, "board.html", &standard_board());
    let src = Source::Html(vec![board]);
    let snap = runner::load_snapshot(&src, None).unwrap();

    let path = write(&dir, "snap.json", &snap.to_json_pretty().unwrap());
    let again = runner::load_snapshot(&Source::Snapshot(path), None).unwrap();
    assert_eq!(again, snap);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn small_page_is_not_the_board() {
    let dir = scratch_dir("small");
    let chapas: Vec<u32> = (2001..=2010).collect();
    let page = write(&dir, "small.html", &board_html(&chapas, &[], [2001, 2002, 2003, 2004]));
    let req = Request { chapa: "2005".into(), source: Source::Html(vec![page]), tie_break: TieBreak::DoorOrder };
    assert!(matches!(Pipeline::new().run(&req, None), Err(Error::NotARoster(_))));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn overlapping_requests_one_is_busy() {
    // A slow source: many contexts. Both threads start together; whichever
    // loses the gate must get Busy, never a second concurrent run.
    let dir = scratch_dir("busy");
    let paths: Vec<PathBuf> = (0..40).map(|i| write(&dir, &format!("b{i}.html"), &standard_board())).collect();
    let req = Request { chapa: "2013".into(), source: Source::Html(paths), tie_break: TieBreak::DoorOrder };

    let pipeline = Arc::new(Pipeline::new());
    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let (p, b, r) = (pipeline.clone(), barrier.clone(), req.clone());
            thread::spawn(move || {
                b.wait();
                p.run(&r, None)
            })
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let ok = results.iter().filter(|r| r.is_ok()).count();
    let busy = results.iter().filter(|r| matches!(r, Err(Error::Busy))).count();
    assert!(ok >= 1);
    assert_eq!(ok + busy, 2);
    assert!(!pipeline.is_busy());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn cli_writes_snapshot_and_diagnostics() {
    let dir = scratch_dir("cli");
    let board = write(&dir, "board.html", &standard_board());
    let snap_path = dir.join("out").join("snap.json");
    let diag_path = dir.join("diag.json");

    let args: Vec<String> = vec![
        "--chapa".into(), "2013".into(),
        "--html".into(), board.display().to_string(),
        "--json".into(),
        "--save-snapshot".into(), snap_path.display().to_string(),
        "--diagnose".into(), diag_path.display().to_string(),
    ];
    cli::run(args).unwrap();

    let saved = Snapshot::from_json(&std::fs::read_to_string(&snap_path).unwrap()).unwrap();
    assert_eq!(saved.ordered().len(), 40);
    let diag: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&diag_path).unwrap()).unwrap();
    assert_eq!(diag["denseTokens"], 40);
    let _ = std::fs::remove_dir_all(&dir);
}
