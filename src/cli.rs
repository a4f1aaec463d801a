// src/cli.rs
use std::fmt::Write as _;
use std::path::PathBuf;

use crate::config::options::{self, AppOptions, Source};
use crate::distance::DistanceReport;
use crate::error::{Error, Result};
use crate::file;
use crate::progress::Progress;
use crate::runner::{self, Pipeline, Request};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub chapa: Option<String>,
    pub options: AppOptions,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    Run(CliArgs),
}

/// Status lines on stderr so stdout stays clean for `--json`.
struct StderrProgress;

impl Progress for StderrProgress {
    fn log(&mut self, msg: &str) { eprintln!("{}", msg); }
    fn item_done(&mut self, label: &str) { eprintln!("  scanned {}", label); }
}

pub fn run<I: IntoIterator<Item = String>>(args: I) -> Result<()> {
    let cli = match parse_args(args)? {
        Command::Help => {
            println!("{}", include_str!("cli_help.txt"));
            return Ok(());
        }
        Command::Run(cli) => cli,
    };
    let opts = &cli.options;

    if let Some(path) = &opts.output.diagnose {
        let diag = runner::diagnose_source(&opts.source)?;
        file::write_json(path, &diag)?;
        eprintln!("Diagnostics ({} candidates) written to {}", diag.total, path.display());
    }

    let Some(chapa) = cli.chapa else {
        return Ok(());
    };

    let req = Request::new(chapa, opts);
    let mut progress = StderrProgress;
    let outcome = Pipeline::new().run(&req, Some(&mut progress))?;

    if let Some(target) = &opts.output.save_snapshot {
        let path = file::resolve_snapshot_path(&target.to_string_lossy())?;
        file::write_json(&path, &outcome.snapshot)?;
        eprintln!("Snapshot written to {}", path.display());
    }

    if opts.output.json {
        println!("{}", outcome.report.to_json_pretty()?);
    } else {
        print!("{}", render_text(&outcome.report));
    }
    Ok(())
}

pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut chapa = None;
    let mut html: Vec<PathBuf> = Vec::new();
    let mut dump: Option<PathBuf> = None;
    let mut snapshot: Option<PathBuf> = None;
    let mut options = AppOptions::default();

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        let mut value = |flag: &str| args.next().ok_or_else(|| bad(format!("Missing value for {}", flag)));
        match a.as_str() {
            "--chapa" | "-c" => chapa = Some(value("--chapa")?),
            "--html" => html.push(PathBuf::from(value("--html")?)),
            "--dump" => dump = Some(PathBuf::from(value("--dump")?)),
            "--snapshot" => snapshot = Some(PathBuf::from(value("--snapshot")?)),
            "--priority" => {
                let v = value("--priority")?;
                options.tie_break = options::parse_priority(&v).map_err(bad)?;
            }
            "--json" => options.output.json = true,
            "--save-snapshot" => options.output.save_snapshot = Some(PathBuf::from(value("--save-snapshot")?)),
            "--diagnose" => options.output.diagnose = Some(PathBuf::from(value("--diagnose")?)),
            "-h" | "--help" => return Ok(Command::Help),
            _ => return Err(bad(format!("Unknown arg: {}", a))),
        }
    }

    let kinds = [!html.is_empty(), dump.is_some(), snapshot.is_some()];
    options.source = match kinds.iter().filter(|k| **k).count() {
        0 => return Err(bad(s!("No source: give --html, --dump or --snapshot"))),
        1 => {
            if let Some(p) = dump {
                Source::Dump(p)
            } else if let Some(p) = snapshot {
                Source::Snapshot(p)
            } else {
                Source::Html(html)
            }
        }
        _ => return Err(bad(s!("Give only one source kind (--html, --dump or --snapshot)"))),
    };

    if chapa.is_none() && options.output.diagnose.is_none() {
        return Err(bad(s!("Missing --chapa")));
    }
    Ok(Command::Run(CliArgs { chapa, options }))
}

fn bad(msg: String) -> Error {
    Error::InvalidInput(msg)
}

/// Human-readable report.
pub fn render_text(rep: &DistanceReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "User chapa: {} (censo {})", rep.user_chapa, rep.user_censo_key);
    let _ = writeln!(
        out,
        "Roster: {} chapas, {} no contratadas",
        rep.meta.total_chapas, rep.meta.no_contratadas
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<8} {:<6} {:>8}  {}", "DOOR", "CHAPA", "DISTANCE", "NOTE");
    for r in &rep.results {
        let dist = r.distance.map(|d| d.to_string()).unwrap_or_else(|| s!("-"));
        let note = match (&r.error, &rep.recommended) {
            (Some(e), _) => e.clone(),
            (None, Some(best)) if best.door == r.door => s!("<- recommended"),
            _ => s!(),
        };
        let _ = writeln!(out, "{:<8} {:<6} {:>8}  {}", r.door.label(), r.door_chapa, dist, note);
    }
    let _ = writeln!(out);
    match &rep.recommended {
        Some(best) => {
            let _ = writeln!(
                out,
                "Recommended: {} (distance {})",
                best.door,
                best.distance.unwrap_or_default()
            );
        }
        None => {
            let _ = writeln!(out, "Recommended: none (no door found in the roster)");
        }
    }
    out
}
