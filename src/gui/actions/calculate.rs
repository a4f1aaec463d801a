// src/gui/actions/calculate.rs
use std::{sync::Arc, thread};

use eframe::egui;

use crate::{
    config::options,
    gui::app::App,
    gui::progress::GuiProgress,
    runner::Request,
};

/// Validate the form and start one request on a worker thread.
pub fn calculate(app: &mut App, ctx: &egui::Context) {
    if app.running {
        return;
    }
    let gui = &app.state.gui;

    let source = gui.source_kind.source_from(&gui.source_input);
    if source.is_empty() {
        app.status("Error: choose a source file first");
        return;
    }
    let tie_break = match options::parse_priority(&gui.priority_input) {
        Ok(t) => t,
        Err(e) => {
            app.status(format!("Error: {e}"));
            return;
        }
    };
    let chapa = s!(gui.chapa_input.trim());

    app.state.options.source = source;
    app.state.options.tie_break = tie_break;

    let req = Request::new(chapa, &app.state.options);
    logf!("Calculate: begin chapa={} source={:?}", req.chapa, req.source);

    app.running = true;
    app.report = None;
    app.status("Working…");

    let pipeline = Arc::clone(&app.pipeline);
    let status = Arc::clone(&app.status);
    let slot = Arc::clone(&app.result);
    let ctx = ctx.clone();

    thread::spawn(move || {
        let mut prog = GuiProgress::new(status);
        let res = pipeline.run(&req, Some(&mut prog)).map_err(|e| e.to_string());
        *slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(res);
        ctx.request_repaint();
    });
}

/// Pick up a finished request, if any. Called every frame.
pub fn collect(app: &mut App) {
    let done = app.result.lock().unwrap_or_else(|p| p.into_inner()).take();
    let Some(res) = done else { return };
    app.running = false;

    match res {
        Ok(outcome) => {
            let msg = match &outcome.report.recommended {
                Some(best) => format!(
                    "Recommended: {} (distance {})",
                    best.door,
                    best.distance.unwrap_or_default()
                ),
                None => s!("No door found in the roster"),
            };
            logf!("Calculate: OK {}", msg);
            app.status(msg);
            app.report = Some(outcome.report);
        }
        Err(e) => {
            loge!("Calculate: Error: {}", e);
            app.status(format!("Error: {e}"));
        }
    }
}
