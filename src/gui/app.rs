// src/gui/app.rs
use std::{
    error::Error,
    sync::{Arc, Mutex},
};

use eframe::egui;

use crate::{
    config::state::AppState,
    distance::DistanceReport,
    runner::{Outcome, Pipeline},
};

use super::{actions, components};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Chapero",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

/// Finished request, handed from the worker thread to the UI thread.
pub type ResultSlot = Arc<Mutex<Option<Result<Outcome, String>>>>;

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    pub pipeline: Arc<Pipeline>,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub result: ResultSlot,
    pub running: bool,

    // last answer shown in the table
    pub report: Option<DistanceReport>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        logf!("Init: window {}x{}", state.gui.window_w, state.gui.window_h);
        Self {
            state,
            pipeline: Arc::new(Pipeline::new()),
            status: Arc::new(Mutex::new(s!("Idle"))),
            result: Arc::new(Mutex::new(None)),
            running: false,
            report: None,
        }
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        *self.status.lock().unwrap_or_else(|p| p.into_inner()) = msg.into();
    }

    #[inline]
    pub fn status_text(&self) -> String {
        self.status.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        actions::collect(self);

        eframe::egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            components::status_bar::draw(ui, self);
        });

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            components::form::draw(ui, self);

            ui.separator();

            components::results_table::draw(ui, self);
        });

        if self.running {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
