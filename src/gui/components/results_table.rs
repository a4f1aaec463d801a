// src/gui/components/results_table.rs
//
// Per-door results of the last request. Purely a view.

use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &App) {
    let Some(rep) = &app.report else {
        ui.label("No results yet.");
        return;
    };

    ui.label(format!(
        "User {} (censo {}) · {} chapas · {} no contratadas",
        rep.user_chapa, rep.user_censo_key, rep.meta.total_chapas, rep.meta.no_contratadas
    ));
    ui.add_space(4.0);

    let best = rep.recommended.as_ref().map(|r| r.door);
    let accent = ui.visuals().selection.bg_fill;

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::exact(90.0))
        .column(Column::exact(80.0))
        .column(Column::exact(80.0))
        .column(Column::remainder().clip(true))
        .header(22.0, |mut header| {
            for h in ["Door", "Chapa", "Distance", "State"] {
                header.col(|ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|mut body| {
            for r in &rep.results {
                let recommended = best == Some(r.door);
                let cell = |text: String| {
                    let t = RichText::new(text);
                    if recommended { t.strong().color(accent) } else { t }
                };
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(cell(s!(r.door.label())));
                    });
                    row.col(|ui| {
                        ui.label(cell(r.door_chapa.to_string()));
                    });
                    row.col(|ui| {
                        let d = r.distance.map(|d| d.to_string()).unwrap_or_else(|| s!("-"));
                        ui.label(cell(d));
                    });
                    row.col(|ui| {
                        let state = match (&r.error, recommended) {
                            (Some(e), _) => e.clone(),
                            (None, true) => s!("recommended"),
                            (None, false) => s!("ok"),
                        };
                        ui.label(cell(state));
                    });
                });
            }
        });
}
