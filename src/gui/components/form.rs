// src/gui/components/form.rs
//
// Chapa, source and tie-break inputs plus the Calculate button.
// Edits go straight into `app.state.gui`; options are built on click.

use eframe::egui::{self, widgets::Spinner};

use crate::{config::options::SourceKind, gui::actions, gui::app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Chapero: door picker");
    ui.add_space(4.0);

    egui::Grid::new("form_grid").num_columns(2).spacing([8.0, 6.0]).show(ui, |ui| {
        ui.label("Your chapa:");
        ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.chapa_input)
                .hint_text("e.g. 2683")
                .desired_width(120.0),
        );
        ui.end_row();

        ui.label("Source:");
        ui.horizontal(|ui| {
            let before = app.state.gui.source_kind;
            egui::ComboBox::from_id_salt("source_kind")
                .selected_text(before.label())
                .show_ui(ui, |ui| {
                    for k in SourceKind::ALL {
                        ui.selectable_value(&mut app.state.gui.source_kind, k, k.label());
                    }
                });
            if app.state.gui.source_kind != before {
                logf!("UI: source kind → {:?}", app.state.gui.source_kind);
            }
            let hint = match app.state.gui.source_kind {
                SourceKind::Html => "board.html; frame2.html",
                SourceKind::Dump => "dump.json",
                SourceKind::Snapshot => "snapshot.json",
            };
            ui.add(
                egui::TextEdit::singleline(&mut app.state.gui.source_input)
                    .hint_text(hint)
                    .desired_width(360.0),
            );
        });
        ui.end_row();

        ui.label("Tie-break:");
        ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.priority_input)
                .hint_text("LAB,FES,NOC,NOC-FES")
                .desired_width(200.0),
        );
        ui.end_row();
    });

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        let ready = !app.running && !app.state.gui.chapa_input.trim().is_empty();
        if ui.add_enabled(ready, egui::Button::new("Calculate")).clicked() {
            let ctx = ui.ctx().clone();
            actions::calculate(app, &ctx);
        }
        if app.running {
            ui.add(Spinner::new());
        }
    });
}
