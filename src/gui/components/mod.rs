// src/gui/components/mod.rs
pub mod form;
pub mod results_table;
pub mod status_bar;
