// src/scrape/mod.rs
pub mod chapero;
pub mod classify;
pub mod frames;

pub use chapero::{diagnose, extract, Diagnostics};
pub use frames::pick_authoritative;
