// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{calculate, collect}.

mod calculate; // src/gui/actions/calculate.rs

pub use calculate::{calculate, collect};
