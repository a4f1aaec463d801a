// src/lib.rs
// #![allow(dead_code)]

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod chapa;
pub mod config;
pub mod core;
pub mod distance;
pub mod document;
pub mod error;
pub mod snapshot;

pub mod cli;
pub mod file;
pub mod gui;
pub mod progress;
pub mod runner;
pub mod scrape;

pub use distance::{compute_distances, compute_distances_with, DistanceReport, TieBreak};
pub use error::{Error, Result};
pub use snapshot::{Door, Snapshot};
