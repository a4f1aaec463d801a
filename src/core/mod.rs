// src/core/mod.rs

pub mod css;
pub mod html;
pub mod sanitize;
