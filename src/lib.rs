//! Score City: a credit score skyline rendered in software
//!
//! A procedural city with one cluster of buildings per credit score band
//! and a glowing marker that glides to the current score. The scene is
//! rasterized on the CPU into an RGBA framebuffer; a host (the macroquad
//! binary in `main.rs`) presents it and draws the overlay text.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod backdrop;
pub mod calculator;
pub mod city;
pub mod rasterizer;
