//! Juxtapos - transparent hypercube viewer
//!
//! Library half of the application: configuration, input mapping and the
//! window/render systems driven by `main.rs`.

pub mod config;
pub mod input;
pub mod systems;
