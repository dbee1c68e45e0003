//! Hypercube Input Handling
//!
//! This crate turns held keys into the model rotation angle of the
//! displayed hypercube.

mod spin_controller;

pub use spin_controller::{SpinController, SpinDirection};
