//! Interactive shell: UI state, controller, view models, and the egui
//! renderer. All statistical logic lives in [`crate::analysis`]; this layer
//! only translates UI events into core calls and core results into render
//! instructions.

pub mod controller;
pub mod state;
pub mod ui;
pub mod view_model;
