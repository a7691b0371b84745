//! Input adapters for the viewer.
//!
//! Adapters here receive window and device input and translate it into
//! `AppState` mutations.

#[cfg(feature = "gui")]
pub mod gui;
