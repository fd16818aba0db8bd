//! Avocado price and volume dashboard.
//!
//! The `data` layer and `state` know nothing about egui; `app` and `ui`
//! draw the [`view::DashboardView`] that `state` keeps current.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod ui;
pub mod view;
