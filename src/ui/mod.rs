//! Terminal rendering using ratatui.
//!
//! Every renderer here is a pure sink: it reads [`crate::app::App`] state
//! and draws widgets, mutating nothing.
//!
//! ## Submodules
//!
//! - [`common`]: Header, tabs, status bar, and the help overlay
//! - [`dashboard`]: Live multiplier chart with forecast overlay and indicators
//! - [`performance`]: Prediction error bars and model accuracy stats
//! - [`settings`]: Editable threshold form
//! - [`theme`]: Color themes and terminal background detection

pub mod common;
pub mod dashboard;
pub mod performance;
pub mod settings;
pub mod theme;

pub use theme::Theme;
