//! Dashboard components.
//!
//! Server-rendered widgets for the story dashboard: the mutually-exclusive
//! [`ToggleButtonGroup`] and the page templates listing stories.

pub mod dashboard;
pub mod toggle;

pub use dashboard::{DashboardContext, StatusFilter, TemplateEngine};
pub use toggle::{ButtonDescriptor, ToggleButtonGroup};
