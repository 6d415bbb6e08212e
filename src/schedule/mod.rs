//! Opening-hours interpretation.
//!
//! Submodules:
//! - `normalize`: provider text or structured records → canonical lines.
//! - `parse`: canonical lines → `WeeklySchedule` (ranges merged once).
//! - `evaluate`: `WeeklySchedule` + current moment → status and next event.
//! - `text`: accent/case folding.

pub mod evaluate;
pub mod normalize;
pub mod parse;
pub mod text;

pub use evaluate::{evaluate, evaluate_text};
pub use parse::{DaySchedule, WeeklySchedule};
