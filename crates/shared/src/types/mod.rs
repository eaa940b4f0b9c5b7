//! Common types used across the workspace.

pub mod labeling;

pub use labeling::YearLabeling;
