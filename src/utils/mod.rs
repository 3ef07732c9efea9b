//! Shared utilities.

pub mod browser;
pub mod html;
pub mod path;
