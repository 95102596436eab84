//! Screen capture and on-screen lookup.
//!
//! This module provides:
//! - Screenshots into temporary files (`Screenshot`)
//! - Template matching for reference images (`find_template`)
//! - The `Screen` abstraction used by the automation flows

pub mod locate;
pub mod screen;
pub mod screenshot;

pub use screen::{DesktopScreen, Screen};
pub use screenshot::Screenshot;
