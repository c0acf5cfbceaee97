//! Data models for the FARMLAND site.
//!
//! These models serialize with the same camelCase keys the browser front end uses.

mod content;
mod post;
mod site_config;

pub use content::*;
pub use post::*;
pub use site_config::*;
