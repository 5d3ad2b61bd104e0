//! Bloomy - Terminal Bouquet Composer
//!
//! Pick flowers, arrange them, write a card, and share the bouquet as a link.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
