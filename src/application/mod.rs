//! Application layer holding the composer session.
//!
//! [`App`] tracks the current stage, the bouquet being built, and the garden
//! and viewing screens, and talks to storage through a `BouquetGateway`.

pub mod state;

pub use state::*;
