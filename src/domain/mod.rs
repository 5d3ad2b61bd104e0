pub mod models;
pub mod catalog;
pub mod arrangement;
pub mod store;
pub mod errors;

pub use models::*;
pub use catalog::*;
pub use arrangement::*;
pub use store::*;
pub use errors::*;
