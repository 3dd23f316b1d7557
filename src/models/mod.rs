pub mod athlete;
pub mod auth;
pub mod common;
pub mod representative;

pub use athlete::*;
pub use auth::*;
pub use common::*;
pub use representative::*;
