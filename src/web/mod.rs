pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod router;

pub use extractors::*;
pub use middleware::*;
pub use responses::*;
pub use router::*;
