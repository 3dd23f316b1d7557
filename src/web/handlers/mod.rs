pub mod athlete_handlers;
pub mod health_handlers;
pub mod inscription_handlers;
pub mod representative_handlers;
