pub mod bootcamp_handlers;
pub mod health_handlers;
