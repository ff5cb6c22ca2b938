// Service wiring from `Config`
pub mod services;

pub use services::{ServicesBootstrap, ServicesHandle};
