// Technical indicator library
pub mod indicators;

// Price history acquisition
pub mod market_data;

// Scoring, composition and generation
pub mod signals;

// Auto-mode trigger
pub mod scheduler;

// Service wiring
pub mod bootstrap;
