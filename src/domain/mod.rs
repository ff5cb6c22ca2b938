// Market data domain (candles, pairs, sessions)
pub mod market;

// Signal domain (indicator snapshot, score, signal record)
pub mod signal;

// Port interfaces
pub mod ports;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
