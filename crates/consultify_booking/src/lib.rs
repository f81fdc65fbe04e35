// --- File: crates/consultify_booking/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod logic;
pub mod models;
pub mod routes;
pub mod session;
#[cfg(test)]
mod session_proptest;

// Re-export the surface the backend wires together
pub use error::BookingError;
pub use logic::BookingEngine;
