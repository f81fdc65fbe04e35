// --- File: crates/consultify_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod directory;
#[cfg(test)]
mod directory_test;
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;
pub mod models;
pub mod routes;
pub mod service;
