//! Persistence models for the fiscal device tracker.
//! - sea-orm entities for the four tables
//! - status vocabularies shared by services and views
//! - model-level validation and connection helpers

pub mod errors;
pub mod db;
pub mod status;
pub mod ofd_provider;
pub mod fiscal_device;
pub mod user;
pub mod import_history;

#[cfg(test)]
mod tests;
