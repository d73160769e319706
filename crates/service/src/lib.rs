//! Service layer for the fiscal device tracker.
//! - Expiry arithmetic and display views on top of `models` entities.
//! - Repository operations per resource and the dashboard aggregate.
//! - One error type classifying failures for the HTTP boundary.

pub mod errors;
pub mod expiry;
pub mod views;
pub mod devices;
pub mod providers;
pub mod users;
pub mod import_history;
pub mod dashboard;
#[cfg(test)]
pub mod test_support;
