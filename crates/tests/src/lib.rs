//! End-to-end API tests against a spawned server and a real MongoDB.
//!
//! These are `#[ignore]`d by default; run them with a local MongoDB (or set
//! `TEST_MONGODB_URI`) via:
//!
//! ```text
//! cargo test -p registrovivo-tests -- --ignored
//! ```

pub mod fixtures;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod diary_tests;
