//! Dashboard E2E test suite.
//!
//! Drives the full app (pages and JSON API) through the real Contentstack
//! client against an in-process mock stack.
//!
//! Run with: cargo test --test dashboard_e2e

mod mock_contentstack;

mod test_client;
mod test_users;
