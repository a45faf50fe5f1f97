//! QA dashboard server library.
//!
//! Reads QA test-run entries from Contentstack, renders them as a filterable
//! dashboard, and keeps a small registry of dashboard users in the same stack.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
pub mod views;
