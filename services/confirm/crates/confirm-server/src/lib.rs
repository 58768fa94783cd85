//! scalegate confirm service library — exposes modules for unit testing.

#![cfg_attr(test, allow(clippy::expect_used))]

pub mod application;
pub mod http;
pub mod infra;
