//! Integration test harness

mod api_tests;
mod crawl_tests;
mod support;
