//! Integration tests for the harvester
//!
//! These tests run the crawl pipeline against a wiremock stand-in for the
//! upstream extraction service and tempfile-backed CSV sinks.

mod discovery_tests;
mod harvest_tests;
