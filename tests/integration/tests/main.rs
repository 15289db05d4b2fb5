//! End-to-end tests for the NameID link store.
//!
//! Every scenario runs against the in-memory store and the JSON file store.

mod common;
mod concurrency;
mod generation;
mod links;
mod protocol;
