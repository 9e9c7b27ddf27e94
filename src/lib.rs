#![doc = "gemini-archive: conversation snapshot synchronisation library."]

//! This crate keeps a local archive of self-contained HTML snapshots in sync
//! with the set of shared Gemini conversations referenced from markdown files.
//!
//! # Usage
//! The binary wires a chromium browser into [`synchronise::synchronise`]; the
//! library exposes every stage (discovery, reconciliation, capture, storage,
//! reporting) for direct use and testing.

pub mod browser;
pub mod capture;
pub mod cli;
pub mod config;
pub mod contract;
pub mod discover;
pub mod executor;
pub mod load_config;
pub mod postprocess;
pub mod reconcile;
pub mod report;
pub mod store;
pub mod synchronise;
