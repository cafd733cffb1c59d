//! Tax divergence auditor for Brazilian fiscal documents.
//!
//! This crate reads NF-e and CT-e XML documents, looks up the rate in force for
//! each tax on the document's issue date, and flags declared amounts that
//! diverge from the expected amount beyond a tolerance. Results for a batch of
//! documents are aggregated into a [`models::BatchResult`].

#![warn(missing_docs)]

pub mod api;
pub mod batch;
pub mod calculation;
pub mod config;
pub mod error;
pub mod extraction;
pub mod models;
