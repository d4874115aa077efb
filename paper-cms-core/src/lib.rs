#![doc = "paper-cms-core: core pipeline library for paper-cms."]

//! This crate contains the data model and pipeline that turn a Dropbox Paper
//! workspace into static site content: documents as Markdown files with a JSON
//! header, a manifest, and a regenerated sidebar config.
//!
//! # Usage
//! Build a [`paper_api::PaperClient`] from an [`config::ApiConfig`], then call
//! [`synchronise::synchronise`] with a [`config::SyncConfig`].

pub mod config;
pub mod contract;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod paper_api;
pub mod persist;
pub mod resolve;
pub mod sidebar;
pub mod synchronise;

pub use error::{PaperError, Result};
