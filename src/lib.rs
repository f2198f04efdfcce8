//! Catalog plugins library
//!
//! Two implementations of the [`catalog::CatalogPlugin`] contract: a mock
//! serving a fixed resource tree and an SFTP importer. The binary wraps one of
//! them in the line-oriented bridge from [`host`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod mock;
pub mod sftp;
pub mod validation;

pub(crate) mod security_log;
