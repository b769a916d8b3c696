// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the data provider pipeline
//!
//! A `get_data` call either yields a full result or fails with one of
//! these; nothing is cached on failure, so the next call retries the
//! fetch from scratch.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the provider pipeline.
///
/// `Clone` because a settled fetch outcome (success or failure) is
/// replayed to every caller that was waiting on the same in-flight fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Remote fetch failed: network error, non-success status, or a
    /// payload that did not parse as a resource list.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The data converter rejected a raw record.
    #[error("conversion failure: {0}")]
    Conversion(String),

    /// Page numbers are 1-based.
    #[error("invalid page number: {0} (must be >= 1)")]
    InvalidPage(usize),
}
