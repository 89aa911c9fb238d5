//! The computation core: quantile binning, filtering, range windowing,
//! Mahalanobis outlier ranking, convex boundaries, and boxplot summaries.
//!
//! Everything here is pure and toolkit-free: functions take immutable data
//! and return result values, so the pipeline can be exercised directly by
//! tests without a UI.

pub mod binning;
pub mod boxplot;
pub mod filters;
pub mod hull;
pub mod outlier;
pub mod range;
pub mod stats;

use thiserror::Error;

/// Errors raised by the analysis pipeline.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Bin counts below one are a usage error.
    #[error("Bin count must be at least 1, got {0}")]
    InvalidBinCount(usize),
    /// An operation was asked to work on zero rows.
    #[error("Cannot analyze an empty sample")]
    EmptySample,
    /// The error sample has no two-dimensional spread, so the covariance
    /// matrix cannot be inverted.
    #[error("Degenerate covariance: the error sample has no two-dimensional spread")]
    DegenerateCovariance,
    /// The error sample is too small to estimate a covariance.
    #[error("At least two points are required to estimate the error covariance")]
    SampleTooSmall,
}
