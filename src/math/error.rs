// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Voronoi diagram has no sites.")]
    EmptyDiagram,

    #[error("Site index {index} out of range for diagram with {site_count} sites")]
    SiteOutOfRange { index: usize, site_count: usize },

    #[error("Metric returned NaN for site {site}")]
    InvalidDistance { site: usize },
}

pub type MathResult<T> = Result<T, MathError>;
