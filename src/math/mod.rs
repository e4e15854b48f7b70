// src/math/mod.rs
pub mod error;
pub mod geometry;
pub mod types;
pub mod utils;

// Re-exports für einfache Verwendung
pub use error::{MathError, MathResult};
pub use types::*;

// Öffentliche API
pub mod prelude {
    pub use super::{
        error::{MathError, MathResult},
        geometry::{
            metric::*,
            sampling::{SamplingMethod, SiteSampler},
            voronoi::*,
        },
        types::*,
    };
}
