// src/math/geometry/voronoi/config.rs
use crate::math::error::{MathError, MathResult};
use serde::{Deserialize, Serialize};

/// Konfiguration für Zellabfragen eines Voronoi-Diagramms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoronoiConfig {
    /// Absolute Toleranz, innerhalb derer zwei Distanzen als gleich gelten.
    /// `0.0` bedeutet exakter Vergleich der `f64`-Werte.
    pub tie_tolerance: f64,
}

impl Default for VoronoiConfig {
    fn default() -> Self {
        Self::exact()
    }
}

impl VoronoiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exakter Distanzvergleich ohne Toleranz
    pub fn exact() -> Self {
        Self { tie_tolerance: 0.0 }
    }

    pub fn with_tie_tolerance(mut self, tolerance: f64) -> Self {
        self.tie_tolerance = tolerance;
        self
    }

    pub fn is_exact(&self) -> bool {
        self.tie_tolerance == 0.0
    }

    pub fn validate(&self) -> MathResult<()> {
        if !self.tie_tolerance.is_finite() || self.tie_tolerance < 0.0 {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Tie tolerance must be finite and non-negative, got {}",
                    self.tie_tolerance
                ),
            });
        }
        Ok(())
    }
}
