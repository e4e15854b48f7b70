// src/math/geometry/sampling.rs

use crate::math::{error::*, types::*};
use rand::{Rng, SeedableRng};

/// Verschiedene Sampling-Methoden für Sites in einer Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingMethod {
    /// Uniform verteilte Punkte
    Uniform,
    /// Jittered Grid: ein zufälliger Punkt pro Rasterzelle
    Jittered,
}

/// Erzeugt Sites für Voronoi-Diagramme
pub struct SiteSampler {
    method: SamplingMethod,
    bounds: Bounds2D,
    rng: rand::rngs::StdRng,
}

impl SiteSampler {
    /// Erstellt einen neuen Sampler
    pub fn new(method: SamplingMethod, bounds: Bounds2D) -> MathResult<Self> {
        Self::with_rng(method, bounds, rand::rngs::StdRng::from_os_rng())
    }

    /// Erstellt einen Sampler mit festem Seed
    pub fn with_seed(method: SamplingMethod, bounds: Bounds2D, seed: u64) -> MathResult<Self> {
        Self::with_rng(method, bounds, rand::rngs::StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        method: SamplingMethod,
        bounds: Bounds2D,
        rng: rand::rngs::StdRng,
    ) -> MathResult<Self> {
        if !bounds.is_valid() {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid sampling bounds {}", bounds),
            });
        }
        Ok(Self {
            method,
            bounds,
            rng,
        })
    }

    /// Generiert eine bestimmte Anzahl von Punkten
    pub fn sample_points(&mut self, count: usize) -> Vec<Point2D> {
        match self.method {
            SamplingMethod::Uniform => (0..count).map(|_| self.uniform_point()).collect(),
            SamplingMethod::Jittered => self.jittered_sampling(count),
        }
    }

    fn uniform_point(&mut self) -> Point2D {
        let u: f64 = self.rng.random();
        let v: f64 = self.rng.random();
        self.bounds.min + self.bounds.size() * Point2D::new(u, v)
    }

    /// Jittered Sampling (Grid-basiert), liefert genau `count` Punkte
    fn jittered_sampling(&mut self, count: usize) -> Vec<Point2D> {
        if count == 0 {
            return Vec::new();
        }
        let columns = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(columns);
        let cell = self.bounds.size() / Point2D::new(columns as f64, rows as f64);

        let mut points = Vec::with_capacity(count);
        'rows: for row in 0..rows {
            for column in 0..columns {
                if points.len() == count {
                    break 'rows;
                }
                let u: f64 = self.rng.random();
                let v: f64 = self.rng.random();
                let offset = Point2D::new(column as f64 + u, row as f64 + v);
                points.push(self.bounds.min + cell * offset);
            }
        }
        points
    }
}
