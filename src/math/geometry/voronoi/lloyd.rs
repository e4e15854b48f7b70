// src/math/geometry/voronoi/lloyd.rs

use crate::math::{
    error::*,
    geometry::{
        metric::Euclidean,
        voronoi::{diagram::VoronoiDiagram, raster::CellRaster},
    },
    types::*,
    utils::simple_geometry,
};
use bevy_log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Konfiguration für Lloyd-Relaxation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LloydConfig {
    /// Maximale Anzahl von Iterationen für die Relaxation.
    pub max_iterations: usize,
    /// Konvergenz-Toleranz: Wenn die gesamte Punktbewegung einer Iteration
    /// unter diesen Wert fällt, stoppt die Iteration.
    pub convergence_tolerance: f64,
    /// Rasterauflösung pro Achse, mit der Zellen und Schwerpunkte bestimmt werden.
    pub resolution: usize,
    /// Gewichtung der Bewegung zum Schwerpunkt (1.0 = voller Schritt).
    pub relaxation_weight: f64,
}

impl Default for LloydConfig {
    fn default() -> Self {
        Self {
            max_iterations: 15,
            convergence_tolerance: 1e-4,
            resolution: 128,
            relaxation_weight: 1.0,
        }
    }
}

impl LloydConfig {
    pub fn validate(&self) -> MathResult<()> {
        if self.resolution == 0 {
            return Err(MathError::InvalidConfiguration {
                message: "Lloyd raster resolution must be greater than 0".to_string(),
            });
        }
        if !self.convergence_tolerance.is_finite() || self.convergence_tolerance < 0.0 {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Convergence tolerance must be finite and non-negative, got {}",
                    self.convergence_tolerance
                ),
            });
        }
        if !(self.relaxation_weight > 0.0 && self.relaxation_weight <= 1.0) {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Relaxation weight must be in (0, 1], got {}",
                    self.relaxation_weight
                ),
            });
        }
        Ok(())
    }
}

/// Statistiken für eine Lloyd-Iteration
#[derive(Debug, Clone, PartialEq)]
pub struct LloydIterationStats {
    pub iteration: usize,
    pub total_movement: f64,
    pub max_movement: f64,
    pub point_count: usize,
    /// Summe der quadrierten Pixel-Site-Abstände vor dem Verschieben
    pub energy: f64,
}

/// Gesamtstatistiken der Lloyd-Relaxation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LloydStatistics {
    pub iterations: Vec<LloydIterationStats>,
    pub converged: bool,
    pub final_iteration: usize,
}

/// Lloyd-Relaxation: verschiebt jede Site in den Schwerpunkt ihrer Zelle.
pub struct LloydRelaxation {
    config: LloydConfig,
}

impl LloydRelaxation {
    pub fn new(config: LloydConfig) -> MathResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LloydConfig {
        &self.config
    }

    pub fn relax_points(
        &self,
        initial_points: &[Point2D],
        boundary: Bounds2D,
    ) -> MathResult<(Vec<Point2D>, LloydStatistics)> {
        if initial_points.is_empty() {
            return Err(MathError::InsufficientPoints {
                expected: 1,
                actual: 0,
            });
        }
        if !boundary.is_valid() {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid Lloyd boundary {}", boundary),
            });
        }

        let mut current_points: Vec<Point2D> = initial_points
            .iter()
            .map(|&p| boundary.closest_point(p))
            .collect();
        let mut statistics = LloydStatistics::default();

        for iteration in 0..self.config.max_iterations {
            let new_points = {
                let diagram = VoronoiDiagram::new(&current_points, Euclidean);
                let raster = CellRaster::compute(
                    &diagram,
                    boundary,
                    self.config.resolution,
                    self.config.resolution,
                )?;
                let energy = Self::calculate_energy(&raster, &current_points);
                let new_points = self.compute_lloyd_iteration(&raster, &current_points);

                let movements: Vec<f64> = current_points
                    .iter()
                    .zip(&new_points)
                    .map(|(old, new)| old.distance(*new))
                    .collect();
                statistics.iterations.push(LloydIterationStats {
                    iteration,
                    total_movement: movements.iter().sum(),
                    max_movement: movements.iter().copied().fold(0.0, f64::max),
                    point_count: new_points.len(),
                    energy,
                });
                new_points
            };

            current_points = new_points;
            statistics.final_iteration = iteration;

            let total_movement = statistics
                .iterations
                .last()
                .map_or(0.0, |stats| stats.total_movement);
            debug!(
                "LloydRelaxation: iteration {} moved points by {:.6} in total",
                iteration, total_movement
            );

            // Prüfe Konvergenz
            if total_movement < self.config.convergence_tolerance {
                statistics.converged = true;
                break;
            }
        }

        if !statistics.converged && self.config.max_iterations > 0 {
            warn!(
                "LloydRelaxation: no convergence after {} iterations (tolerance {})",
                self.config.max_iterations, self.config.convergence_tolerance
            );
        }

        Ok((current_points, statistics))
    }

    /// Führt eine einzelne Lloyd-Iteration durch
    fn compute_lloyd_iteration(&self, raster: &CellRaster, points: &[Point2D]) -> Vec<Point2D> {
        let centroids = raster.cell_centroids(points.len());
        points
            .iter()
            .zip(centroids)
            .map(|(&old, centroid)| match centroid {
                Some(target) => {
                    simple_geometry::lerp_point(old, target, self.config.relaxation_weight)
                }
                // Zelle ohne Pixel (z.B. Duplikat): Position behalten
                None => old,
            })
            .collect()
    }

    fn calculate_energy(raster: &CellRaster, points: &[Point2D]) -> f64 {
        let pixel_area = raster.pixel_size().x * raster.pixel_size().y;
        let mut energy = 0.0;
        for y in 0..raster.height() {
            for x in 0..raster.width() {
                if let Some(label) = raster.label(x, y) {
                    energy += raster.pixel_center(x, y).distance_squared(points[label]);
                }
            }
        }
        energy * pixel_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> Bounds2D {
        Bounds2D::from_points(Point2D::new(0.0, 0.0), Point2D::new(1.0, 1.0))
    }

    #[test]
    fn test_lloyd_relaxation_basic() {
        let points = vec![
            Point2D::new(0.1, 0.1),
            Point2D::new(0.9, 0.1),
            Point2D::new(0.9, 0.9),
            Point2D::new(0.1, 0.9),
            Point2D::new(0.5, 0.5),
        ];

        let lloyd = LloydRelaxation::new(LloydConfig::default()).unwrap();
        let (relaxed_points, stats) = lloyd.relax_points(&points, unit_square()).unwrap();

        assert_eq!(relaxed_points.len(), points.len());
        assert!(!stats.iterations.is_empty());
        for point in &relaxed_points {
            assert!(unit_square().contains_point(*point));
        }
    }

    #[test]
    fn test_single_site_moves_to_center() {
        let points = [Point2D::new(0.1, 0.8)];
        let config = LloydConfig {
            max_iterations: 5,
            resolution: 16,
            ..Default::default()
        };
        let lloyd = LloydRelaxation::new(config).unwrap();
        let (relaxed, stats) = lloyd.relax_points(&points, unit_square()).unwrap();

        assert_relative_eq!(relaxed[0].x, 0.5, epsilon = 1e-9);
        assert_relative_eq!(relaxed[0].y, 0.5, epsilon = 1e-9);
        // Zweite Iteration bewegt nichts mehr
        assert!(stats.converged);
        assert_eq!(stats.final_iteration, 1);
    }

    #[test]
    fn test_energy_decreases() {
        let points = vec![
            Point2D::new(0.05, 0.05),
            Point2D::new(0.1, 0.05),
            Point2D::new(0.05, 0.1),
            Point2D::new(0.95, 0.95),
        ];
        let config = LloydConfig {
            max_iterations: 10,
            convergence_tolerance: 0.0,
            resolution: 32,
            relaxation_weight: 1.0,
        };
        let lloyd = LloydRelaxation::new(config).unwrap();
        let (_, stats) = lloyd.relax_points(&points, unit_square()).unwrap();

        let first = stats.iterations.first().unwrap().energy;
        let last = stats.iterations.last().unwrap().energy;
        assert!(last < first, "energy {} should drop below {}", last, first);
    }

    #[test]
    fn test_points_outside_are_clamped() {
        let points = [Point2D::new(-0.5, 0.5), Point2D::new(0.5, 0.5)];
        let config = LloydConfig {
            max_iterations: 1,
            ..Default::default()
        };
        let lloyd = LloydRelaxation::new(config).unwrap();
        let (relaxed, _) = lloyd.relax_points(&points, unit_square()).unwrap();

        for point in &relaxed {
            assert!(unit_square().contains_point(*point));
        }
    }

    #[test]
    fn test_duplicate_sites_keep_position() {
        let points = [Point2D::new(0.3, 0.3), Point2D::new(0.3, 0.3)];
        let config = LloydConfig {
            max_iterations: 1,
            resolution: 8,
            ..Default::default()
        };
        let lloyd = LloydRelaxation::new(config).unwrap();
        let (relaxed, _) = lloyd.relax_points(&points, unit_square()).unwrap();

        // Index 0 gewinnt jeden Gleichstand, Index 1 bekommt keine Pixel
        assert_relative_eq!(relaxed[0].x, 0.5, epsilon = 1e-9);
        assert_eq!(relaxed[1], Point2D::new(0.3, 0.3));
    }

    #[test]
    fn test_invalid_input() {
        let lloyd = LloydRelaxation::new(LloydConfig::default()).unwrap();
        assert_eq!(
            lloyd.relax_points(&[], unit_square()),
            Err(MathError::InsufficientPoints {
                expected: 1,
                actual: 0
            })
        );

        for config in [
            LloydConfig {
                resolution: 0,
                ..Default::default()
            },
            LloydConfig {
                relaxation_weight: 0.0,
                ..Default::default()
            },
            LloydConfig {
                convergence_tolerance: f64::NAN,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                LloydRelaxation::new(config),
                Err(MathError::InvalidConfiguration { .. })
            ));
        }
    }
}
