// src/math/geometry/voronoi/raster.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::voronoi::query::NearestSite,
    types::*,
};
use bevy_log::debug;

/// Diskrete Zellzuordnung auf einem regelmäßigen Raster.
///
/// Jedes Pixel wird an seinem Mittelpunkt abgetastet und mit dem Index der
/// nächsten Site beschriftet.
#[derive(Debug, Clone, PartialEq)]
pub struct CellRaster {
    bounds: Bounds2D,
    width: usize,
    height: usize,
    labels: Vec<usize>,
}

impl CellRaster {
    pub fn compute<Q>(query: &Q, bounds: Bounds2D, width: usize, height: usize) -> MathResult<Self>
    where
        Q: NearestSite<Point2D> + ?Sized,
    {
        if width == 0 || height == 0 {
            return Err(MathError::InvalidConfiguration {
                message: format!("Raster dimensions must be positive, got {}x{}", width, height),
            });
        }
        if !bounds.is_valid() {
            return Err(MathError::InvalidConfiguration {
                message: format!("Invalid raster bounds {}", bounds),
            });
        }
        if query.is_empty() {
            return Err(MathError::EmptyDiagram);
        }
        let pixel_count = width
            .checked_mul(height)
            .ok_or_else(|| MathError::InvalidConfiguration {
                message: format!("Raster {}x{} is too large", width, height),
            })?;

        let mut raster = Self {
            bounds,
            width,
            height,
            labels: Vec::with_capacity(pixel_count),
        };
        for y in 0..height {
            for x in 0..width {
                let label = query.nearest(&raster.pixel_center(x, y))?;
                raster.labels.push(label);
            }
        }

        debug!(
            "CellRaster::compute: {}x{} pixels over {} for {} sites",
            width,
            height,
            bounds,
            query.site_count()
        );
        Ok(raster)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn bounds(&self) -> &Bounds2D {
        &self.bounds
    }

    /// Labels zeilenweise, beginnend bei `bounds.min.y`
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    pub fn label(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.labels.get(y * self.width + x).copied()
    }

    /// Größe eines Pixels in Weltkoordinaten
    pub fn pixel_size(&self) -> Point2D {
        Point2D::new(
            self.bounds.width() / self.width as f64,
            self.bounds.height() / self.height as f64,
        )
    }

    pub fn pixel_center(&self, x: usize, y: usize) -> Point2D {
        self.bounds.min + self.pixel_size() * Point2D::new(x as f64 + 0.5, y as f64 + 0.5)
    }

    /// Anzahl Pixel pro Site
    pub fn cell_pixel_counts(&self, site_count: usize) -> Vec<usize> {
        let mut counts = vec![0; site_count];
        for &label in &self.labels {
            if let Some(count) = counts.get_mut(label) {
                *count += 1;
            }
        }
        counts
    }

    /// Flächenanteil jeder Zelle an den Raster-Bounds
    pub fn cell_area_fractions(&self, site_count: usize) -> Vec<f64> {
        let total = self.labels.len() as f64;
        self.cell_pixel_counts(site_count)
            .into_iter()
            .map(|count| count as f64 / total)
            .collect()
    }

    /// Schwerpunkt jeder Zelle; `None` für Zellen ohne Pixel
    pub fn cell_centroids(&self, site_count: usize) -> Vec<Option<Point2D>> {
        let mut sums = vec![Point2D::ZERO; site_count];
        let mut counts = vec![0_usize; site_count];

        for y in 0..self.height {
            for x in 0..self.width {
                let label = self.labels[y * self.width + x];
                if label < site_count {
                    sums[label] += self.pixel_center(x, y);
                    counts[label] += 1;
                }
            }
        }

        sums.into_iter()
            .zip(counts)
            .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
            .collect()
    }
}
