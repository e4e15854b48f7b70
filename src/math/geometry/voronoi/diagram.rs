// src/math/geometry/voronoi/diagram.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::{
        metric::Metric,
        voronoi::{config::VoronoiConfig, query::NearestSite},
    },
};
use bevy_log::debug;

/// Voronoi-Diagramm über einer festen, geordneten Menge von Sites.
///
/// Zellen werden nicht gespeichert: Die Zugehörigkeit eines Punktes wird bei
/// jeder Abfrage per linearer Suche über alle Sites bestimmt. Die Sites werden
/// nur geliehen und nach der Konstruktion nie verändert.
#[derive(Debug, Clone)]
pub struct VoronoiDiagram<'a, P, M> {
    sites: &'a [P],
    metric: M,
    config: VoronoiConfig,
}

impl<'a, P, M: Metric<P>> VoronoiDiagram<'a, P, M> {
    /// Erstellt ein Diagramm mit exaktem Distanzvergleich
    pub fn new(sites: &'a [P], metric: M) -> Self {
        debug!("VoronoiDiagram::new: {} sites", sites.len());
        Self {
            sites,
            metric,
            config: VoronoiConfig::exact(),
        }
    }

    /// Erstellt ein Diagramm aus einem Array fester Größe
    pub fn from_array<const N: usize>(sites: &'a [P; N], metric: M) -> Self {
        Self::new(sites.as_slice(), metric)
    }

    /// Erstellt ein Diagramm und prüft, dass genau `expected` Sites übergeben wurden
    pub fn with_site_count(sites: &'a [P], expected: usize, metric: M) -> MathResult<Self> {
        if sites.len() != expected {
            return Err(MathError::InvalidConfiguration {
                message: format!(
                    "Expected exactly {} sites, got {}",
                    expected,
                    sites.len()
                ),
            });
        }
        Ok(Self::new(sites, metric))
    }

    /// Erstellt ein Diagramm mit eigener Konfiguration
    pub fn with_config(sites: &'a [P], metric: M, config: VoronoiConfig) -> MathResult<Self> {
        config.validate()?;
        debug!(
            "VoronoiDiagram::with_config: {} sites, tie tolerance {}",
            sites.len(),
            config.tie_tolerance
        );
        Ok(Self {
            sites,
            metric,
            config,
        })
    }

    pub fn sites(&self) -> &'a [P] {
        self.sites
    }

    pub fn site(&self, index: usize) -> Option<&'a P> {
        self.sites.get(index)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    pub fn config(&self) -> &VoronoiConfig {
        &self.config
    }

    /// Index der nächsten Site. Bei Gleichstand gewinnt der kleinste Index.
    pub fn nearest(&self, point: &P) -> MathResult<usize> {
        self.nearest_with_distance(point).map(|(index, _)| index)
    }

    /// Index und Distanz der nächsten Site
    pub fn nearest_with_distance(&self, point: &P) -> MathResult<(usize, f64)> {
        let (best_index, best_distance) = self.scan_minimum(point)?;
        if self.config.is_exact() {
            return Ok((best_index, best_distance));
        }

        // Mit Toleranz: kleinster Index, der noch als gleich weit gilt
        let threshold = best_distance + self.config.tie_tolerance;
        for index in 0..best_index {
            let distance = self.distance_to(point, index)?;
            if distance <= threshold {
                return Ok((index, distance));
            }
        }
        Ok((best_index, best_distance))
    }

    /// Prüft, ob `point` in der Zelle von `site` liegt: keine andere Site ist
    /// echt näher. Gleich weit entfernte Sites teilen sich den Punkt.
    pub fn in_cell(&self, point: &P, site: usize) -> MathResult<bool> {
        self.check_site(site)?;
        let distances = self.distances(point)?;
        let site_distance = distances[site];

        Ok(distances
            .iter()
            .all(|distance| distance + self.config.tie_tolerance >= site_distance))
    }

    /// Alle Sites, deren Zelle `point` enthält, aufsteigend sortiert
    pub fn cell_members(&self, point: &P) -> MathResult<Vec<usize>> {
        let distances = self.distances(point)?;
        let minimum = distances.iter().copied().fold(f64::INFINITY, f64::min);
        let threshold = minimum + self.config.tie_tolerance;

        Ok(distances
            .iter()
            .enumerate()
            .filter(|(_, distance)| **distance <= threshold)
            .map(|(index, _)| index)
            .collect())
    }

    /// Distanzen von `point` zu allen Sites in Index-Reihenfolge
    pub fn distances(&self, point: &P) -> MathResult<Vec<f64>> {
        if self.sites.is_empty() {
            return Err(MathError::EmptyDiagram);
        }
        (0..self.sites.len())
            .map(|index| self.distance_to(point, index))
            .collect()
    }

    /// Lineare Suche; striktes `<` hält bei Gleichstand den kleineren Index.
    fn scan_minimum(&self, point: &P) -> MathResult<(usize, f64)> {
        if self.sites.is_empty() {
            return Err(MathError::EmptyDiagram);
        }

        let mut best_index = 0;
        let mut best_distance = self.distance_to(point, 0)?;
        for index in 1..self.sites.len() {
            let distance = self.distance_to(point, index)?;
            if distance < best_distance {
                best_index = index;
                best_distance = distance;
            }
        }
        Ok((best_index, best_distance))
    }

    fn distance_to(&self, point: &P, index: usize) -> MathResult<f64> {
        let distance = self.metric.distance(point, &self.sites[index]);
        if distance.is_nan() {
            return Err(MathError::InvalidDistance { site: index });
        }
        Ok(distance)
    }

    fn check_site(&self, site: usize) -> MathResult<()> {
        if self.sites.is_empty() {
            return Err(MathError::EmptyDiagram);
        }
        if site >= self.sites.len() {
            return Err(MathError::SiteOutOfRange {
                index: site,
                site_count: self.sites.len(),
            });
        }
        Ok(())
    }
}

impl<P, M: Metric<P>> NearestSite<P> for VoronoiDiagram<'_, P, M> {
    fn site_count(&self) -> usize {
        self.len()
    }

    fn nearest_with_distance(&self, point: &P) -> MathResult<(usize, f64)> {
        VoronoiDiagram::nearest_with_distance(self, point)
    }

    fn in_cell(&self, point: &P, site: usize) -> MathResult<bool> {
        VoronoiDiagram::in_cell(self, point, site)
    }

    fn cell_members(&self, point: &P) -> MathResult<Vec<usize>> {
        VoronoiDiagram::cell_members(self, point)
    }
}
