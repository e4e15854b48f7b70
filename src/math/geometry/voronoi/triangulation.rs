// src/math/geometry/voronoi/triangulation.rs

use crate::math::{
    error::{MathError, MathResult},
    geometry::{
        metric::{Euclidean, Metric},
        voronoi::{diagram::VoronoiDiagram, query::NearestSite},
    },
    types::*,
};
use bevy_log::debug;
use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, HasPosition, Triangulation};
use std::collections::{HashMap, HashSet, VecDeque};

/// Vertex der Triangulation: Position plus kleinster Site-Index an dieser Position
#[derive(Debug, Clone, Copy)]
struct SiteVertex {
    position: SpadePoint,
    index: usize,
}

impl HasPosition for SiteVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint {
        self.position
    }
}

type SiteTriangulation = DelaunayTriangulation<SiteVertex>;

/// Relative Breite des Suchbands um die Distanz des lokalen Minimums, in
/// Vielfachen von `f64::EPSILON`. Die euklidische Distanz ist auf wenige
/// Rundungsschritte genau; das Band deckt diese Abweichung mehrfach ab.
const TIE_BAND_ULPS: f64 = 16.0;

/// Beschleunigte Nächste-Site-Suche für euklidische 2D-Sites.
///
/// Liefert für jede Anfrage dieselben Antworten wie
/// `VoronoiDiagram<Point2D, Euclidean>` mit exaktem Vergleich, inklusive
/// Gleichständen und doppelter Sites.
pub struct SpatialVoronoi<'a> {
    sites: &'a [Point2D],
    triangulation: SiteTriangulation,
    /// Alle Indizes pro Position, falls Sites mehrfach vorkommen
    duplicates: HashMap<usize, Vec<usize>>,
}

impl<'a> SpatialVoronoi<'a> {
    pub fn new(sites: &'a [Point2D]) -> MathResult<Self> {
        let mut triangulation = SiteTriangulation::new();
        let mut first_at_position: HashMap<(u64, u64), usize> = HashMap::new();
        let mut duplicates: HashMap<usize, Vec<usize>> = HashMap::new();

        for (index, site) in sites.iter().enumerate() {
            if !site.is_finite() {
                return Err(MathError::InvalidConfiguration {
                    message: format!("Site {} has non-finite coordinates {:?}", index, site),
                });
            }

            let key = position_key(*site);
            if let Some(&first) = first_at_position.get(&key) {
                duplicates.entry(first).or_insert_with(|| vec![first]).push(index);
                continue;
            }
            first_at_position.insert(key, index);

            triangulation
                .insert(SiteVertex {
                    position: to_spade_point(*site),
                    index,
                })
                .map_err(|e| MathError::InvalidConfiguration {
                    message: format!(
                        "Site {} at {:?} rejected by triangulation: {:?}",
                        index, site, e
                    ),
                })?;
        }

        debug!(
            "SpatialVoronoi::new: {} sites, {} distinct positions, {} triangulation faces",
            sites.len(),
            triangulation.num_vertices(),
            triangulation.num_inner_faces()
        );

        Ok(Self {
            sites,
            triangulation,
            duplicates,
        })
    }

    pub fn sites(&self) -> &'a [Point2D] {
        self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Anzahl unterschiedlicher Positionen
    pub fn distinct_sites(&self) -> usize {
        self.triangulation.num_vertices()
    }

    pub fn nearest(&self, point: &Point2D) -> MathResult<usize> {
        self.nearest_with_distance(point).map(|(index, _)| index)
    }

    pub fn nearest_with_distance(&self, point: &Point2D) -> MathResult<(usize, f64)> {
        if !point.is_finite() {
            return self.reference().nearest_with_distance(point);
        }
        let (ties, distance) = self.tied_sites(point)?;
        let index = ties.into_iter().min().ok_or(MathError::EmptyDiagram)?;
        Ok((index, distance))
    }

    pub fn in_cell(&self, point: &Point2D, site: usize) -> MathResult<bool> {
        if self.sites.is_empty() {
            return Err(MathError::EmptyDiagram);
        }
        if site >= self.sites.len() {
            return Err(MathError::SiteOutOfRange {
                index: site,
                site_count: self.sites.len(),
            });
        }
        if !point.is_finite() {
            return self.reference().in_cell(point, site);
        }

        let (_, minimum) = self.nearest_with_distance(point)?;
        Ok(self.site_distance(point, site) <= minimum)
    }

    pub fn cell_members(&self, point: &Point2D) -> MathResult<Vec<usize>> {
        if !point.is_finite() {
            return self.reference().cell_members(point);
        }

        let (ties, _) = self.tied_sites(point)?;
        let mut members: Vec<usize> = ties
            .into_iter()
            .flat_map(|first| match self.duplicates.get(&first) {
                Some(all) => all.clone(),
                None => vec![first],
            })
            .collect();
        members.sort_unstable();
        Ok(members)
    }

    /// Lineare Suche über dieselben Sites
    fn reference(&self) -> VoronoiDiagram<'a, Point2D, Euclidean> {
        VoronoiDiagram::new(self.sites, Euclidean)
    }

    fn site_distance(&self, point: &Point2D, index: usize) -> f64 {
        Euclidean.distance(point, &self.sites[index])
    }

    /// Erste Site-Indizes aller Vertices mit minimaler Distanz zu `point`.
    ///
    /// Nach dem Abstieg liegt das exakte Minimum höchstens wenige Rundungsschritte
    /// unter der Distanz des erreichten Vertex. Alle Sites innerhalb eines Kreises
    /// um `point` bilden einen zusammenhängenden Delaunay-Teilgraphen, daher
    /// genügt eine Breitensuche über Nachbarn im Toleranzband; Minimum und
    /// Gleichstände werden danach exakt über die gefundenen Kandidaten bestimmt.
    fn tied_sites(&self, point: &Point2D) -> MathResult<(Vec<usize>, f64)> {
        let mut current = self
            .triangulation
            .nearest_neighbor(to_spade_point(*point))
            .ok_or(MathError::EmptyDiagram)?;
        let mut current_distance = self.site_distance(point, current.data().index);

        // Solange ein Nachbar echt näher ist, weiterlaufen
        loop {
            let closer = current
                .out_edges()
                .map(|edge| edge.to())
                .map(|neighbor| (neighbor, self.site_distance(point, neighbor.data().index)))
                .filter(|(_, distance)| *distance < current_distance)
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match closer {
                Some((neighbor, distance)) => {
                    debug!(
                        "SpatialVoronoi: descending to closer vertex {:?}",
                        neighbor.position()
                    );
                    current = neighbor;
                    current_distance = distance;
                }
                None => break,
            }
        }

        let band = current_distance * (1.0 + TIE_BAND_ULPS * f64::EPSILON);
        let mut visited: HashSet<FixedVertexHandle> = HashSet::new();
        visited.insert(current.fix());
        let mut candidates = vec![(current.data().index, current_distance)];
        let mut queue = VecDeque::from([current]);
        while let Some(vertex) = queue.pop_front() {
            for edge in vertex.out_edges() {
                let neighbor = edge.to();
                if !visited.insert(neighbor.fix()) {
                    continue;
                }
                let distance = self.site_distance(point, neighbor.data().index);
                if distance <= band {
                    candidates.push((neighbor.data().index, distance));
                    queue.push_back(neighbor);
                }
            }
        }

        let minimum = candidates
            .iter()
            .map(|(_, distance)| *distance)
            .fold(current_distance, f64::min);
        if minimum < current_distance {
            debug!(
                "SpatialVoronoi: local minimum {} undercut by {} within the tie band",
                current_distance, minimum
            );
        }
        let ties = candidates
            .into_iter()
            .filter(|(_, distance)| *distance == minimum)
            .map(|(index, _)| index)
            .collect();

        Ok((ties, minimum))
    }
}

/// Schlüssel für bitgenaue Positionsgleichheit; `-0.0` und `0.0` fallen zusammen.
fn position_key(point: Point2D) -> (u64, u64) {
    ((point.x + 0.0).to_bits(), (point.y + 0.0).to_bits())
}

impl NearestSite<Point2D> for SpatialVoronoi<'_> {
    fn site_count(&self) -> usize {
        self.len()
    }

    fn nearest_with_distance(&self, point: &Point2D) -> MathResult<(usize, f64)> {
        SpatialVoronoi::nearest_with_distance(self, point)
    }

    fn in_cell(&self, point: &Point2D, site: usize) -> MathResult<bool> {
        SpatialVoronoi::in_cell(self, point, site)
    }

    fn cell_members(&self, point: &Point2D) -> MathResult<Vec<usize>> {
        SpatialVoronoi::cell_members(self, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    fn assert_matches_reference(sites: &[Point2D], queries: &[Point2D]) {
        let spatial = SpatialVoronoi::new(sites).unwrap();
        let reference = VoronoiDiagram::new(sites, Euclidean);

        for query in queries {
            assert_eq!(
                spatial.nearest(query).unwrap(),
                reference.nearest(query).unwrap(),
                "nearest mismatch for {:?}",
                query
            );
            assert_eq!(
                spatial.cell_members(query).unwrap(),
                reference.cell_members(query).unwrap(),
                "cell members mismatch for {:?}",
                query
            );
            for site in 0..sites.len() {
                assert_eq!(
                    spatial.in_cell(query, site).unwrap(),
                    reference.in_cell(query, site).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_tie_and_non_tie_scenarios() {
        let sites = [Point2D::new(0.0, 0.0), Point2D::new(2.0, 0.0)];
        let spatial = SpatialVoronoi::new(&sites).unwrap();
        let query = Point2D::new(1.0, 0.0);
        assert_eq!(spatial.nearest(&query).unwrap(), 0);
        assert!(spatial.in_cell(&query, 0).unwrap());
        assert!(spatial.in_cell(&query, 1).unwrap());

        let sites = [
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(0.0, 10.0),
        ];
        let spatial = SpatialVoronoi::new(&sites).unwrap();
        let query = Point2D::new(1.0, 1.0);
        assert_eq!(spatial.nearest(&query).unwrap(), 0);
        assert!(!spatial.in_cell(&query, 1).unwrap());
        assert!(!spatial.in_cell(&query, 2).unwrap());
    }

    #[test]
    fn test_empty_and_single() {
        let empty: [Point2D; 0] = [];
        let spatial = SpatialVoronoi::new(&empty).unwrap();
        assert_eq!(
            spatial.nearest(&Point2D::ZERO),
            Err(MathError::EmptyDiagram)
        );
        assert_eq!(
            spatial.in_cell(&Point2D::ZERO, 0),
            Err(MathError::EmptyDiagram)
        );

        let single = [Point2D::new(4.0, 4.0)];
        let spatial = SpatialVoronoi::new(&single).unwrap();
        assert_eq!(spatial.nearest(&Point2D::new(-100.0, 3.0)).unwrap(), 0);
        assert!(spatial.in_cell(&Point2D::new(-100.0, 3.0), 0).unwrap());
    }

    #[test]
    fn test_cocircular_ties() {
        // Acht Sites auf einem Kreis um den Ursprung, dazu ein Ausreißer mit Index 0
        let mut sites = vec![Point2D::new(50.0, 50.0)];
        sites.extend([
            Point2D::new(5.0, 0.0),
            Point2D::new(3.0, 4.0),
            Point2D::new(0.0, 5.0),
            Point2D::new(-4.0, 3.0),
            Point2D::new(-5.0, 0.0),
            Point2D::new(-3.0, -4.0),
            Point2D::new(0.0, -5.0),
            Point2D::new(4.0, -3.0),
        ]);
        let spatial = SpatialVoronoi::new(&sites).unwrap();
        assert_eq!(spatial.nearest(&Point2D::ZERO).unwrap(), 1);
        assert_eq!(
            spatial.cell_members(&Point2D::ZERO).unwrap(),
            (1..=8).collect::<Vec<_>>()
        );
        assert_matches_reference(&sites, &[Point2D::ZERO, Point2D::new(0.5, 0.5)]);
    }

    #[test]
    fn test_collinear_sites() {
        let sites: Vec<Point2D> = (0..6).map(|i| Point2D::new(i as f64 * 2.0, 0.0)).collect();
        let queries = [
            Point2D::new(1.0, 0.0),
            Point2D::new(3.0, 7.0),
            Point2D::new(-4.0, -1.0),
            Point2D::new(10.0, 0.0),
        ];
        assert_matches_reference(&sites, &queries);
    }

    #[test]
    fn test_duplicates_report_all_indices() {
        let sites = [
            Point2D::new(1.0, 1.0),
            Point2D::new(-1.0, -1.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(-0.0, 3.0),
            Point2D::new(0.0, 3.0),
        ];
        let spatial = SpatialVoronoi::new(&sites).unwrap();
        assert_eq!(spatial.distinct_sites(), 3);
        assert_eq!(spatial.cell_members(&Point2D::new(2.0, 2.0)).unwrap(), vec![0, 2]);
        assert_eq!(spatial.nearest(&Point2D::new(0.0, 3.5)).unwrap(), 3);
        assert!(spatial.in_cell(&Point2D::new(0.0, 3.5), 4).unwrap());
        assert_matches_reference(&sites, &[Point2D::new(0.0, 1.0), Point2D::new(0.0, 0.0)]);
    }

    #[test]
    fn test_non_finite_site_rejected() {
        let sites = [Point2D::new(0.0, 0.0), Point2D::new(f64::NAN, 0.0)];
        assert!(matches!(
            SpatialVoronoi::new(&sites),
            Err(MathError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_non_finite_query_uses_reference() {
        let sites = [Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0)];
        let spatial = SpatialVoronoi::new(&sites).unwrap();
        assert_eq!(
            spatial.nearest(&Point2D::new(f64::NAN, 0.0)),
            Err(MathError::InvalidDistance { site: 0 })
        );
    }

    #[test]
    fn test_random_sites_match_reference() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let sites: Vec<Point2D> = (0..200)
            .map(|_| Point2D::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0)))
            .collect();
        let queries: Vec<Point2D> = (0..200)
            .map(|_| Point2D::new(rng.random_range(-150.0..150.0), rng.random_range(-150.0..150.0)))
            .collect();
        assert_matches_reference(&sites, &queries);
    }

    /// Sites auf einem Kreis mit radialem Rauschen in der Größenordnung der
    /// Rundung, Anfragen nahe dem Mittelpunkt.
    fn near_cocircular_sites(
        rng: &mut rand::rngs::StdRng,
        center: Point2D,
        radius: f64,
        count: usize,
    ) -> Vec<Point2D> {
        (0..count)
            .map(|i| {
                let angle = std::f64::consts::TAU * i as f64 / count as f64;
                let noise = 1.0 + rng.random_range(-1.0..1.0) * 1e-15;
                center + Point2D::new(angle.cos(), angle.sin()) * radius * noise
            })
            .collect()
    }

    #[test]
    fn test_near_cocircular_sites_match_reference() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..2000 {
            let sites = near_cocircular_sites(&mut rng, Point2D::ZERO, 100.0, 11);
            let queries = [
                Point2D::ZERO,
                Point2D::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)),
            ];
            assert_matches_reference(&sites, &queries);
        }
    }

    #[test]
    fn test_near_cocircular_random_centers_match_reference() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1234);
        for _ in 0..1000 {
            let center = Point2D::new(
                rng.random_range(-500.0..500.0),
                rng.random_range(-500.0..500.0),
            );
            let radius = rng.random_range(0.5..300.0);
            let count = rng.random_range(3..24);
            let sites = near_cocircular_sites(&mut rng, center, radius, count);
            let offset = Point2D::new(
                rng.random_range(-1e-3..1e-3),
                rng.random_range(-1e-3..1e-3),
            );
            assert_matches_reference(&sites, &[center, center + offset * radius]);
        }
    }

    #[test]
    fn test_integer_grid_with_many_ties() {
        let sites: Vec<Point2D> = (0..25)
            .map(|i| Point2D::new((i % 5) as f64 * 2.0, (i / 5) as f64 * 2.0))
            .collect();
        let queries: Vec<Point2D> = (0..11)
            .flat_map(|x| (0..11).map(move |y| Point2D::new(x as f64, y as f64)))
            .collect();
        assert_matches_reference(&sites, &queries);
    }
}
