// src/math/geometry/voronoi/query.rs
use crate::math::error::MathResult;

/// Abfrageschnittstelle für Nächste-Site-Strukturen.
///
/// Implementiert von [`VoronoiDiagram`](super::VoronoiDiagram) (lineare Suche,
/// Referenzverhalten) und [`SpatialVoronoi`](super::SpatialVoronoi)
/// (Delaunay-beschleunigt). Beide müssen für jede Eingabe dieselben Antworten
/// liefern.
pub trait NearestSite<P> {
    /// Anzahl der Sites
    fn site_count(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.site_count() == 0
    }

    /// Index und Distanz der nächsten Site. Bei Gleichstand gewinnt der
    /// kleinste Index.
    fn nearest_with_distance(&self, point: &P) -> MathResult<(usize, f64)>;

    /// Index der nächsten Site. Bei Gleichstand gewinnt der kleinste Index.
    fn nearest(&self, point: &P) -> MathResult<usize> {
        self.nearest_with_distance(point).map(|(index, _)| index)
    }

    /// Liegt `point` in der Zelle von `site`? Ränder gehören zu allen
    /// angrenzenden Zellen.
    fn in_cell(&self, point: &P, site: usize) -> MathResult<bool>;

    /// Alle Sites, deren Zelle `point` enthält, aufsteigend sortiert.
    fn cell_members(&self, point: &P) -> MathResult<Vec<usize>>;
}
