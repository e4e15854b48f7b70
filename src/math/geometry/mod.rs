// src/math/geometry/mod.rs

// Deklaration der Haupt-Geometriemodule
pub mod metric;
pub mod sampling;
pub mod voronoi;

// Re-Exporte für einen schnellen Zugriff auf die Kern-Geometrietypen,
// falls man nicht das gesamte `math::prelude` importieren möchte.
pub use self::metric::{Chebyshev, DistanceFn, Euclidean, GreatCircle, Manhattan, Metric};
pub use self::sampling::{SamplingMethod, SiteSampler};
pub use self::voronoi::{
    CellRaster, LloydConfig, LloydRelaxation, LloydStatistics, NearestSite, SpatialVoronoi,
    VoronoiConfig, VoronoiDiagram,
};
