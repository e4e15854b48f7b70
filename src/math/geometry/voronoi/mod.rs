// src/math/geometry/voronoi/mod.rs

// Deklaration der Untermodule für Voronoi-spezifische Funktionalität
pub mod config;
pub mod diagram; // Referenz: lineare Suche über alle Sites
pub mod lloyd;
pub mod query;
pub mod raster;
pub mod triangulation; // Delaunay-beschleunigte Suche (nur euklidisch, 2D)

// Re-Exporte für den einfachen Zugriff auf die wichtigsten Voronoi-Elemente
pub use self::config::VoronoiConfig;
pub use self::diagram::VoronoiDiagram;
pub use self::lloyd::{LloydConfig, LloydIterationStats, LloydRelaxation, LloydStatistics};
pub use self::query::NearestSite;
pub use self::raster::CellRaster;
pub use self::triangulation::SpatialVoronoi;
