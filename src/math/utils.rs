// src/math/utils.rs

/// Geometrische Hilfsfunktionen (einfach, ohne komplexe Strukturen)
pub mod simple_geometry {
    use crate::math::types::Point2D;

    /// Lineare Interpolation zwischen zwei Punkten
    pub fn lerp_point(from: Point2D, to: Point2D, t: f64) -> Point2D {
        from + (to - from) * t
    }
}
