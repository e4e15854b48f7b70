// src/math/types/mod.rs
pub mod bounds;

pub use bounds::*;

// Re-export häufig verwendete externe Typen
pub use bevy_math::{DVec2, DVec3, Vec2, Vec3};
pub use spade::Point2;

// Einheitliche Typen für das gesamte Modul
pub type Point2D = DVec2;
pub type Point3D = DVec3;
pub type SpadePoint = Point2<f64>;

/// Konvertiert einen Punkt in Spade's Punkttyp
pub fn to_spade_point(point: Point2D) -> SpadePoint {
    SpadePoint::new(point.x, point.y)
}
