// src/math/geometry/metric.rs

//! Distanzfunktionen für die Zellzuordnung.
//!
//! Ein [`Metric`] liefert für zwei Punkte eines Raums eine Distanz als `f64`.
//! Die Implementierungen hier gehen davon aus, dass die Metrik-Axiome gelten
//! (Nicht-Negativität, Identität, Symmetrie, Dreiecksungleichung); geprüft
//! wird das nicht.

use crate::math::types::{DVec2, DVec3, Vec2, Vec3};
use nalgebra::{Point, SVector};
use serde::{Deserialize, Serialize};

/// Distanz zwischen zwei Punkten vom Typ `P`.
pub trait Metric<P: ?Sized> {
    /// Berechnet die Distanz zwischen `a` und `b`.
    fn distance(&self, a: &P, b: &P) -> f64;
}

impl<P: ?Sized, M: Metric<P> + ?Sized> Metric<P> for &M {
    fn distance(&self, a: &P, b: &P) -> f64 {
        (**self).distance(a, b)
    }
}

/// Adapter für beliebige Closures `Fn(&P, &P) -> f64`.
#[derive(Debug, Clone, Copy)]
pub struct DistanceFn<F>(pub F);

impl<P: ?Sized, F> Metric<P> for DistanceFn<F>
where
    F: Fn(&P, &P) -> f64,
{
    fn distance(&self, a: &P, b: &P) -> f64 {
        (self.0)(a, b)
    }
}

/// Euklidische Distanz (L2)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Euclidean;

/// Manhattan-Distanz (L1)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manhattan;

/// Chebyshev-Distanz (L∞)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chebyshev;

/// Großkreisdistanz auf einer Kugel mit Radius `radius`.
///
/// Punkte werden als Richtungsvektoren vom Kugelmittelpunkt interpretiert,
/// ihre Länge spielt keine Rolle. Der Nullvektor hat keine Richtung und
/// liefert NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreatCircle {
    pub radius: f64,
}

impl GreatCircle {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Einheitskugel
    pub fn unit() -> Self {
        Self::new(1.0)
    }
}

impl Default for GreatCircle {
    fn default() -> Self {
        Self::unit()
    }
}

impl<const N: usize> Metric<[f64; N]> for Euclidean {
    fn distance(&self, a: &[f64; N], b: &[f64; N]) -> f64 {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| {
                let d = x - y;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }
}

impl Metric<DVec2> for Euclidean {
    fn distance(&self, a: &DVec2, b: &DVec2) -> f64 {
        // Gleiche Reihenfolge der Operationen wie Spade's `distance_2`
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Metric<DVec3> for Euclidean {
    fn distance(&self, a: &DVec3, b: &DVec3) -> f64 {
        a.distance(*b)
    }
}

impl Metric<Vec2> for Euclidean {
    fn distance(&self, a: &Vec2, b: &Vec2) -> f64 {
        Euclidean.distance(&a.as_dvec2(), &b.as_dvec2())
    }
}

impl Metric<Vec3> for Euclidean {
    fn distance(&self, a: &Vec3, b: &Vec3) -> f64 {
        a.as_dvec3().distance(b.as_dvec3())
    }
}

impl<const D: usize> Metric<SVector<f64, D>> for Euclidean {
    fn distance(&self, a: &SVector<f64, D>, b: &SVector<f64, D>) -> f64 {
        (a - b).norm()
    }
}

impl<const D: usize> Metric<Point<f64, D>> for Euclidean {
    fn distance(&self, a: &Point<f64, D>, b: &Point<f64, D>) -> f64 {
        nalgebra::distance(a, b)
    }
}

impl<const N: usize> Metric<[f64; N]> for Manhattan {
    fn distance(&self, a: &[f64; N], b: &[f64; N]) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| (x - y).abs()).sum()
    }
}

impl Metric<DVec2> for Manhattan {
    fn distance(&self, a: &DVec2, b: &DVec2) -> f64 {
        let d = (*a - *b).abs();
        d.x + d.y
    }
}

impl<const N: usize> Metric<[f64; N]> for Chebyshev {
    fn distance(&self, a: &[f64; N], b: &[f64; N]) -> f64 {
        // fold statt max_by, damit NaN durchgereicht wird
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, |acc, d| if d > acc || d.is_nan() { d } else { acc })
    }
}

impl Metric<DVec2> for Chebyshev {
    fn distance(&self, a: &DVec2, b: &DVec2) -> f64 {
        Chebyshev.distance(&a.to_array(), &b.to_array())
    }
}

impl Metric<DVec3> for GreatCircle {
    fn distance(&self, a: &DVec3, b: &DVec3) -> f64 {
        let denominator = (a.length_squared() * b.length_squared()).sqrt();
        if denominator == 0.0 {
            return f64::NAN;
        }
        let cos_angle = (a.dot(*b) / denominator).clamp(-1.0, 1.0);
        self.radius * cos_angle.acos()
    }
}
