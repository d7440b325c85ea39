use bevy::math::cubic_splines::{CubicCardinalSpline, CubicCurve, CyclicCubicGenerator};
use bevy::prelude::*;

/// Closed, smoothly interpolated route through an ordered set of control
/// points, sampled by a normalised parameter that wraps at 1.0.
pub struct PathCurve {
    curve: CubicCurve<Vec3>,
    segment_count: usize,
}

impl PathCurve {
    /// Builds a closed cardinal spline through `points`. Returns `None` when
    /// there are too few points to form a loop.
    pub fn closed(points: Vec<Vec3>, tension: f32) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let curve = CubicCardinalSpline::new(tension, points)
            .to_curve_cyclic()
            .ok()?;
        let segment_count = curve.segments().len();
        Some(Self {
            curve,
            segment_count,
        })
    }

    /// Samples the route at `t`, wrapped into [0, 1).
    pub fn point_at(&self, t: f32) -> Vec3 {
        let t = t.rem_euclid(1.0);
        self.curve.position(t * self.segment_count as f32)
    }

    /// Samples inside a sub-span of the route: `f` in [0, 1] maps linearly
    /// onto [span.0, span.1].
    pub fn point_in_span(&self, span: (f32, f32), f: f32) -> Vec3 {
        let f = f.clamp(0.0, 1.0);
        self.point_at(span.0 + (span.1 - span.0) * f)
    }
}

/// Routes the orchestrator borrows every tick: the main travel path through
/// all regions and the orbit ring around the refinement core.
#[derive(Resource)]
pub struct PipelinePaths {
    pub main: PathCurve,
    pub rar_ring: PathCurve,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(-4.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, -4.0),
            Vec3::new(4.0, 0.0, 4.0),
            Vec3::new(-4.0, 0.0, 4.0),
        ]
    }

    #[test]
    fn rejects_too_few_points() {
        assert!(PathCurve::closed(vec![Vec3::ZERO, Vec3::X], 0.5).is_none());
    }

    #[test]
    fn passes_through_control_points() {
        let points = square();
        let curve = PathCurve::closed(points.clone(), 0.5).unwrap();
        for (i, expected) in points.iter().enumerate() {
            let sampled = curve.point_at(i as f32 / points.len() as f32);
            assert!(
                sampled.distance(*expected) < 1e-3,
                "control point {i}: {sampled:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn parameter_wraps_past_one() {
        let curve = PathCurve::closed(square(), 0.5).unwrap();
        let a = curve.point_at(0.25);
        let b = curve.point_at(1.25);
        assert!(a.distance(b) < 1e-4);
    }

    #[test]
    fn span_sampling_clamps_and_maps() {
        let curve = PathCurve::closed(square(), 0.5).unwrap();
        let start = curve.point_in_span((0.1, 0.3), 0.0);
        let end = curve.point_in_span((0.1, 0.3), 1.0);
        assert!(start.distance(curve.point_at(0.1)) < 1e-5);
        assert!(end.distance(curve.point_at(0.3)) < 1e-5);
        let over = curve.point_in_span((0.1, 0.3), 2.0);
        assert!(over.distance(end) < 1e-5);
    }
}
