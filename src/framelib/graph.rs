//! Explicit frame-transform registry
//!
//! A [`FrameGraph`] maps directed frame pairs to transform edges and
//! resolves multi-hop transforms by breadth-first search over the
//! registered edges. The graph is populated once (see
//! [`FrameGraph::standard`]) and then only read, so a shared reference can
//! serve any number of worker threads.

use crate::earthlib::EarthOrientationProvider;
use crate::framelib::terrestrial;
use crate::framelib::{Frame, FrameError, Result, StateVector};
use crate::time::Time;
use log::debug;
use nalgebra::Matrix3;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Closure computing a rotation matrix for an instant
pub type RotationFn = Arc<dyn Fn(&Time) -> Result<Matrix3<f64>> + Send + Sync>;

/// Closure applying a full state transform
pub type TransformFn = Arc<dyn Fn(&StateVector) -> Result<StateVector> + Send + Sync>;

/// One directed transform between neighboring frames
///
/// A `Rotation` edge supplies a matrix recomputed per instant and applied
/// identically to position and velocity; it is correct only for transforms
/// with no rotation-rate coupling (the matrix is treated as instantaneously
/// frozen). A `Function` edge owns the whole state mapping and is the form
/// to use when a velocity-correction term is involved.
#[derive(Clone)]
pub enum TransformEdge {
    /// Pure rotation, `instant -> matrix`
    Rotation(RotationFn),
    /// Full state function, may adjust velocity beyond the rotation
    Function(TransformFn),
}

impl TransformEdge {
    /// Wrap a per-instant rotation matrix closure
    pub fn rotation<F>(f: F) -> Self
    where
        F: Fn(&Time) -> Result<Matrix3<f64>> + Send + Sync + 'static,
    {
        TransformEdge::Rotation(Arc::new(f))
    }

    /// Wrap a full state-transform closure
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&StateVector) -> Result<StateVector> + Send + Sync + 'static,
    {
        TransformEdge::Function(Arc::new(f))
    }

    fn apply(&self, state: &StateVector, from: Frame, to: Frame) -> Result<StateVector> {
        match self {
            TransformEdge::Rotation(matrix_fn) => {
                if state.acceleration.is_some() {
                    return Err(FrameError::UnsupportedQuantity {
                        from,
                        to,
                        quantity: "acceleration",
                    });
                }
                let matrix = matrix_fn(&state.time)?;
                Ok(StateVector {
                    frame: to,
                    time: state.time,
                    position: state.position.transform(&matrix),
                    velocity: state.velocity.map(|v| v.transform(&matrix)),
                    acceleration: None,
                })
            }
            TransformEdge::Function(transform_fn) => transform_fn(state),
        }
    }
}

/// Directed graph of reference frames and transform edges
///
/// Edges are registered one direction at a time; nothing is auto-inverted.
/// Path resolution picks the shortest chain by edge count and applies the
/// edges in order, so a TEME to ITRS request composes the sidereal and
/// polar-motion edges with no shortcut matrix.
pub struct FrameGraph {
    edges: HashMap<(Frame, Frame), TransformEdge>,
}

impl FrameGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }

    /// The standard graph: TEME <-> TIRS <-> ITRS over the given provider
    pub fn standard(provider: Arc<dyn EarthOrientationProvider>) -> Self {
        let mut graph = Self::new();
        graph.register(
            Frame::Teme,
            Frame::Tirs,
            terrestrial::teme_to_tirs_edge(Arc::clone(&provider)),
        );
        graph.register(
            Frame::Tirs,
            Frame::Teme,
            terrestrial::tirs_to_teme_edge(Arc::clone(&provider)),
        );
        graph.register(
            Frame::Tirs,
            Frame::Itrs,
            terrestrial::tirs_to_itrs_edge(Arc::clone(&provider)),
        );
        graph.register(
            Frame::Itrs,
            Frame::Tirs,
            terrestrial::itrs_to_tirs_edge(provider),
        );
        graph
    }

    /// Register one directed edge, replacing any existing one for the pair
    pub fn register(&mut self, source: Frame, target: Frame, edge: TransformEdge) {
        self.edges.insert((source, target), edge);
    }

    /// Whether a direct edge exists for the pair
    pub fn has_edge(&self, source: Frame, target: Frame) -> bool {
        self.edges.contains_key(&(source, target))
    }

    /// Shortest registered path as a frame sequence, BFS by edge count
    ///
    /// Neighbor expansion is ordered by frame tag so equal-length paths
    /// resolve the same way on every run.
    fn shortest_path(&self, from: Frame, to: Frame) -> Result<Vec<Frame>> {
        let mut predecessor: HashMap<Frame, Frame> = HashMap::new();
        let mut queue = VecDeque::from([from]);

        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = vec![to];
                let mut cursor = to;
                while cursor != from {
                    cursor = predecessor[&cursor];
                    path.push(cursor);
                }
                path.reverse();
                return Ok(path);
            }

            let mut neighbors: Vec<Frame> = self
                .edges
                .keys()
                .filter(|(s, _)| *s == node)
                .map(|(_, t)| *t)
                .collect();
            neighbors.sort();

            for next in neighbors {
                if next != from && !predecessor.contains_key(&next) {
                    predecessor.insert(next, node);
                    queue.push_back(next);
                }
            }
        }

        Err(FrameError::NoPath { from, to })
    }

    /// Transform a state into the target frame
    ///
    /// Applies every edge along the shortest registered path in order. The
    /// output keeps the input's instant and carries `target` as its frame;
    /// the input is never mutated. For a fixed instant and input the result
    /// is bit-for-bit reproducible.
    pub fn transform(&self, state: &StateVector, target: Frame) -> Result<StateVector> {
        if state.frame == target {
            return Ok(*state);
        }

        let path = self.shortest_path(state.frame, target)?;
        debug!(
            "transform path {}: {}",
            state.time,
            path.iter()
                .map(Frame::name)
                .collect::<Vec<_>>()
                .join(" -> ")
        );

        let mut current = *state;
        for hop in path.windows(2) {
            let (from, to) = (hop[0], hop[1]);
            let edge = self
                .edges
                .get(&(from, to))
                .ok_or(FrameError::NoPath { from, to })?;
            current = edge.apply(&current, from, to)?;
        }
        Ok(current)
    }
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{EARTH_ANGVEL, MJD_OFFSET};
    use crate::coordinates::rotation::{orthogonality_defect, rot_z};
    use crate::coordinates::Cartesian3;
    use crate::earthlib::BundledEop;
    use crate::time::{Time, Timescale};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn covered_time() -> Time {
        // Mid-2020, inside the bundled EOP span
        Timescale::default().tt_jd(59_000.0 + MJD_OFFSET, None)
    }

    fn sample_state(time: Time) -> StateVector {
        StateVector::new(Frame::Teme, time, Cartesian3::new(-4_437.95, 2_662.40, 4_396.67))
            .with_velocity(Cartesian3::new(-3.68, -5.62, 0.63))
    }

    #[test]
    fn test_round_trip_identity() {
        let graph = FrameGraph::standard(BundledEop::bundled());
        let mut rng = StdRng::seed_from_u64(19570704);

        for _ in 0..20 {
            let time = covered_time() + rng.gen::<f64>() * 100.0;
            let state = StateVector::new(
                Frame::Teme,
                time,
                Cartesian3::new(
                    rng.gen_range(-7_000.0..7_000.0),
                    rng.gen_range(-7_000.0..7_000.0),
                    rng.gen_range(-7_000.0..7_000.0),
                ),
            )
            .with_velocity(Cartesian3::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
            ));

            for target in [Frame::Tirs, Frame::Itrs] {
                let there = graph.transform(&state, target).unwrap();
                let back = graph.transform(&there, Frame::Teme).unwrap();

                assert_relative_eq!(
                    back.position.x,
                    state.position.x,
                    max_relative = 1e-9
                );
                assert_relative_eq!(
                    back.position.y,
                    state.position.y,
                    max_relative = 1e-9
                );
                assert_relative_eq!(
                    back.position.z,
                    state.position.z,
                    max_relative = 1e-9
                );

                let v0 = state.velocity.unwrap();
                let v1 = back.velocity.unwrap();
                assert_relative_eq!(v1.x, v0.x, max_relative = 1e-9);
                assert_relative_eq!(v1.y, v0.y, max_relative = 1e-9);
                assert_relative_eq!(v1.z, v0.z, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_no_path_on_disconnected_graph() {
        let provider: Arc<dyn EarthOrientationProvider> = BundledEop::bundled();
        let mut graph = FrameGraph::new();
        graph.register(
            Frame::Teme,
            Frame::Tirs,
            crate::framelib::terrestrial::teme_to_tirs_edge(Arc::clone(&provider)),
        );
        graph.register(
            Frame::Tirs,
            Frame::Teme,
            crate::framelib::terrestrial::tirs_to_teme_edge(provider),
        );

        let state = sample_state(covered_time());
        match graph.transform(&state, Frame::Itrs) {
            Err(FrameError::NoPath { from, to }) => {
                assert_eq!(from, Frame::Teme);
                assert_eq!(to, Frame::Itrs);
            }
            other => panic!("expected NoPath, got {other:?}"),
        }
    }

    #[test]
    fn test_no_velocity_pass_through() {
        let graph = FrameGraph::standard(BundledEop::bundled());
        let state = StateVector::new(
            Frame::Teme,
            covered_time(),
            Cartesian3::new(7_000.0, 0.0, 0.0),
        );

        let out = graph.transform(&state, Frame::Itrs).unwrap();
        assert_eq!(out.frame, Frame::Itrs);
        assert!(out.velocity.is_none());
    }

    #[test]
    fn test_acceleration_is_rejected() {
        let graph = FrameGraph::standard(BundledEop::bundled());
        let state = sample_state(covered_time())
            .with_acceleration(Cartesian3::new(0.0, 0.0, -0.008));

        // Both the function edge (TEME->TIRS) and the matrix edge
        // (TIRS->ITRS) must refuse.
        for (start, target) in [(Frame::Teme, Frame::Tirs), (Frame::Tirs, Frame::Itrs)] {
            let mut s = state;
            s.frame = start;
            match graph.transform(&s, target) {
                Err(FrameError::UnsupportedQuantity { quantity, .. }) => {
                    assert_eq!(quantity, "acceleration");
                }
                other => panic!("expected UnsupportedQuantity, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_transform_is_deterministic() {
        let graph = FrameGraph::standard(BundledEop::bundled());
        let state = sample_state(covered_time());

        let first = graph.transform(&state, Frame::Itrs).unwrap();
        let second = graph.transform(&state, Frame::Itrs).unwrap();
        assert_eq!(first.position, second.position);
        assert_eq!(first.velocity, second.velocity);
    }

    #[test]
    fn test_same_frame_is_identity() {
        let graph = FrameGraph::standard(BundledEop::bundled());
        let state = sample_state(covered_time());
        let out = graph.transform(&state, Frame::Teme).unwrap();
        assert_eq!(out.position, state.position);
        assert_eq!(out.velocity, state.velocity);
    }

    #[test]
    fn test_edge_matrices_are_orthogonal() {
        let provider = BundledEop::bundled();
        let time = covered_time();

        let pm = provider.polar_motion(&time).unwrap();
        let matrix = crate::framelib::terrestrial::polar_motion_matrix(&pm);
        assert!(orthogonality_defect(&matrix) < 1e-12);

        let theta = provider.gmst_angle(&time).unwrap();
        assert!(orthogonality_defect(&rot_z(theta)) < 1e-12);
    }

    #[test]
    fn test_missing_velocity_correction_breaks_round_trip() {
        // Regression guard: replace the TEME->TIRS function edge with a
        // bare sidereal rotation (no omega x r term) and the velocity
        // round trip must no longer close.
        let provider = BundledEop::bundled();
        let mut graph = FrameGraph::new();
        let p = Arc::clone(&provider);
        graph.register(
            Frame::Teme,
            Frame::Tirs,
            TransformEdge::rotation(move |t| Ok(rot_z(p.gmst_angle(t)?))),
        );
        graph.register(
            Frame::Tirs,
            Frame::Teme,
            crate::framelib::terrestrial::tirs_to_teme_edge(provider),
        );

        let state = sample_state(covered_time());
        let back = graph
            .transform(&graph.transform(&state, Frame::Tirs).unwrap(), Frame::Teme)
            .unwrap();

        let v0 = state.velocity.unwrap();
        let v1 = back.velocity.unwrap();
        let error = (v1 - v0).magnitude();

        // The missing term is |omega x r| ~ 0.5 km/s at LEO radius; the
        // round trip must be off by that order, far beyond tolerance.
        let expected = EARTH_ANGVEL
            * Cartesian3::new(state.position.x, state.position.y, 0.0).magnitude();
        assert!(error > 0.5 * expected, "error {error} vs expected {expected}");
    }
}
