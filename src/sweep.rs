use nalgebra::Vector3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::curve::{PointSet, TaggedCurve};
use crate::extrema::find_local_extrema;
use crate::simulator::Simulator;
use crate::systems::SystemKind;

/// Default display range width; coordinates land in [-1, 1]
pub const DEFAULT_SCALE: f64 = 2.0;

/// Default hue span, matching the reference HSB wheel slice
/// (0 = red … 160 = violet on a 200-step wheel)
pub const DEFAULT_HUE_RANGE: f64 = 160.0;

/// Map `v` from `[min, max]` into the centered display range
/// `[-scale/2, scale/2]`. Values outside the bounds extrapolate
/// linearly; non-finite input stays non-finite.
pub fn normalize(v: f64, min: f64, max: f64, scale: f64) -> f64 {
    ((v - min) / (max - min)) * scale - scale / 2.0
}

/// Inverse of `normalize`
pub fn denormalize(v: f64, min: f64, max: f64, scale: f64) -> f64 {
    ((v + scale / 2.0) / scale) * (max - min) + min
}

/// Validated configuration for one parameter sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub param_start: f64,
    pub param_end: f64,
    pub param_step: f64,
    /// Recorded steps per sweep value
    pub run_length: usize,
    /// Discarded steps before recording begins
    pub transient_length: usize,
    /// Maximum extrema collected per sweep value
    pub extrema_cap: usize,
    /// Width of the centered display range
    pub scale: f64,
    /// Span of the hue gradient across the sweep
    pub hue_range: f64,
}

impl SweepConfig {
    pub fn new(
        param_start: f64,
        param_end: f64,
        param_step: f64,
        run_length: usize,
        transient_length: usize,
        extrema_cap: usize,
    ) -> Result<Self, String> {
        if !param_start.is_finite() || !param_end.is_finite() || !param_step.is_finite() {
            return Err("Sweep bounds and step must be finite".to_string());
        }
        if param_step <= 0.0 {
            return Err("Sweep step must be positive".to_string());
        }
        if param_start >= param_end {
            return Err("Sweep start must be below sweep end".to_string());
        }
        if run_length == 0 {
            return Err("Run length must be positive".to_string());
        }
        Ok(Self {
            param_start,
            param_end,
            param_step,
            run_length,
            transient_length,
            extrema_cap,
            scale: DEFAULT_SCALE,
            hue_range: DEFAULT_HUE_RANGE,
        })
    }

    /// Sweep with the system's suggested transient length
    pub fn for_system(
        kind: SystemKind,
        param_start: f64,
        param_end: f64,
        param_step: f64,
        run_length: usize,
        extrema_cap: usize,
    ) -> Result<Self, String> {
        Self::new(
            param_start,
            param_end,
            param_step,
            run_length,
            kind.suggested_transient(),
            extrema_cap,
        )
    }

    pub fn with_scale(mut self, scale: f64) -> Result<Self, String> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err("Display scale must be a positive finite number".to_string());
        }
        self.scale = scale;
        Ok(self)
    }

    pub fn with_hue_range(mut self, hue_range: f64) -> Result<Self, String> {
        if !hue_range.is_finite() || hue_range < 0.0 {
            return Err("Hue range must be a non-negative finite number".to_string());
        }
        self.hue_range = hue_range;
        Ok(self)
    }

    /// Sampled sweep values: the half-open interval
    /// `[param_start, param_end)` stepped by accumulation, with no
    /// rounding correction at the boundary
    pub fn sweep_values(&self) -> Vec<f64> {
        let mut values = Vec::new();
        let mut p = self.param_start;
        while p < self.param_end {
            values.push(p);
            p += self.param_step;
        }
        values
    }

    /// Position of `p` within the sweep, in [0, 1)
    fn sweep_fraction(&self, p: f64) -> f64 {
        (p - self.param_start) / (self.param_end - self.param_start)
    }
}

/// Result of one full sweep: per sweep value, one orbit curve and one
/// bifurcation curve, in sweep order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutput {
    pub orbit: Vec<TaggedCurve>,
    pub bifurcation: Vec<TaggedCurve>,
}

/// Run the full parameter sweep sequentially.
///
/// Each sweep value resets the system to its canonical initial
/// state, burns the transient, records the steady-state trajectory,
/// and projects it into both views. Iterations are independent;
/// `sweep_par` is the drop-in parallel variant.
pub fn sweep(kind: SystemKind, config: &SweepConfig) -> SweepOutput {
    let values = config.sweep_values();
    log::debug!(
        "sweeping {:?} over {} parameter values in [{}, {})",
        kind,
        values.len(),
        config.param_start,
        config.param_end
    );

    let curves: Vec<(TaggedCurve, TaggedCurve)> = values
        .iter()
        .map(|&p| sample_sweep_value(kind, config, p))
        .collect();
    collect_output(curves)
}

/// Parallel sweep across rayon's thread pool. Output is identical to
/// `sweep`, including order: sweep values are independent and the
/// indexed collect preserves their sequence.
pub fn sweep_par(kind: SystemKind, config: &SweepConfig) -> SweepOutput {
    let values = config.sweep_values();
    let curves: Vec<(TaggedCurve, TaggedCurve)> = values
        .par_iter()
        .map(|&p| sample_sweep_value(kind, config, p))
        .collect();
    collect_output(curves)
}

fn collect_output(curves: Vec<(TaggedCurve, TaggedCurve)>) -> SweepOutput {
    let mut output = SweepOutput {
        orbit: Vec::with_capacity(curves.len()),
        bifurcation: Vec::with_capacity(curves.len()),
    };
    for (orbit, bifurcation) in curves {
        output.orbit.push(orbit);
        output.bifurcation.push(bifurcation);
    }
    output
}

/// Simulate one sweep value and build its two tagged curves
fn sample_sweep_value(
    kind: SystemKind,
    config: &SweepConfig,
    p: f64,
) -> (TaggedCurve, TaggedCurve) {
    let simulator = Simulator::new(kind);
    let params = kind.default_parameters().with_sweep(p);

    let settled = simulator.settle(kind.initial_state(), &params, config.transient_length);
    let trajectory = simulator.run(settled, &params, config.run_length);

    let hue = config.sweep_fraction(p) * config.hue_range;
    let orbit = TaggedCurve::new(orbit_point_set(kind, &trajectory, config.scale), hue);
    let bifurcation = TaggedCurve::new(
        bifurcation_point_set(kind, &trajectory, config, p),
        hue,
    );
    (orbit, bifurcation)
}

/// Project a trajectory into the orbit (pseudo-Poincaré) view.
///
/// The 1-D logistic map uses a lagged embedding: each point is the
/// normalized triple (x_t, x_{t+1}, x_{t+2}). Three-dimensional flows
/// map each state's coordinates directly, every axis normalized by
/// the system's display bounds.
fn orbit_point_set(kind: SystemKind, trajectory: &[Vector3<f64>], scale: f64) -> PointSet {
    let (y_min, y_max) = kind.display_bounds();
    let mut points = PointSet::with_capacity(trajectory.len());

    if kind.dimension() == 1 {
        let normalized: Vec<f64> = trajectory
            .iter()
            .map(|s| normalize(s.x, y_min, y_max, scale))
            .collect();
        for window in normalized.windows(3) {
            points.push(window[0], window[1], window[2]);
        }
    } else {
        for state in trajectory {
            points.push(
                normalize(state.x, y_min, y_max, scale),
                normalize(state.y, y_min, y_max, scale),
                normalize(state.z, y_min, y_max, scale),
            );
        }
    }
    points
}

/// Build the bifurcation view for one sweep value: extrema of the
/// response dimension plotted against the (normalized) sweep value,
/// flat in z.
fn bifurcation_point_set(
    kind: SystemKind,
    trajectory: &[Vector3<f64>],
    config: &SweepConfig,
    p: f64,
) -> PointSet {
    let (y_min, y_max) = kind.display_bounds();
    let extrema = find_local_extrema(
        trajectory,
        kind.scan_dimension(),
        kind.response_dimension(),
        config.extrema_cap,
    );

    let x = normalize(p, config.param_start, config.param_end, config.scale);
    let mut points = PointSet::with_capacity(extrema.len());
    for value in extrema {
        points.push(x, normalize(value, y_min, y_max, config.scale), 0.0);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rejects_bad_bounds() {
        assert!(SweepConfig::new(4.0, 3.0, 0.1, 50, 100, 500).is_err());
        assert!(SweepConfig::new(3.0, 3.0, 0.1, 50, 100, 500).is_err());
        assert!(SweepConfig::new(3.0, 4.0, 0.0, 50, 100, 500).is_err());
        assert!(SweepConfig::new(3.0, 4.0, -0.1, 50, 100, 500).is_err());
        assert!(SweepConfig::new(f64::NAN, 4.0, 0.1, 50, 100, 500).is_err());
        assert!(SweepConfig::new(3.0, 4.0, 0.1, 0, 100, 500).is_err());
        assert!(SweepConfig::new(3.0, 4.0, 0.1, 50, 100, 500).is_ok());
    }

    #[test]
    fn test_for_system_uses_suggested_transient() {
        let config =
            SweepConfig::for_system(SystemKind::LogisticMap, 3.5, 4.0, 0.005, 50, 500).unwrap();
        assert_eq!(config.transient_length, 200);

        let config = SweepConfig::for_system(SystemKind::Lorenz, 5.0, 15.0, 0.1, 300, 700).unwrap();
        assert_eq!(config.transient_length, 1000);
    }

    #[test]
    fn test_sweep_interval_is_half_open() {
        // 3.61 >= 3.605, so only 3.6 is sampled
        let config = SweepConfig::new(3.6, 3.605, 0.01, 50, 200, 500).unwrap();
        let values = config.sweep_values();

        assert_eq!(values.len(), 1);
        assert!((values[0] - 3.6).abs() < 1e-12);
    }

    #[test]
    fn test_uneven_step_excludes_boundary() {
        // 0.3 steps from 0: 0.0, 0.3, 0.6, 0.9; 1.2 exceeds the end
        let config = SweepConfig::new(0.0, 1.0, 0.3, 10, 0, 10).unwrap();
        assert_eq!(config.sweep_values().len(), 4);
    }

    #[test]
    fn test_normalize_round_trip() {
        let (min, max, scale) = (-50.0, 50.0, 2.0);
        for v in [-50.0, -12.75, 0.0, 3.0, 49.999] {
            let back = denormalize(normalize(v, min, max, scale), min, max, scale);
            assert!((back - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_normalize_centers_display_range() {
        assert!((normalize(0.0, 0.0, 1.0, 2.0) + 1.0).abs() < 1e-12);
        assert!((normalize(1.0, 0.0, 1.0, 2.0) - 1.0).abs() < 1e-12);
        assert!(normalize(0.5, 0.0, 1.0, 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_end_to_end_single_value_sweep() {
        let config = SweepConfig::new(3.6, 3.605, 0.01, 100, 200, 500).unwrap();
        let output = sweep(SystemKind::LogisticMap, &config);

        assert_eq!(output.orbit.len(), 1);
        assert_eq!(output.bifurcation.len(), 1);
    }

    #[test]
    fn test_hue_gradient_spans_sweep() {
        let config = SweepConfig::new(3.5, 4.0, 0.1, 50, 100, 200).unwrap();
        let output = sweep(SystemKind::LogisticMap, &config);

        assert!((output.orbit[0].hue).abs() < 1e-12);
        let last = output.orbit.last().unwrap().hue;
        assert!(last > 0.0 && last < DEFAULT_HUE_RANGE);
        // Hue is monotonically increasing across the sweep
        for pair in output.orbit.windows(2) {
            assert!(pair[0].hue < pair[1].hue);
        }
    }

    #[test]
    fn test_logistic_orbit_uses_lagged_embedding() {
        let config = SweepConfig::new(3.2, 3.21, 0.1, 50, 200, 500).unwrap();
        let output = sweep(SystemKind::LogisticMap, &config);

        let points = &output.orbit[0].points;
        // 50 recorded states give 48 embedded triples
        assert_eq!(points.len(), 48);
        // Shifted columns: ys lead xs by one step
        assert!((points.xs()[1] - points.ys()[0]).abs() < 1e-12);
        assert!((points.ys()[1] - points.zs()[0]).abs() < 1e-12);
    }

    #[test]
    fn test_continuous_orbit_projects_all_states() {
        let config = SweepConfig::new(5.0, 5.1, 0.2, 300, 500, 500).unwrap();
        let output = sweep(SystemKind::Rossler, &config);

        assert_eq!(output.orbit.len(), 1);
        assert_eq!(output.orbit[0].points.len(), 300);
    }

    #[test]
    fn test_bifurcation_points_share_sweep_x() {
        let config = SweepConfig::new(3.8, 3.81, 0.1, 200, 200, 500).unwrap();
        let output = sweep(SystemKind::LogisticMap, &config);

        let points = &output.bifurcation[0].points;
        assert!(points.len() > 1, "chaotic band should yield many extrema");
        let x = points.xs()[0];
        assert!(points.xs().iter().all(|&v| (v - x).abs() < 1e-12));
        assert!(points.zs().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_extrema_cap_bounds_bifurcation_points() {
        let config = SweepConfig::new(3.9, 3.91, 0.1, 500, 200, 7).unwrap();
        let output = sweep(SystemKind::LogisticMap, &config);

        assert!(output.bifurcation[0].points.len() <= 7);
    }

    #[test]
    fn test_divergent_sweep_produces_no_panic() {
        // Chen with a huge sweep value diverges to non-finite states;
        // the pipeline must drop those points, not crash
        let config = SweepConfig::new(1e9, 2e9, 1e9, 100, 100, 100).unwrap();
        let output = sweep(SystemKind::Chen, &config);

        assert_eq!(output.orbit.len(), 1);
    }

    #[test]
    fn test_parallel_sweep_matches_sequential() {
        let config = SweepConfig::new(3.5, 3.7, 0.05, 100, 200, 300).unwrap();
        let sequential = sweep(SystemKind::LogisticMap, &config);
        let parallel = sweep_par(SystemKind::LogisticMap, &config);

        assert_eq!(sequential.orbit.len(), parallel.orbit.len());
        for (a, b) in sequential.bifurcation.iter().zip(&parallel.bifurcation) {
            assert!((a.hue - b.hue).abs() < 1e-15);
            assert_eq!(a.points.ys(), b.points.ys());
        }
    }
}
