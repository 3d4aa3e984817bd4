use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Ordered parameter values for one chaotic system, with one slot
/// designated as the sweep variable.
///
/// The non-sweep entries are fixed constants taken from the classical
/// chaotic regime of each system; the sweep slot is overridden per
/// sweep step via `with_sweep`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    values: Vec<f64>,
    sweep_index: usize,
}

impl ParameterSet {
    pub fn new(values: Vec<f64>, sweep_index: usize) -> Result<Self, String> {
        if values.is_empty() {
            return Err("Parameter set must contain at least one value".to_string());
        }
        if sweep_index >= values.len() {
            return Err(format!(
                "Sweep index {} out of range for {} parameters",
                sweep_index,
                values.len()
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err("Parameters must be finite numbers".to_string());
        }
        Ok(Self {
            values,
            sweep_index,
        })
    }

    /// Copy of this set with the sweep slot replaced by `p`
    pub fn with_sweep(&self, p: f64) -> Self {
        let mut values = self.values.clone();
        values[self.sweep_index] = p;
        Self {
            values,
            sweep_index: self.sweep_index,
        }
    }

    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn sweep_value(&self) -> f64 {
        self.values[self.sweep_index]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The chaotic systems supported by the sweep pipeline.
///
/// Each variant carries its equations and display data as plain
/// associated data rather than an inheritance chain: defaults,
/// bounds, time step and scan dimensions are all per-variant
/// constants queried from the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemKind {
    /// Discrete logistic map x' = r·x·(1−x), the canonical
    /// period-doubling route to chaos
    LogisticMap,
    /// Aizawa attractor, a sphere-like three-dimensional flow
    Aizawa,
    /// Lorenz system in the original visualizer's form, where a
    /// single swept constant plays both the σ and β roles
    Lorenz,
    /// Rössler attractor, single-lobe spiral chaos
    Rossler,
    /// Chen attractor, a dual-scroll relative of Lorenz
    Chen,
    /// Burke-Shaw system
    BurkeShaw,
    /// Arnold cubic jerk flow
    Arnold,
}

impl SystemKind {
    /// Default parameters in the classical chaotic regime, with the
    /// designated sweep slot
    pub fn default_parameters(&self) -> ParameterSet {
        let (values, sweep_index) = match self {
            // r; swept over the period-doubling cascade
            SystemKind::LogisticMap => (vec![3.9], 0),
            // a, b, c, d, e, f; sweep f
            SystemKind::Aizawa => (vec![0.95, 0.7, 0.6, 3.5, 0.25, 0.1], 5),
            // rho, c (shared sigma/beta); sweep c
            SystemKind::Lorenz => (vec![28.0, 10.0], 1),
            // a, b, c; sweep c
            SystemKind::Rossler => (vec![0.2, 0.2, 5.7], 2),
            // a, b, c; sweep c
            SystemKind::Chen => (vec![40.0, 3.0, 28.0], 2),
            // s, v; sweep v
            SystemKind::BurkeShaw => (vec![10.0, 4.272], 1),
            // a, b; sweep b
            SystemKind::Arnold => (vec![5.0, 3.8], 1),
        };
        ParameterSet {
            values,
            sweep_index,
        }
    }

    /// Evaluate the vector field at `state`.
    ///
    /// Returns the derivative for continuous systems and the next
    /// state for the discrete logistic map. Pure and side-effect
    /// free; non-finite results propagate to the caller unclamped.
    pub fn eval(&self, state: &Vector3<f64>, params: &ParameterSet) -> Vector3<f64> {
        let (x, y, z) = (state.x, state.y, state.z);
        match self {
            SystemKind::LogisticMap => {
                let r = params.get(0);
                Vector3::new(r * x * (1.0 - x), 0.0, 0.0)
            }
            SystemKind::Aizawa => {
                let (a, b, c) = (params.get(0), params.get(1), params.get(2));
                let (d, e, f) = (params.get(3), params.get(4), params.get(5));
                Vector3::new(
                    (z - b) * x - d * y,
                    d * x + (z - b) * y,
                    c + a * z - z.powi(3) / 3.0
                        - (x * x + y * y) * (1.0 + e * z)
                        + f * z * x.powi(3),
                )
            }
            SystemKind::Lorenz => {
                let (rho, c) = (params.get(0), params.get(1));
                Vector3::new(c * (y - x), x * (rho - z) - y, x * y - c * z)
            }
            SystemKind::Rossler => {
                let (a, b, c) = (params.get(0), params.get(1), params.get(2));
                Vector3::new(-y - z, x + a * y, b + z * (x - c))
            }
            SystemKind::Chen => {
                let (a, b, c) = (params.get(0), params.get(1), params.get(2));
                Vector3::new(a * (y - x), (c - a) * x - x * z + c * y, x * y - b * z)
            }
            SystemKind::BurkeShaw => {
                let (s, v) = (params.get(0), params.get(1));
                Vector3::new(-s * (x + y), -y - s * x * z, v + s * x * y)
            }
            SystemKind::Arnold => {
                let (a, b) = (params.get(0), params.get(1));
                Vector3::new(y, z, a * x - b * y - z - x.powi(3))
            }
        }
    }

    /// Fixed integration step for continuous systems; `None` for the
    /// discrete map, which is iterated directly
    pub fn time_step(&self) -> Option<f64> {
        match self {
            SystemKind::LogisticMap => None,
            _ => Some(0.01),
        }
    }

    /// State-space dimension (1 for the logistic map, 3 otherwise)
    pub fn dimension(&self) -> usize {
        match self {
            SystemKind::LogisticMap => 1,
            _ => 3,
        }
    }

    /// Initial condition used before every sweep run
    pub fn initial_state(&self) -> Vector3<f64> {
        match self {
            SystemKind::LogisticMap => Vector3::new(0.5, 0.0, 0.0),
            _ => Vector3::new(0.1, 0.1, 0.05),
        }
    }

    /// Display bounds (y_min, y_max) used to normalize raw
    /// coordinates into the renderer range
    pub fn display_bounds(&self) -> (f64, f64) {
        match self {
            SystemKind::LogisticMap => (0.0, 1.0),
            SystemKind::Aizawa | SystemKind::BurkeShaw => (-5.0, 5.0),
            SystemKind::Lorenz | SystemKind::Arnold => (-50.0, 50.0),
            SystemKind::Rossler => (-10.0, 10.0),
            SystemKind::Chen => (-100.0, 100.0),
        }
    }

    /// Dimension scanned for local extrema
    pub fn scan_dimension(&self) -> usize {
        match self {
            SystemKind::LogisticMap => 0,
            _ => 1,
        }
    }

    /// Dimension whose value is reported at each extremum
    pub fn response_dimension(&self) -> usize {
        0
    }

    /// Suggested transient length before recording.
    ///
    /// The discrete map converges to its attractor within a couple
    /// hundred iterations; the continuous flows need more steps at
    /// dt = 0.01 to leave the initial-condition neighborhood.
    pub fn suggested_transient(&self) -> usize {
        match self {
            SystemKind::LogisticMap => 200,
            _ => 1000,
        }
    }
}
