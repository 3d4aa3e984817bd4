use nalgebra::Vector3;

use crate::systems::{ParameterSet, SystemKind};

/// Forward integrator for one chaotic system.
///
/// Continuous systems advance by explicit forward Euler,
/// x_{n+1} = x_n + dt · f(x_n), with the fixed per-system dt; the
/// discrete logistic map advances by direct iteration,
/// x_{n+1} = f(x_n). Euler is deliberate here: the visualizer
/// reproduces the reference orbits, which were generated with a
/// first-order step, and attractor geometry at dt = 0.01 is stable
/// for every supported system.
///
/// Runs are two-phase: `settle` burns the transient prefix keeping
/// only the final state, then `run` records the steady-state
/// trajectory from that state.
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    kind: SystemKind,
}

impl Simulator {
    pub fn new(kind: SystemKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> SystemKind {
        self.kind
    }

    /// Advance by a single step
    pub fn step(&self, state: &Vector3<f64>, params: &ParameterSet) -> Vector3<f64> {
        match self.kind.time_step() {
            Some(dt) => state + self.kind.eval(state, params) * dt,
            None => self.kind.eval(state, params),
        }
    }

    /// Transient phase: advance `steps` times, discarding intermediate
    /// states and returning only the final one
    pub fn settle(
        &self,
        initial: Vector3<f64>,
        params: &ParameterSet,
        steps: usize,
    ) -> Vector3<f64> {
        let mut state = initial;
        for _ in 0..steps {
            state = self.step(&state, params);
        }
        state
    }

    /// Recording phase: advance `steps` times, collecting each
    /// post-step state in order.
    ///
    /// The initial state is not included; `steps = 0` yields an empty
    /// trajectory. Non-finite states are recorded as-is and left for
    /// downstream display logic to handle.
    pub fn run(
        &self,
        initial: Vector3<f64>,
        params: &ParameterSet,
        steps: usize,
    ) -> Vec<Vector3<f64>> {
        let mut trajectory = Vec::with_capacity(steps);
        let mut state = initial;
        for _ in 0..steps {
            state = self.step(&state, params);
            trajectory.push(state);
        }
        trajectory
    }
}
