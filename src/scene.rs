use serde::{Deserialize, Serialize};

use crate::curve::BoundedHistory;
use crate::sweep::{sweep, SweepConfig, SweepOutput};
use crate::systems::SystemKind;

/// Which of the two point-cloud views a renderer is displaying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    Orbit,
    Bifurcation,
}

/// A fully generated scene for one chaotic system: the sweep output
/// loaded into two bounded histories, one per view.
///
/// The sweep runs to completion at construction; afterwards the
/// scene is a passive container the renderer reads each tick,
/// refreshing and fading curves through the history's own
/// operations. Nothing here re-enters the simulation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaosScene {
    kind: SystemKind,
    orbits: BoundedHistory,
    bifurcations: BoundedHistory,
}

impl ChaosScene {
    /// Sweep `kind` per `config` and load both histories, each with
    /// the given capacity
    pub fn generate(
        kind: SystemKind,
        config: &SweepConfig,
        capacity: usize,
    ) -> Result<Self, String> {
        let mut scene = Self {
            kind,
            orbits: BoundedHistory::new(capacity)?,
            bifurcations: BoundedHistory::new(capacity)?,
        };
        scene.load(sweep(kind, config));
        Ok(scene)
    }

    fn load(&mut self, output: SweepOutput) {
        for curve in output.orbit {
            self.orbits.enqueue(curve);
        }
        for curve in output.bifurcation {
            self.bifurcations.enqueue(curve);
        }
    }

    pub fn kind(&self) -> SystemKind {
        self.kind
    }

    /// Read-only snapshot of one view's history
    pub fn history(&self, view: ViewMode) -> &BoundedHistory {
        match view {
            ViewMode::Orbit => &self.orbits,
            ViewMode::Bifurcation => &self.bifurcations,
        }
    }

    /// Mutable access for the renderer's refresh/fade tick
    pub fn history_mut(&mut self, view: ViewMode) -> &mut BoundedHistory {
        match view {
            ViewMode::Orbit => &mut self.orbits,
            ViewMode::Bifurcation => &mut self.bifurcations,
        }
    }

    /// One display tick for the selected view: revive the strided
    /// subset starting at `offset`, then fade everything by `rate`
    pub fn tick(&mut self, view: ViewMode, offset: usize, stride: usize, rate: f64) {
        let history = self.history_mut(view);
        history.cycle_refresh(offset, stride);
        history.fade_all(rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::MAX_LIFESPAN;

    fn small_scene() -> ChaosScene {
        let config = SweepConfig::new(3.5, 3.56, 0.01, 80, 200, 300).unwrap();
        ChaosScene::generate(SystemKind::LogisticMap, &config, 500).unwrap()
    }

    #[test]
    fn test_scene_holds_one_curve_per_sweep_value() {
        let scene = small_scene();

        // Seven sweep values: accumulation leaves the sixth step at
        // 3.5599999999999987, still inside the half-open interval
        assert_eq!(scene.history(ViewMode::Orbit).len(), 7);
        assert_eq!(scene.history(ViewMode::Bifurcation).len(), 7);
    }

    #[test]
    fn test_capacity_truncates_oldest_curves() {
        let config = SweepConfig::new(3.5, 3.56, 0.01, 80, 200, 300).unwrap();
        let scene = ChaosScene::generate(SystemKind::LogisticMap, &config, 4).unwrap();

        let history = scene.history(ViewMode::Bifurcation);
        assert_eq!(history.len(), 4);
        // The three oldest (lowest-hue) curves were evicted
        let first_hue = history.get(0).unwrap().hue;
        assert!(first_hue > 0.0);
    }

    #[test]
    fn test_tick_fades_and_refreshes() {
        let mut scene = small_scene();
        scene.tick(ViewMode::Orbit, 0, 2, 30.0);

        let history = scene.history(ViewMode::Orbit);
        // Even indices refreshed then faded once; odd only faded
        assert!((history.get(0).unwrap().lifespan() - (MAX_LIFESPAN - 30.0)).abs() < 1e-12);
        assert!((history.get(1).unwrap().lifespan() - (MAX_LIFESPAN - 30.0)).abs() < 1e-12);

        scene.tick(ViewMode::Orbit, 0, 2, 30.0);
        let history = scene.history(ViewMode::Orbit);
        assert!((history.get(0).unwrap().lifespan() - (MAX_LIFESPAN - 30.0)).abs() < 1e-12);
        assert!((history.get(1).unwrap().lifespan() - (MAX_LIFESPAN - 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_views_are_independent() {
        let mut scene = small_scene();
        scene.tick(ViewMode::Bifurcation, 0, 0, 100.0);

        assert!((scene.history(ViewMode::Orbit).get(0).unwrap().lifespan() - MAX_LIFESPAN)
            .abs()
            < 1e-12);
        assert!((scene
            .history(ViewMode::Bifurcation)
            .get(0)
            .unwrap()
            .lifespan()
            - (MAX_LIFESPAN - 100.0))
            .abs()
            < 1e-12);
    }
}
