use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Which turning points the scan reports.
///
/// Bifurcation diagrams of the continuous flows sample peaks only
/// (the classical Lorenz-map construction), so `Peaks` is the
/// default used by the sweep; `PeaksAndValleys` reports strict local
/// minima as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtremaMode {
    Peaks,
    PeaksAndValleys,
}

/// Scan a trajectory for local extrema along `scan_dim` with the
/// default `Peaks` mode. See `find_local_extrema_in`.
pub fn find_local_extrema(
    trajectory: &[Vector3<f64>],
    scan_dim: usize,
    response_dim: usize,
    cap: usize,
) -> Vec<f64> {
    find_local_extrema_in(trajectory, scan_dim, response_dim, cap, ExtremaMode::Peaks)
}

/// Scan a trajectory for local extrema along `scan_dim` and report
/// the `response_dim` value at each one, in chronological order.
///
/// An interior point j is a peak when both neighbors are strictly
/// below it, a valley when both are strictly above it. Plateaus
/// therefore never register, and neither do comparisons against NaN,
/// which are false by IEEE semantics; degenerate trajectories fall
/// through to the fallback below.
///
/// At most `cap` extrema are collected; the scan stops early once
/// the cap is exhausted.
///
/// Fallback: a trajectory with no detected extrema (monotonic runs,
/// fixed points, cap of zero) yields a single-element set holding the
/// last response value, so the bifurcation view always has one point
/// per sweep value. An empty trajectory yields an empty set.
pub fn find_local_extrema_in(
    trajectory: &[Vector3<f64>],
    scan_dim: usize,
    response_dim: usize,
    cap: usize,
    mode: ExtremaMode,
) -> Vec<f64> {
    let mut extrema = Vec::new();
    let mut remaining = cap;

    let mut j = 1;
    while remaining > 0 && j + 1 < trajectory.len() {
        let prev = trajectory[j - 1][scan_dim];
        let here = trajectory[j][scan_dim];
        let next = trajectory[j + 1][scan_dim];

        let is_peak = prev < here && next < here;
        let is_valley = prev > here && next > here;
        let detected = match mode {
            ExtremaMode::Peaks => is_peak,
            ExtremaMode::PeaksAndValleys => is_peak || is_valley,
        };
        if detected {
            extrema.push(trajectory[j][response_dim]);
            remaining -= 1;
        }
        j += 1;
    }

    if extrema.is_empty() {
        if let Some(last) = trajectory.last() {
            log::warn!("no local extrema found; falling back to final response value");
            extrema.push(last[response_dim]);
        }
    }
    extrema
}
