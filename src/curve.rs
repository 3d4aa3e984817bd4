use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Fully-opaque lifespan assigned to a freshly built or refreshed
/// curve; the renderer fades it toward zero between refresh cycles
pub const MAX_LIFESPAN: f64 = 200.0;

/// Renderer-facing cloud of points: three equal-length coordinate
/// columns, already normalized into the display range.
///
/// Points with any non-finite coordinate are dropped at insertion so
/// that divergent trajectories degrade to sparser clouds instead of
/// poisoning the renderer; the skip is deterministic for identical
/// inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointSet {
    xs: Vec<f64>,
    ys: Vec<f64>,
    zs: Vec<f64>,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            xs: Vec::with_capacity(capacity),
            ys: Vec::with_capacity(capacity),
            zs: Vec::with_capacity(capacity),
        }
    }

    /// Build from pre-assembled columns, which must be equal length
    pub fn from_columns(xs: Vec<f64>, ys: Vec<f64>, zs: Vec<f64>) -> Result<Self, String> {
        if xs.len() != ys.len() || ys.len() != zs.len() {
            return Err(format!(
                "Coordinate columns differ in length: {} / {} / {}",
                xs.len(),
                ys.len(),
                zs.len()
            ));
        }
        Ok(Self { xs, ys, zs })
    }

    /// Append one point, silently skipping it when any coordinate is
    /// non-finite
    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        if x.is_finite() && y.is_finite() && z.is_finite() {
            self.xs.push(x);
            self.ys.push(y);
            self.zs.push(z);
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn zs(&self) -> &[f64] {
        &self.zs
    }
}

/// A point cloud tagged with its sweep hue and a fade lifespan.
///
/// The lifespan is presentation state only: the simulation pipeline
/// writes it once at construction and thereafter it changes solely
/// through `refresh` and `fade`, driven by the renderer's tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedCurve {
    pub points: PointSet,
    pub hue: f64,
    lifespan: f64,
}

impl TaggedCurve {
    pub fn new(points: PointSet, hue: f64) -> Self {
        Self {
            points,
            hue,
            lifespan: MAX_LIFESPAN,
        }
    }

    pub fn lifespan(&self) -> f64 {
        self.lifespan
    }

    /// Reset the fade cycle to fully opaque
    pub fn refresh(&mut self) {
        self.lifespan = MAX_LIFESPAN;
    }

    /// Decrement the lifespan by `rate`, clamped at zero
    pub fn fade(&mut self, rate: f64) {
        self.lifespan = (self.lifespan - rate).max(0.0);
    }

    pub fn is_faded(&self) -> bool {
        self.lifespan <= 0.0
    }
}

/// Fixed-capacity FIFO of tagged curves.
///
/// `enqueue` appends and evicts at most the single oldest entry, so
/// the history never exceeds its capacity. Read access is by
/// iteration or index; the rolling-refresh and fade operations below
/// are the only mutation the renderer performs per display tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundedHistory {
    capacity: usize,
    contents: VecDeque<TaggedCurve>,
}

impl BoundedHistory {
    pub fn new(capacity: usize) -> Result<Self, String> {
        if capacity == 0 {
            return Err("History capacity must be positive".to_string());
        }
        Ok(Self {
            capacity,
            contents: VecDeque::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Append a curve, evicting the oldest entry once full
    pub fn enqueue(&mut self, curve: TaggedCurve) {
        self.contents.push_back(curve);
        if self.contents.len() > self.capacity {
            self.contents.pop_front();
        }
    }

    pub fn get(&self, index: usize) -> Option<&TaggedCurve> {
        self.contents.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaggedCurve> {
        self.contents.iter()
    }

    /// Rolling refresh: reset the lifespan of entries at indices
    /// `offset, offset + stride, offset + 2·stride, …`.
    ///
    /// Called once per display tick with an advancing offset so that
    /// every curve is periodically revived while the rest keep
    /// fading. A stride of zero refreshes nothing.
    pub fn cycle_refresh(&mut self, offset: usize, stride: usize) {
        if stride == 0 {
            return;
        }
        let mut i = offset;
        while i < self.contents.len() {
            self.contents[i].refresh();
            i += stride;
        }
    }

    /// Fade every curve by `rate`; one display tick's worth of decay
    pub fn fade_all(&mut self, rate: f64) {
        for curve in &mut self.contents {
            curve.fade(rate);
        }
    }
}
