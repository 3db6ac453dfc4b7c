//! Greedy slot packing for the two card lanes.
//!
//! Each lane keeps one watermark per slot: the x before which that slot is still occupied. A
//! request at `x` takes the lowest slot whose watermark is `<= x`, so slots near the axis fill
//! first, and opens a new slot only when every existing one is busy. Requests must arrive in
//! non-decreasing x per lane; with that order a request never needs a slot it has already passed.

use crate::model::Lane;
use crate::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct LaneState {
    watermarks: Vec<f64>,
    last_x: Option<f64>,
}

impl LaneState {
    pub fn slot_count(&self) -> usize {
        self.watermarks.len()
    }

    pub fn watermarks(&self) -> &[f64] {
        &self.watermarks
    }

    fn pick_slot(&mut self, x: f64, min_gap: f64) -> usize {
        for (i, mark) in self.watermarks.iter_mut().enumerate() {
            if x >= *mark {
                *mark = x + min_gap;
                return i;
            }
        }
        self.watermarks.push(x + min_gap);
        self.watermarks.len() - 1
    }
}

/// Lane state for a single placement pass; build a fresh one per pass.
#[derive(Debug, Clone)]
pub struct LaneAllocator {
    min_gap: f64,
    top: LaneState,
    bottom: LaneState,
}

impl LaneAllocator {
    pub fn new(min_gap: f64) -> Self {
        Self {
            min_gap,
            top: LaneState::default(),
            bottom: LaneState::default(),
        }
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    pub fn lane(&self, lane: Lane) -> &LaneState {
        match lane {
            Lane::Top => &self.top,
            Lane::Bottom => &self.bottom,
        }
    }

    /// Assigns a slot on `lane` for a card at `x`.
    ///
    /// Fails on non-finite x or when x moves backwards within the lane.
    pub fn allocate(&mut self, lane: Lane, x: f64) -> Result<usize> {
        if !x.is_finite() {
            return Err(Error::InvalidPosition { lane, x });
        }
        let min_gap = self.min_gap;
        let state = match lane {
            Lane::Top => &mut self.top,
            Lane::Bottom => &mut self.bottom,
        };
        if let Some(previous) = state.last_x {
            if x < previous {
                return Err(Error::NonAscendingInput { lane, previous, x });
            }
        }
        state.last_x = Some(x);
        Ok(state.pick_slot(x, min_gap))
    }
}
