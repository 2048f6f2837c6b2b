//! Bounded input controls.
//!
//! Controls own their range: every mutation clamps, so whatever a control
//! reports is always a legal input.

use std::ops::RangeInclusive;

/// Coarse steps move this many fine steps.
pub const COARSE_STEPS: i64 = 10;

/// A numeric slider over a closed range.
///
/// Values are kept as integers in units of `1 / scale` so that stepping by
/// 0.1 is exact (`15.0` stays `15.0` after any number of round trips).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slider {
    label: &'static str,
    min: i64,
    max: i64,
    value: i64,
    scale: i64,
}

impl Slider {
    /// `decimals` is the number of fractional digits the slider steps by
    /// (0 → step 1, 1 → step 0.1).
    pub fn new(label: &'static str, range: RangeInclusive<f64>, initial: f64, decimals: u32) -> Self {
        let scale = 10_i64.pow(decimals);
        let to_units = |v: f64| (v * scale as f64).round() as i64;
        let min = to_units(*range.start());
        let max = to_units(*range.end());
        Self {
            label,
            min,
            max,
            value: to_units(initial).clamp(min, max),
            scale,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn value(&self) -> f64 {
        self.value as f64 / self.scale as f64
    }

    pub fn decimals(&self) -> usize {
        self.scale.ilog10() as usize
    }

    /// Position within the range, `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.max == self.min {
            return 0.0;
        }
        (self.value - self.min) as f64 / (self.max - self.min) as f64
    }

    /// Move by `steps` fine steps. Returns whether the value changed.
    pub fn step(&mut self, steps: i64) -> bool {
        self.set_units(self.value.saturating_add(steps))
    }

    pub fn to_min(&mut self) -> bool {
        self.set_units(self.min)
    }

    pub fn to_max(&mut self) -> bool {
        self.set_units(self.max)
    }

    pub fn display_value(&self) -> String {
        format!("{:.*}", self.decimals(), self.value())
    }

    fn set_units(&mut self, units: i64) -> bool {
        let next = units.clamp(self.min, self.max);
        let changed = next != self.value;
        self.value = next;
        changed
    }
}

/// A selector over a fixed list of options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice<T: 'static> {
    label: &'static str,
    options: &'static [T],
    index: usize,
}

impl<T: Copy> Choice<T> {
    /// # Panics
    /// Panics if `options` is empty.
    pub fn new(label: &'static str, options: &'static [T], initial: usize) -> Self {
        assert!(!options.is_empty(), "a choice needs at least one option");
        Self {
            label,
            options,
            index: initial.min(options.len() - 1),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn selected(&self) -> T {
        self.options[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn len(&self) -> usize {
        self.options.len()
    }

    /// Move the selection, stopping at either end. Returns whether it changed.
    pub fn step(&mut self, steps: i64) -> bool {
        let last = (self.options.len() - 1) as i64;
        let next = (self.index as i64).saturating_add(steps).clamp(0, last) as usize;
        let changed = next != self.index;
        self.index = next;
        changed
    }

    pub fn to_first(&mut self) -> bool {
        self.step(i64::MIN)
    }

    pub fn to_last(&mut self) -> bool {
        self.step(i64::MAX)
    }
}
