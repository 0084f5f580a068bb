//! # Streaming smoothing filters
//!
//! Per-bin filters applied across successive spectrum frames to suppress
//! flicker. One instance tracks one frequency bin.
//!
//! - [`LowPassFilter`]: single-pole IIR, `y = a*x + (1-a)*y_prev`
//! - [`FifoFilter`]: weighted moving average over a circular history,
//!   followed by a fixed exponential smoothing pass

use std::fmt;

/// Scale from a cutoff value to the IIR coefficient.
const CUTOFF_TO_ALPHA: f32 = 0.02;

/// Exponential smoothing factor applied after the FIFO weighted average.
pub const FIFO_SMOOTHING: f32 = 0.07;

pub const DEFAULT_FIFO_SIZE: usize = 6;

/// The cutoff values offered for the low-pass filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffPreset {
    QuarterHz,
    HalfHz,
    OneHz,
}

impl CutoffPreset {
    pub const ALL: [CutoffPreset; 3] = [Self::QuarterHz, Self::HalfHz, Self::OneHz];

    pub fn hz(self) -> f32 {
        match self {
            Self::QuarterHz => 0.25,
            Self::HalfHz => 0.5,
            Self::OneHz => 1.0,
        }
    }
}

impl TryFrom<f32> for CutoffPreset {
    type Error = f32;

    fn try_from(hz: f32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|preset| (preset.hz() - hz).abs() < 1e-6)
            .ok_or(hz)
    }
}

impl fmt::Display for CutoffPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.hz())
    }
}

/// Single-pole low-pass filter.
///
/// The first sample passes through unchanged so the output does not ramp up
/// from zero. The coefficient is fixed for the lifetime of the instance;
/// changing the cutoff means building a new filter.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    alpha: f32,
    prev: Option<f32>,
}

impl LowPassFilter {
    /// `alpha = cutoff_hz * 0.02`. No clamping: values outside the presets
    /// give whatever smoothing that coefficient implies.
    pub fn new(cutoff_hz: f32) -> Self {
        Self {
            alpha: cutoff_hz * CUTOFF_TO_ALPHA,
            prev: None,
        }
    }

    pub fn from_preset(preset: CutoffPreset) -> Self {
        Self::new(preset.hz())
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn process(&mut self, value: f32) -> f32 {
        let filtered = match self.prev {
            None => value,
            Some(prev) => self.alpha * value + (1.0 - self.alpha) * prev,
        };
        self.prev = Some(filtered);
        filtered
    }

    pub fn reset(&mut self) {
        self.prev = None;
    }
}

/// Weighted moving average over a circular history, smoothed once more by a
/// fixed exponential factor.
///
/// Weights follow buffer slot order (slot `i` has weight `i + 1`). Before the
/// first wrap that is also recency order; after it, the newest sample may sit
/// in a low-weight slot.
#[derive(Debug, Clone)]
pub struct FifoFilter {
    buffer: Vec<f32>,
    head: usize,
    full: bool,
    last_output: Option<f32>,
}

impl Default for FifoFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FIFO_SIZE)
    }
}

impl FifoFilter {
    /// # Panics
    /// * If `size` is zero
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "FIFO filter size must be positive");
        Self {
            buffer: vec![0.0; size],
            head: 0,
            full: false,
            last_output: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Raw history slots, in buffer order.
    pub fn history(&self) -> &[f32] {
        &self.buffer
    }

    pub fn last_output(&self) -> Option<f32> {
        self.last_output
    }

    fn valid_count(&self) -> usize {
        if self.full {
            self.buffer.len()
        } else {
            self.head
        }
    }

    pub fn process(&mut self, value: f32) -> f32 {
        let size = self.buffer.len();
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % size;
        if self.head == 0 {
            self.full = true;
        }

        let count = self.valid_count();
        let (sum, weight_sum) = self.buffer[..count]
            .iter()
            .enumerate()
            .fold((0.0f32, 0.0f32), |(sum, weights), (i, &v)| {
                let weight = (i + 1) as f32;
                (sum + v * weight, weights + weight)
            });
        let average = if count > 0 { sum / weight_sum } else { value };

        let output = match self.last_output {
            None => average,
            Some(last) => last + (average - last) * FIFO_SMOOTHING,
        };
        self.last_output = Some(output);
        output
    }

    /// Changes the history capacity without disturbing the output.
    ///
    /// The most recent `min(valid, new_size)` samples are carried over,
    /// oldest first. The smoothed output is kept as is, so the next
    /// `process` call continues from where the filter left off.
    ///
    /// # Panics
    /// * If `new_size` is zero
    pub fn resize(&mut self, new_size: usize) {
        assert!(new_size > 0, "FIFO filter size must be positive");
        let old_size = self.buffer.len();
        if new_size == old_size {
            return;
        }

        let keep = self.valid_count().min(new_size);
        let mut buffer = vec![0.0; new_size];
        for (i, slot) in buffer.iter_mut().take(keep).enumerate() {
            *slot = self.buffer[(self.head + old_size - keep + i) % old_size];
        }

        self.buffer = buffer;
        self.head = keep % new_size;
        self.full = false;
    }

    /// Clears the history and the smoothed output.
    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.head = 0;
        self.full = false;
        self.last_output = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oscillation_after(filter: &mut LowPassFilter, samples: usize) -> f32 {
        let outputs: Vec<f32> = (0..samples)
            .map(|i| filter.process(if i % 2 == 0 { 1.0 } else { -1.0 }))
            .collect();
        outputs[samples - 20..]
            .windows(2)
            .map(|w| (w[1] - w[0]).abs())
            .fold(0.0, f32::max)
    }

    #[test]
    fn alpha_scales_cutoff() {
        assert!((LowPassFilter::new(1.0).alpha() - 0.02).abs() < 1e-7);
        assert!((LowPassFilter::from_preset(CutoffPreset::QuarterHz).alpha() - 0.005).abs() < 1e-7);
    }

    #[test]
    fn low_pass_first_sample_passes_through() {
        let mut filter = LowPassFilter::new(0.5);
        assert_eq!(filter.process(-37.25), -37.25);
    }

    #[test]
    fn low_pass_holds_constant_signal() {
        let mut filter = LowPassFilter::new(1.0);
        filter.process(-60.0);
        for _ in 0..10 {
            assert!((filter.process(-60.0) + 60.0).abs() < 1e-4);
        }
    }

    #[test]
    fn low_pass_moves_toward_input() {
        let mut filter = LowPassFilter::new(1.0);
        filter.process(0.0);
        let y = filter.process(10.0);
        assert!((y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn smaller_alpha_damps_oscillation_more() {
        let mut fast = LowPassFilter::from_preset(CutoffPreset::OneHz);
        let mut medium = LowPassFilter::from_preset(CutoffPreset::HalfHz);
        let mut slow = LowPassFilter::from_preset(CutoffPreset::QuarterHz);
        let fast_swing = oscillation_after(&mut fast, 200);
        let medium_swing = oscillation_after(&mut medium, 200);
        let slow_swing = oscillation_after(&mut slow, 200);
        assert!(medium_swing < fast_swing);
        assert!(slow_swing < medium_swing);
    }

    #[test]
    fn low_pass_reset_restarts_passthrough() {
        let mut filter = LowPassFilter::new(1.0);
        filter.process(1.0);
        filter.process(5.0);
        filter.reset();
        assert_eq!(filter.process(-3.0), -3.0);
    }

    #[test]
    fn cutoff_preset_lookup() {
        assert_eq!(CutoffPreset::try_from(0.5), Ok(CutoffPreset::HalfHz));
        assert_eq!(CutoffPreset::try_from(2.0), Err(2.0));
        assert_eq!(CutoffPreset::OneHz.to_string(), "1Hz");
    }

    #[test]
    fn fifo_first_sample_seeds_output() {
        let mut filter = FifoFilter::default();
        assert_eq!(filter.capacity(), 6);
        assert_eq!(filter.process(-42.0), -42.0);
        assert_eq!(filter.last_output(), Some(-42.0));
    }

    #[test]
    fn fifo_weights_by_slot_and_smooths() {
        let mut filter = FifoFilter::new(4);
        filter.process(3.0);
        // slots [3, 6] weighted 1 and 2: (3 + 12) / 3 = 5
        let y = filter.process(6.0);
        let expected = 3.0 + (5.0 - 3.0) * FIFO_SMOOTHING;
        assert!((y - expected).abs() < 1e-6);
    }

    #[test]
    fn fifo_weighting_is_positional_after_wrap() {
        let mut filter = FifoFilter::new(3);
        for v in [1.0, 2.0, 3.0] {
            filter.process(v);
        }
        assert!(filter.is_full());
        let before = filter.last_output().unwrap();
        let y = filter.process(4.0);
        // slots [4, 2, 3]: (4*1 + 2*2 + 3*3) / 6
        let average = 17.0 / 6.0;
        assert!((y - (before + (average - before) * FIFO_SMOOTHING)).abs() < 1e-6);
        assert_eq!(filter.history(), &[4.0, 2.0, 3.0]);
        assert_eq!(filter.head(), 1);
    }

    #[test]
    fn fifo_resize_to_same_size_is_noop() {
        let mut filter = FifoFilter::new(6);
        for v in 1..=8 {
            filter.process(v as f32);
        }
        let history = filter.history().to_vec();
        let (head, full, output) = (filter.head(), filter.is_full(), filter.last_output());

        filter.resize(6);

        assert_eq!(filter.history(), history.as_slice());
        assert_eq!(filter.head(), head);
        assert_eq!(filter.is_full(), full);
        assert_eq!(filter.last_output(), output);
    }

    #[test]
    fn fifo_shrink_keeps_most_recent_samples() {
        let mut filter = FifoFilter::new(6);
        for v in 1..=10 {
            filter.process(v as f32);
        }
        let output = filter.last_output();

        filter.resize(3);

        assert_eq!(filter.capacity(), 3);
        assert_eq!(filter.history(), &[8.0, 9.0, 10.0]);
        assert_eq!(filter.head(), 0);
        assert!(!filter.is_full());
        assert_eq!(filter.last_output(), output);
    }

    #[test]
    fn fifo_grow_before_wrap_keeps_everything() {
        let mut filter = FifoFilter::new(6);
        for v in [1.0, 2.0, 3.0] {
            filter.process(v);
        }
        filter.resize(10);
        assert_eq!(&filter.history()[..3], &[1.0, 2.0, 3.0]);
        assert!(filter.history()[3..].iter().all(|&v| v == 0.0));
        assert_eq!(filter.head(), 3);
    }

    #[test]
    fn fifo_resize_keeps_output_continuous() {
        let mut filter = FifoFilter::new(6);
        for _ in 0..20 {
            filter.process(-50.0);
        }
        filter.resize(2);
        let y = filter.process(-50.0);
        assert!((y + 50.0).abs() < 1e-3);
    }

    #[test]
    fn fifo_reset_clears_both_layers() {
        let mut filter = FifoFilter::new(4);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            filter.process(v);
        }
        filter.reset();
        assert!(filter.history().iter().all(|&v| v == 0.0));
        assert_eq!(filter.head(), 0);
        assert!(!filter.is_full());
        assert_eq!(filter.last_output(), None);
        assert_eq!(filter.process(9.0), 9.0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn fifo_zero_size_panics() {
        FifoFilter::new(0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn fifo_resize_to_zero_panics() {
        FifoFilter::new(3).resize(0);
    }
}
