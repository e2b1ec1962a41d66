//! Fixed-window moving average.
//!
//! Samples are held newest-first.  The window is the capacity: once full,
//! every push evicts the oldest sample.  A buffer built with
//! [`SmoothingBuffer::zeroed`] starts full of zeros, so a quiet device
//! drags the average toward zero instead of freezing the last reading.

use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq)]
pub struct SmoothingBuffer {
    samples:  VecDeque<f64>,
    capacity: usize,
}

impl SmoothingBuffer {
    /// Empty buffer.  A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        SmoothingBuffer { samples: VecDeque::with_capacity(capacity), capacity }
    }

    /// Buffer pre-filled with `capacity` zeros.
    pub fn zeroed(capacity: usize) -> Self {
        let mut b = Self::new(capacity);
        b.samples.extend(std::iter::repeat(0.0).take(b.capacity));
        b
    }

    /// Prepend `sample`; drop whatever falls past the window.
    pub fn push(&mut self, sample: f64) {
        self.samples.push_front(sample);
        self.samples.truncate(self.capacity);
    }

    /// No measurement this frame counts as silence.
    pub fn push_or_zero(&mut self, sample: Option<f64>) {
        self.push(sample.unwrap_or(0.0));
    }

    /// Mean of every held sample; `0.0` when nothing has been pushed.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn len(&self) -> usize { self.samples.len() }
    pub fn is_empty(&self) -> bool { self.samples.is_empty() }
    pub fn capacity(&self) -> usize { self.capacity }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.samples.iter()
    }

    pub fn samples(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
