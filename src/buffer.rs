/// Bounded buffer of the most recent readings for one sector
use std::collections::VecDeque;

use crate::models::Reading;

/// FIFO of recent readings with a fixed capacity.
///
/// Pushing beyond capacity evicts the oldest entry, so the buffer holds a
/// constant amount of memory for the life of the service regardless of how
/// many cycles feed it.
#[derive(Debug, Clone)]
pub struct ReadingBuffer {
    capacity: usize,
    readings: VecDeque<Reading>,
}

impl ReadingBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a reading, evicting the oldest one when full
    pub fn push(&mut self, reading: Reading) {
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
    }

    /// The most recently pushed reading
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}
