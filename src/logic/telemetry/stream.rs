//! Stream - Ordered, append-only sequence of readings

use serde::{Deserialize, Serialize};

use super::reading::{Channel, Reading};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stream {
    readings: Vec<Reading>,
}

impl Stream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            readings: Vec::with_capacity(capacity),
        }
    }

    /// Append a reading. Existing readings are never touched.
    pub fn push(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Reading> {
        self.readings.get(index)
    }

    pub fn last(&self) -> Option<&Reading> {
        self.readings.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.readings
    }

    /// Values of one channel over time (for charts / exports)
    pub fn channel_series(&self, channel: Channel) -> Vec<f64> {
        self.readings.iter().map(|r| r.get(channel)).collect()
    }
}

impl FromIterator<Reading> for Stream {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self {
            readings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Stream {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
