//! Deterministic replay of a recorded observation stream.

use std::fs;
use std::io;
use std::path::Path;

use crate::source::ObservationSink;

/// Fixed, ordered list of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSource<T> {
    values: Vec<T>,
}

impl<T> SequenceSource<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Deliver every value to `sink` in order. Returns how many were delivered.
    pub fn drive<S: ObservationSink<T> + ?Sized>(self, sink: &S) -> usize {
        let count = self.values.len();
        for value in self.values {
            sink.observe(value);
        }
        count
    }
}

impl SequenceSource<String> {
    /// One observation per line; blank lines and `#` comments are skipped.
    pub fn parse_lines(text: &str) -> Self {
        let values = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(String::from)
            .collect();
        Self { values }
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse_lines(&text))
    }
}
