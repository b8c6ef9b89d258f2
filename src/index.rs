//! Forward index: character → coordinates of its occurrences.
//!
//! Buckets are filled in corpus traversal order, so building is fully
//! deterministic. Encoding consumes coordinates from the buckets; a consumed
//! coordinate is gone for the lifetime of this index value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::corpus::{Coordinate, Corpus};
use crate::random::RandomSource;

/// Mapping from each corpus character to the coordinates where it occurs.
///
/// Persisted as a JSON object whose keys are single-character strings and
/// whose values are arrays of `"page-line-position"` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForwardIndex {
    buckets: BTreeMap<char, Vec<Coordinate>>,
}

impl ForwardIndex {
    /// Indexes every character of `corpus`, pages ascending, then lines,
    /// then positions.
    pub fn build(corpus: &Corpus) -> Self {
        let mut buckets: BTreeMap<char, Vec<Coordinate>> = BTreeMap::new();
        for (coordinate, c) in corpus.occurrences() {
            buckets.entry(c).or_default().push(coordinate);
        }
        ForwardIndex { buckets }
    }

    /// Coordinates still available for `c`, in bucket order.
    pub fn coordinates(&self, c: char) -> &[Coordinate] {
        self.buckets.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of coordinates still available for `c`.
    pub fn remaining(&self, c: char) -> usize {
        self.coordinates(c).len()
    }

    /// Returns `true` if `c` can still be encoded.
    pub fn contains(&self, c: char) -> bool {
        self.remaining(c) > 0
    }

    /// Number of distinct characters with at least one coordinate left.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `true` if no character can be encoded.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total coordinates left across all characters.
    pub fn total_coordinates(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Iterates the indexed characters in ascending order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.buckets.keys().copied()
    }

    /// Removes and returns a uniformly chosen coordinate for `c`.
    ///
    /// Returns `None` if `c` was never indexed or its bucket is exhausted.
    /// The removal is a swap-remove; a bucket that becomes empty is dropped.
    pub fn take_random<R>(&mut self, c: char, rng: &mut R) -> Option<Coordinate>
    where
        R: RandomSource + ?Sized,
    {
        let bucket = self.buckets.get_mut(&c)?;
        if bucket.is_empty() {
            self.buckets.remove(&c);
            return None;
        }
        let coordinate = bucket.swap_remove(rng.next_below(bucket.len()));
        if bucket.is_empty() {
            self.buckets.remove(&c);
        }
        Some(coordinate)
    }
}
