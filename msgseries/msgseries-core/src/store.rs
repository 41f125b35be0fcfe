//! Series storage contract and the in-memory store.

use std::collections::HashMap;

use crate::path::FieldPath;

/// Opaque reference to a series inside the store that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesHandle(usize);

impl SeriesHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Append-only storage of named `(timestamp, value)` series.
///
/// Handles returned by [`get_or_create`] are only meaningful for the store
/// that produced them.
///
/// [`get_or_create`]: SeriesStore::get_or_create
pub trait SeriesStore {
    /// Return the handle of the series at `path`, creating it on first use.
    fn get_or_create(&mut self, path: &FieldPath) -> SeriesHandle;

    /// Append one sample to an existing series.
    fn append(&mut self, handle: SeriesHandle, timestamp: f64, value: f64);
}

impl<S: SeriesStore + ?Sized> SeriesStore for &mut S {
    fn get_or_create(&mut self, path: &FieldPath) -> SeriesHandle {
        (**self).get_or_create(path)
    }

    fn append(&mut self, handle: SeriesHandle, timestamp: f64, value: f64) {
        (**self).append(handle, timestamp, value)
    }
}

/// One named series with its samples in append order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    path: FieldPath,
    points: Vec<(f64, f64)>,
}

impl Series {
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// [`SeriesStore`] keeping every series in memory, in creation order.
#[derive(Debug, Clone, Default)]
pub struct MemorySeriesStore {
    series: Vec<Series>,
    index: HashMap<FieldPath, usize>,
}

impl MemorySeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&Series> {
        self.index
            .get(&FieldPath::root(path))
            .map(|&i| &self.series[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.path.as_str())
    }

    /// Total number of samples across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }

    /// Move every sample of `other` into this store, appending to series
    /// that already exist.
    pub fn merge(&mut self, other: MemorySeriesStore) {
        for series in other.series {
            let handle = self.get_or_create(&series.path);
            self.series[handle.index()].points.extend(series.points);
        }
    }
}

impl SeriesStore for MemorySeriesStore {
    fn get_or_create(&mut self, path: &FieldPath) -> SeriesHandle {
        if let Some(&i) = self.index.get(path) {
            return SeriesHandle(i);
        }
        let i = self.series.len();
        self.series.push(Series {
            path: path.clone(),
            points: Vec::new(),
        });
        self.index.insert(path.clone(), i);
        SeriesHandle(i)
    }

    fn append(&mut self, handle: SeriesHandle, timestamp: f64, value: f64) {
        debug_assert!(handle.0 < self.series.len(), "foreign series handle");
        if let Some(series) = self.series.get_mut(handle.0) {
            series.points.push((timestamp, value));
        }
    }
}
