use std::ops::Index;

// ---------------------------------------------------------------------------
// NumericSeries – one metric column over time
// ---------------------------------------------------------------------------

/// Marker for "no sample at this position". Rendered as a gap.
pub const MISSING: f64 = f64::NAN;

/// Whether a value is the missing marker.
#[inline]
pub fn is_missing(v: f64) -> bool {
    v.is_nan()
}

/// An ordered sequence of samples. Any element may be [`MISSING`].
///
/// Position is the only relationship between two series: after alignment,
/// index `i` of one series corresponds to index `i` of the other.
#[derive(Debug, Clone, Default)]
pub struct NumericSeries {
    values: Vec<f64>,
}

impl NumericSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Total number of positions, missing ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-missing values.
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| !is_missing(**v)).count()
    }

    /// Number of missing markers before the first real value.
    pub fn leading_missing(&self) -> usize {
        self.values.iter().take_while(|v| is_missing(**v)).count()
    }

    /// Number of missing markers after the last real value.
    pub fn trailing_missing(&self) -> usize {
        self.values.iter().rev().take_while(|v| is_missing(**v)).count()
    }

    /// Divide every value by `divisor`. Missing stays missing.
    pub fn scaled(&self, divisor: f64) -> Self {
        Self::new(self.values.iter().map(|v| v / divisor).collect())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.values.iter()
    }

    /// Split off the first `n` positions: `(head, tail)`.
    pub fn split_at(&self, n: usize) -> (Self, Self) {
        let n = n.min(self.values.len());
        let (head, tail) = self.values.split_at(n);
        (Self::new(head.to_vec()), Self::new(tail.to_vec()))
    }

    /// `self` followed by `other`.
    pub fn concat(&self, other: &Self) -> Self {
        let mut values = Vec::with_capacity(self.len() + other.len());
        values.extend_from_slice(&self.values);
        values.extend_from_slice(&other.values);
        Self::new(values)
    }

    /// Keep the first `len` positions.
    pub fn truncated(&self, len: usize) -> Self {
        Self::new(self.values[..len.min(self.values.len())].to_vec())
    }

    /// Finite `(min, max)` over the series, ignoring missing markers.
    pub fn finite_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl From<Vec<f64>> for NumericSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<f64> for NumericSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for NumericSeries {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.values[i]
    }
}

/// Element-wise equality where two missing markers compare equal.
impl PartialEq for NumericSeries {
    fn eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a == b || (is_missing(*a) && is_missing(*b)))
    }
}

// ---------------------------------------------------------------------------
// MetricTable – one CSV file
// ---------------------------------------------------------------------------

/// Raw rows of a metrics CSV, addressable by column name.
///
/// Cells are kept as text and parsed on extraction, so a non-numeric cell
/// only fails the column that is actually requested.
#[derive(Debug, Clone)]
pub struct MetricTable {
    /// Header names in file order.
    pub column_names: Vec<String>,
    /// One entry per data row, same width as `column_names`.
    pub rows: Vec<Vec<String>>,
}

impl MetricTable {
    pub fn new(column_names: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { column_names, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }
}
