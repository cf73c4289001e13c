//! Pairwise alignment of two metric series onto one shared index.

use super::model::{is_missing, NumericSeries, MISSING};
use super::smooth::{smooth_with, SmoothingParams};
use crate::error::{AlignError, AlignResult};

/// Append `count` missing markers to the tail of `series`.
pub fn pad_with_missing(series: &NumericSeries, count: usize) -> NumericSeries {
    if count == 0 {
        return series.clone();
    }
    let mut values = Vec::with_capacity(series.len() + count);
    values.extend_from_slice(series.values());
    values.extend(std::iter::repeat(MISSING).take(count));
    NumericSeries::new(values)
}

/// Convert a signed pad count, rejecting negatives.
pub fn pad_count(count: i64) -> AlignResult<usize> {
    usize::try_from(count)
        .map_err(|_| AlignError::InvalidInput(format!("pad count must be >= 0, got {count}")))
}

/// Smooth both series with the default filter and pad the shorter one.
pub fn align_pair(
    a: &NumericSeries,
    b: &NumericSeries,
) -> AlignResult<(NumericSeries, NumericSeries)> {
    align_pair_with(a, b, SmoothingParams::default())
}

/// [`align_pair`] with explicit smoothing parameters.
///
/// Both outputs have length `max(a.len(), b.len())`. The shorter input's
/// excess positions are missing markers at the tail.
pub fn align_pair_with(
    a: &NumericSeries,
    b: &NumericSeries,
    params: SmoothingParams,
) -> AlignResult<(NumericSeries, NumericSeries)> {
    let a = smooth_with(a, params)?;
    let b = smooth_with(b, params)?;

    let difference = a.len().abs_diff(b.len());
    Ok(if a.len() > b.len() {
        let b = pad_with_missing(&b, difference);
        (a, b)
    } else if b.len() > a.len() {
        let a = pad_with_missing(&a, difference);
        (a, b)
    } else {
        (a, b)
    })
}

/// Alignment for metrics whose first samples are missing.
pub fn align_pair_skipping_leading_missing(
    a: &NumericSeries,
    b: &NumericSeries,
) -> AlignResult<(NumericSeries, NumericSeries)> {
    align_pair_skipping_leading_missing_with(a, b, SmoothingParams::default())
}

/// Strip each series' leading missing markers, align the remainders, then
/// put each series' own leading markers back.
///
/// When the re-prefixed outputs differ in length, the longer one is cut at
/// the tail to match. That cut can drop smoothed values; it is logged at
/// `warn` whenever it does.
pub fn align_pair_skipping_leading_missing_with(
    a: &NumericSeries,
    b: &NumericSeries,
    params: SmoothingParams,
) -> AlignResult<(NumericSeries, NumericSeries)> {
    let (a_head, a_body) = a.split_at(a.leading_missing());
    let (b_head, b_body) = b.split_at(b.leading_missing());

    let (a_body, b_body) = align_pair_with(&a_body, &b_body, params)?;
    let a = a_head.concat(&a_body);
    let b = b_head.concat(&b_body);

    let len = a.len().min(b.len());
    let dropped = discarded_values(&a, len) + discarded_values(&b, len);
    if dropped > 0 {
        log::warn!(
            "truncating aligned series to {len} positions discards {dropped} smoothed values"
        );
    }
    Ok((a.truncated(len), b.truncated(len)))
}

fn discarded_values(series: &NumericSeries, len: usize) -> usize {
    series
        .values()
        .iter()
        .skip(len)
        .filter(|v| !is_missing(**v))
        .count()
}
