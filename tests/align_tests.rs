//! Tests for series smoothing and pairwise alignment.
//!
//! ## Test Organization
//!
//! 1. **Smoothing** - length, determinism, window boundary, bad samples
//! 2. **Alignment** - length invariant, value preservation, padding
//! 3. **Leading missing values** - strip, re-prefix, tail truncation
//! 4. **Properties** - randomized length and symmetry checks

use broker_charts::data::align::{
    align_pair, align_pair_skipping_leading_missing, align_pair_with,
};
use broker_charts::data::model::{is_missing, NumericSeries, MISSING};
use broker_charts::data::smooth::{smooth, smooth_with, SmoothingParams};
use broker_charts::AlignError;
use proptest::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

/// `1, 2, ..., n`
fn ascending(n: usize) -> NumericSeries {
    (1..=n).map(|i| i as f64).collect()
}

/// Deterministic noisy signal.
fn noisy(n: usize, seed: f64) -> NumericSeries {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.5 * t + 10.0 * (t * 0.3 + seed).sin() + 3.0 * (t * 7.0 + seed).cos()
        })
        .collect()
}

fn leading(n_missing: usize, body: NumericSeries) -> NumericSeries {
    std::iter::repeat(MISSING)
        .take(n_missing)
        .chain(body.iter().copied())
        .collect()
}

// ============================================================================
// Smoothing Tests
// ============================================================================

/// Smoothing keeps every sample and is stable across calls.
#[test]
fn test_smooth_preserves_length_and_is_deterministic() {
    let s = noisy(200, 1.0);
    let first = smooth(&s).unwrap();
    let second = smooth(&s).unwrap();

    assert_eq!(first.len(), 200);
    assert_eq!(first, second);
    assert_eq!(first.count(), 200, "smoothing must not introduce gaps");
}

/// Smoothing actually reduces sample-to-sample noise.
#[test]
fn test_smooth_reduces_roughness() {
    let s = noisy(300, 0.5);
    let out = smooth(&s).unwrap();
    let roughness = |v: &[f64]| v.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>();

    assert!(roughness(out.values()) < roughness(s.values()) / 2.0);
}

/// A series exactly one window long is accepted.
#[test]
fn test_smooth_accepts_exact_window() {
    let out = smooth(&ascending(53)).unwrap();
    assert_eq!(out.len(), 53);
}

/// One sample short of the window is rejected before any numeric work.
#[test]
fn test_smooth_rejects_short_series() {
    let err = smooth(&ascending(52)).unwrap_err();
    assert_eq!(err, AlignError::InsufficientData { len: 52, window: 53 });
}

/// Empty input is just a very short series.
#[test]
fn test_smooth_rejects_empty_series() {
    let err = smooth(&NumericSeries::default()).unwrap_err();
    assert!(matches!(err, AlignError::InsufficientData { len: 0, .. }));
}

/// Missing samples inside the smoothed span are not silently propagated.
#[test]
fn test_smooth_rejects_interior_missing() {
    let mut values = ascending(60).into_values();
    values[30] = MISSING;
    let err = smooth(&NumericSeries::new(values)).unwrap_err();
    assert!(matches!(err, AlignError::InvalidInput(msg) if msg.contains("index 30")));
}

/// Infinite samples are rejected the same way.
#[test]
fn test_smooth_rejects_infinite() {
    let mut values = ascending(60).into_values();
    values[0] = f64::INFINITY;
    assert!(matches!(
        smooth(&NumericSeries::new(values)),
        Err(AlignError::InvalidInput(_))
    ));
}

/// A straight line survives the filter, edges included.
#[test]
fn test_smooth_reproduces_linear_trend() {
    let s = ascending(100);
    let out = smooth(&s).unwrap();
    for (raw, smoothed) in s.iter().zip(out.iter()) {
        assert!((raw - smoothed).abs() < 1e-6, "{raw} vs {smoothed}");
    }
}

/// Window-53 cubic output on a sawtooth-plus-ramp, checked at the leading
/// edge, the interior and the trailing edge.
#[test]
fn test_smooth_matches_reference_values() {
    let s: NumericSeries = (0..60)
        .map(|i| ((i * 37 + 11) % 17) as f64 + i as f64 / 4.0)
        .collect();
    let out = smooth(&s).unwrap();
    for (i, expected) in [(0, 7.641795311607), (26, 14.283876500858), (59, 22.340051457976)] {
        assert!(
            (out[i] - expected).abs() < 1e-9,
            "out[{i}] = {} expected {expected}",
            out[i]
        );
    }
}

/// Custom params are honoured.
#[test]
fn test_smooth_with_small_window() {
    let params = SmoothingParams { window: 5, degree: 2 };
    let out = smooth_with(&ascending(5), params).unwrap();
    assert_eq!(out.len(), 5);
    assert!(matches!(
        smooth_with(&ascending(4), params),
        Err(AlignError::InsufficientData { len: 4, window: 5 })
    ));
}

// ============================================================================
// Alignment Tests
// ============================================================================

/// 100 vs 70 ascending values: both come out 100 long, the shorter with
/// exactly 30 trailing missing markers.
#[test]
fn test_align_pair_end_to_end() {
    let (a, b) = align_pair(&ascending(100), &ascending(70)).unwrap();

    assert_eq!(a.len(), 100);
    assert_eq!(b.len(), 100);
    assert_eq!(a.count(), 100, "longer series gets no padding");
    assert_eq!(b.count(), 70);
    assert_eq!(b.trailing_missing(), 30);
    assert!(b.values()[70..].iter().all(|v| is_missing(*v)));
}

/// The leading values of each output are the smoothed input, not the raw one.
#[test]
fn test_align_pair_preserves_smoothed_values() {
    let a = noisy(120, 0.0);
    let b = noisy(90, 2.0);
    let (a2, b2) = align_pair(&a, &b).unwrap();

    assert_eq!(a2, smooth(&a).unwrap());
    assert_eq!(b2.truncated(90), smooth(&b).unwrap());
    assert_ne!(b2.truncated(90), b, "raw values must not leak through");
}

/// Equal lengths: nothing is padded.
#[test]
fn test_align_pair_equal_lengths() {
    let (a, b) = align_pair(&noisy(80, 0.0), &noisy(80, 1.0)).unwrap();
    assert_eq!(a.len(), 80);
    assert_eq!(b.len(), 80);
    assert_eq!(a.count(), 80);
    assert_eq!(b.count(), 80);
}

/// Padding goes to whichever side is shorter.
#[test]
fn test_align_pair_pads_first_when_shorter() {
    let (a, b) = align_pair(&ascending(60), &ascending(75)).unwrap();
    assert_eq!(a.len(), 75);
    assert_eq!(a.trailing_missing(), 15);
    assert_eq!(b.trailing_missing(), 0);
}

/// Either input being too short fails the whole pair.
#[test]
fn test_align_pair_propagates_insufficient_data() {
    let err = align_pair(&ascending(100), &ascending(10)).unwrap_err();
    assert_eq!(err, AlignError::InsufficientData { len: 10, window: 53 });
}

/// Padding is decided on lengths that smoothing never changes.
#[test]
fn test_align_pair_length_independent_of_smoothing() {
    let params = SmoothingParams { window: 7, degree: 2 };
    let a = noisy(30, 0.0);
    let b = noisy(20, 0.0);
    let (a2, b2) = align_pair_with(&a, &b, params).unwrap();

    assert_eq!(smooth_with(&a, params).unwrap().len(), a.len());
    assert_eq!(a2.len(), 30);
    assert_eq!(b2.trailing_missing(), 10);
}

// ============================================================================
// Leading Missing Value Tests
// ============================================================================

/// No leading gaps: identical to plain alignment.
#[test]
fn test_skip_leading_without_gaps_matches_align_pair() {
    let a = noisy(100, 0.0);
    let b = noisy(70, 1.0);
    assert_eq!(
        align_pair_skipping_leading_missing(&a, &b).unwrap(),
        align_pair(&a, &b).unwrap()
    );
}

/// Both series start with the same gap: it is restored on both.
#[test]
fn test_skip_leading_restores_gap() {
    let a = leading(4, noisy(60, 0.0));
    let b = leading(4, noisy(60, 1.0));
    let (a2, b2) = align_pair_skipping_leading_missing(&a, &b).unwrap();

    assert_eq!(a2.len(), 64);
    assert_eq!(b2.len(), 64);
    assert_eq!(a2.leading_missing(), 4);
    assert_eq!(b2.leading_missing(), 4);
    assert_eq!(a2.split_at(4).1, smooth(&noisy(60, 0.0)).unwrap());
}

/// Uneven gaps: the longer result is cut at the tail, dropping real values.
#[test]
fn test_skip_leading_truncates_longer_tail() {
    let a = leading(5, ascending(100));
    let b = leading(2, ascending(70));
    let (a2, b2) = align_pair_skipping_leading_missing(&a, &b).unwrap();

    // Bodies align to 100; re-prefixed lengths are 105 and 102.
    assert_eq!(a2.len(), 102);
    assert_eq!(b2.len(), 102);
    assert_eq!(a2.leading_missing(), 5);
    assert_eq!(a2.count(), 97, "three smoothed values are discarded");
    assert_eq!(b2.leading_missing(), 2);
    assert_eq!(b2.count(), 70);
    assert_eq!(b2.trailing_missing(), 30);
}

/// A series that is all gap has nothing to smooth.
#[test]
fn test_skip_leading_all_missing_fails() {
    let a = leading(80, NumericSeries::default());
    let err = align_pair_skipping_leading_missing(&a, &ascending(80)).unwrap_err();
    assert!(matches!(err, AlignError::InsufficientData { len: 0, .. }));
}

// ============================================================================
// Property Tests
// ============================================================================

fn series_strategy() -> impl Strategy<Value = NumericSeries> {
    prop::collection::vec(-1.0e6f64..1.0e6, 53..160).prop_map(NumericSeries::new)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_aligned_lengths_match(a in series_strategy(), b in series_strategy()) {
        let (a2, b2) = align_pair(&a, &b).unwrap();
        let longest = a.len().max(b.len());
        prop_assert_eq!(a2.len(), longest);
        prop_assert_eq!(b2.len(), longest);
        prop_assert_eq!(a2.count(), a.len());
        prop_assert_eq!(b2.count(), b.len());
        prop_assert_eq!(a2.trailing_missing(), longest - a.len());
        prop_assert_eq!(b2.trailing_missing(), longest - b.len());
    }

    #[test]
    fn prop_swapping_inputs_swaps_outputs(a in series_strategy(), b in series_strategy()) {
        let (a2, b2) = align_pair(&a, &b).unwrap();
        let (b3, a3) = align_pair(&b, &a).unwrap();
        prop_assert_eq!(a2, a3);
        prop_assert_eq!(b2, b3);
    }
}
