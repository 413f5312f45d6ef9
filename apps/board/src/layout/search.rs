//! Font-Size Search: bounded bisection for the largest non-overflowing font size.
//!
//! Overflow is assumed monotone in font size: if `s` fits, every `s' < s` fits. The search
//! only records a candidate on the "fits" branch, so the returned size always passed the
//! overflow check, unless nothing fit, in which case the range minimum is the floor.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::font_size::{FontRange, FontSize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The size that was applied last.
    pub size: FontSize,
    pub iterations: u32,
    /// False when the iteration ceiling stopped the loop before the bracket closed.
    pub converged: bool,
    /// False when no probed size fit and the minimum was applied as a floor.
    pub found_fit: bool,
}

/// Bisects `range` for the largest size at which `check` reports no overflow.
///
/// `apply` installs a trial size on `target`; `check` returns true if the target overflows
/// at the currently applied size. Both see the same `target`, so every check observes the
/// size applied immediately before it. The terminal size is applied before returning.
pub fn find_optimal_font_size<T: ?Sized>(
    range: &FontRange,
    target: &mut T,
    mut apply: impl FnMut(&mut T, FontSize),
    mut check: impl FnMut(&mut T) -> bool,
) -> SearchOutcome {
    let mut min = range.min.px();
    let mut max = range.max.px();
    let mut found: Option<f32> = None;
    let mut iterations = 0u32;

    while max - min > range.step && iterations < range.max_iterations {
        iterations += 1;
        let mid = (min + max) / 2.0;
        apply(target, FontSize::new(mid));
        if check(target) {
            max = mid;
        } else {
            min = mid;
            found = Some(mid);
        }
    }

    let converged = max - min <= range.step;
    if !converged {
        warn!(
            iterations,
            min, max, "Font-size search hit the iteration ceiling before converging"
        );
    }

    let size = match found {
        Some(px) => FontSize::new(px),
        None => {
            debug!(
                min = range.min.px(),
                "No probed font size fit; applying the range minimum"
            );
            range.min
        }
    };
    apply(target, size);

    SearchOutcome {
        size,
        iterations,
        converged,
        found_fit: found.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_size::{FONT_STEP, MAX_ITERATIONS};

    /// Synthetic monotone oracle: overflows iff the applied size exceeds `threshold`.
    struct ThresholdStub {
        threshold: f32,
        applied: f32,
        checks: u32,
        applied_log: Vec<f32>,
    }

    impl ThresholdStub {
        fn new(threshold: f32) -> Self {
            Self {
                threshold,
                applied: 0.0,
                checks: 0,
                applied_log: vec![],
            }
        }
    }

    fn run(range: &FontRange, stub: &mut ThresholdStub) -> SearchOutcome {
        find_optimal_font_size(
            range,
            stub,
            |s, size| {
                s.applied = size.px();
                s.applied_log.push(size.px());
            },
            |s| {
                s.checks += 1;
                s.applied > s.threshold
            },
        )
    }

    #[test]
    fn test_finds_maximal_fitting_size() {
        let range = FontRange::default();
        let mut stub = ThresholdStub::new(37.25);
        let outcome = run(&range, &mut stub);
        assert!(outcome.converged);
        assert!(outcome.found_fit);
        assert!(outcome.size.px() <= 37.25, "must fit: {:?}", outcome.size);
        assert!(
            outcome.size.px() + FONT_STEP > 37.25,
            "must be maximal within one step: {:?}",
            outcome.size
        );
        // The terminal size is the last one applied.
        assert_eq!(stub.applied, outcome.size.px());
    }

    #[test]
    fn test_monotone_oracle_consistency() {
        // Every probe below a fitting probe must also fit under the stub.
        let range = FontRange::default();
        let mut stub = ThresholdStub::new(20.0);
        run(&range, &mut stub);
        let fitting: Vec<f32> = stub
            .applied_log
            .iter()
            .copied()
            .filter(|&s| s <= 20.0)
            .collect();
        let overflowing: Vec<f32> = stub
            .applied_log
            .iter()
            .copied()
            .filter(|&s| s > 20.0)
            .collect();
        let max_fit = fitting.iter().copied().fold(f32::MIN, f32::max);
        let min_over = overflowing.iter().copied().fold(f32::MAX, f32::min);
        assert!(max_fit < min_over);
    }

    #[test]
    fn test_iterations_bounded_and_result_in_range() {
        let range = FontRange::default();
        for threshold in [0.0, 8.0, 8.05, 15.5, 40.0, 71.99, 72.0, 500.0] {
            let mut stub = ThresholdStub::new(threshold);
            let outcome = run(&range, &mut stub);
            assert!(outcome.iterations <= MAX_ITERATIONS);
            assert!(range.contains(outcome.size), "{threshold}: {:?}", outcome.size);
            // log2((72 - 8) / 0.1) ≈ 9.3
            assert!(outcome.iterations <= 10, "{threshold}: {}", outcome.iterations);
            assert_eq!(stub.checks, outcome.iterations);
        }
    }

    #[test]
    fn test_minimum_overflowing_returns_minimum() {
        let range = FontRange::default();
        let mut stub = ThresholdStub::new(0.0);
        let outcome = run(&range, &mut stub);
        assert_eq!(outcome.size, FontSize::MIN);
        assert!(!outcome.found_fit);
        assert_eq!(stub.applied, FontSize::MIN.px());
    }

    #[test]
    fn test_iteration_ceiling_stops_without_convergence() {
        let range = FontRange {
            max_iterations: 3,
            ..FontRange::default()
        };
        let mut stub = ThresholdStub::new(50.0);
        let outcome = run(&range, &mut stub);
        assert_eq!(outcome.iterations, 3);
        assert!(!outcome.converged);
        // Probes: 40 fits, 56 overflows, 48 fits.
        assert_eq!(outcome.size, FontSize::new(48.0));
        assert!(outcome.found_fit);
    }

    #[test]
    fn test_degenerate_range_runs_no_probes() {
        let range = FontRange {
            min: FontSize::new(12.0),
            max: FontSize::new(12.05),
            ..FontRange::default()
        };
        let mut stub = ThresholdStub::new(100.0);
        let outcome = run(&range, &mut stub);
        assert_eq!(outcome.iterations, 0);
        assert!(outcome.converged);
        assert_eq!(outcome.size, FontSize::new(12.0));
        assert_eq!(stub.checks, 0);
    }
}
