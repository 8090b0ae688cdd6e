//! Sliding-window slicing of a normalized series into training pairs.

/// Training pairs produced by sliding a width-`W` window (stride 1) across
/// a series, pairing each window with the value immediately following it.
#[derive(Debug, Clone)]
pub struct WindowSet {
    pub window: usize,
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl WindowSet {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// Slice `series` into `(window, target)` pairs.
///
/// Produces `max(0, len - window)` pairs; callers must treat an empty
/// result as insufficient data rather than training on it.
pub fn make_windows(series: &[f64], window: usize) -> WindowSet {
    let count = series.len().saturating_sub(window);
    let mut inputs = Vec::with_capacity(count);
    let mut targets = Vec::with_capacity(count);

    for start in 0..count {
        inputs.push(series[start..start + window].to_vec());
        targets.push(series[start + window]);
    }

    WindowSet {
        window,
        inputs,
        targets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_len_minus_window_pairs() {
        let series: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let set = make_windows(&series, 3);
        assert_eq!(set.len(), 7);
        for (input, &target) in set.inputs.iter().zip(&set.targets) {
            assert_eq!(input.len(), 3);
            assert_eq!(target, input[2] + 1.0);
        }
    }

    #[test]
    fn pairs_match_worked_example() {
        let series = [1.00, 1.01, 1.02, 1.03];
        let set = make_windows(&series, 2);
        assert_eq!(set.len(), 2);
        assert_eq!(set.inputs[0], vec![1.00, 1.01]);
        assert_eq!(set.targets[0], 1.02);
        assert_eq!(set.inputs[1], vec![1.01, 1.02]);
        assert_eq!(set.targets[1], 1.03);
    }

    #[test]
    fn short_series_yields_no_pairs() {
        assert!(make_windows(&[1.0, 2.0], 2).is_empty());
        assert!(make_windows(&[1.0], 5).is_empty());
        assert!(make_windows(&[], 1).is_empty());
    }
}
