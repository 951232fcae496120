//! core/transitions.rs — gaze-direction transition counting and
//! normalization to relative frequencies.

use tracing::debug;

use crate::core::tier::IntervalTier;

/// Number of gaze categories in the coding scheme (0..=9).
pub const CATEGORIES: usize = 10;

/// Category reserved for off-task/neutral gaze.
pub const OFF_TASK: u8 = 5;

/// Whether the off-task category participates in sums and outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    ExcludeOffTask,
}

impl CategoryFilter {
    pub fn includes(&self, category: u8) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::ExcludeOffTask => category != OFF_TASK,
        }
    }
}

/// Parse a mark as a gaze category. Anything outside 0..=9 is not a
/// category.
pub fn parse_category(mark: &str) -> Option<u8> {
    mark.trim().parse::<u8>().ok().filter(|c| *c < CATEGORIES as u8)
}

/// Fixed 10×10 count matrix. Absence of data is an observable zero, not an
/// implicit default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionMatrix {
    counts: [[u32; CATEGORIES]; CATEGORIES],
}

impl TransitionMatrix {
    pub fn get(&self, from: u8, to: u8) -> u32 {
        self.counts[from as usize][to as usize]
    }

    pub fn increment(&mut self, from: u8, to: u8) {
        self.counts[from as usize][to as usize] += 1;
    }

    pub fn row(&self, from: u8) -> &[u32; CATEGORIES] {
        &self.counts[from as usize]
    }

    /// Total number of recorded transitions.
    pub fn total(&self) -> u32 {
        self.counts.iter().flatten().sum()
    }
}

/// Row-stochastic counterpart of [`TransitionMatrix`], rounded to two
/// decimals.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrequencyMatrix {
    freqs: [[f64; CATEGORIES]; CATEGORIES],
}

impl FrequencyMatrix {
    pub fn get(&self, from: u8, to: u8) -> f64 {
        self.freqs[from as usize][to as usize]
    }

    pub fn row(&self, from: u8) -> &[f64; CATEGORIES] {
        &self.freqs[from as usize]
    }

    /// Iterate non-zero entries in (source, destination) order.
    pub fn non_zero(&self) -> impl Iterator<Item = (u8, u8, f64)> + '_ {
        self.freqs.iter().enumerate().flat_map(|(from, row)| {
            row.iter().enumerate().filter_map(move |(to, &f)| {
                (f != 0.0).then_some((from as u8, to as u8, f))
            })
        })
    }
}

/// Walk the gaze tier in time order and count category changes. Intervals
/// whose mark is not a category are skipped without touching the cursor;
/// self-transitions are never counted.
pub fn analyze_transitions(tier: &IntervalTier) -> TransitionMatrix {
    let mut matrix = TransitionMatrix::default();
    let mut current: Option<u8> = None;

    for interval in tier {
        let Some(next) = parse_category(interval.mark()) else {
            continue;
        };
        if let Some(prev) = current {
            if prev != next {
                matrix.increment(prev, next);
            }
        }
        current = Some(next);
    }

    matrix
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Convert counts to relative frequencies per source row. With
/// [`CategoryFilter::ExcludeOffTask`] the off-task column neither
/// contributes to the row sum nor receives a frequency. Rows with no
/// outgoing transitions stay all-zero.
pub fn relative_frequencies(counts: &TransitionMatrix, filter: CategoryFilter) -> FrequencyMatrix {
    let mut out = FrequencyMatrix::default();

    for from in 0..CATEGORIES as u8 {
        let sum: u32 = (0..CATEGORIES as u8)
            .filter(|to| filter.includes(*to))
            .map(|to| counts.get(from, to))
            .sum();

        if sum == 0 {
            debug!(category = from, "no outgoing transitions, row left zero");
            continue;
        }

        for to in 0..CATEGORIES as u8 {
            if !filter.includes(to) {
                continue;
            }
            let count = counts.get(from, to);
            if count > 0 {
                out.freqs[from as usize][to as usize] = round2(count as f64 / sum as f64);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tier::{Interval, IntervalTier};

    fn gaze_tier(marks: &[&str]) -> IntervalTier {
        let intervals = marks
            .iter()
            .enumerate()
            .map(|(i, m)| Interval::new(i as f64, (i + 1) as f64, *m))
            .collect();
        IntervalTier::from_intervals("gaze", intervals)
    }

    #[test]
    fn counts_only_category_changes() {
        let tier = gaze_tier(&["1", "1", "2", "2", "5", "5", "3"]);
        let m = analyze_transitions(&tier);
        assert_eq!(m.get(1, 2), 1);
        assert_eq!(m.get(2, 5), 1);
        assert_eq!(m.get(5, 3), 1);
        assert_eq!(m.total(), 3);
    }

    #[test]
    fn diagonal_is_never_incremented() {
        let tier = gaze_tier(&["4", "4", "4", "7", "7", "4"]);
        let m = analyze_transitions(&tier);
        for c in 0..CATEGORIES as u8 {
            assert_eq!(m.get(c, c), 0);
        }
        assert_eq!(m.get(4, 7), 1);
        assert_eq!(m.get(7, 4), 1);
    }

    #[test]
    fn unparsable_marks_do_not_move_the_cursor() {
        // "x" between the 1 and the 2 must not hide the 1->2 transition,
        // and "12" is out of range, not category 1.
        let tier = gaze_tier(&["1", "x", "2", "12", "2"]);
        let m = analyze_transitions(&tier);
        assert_eq!(m.get(1, 2), 1);
        assert_eq!(m.total(), 1);
    }

    #[test]
    fn empty_tier_yields_zero_matrix() {
        let m = analyze_transitions(&gaze_tier(&[]));
        assert_eq!(m, TransitionMatrix::default());
    }

    #[test]
    fn frequencies_are_row_stochastic() {
        let tier = gaze_tier(&["1", "2", "1", "3", "1", "2"]);
        let m = analyze_transitions(&tier);
        let f = relative_frequencies(&m, CategoryFilter::All);

        let row1: f64 = f.row(1).iter().sum();
        assert!((row1 - 1.0).abs() <= 0.02, "row 1 sums to {row1}");
        assert_eq!(f.get(1, 2), 0.67);
        assert_eq!(f.get(1, 3), 0.33);
    }

    #[test]
    fn exclusion_drops_off_task_from_sum_and_output() {
        let mut m = TransitionMatrix::default();
        m.counts[0][2] = 3;
        m.counts[0][5] = 1;
        m.counts[0][8] = 1;

        let f = relative_frequencies(&m, CategoryFilter::ExcludeOffTask);
        assert_eq!(f.get(0, 2), 0.75);
        assert_eq!(f.get(0, 8), 0.25);
        assert_eq!(f.get(0, 5), 0.0);

        let included: f64 = (0..CATEGORIES as u8)
            .filter(|to| *to != OFF_TASK)
            .map(|to| f.get(0, to))
            .sum();
        assert!((included - 1.0).abs() <= 0.02);
    }

    #[test]
    fn zero_sum_row_stays_zero() {
        let mut m = TransitionMatrix::default();
        // category 9 only ever receives transitions
        m.counts[1][9] = 2;
        let f = relative_frequencies(&m, CategoryFilter::All);
        assert!(f.row(9).iter().all(|&x| x == 0.0));
        assert_eq!(f.get(1, 9), 1.0);
    }

    #[test]
    fn exclusion_with_only_off_task_counts_is_a_zero_row() {
        let mut m = TransitionMatrix::default();
        m.counts[3][5] = 4;
        let f = relative_frequencies(&m, CategoryFilter::ExcludeOffTask);
        assert!(f.row(3).iter().all(|&x| x == 0.0));
    }
}
