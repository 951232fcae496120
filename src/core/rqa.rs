//! core/rqa.rs — recurrence matrix and quantification statistics for a
//! one-dimensional category sequence.
//!
//! Embedding dimension 1, time delay 0: two samples are recurrent when
//! their Euclidean distance is within the radius. Statistics follow the
//! usual RQA definitions with the main diagonal excluded (Theiler
//! corrector 1) so that recurrence rate, determinism and laminarity share
//! one denominator. The rendered plot keeps the line of identity.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RqaParams {
    /// Neighbourhood radius. The default keeps integer categories
    /// recurrent only when equal.
    pub radius: f64,
    /// Number of diagonals around the line of identity excluded from the
    /// statistics. 1 excludes only the line of identity itself.
    pub theiler: usize,
    /// Minimum diagonal line length counted by determinism.
    pub min_diagonal: usize,
    /// Minimum vertical line length counted by laminarity.
    pub min_vertical: usize,
}

impl Default for RqaParams {
    fn default() -> Self {
        Self {
            radius: 0.65,
            theiler: 1,
            min_diagonal: 2,
            min_vertical: 2,
        }
    }
}

/// Square boolean recurrence matrix, row-major, row 0 = first sample.
#[derive(Clone, Debug, PartialEq)]
pub struct RecurrenceMatrix {
    side: usize,
    cells: Vec<bool>,
}

impl RecurrenceMatrix {
    pub fn from_sequence(values: &[f64], radius: f64) -> Self {
        let side = values.len();
        let mut cells = vec![false; side * side];
        for i in 0..side {
            for j in 0..side {
                cells[i * side + j] = (values[i] - values[j]).abs() <= radius;
            }
        }
        Self { side, cells }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn at(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.side + j]
    }
}

/// Recurrence-quantification summary of one sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RqaSummary {
    pub samples: usize,
    pub recurrence_rate: f64,
    pub determinism: f64,
    pub average_diagonal_line: f64,
    pub longest_diagonal_line: usize,
    pub divergence: f64,
    pub entropy_diagonal_lines: f64,
    pub laminarity: f64,
    pub trapping_time: f64,
    pub longest_vertical_line: usize,
    pub entropy_vertical_lines: f64,
}

impl RqaSummary {
    pub fn compute(matrix: &RecurrenceMatrix, params: &RqaParams) -> Self {
        let n = matrix.side();
        let theiler = params.theiler;

        let masked = |i: usize, j: usize| -> bool {
            i.abs_diff(j) >= theiler.max(1) && matrix.at(i, j)
        };

        let mut recurrent_points = 0usize;
        for i in 0..n {
            for j in 0..n {
                if masked(i, j) {
                    recurrent_points += 1;
                }
            }
        }

        // cells outside the Theiler window
        let mut total_cells = 0usize;
        for i in 0..n {
            for j in 0..n {
                if i.abs_diff(j) >= theiler.max(1) {
                    total_cells += 1;
                }
            }
        }

        let recurrence_rate = ratio(recurrent_points, total_cells);

        // Diagonal line histogram over every off-Theiler diagonal.
        let mut diagonal_lines: Vec<usize> = Vec::new();
        for offset in theiler.max(1)..n {
            collect_runs(
                (0..n - offset).map(|k| masked(k, k + offset)),
                &mut diagonal_lines,
            );
            collect_runs(
                (0..n - offset).map(|k| masked(k + offset, k)),
                &mut diagonal_lines,
            );
        }

        // Vertical line histogram, column-wise.
        let mut vertical_lines: Vec<usize> = Vec::new();
        for j in 0..n {
            collect_runs((0..n).map(|i| masked(i, j)), &mut vertical_lines);
        }

        let diag = LineStats::from_lengths(&diagonal_lines, params.min_diagonal);
        let vert = LineStats::from_lengths(&vertical_lines, params.min_vertical);

        Self {
            samples: n,
            recurrence_rate,
            determinism: ratio(diag.points, recurrent_points),
            average_diagonal_line: diag.mean,
            longest_diagonal_line: diag.longest,
            divergence: if diag.longest > 0 {
                1.0 / diag.longest as f64
            } else {
                0.0
            },
            entropy_diagonal_lines: diag.entropy,
            laminarity: ratio(vert.points, recurrent_points),
            trapping_time: vert.mean,
            longest_vertical_line: vert.longest,
            entropy_vertical_lines: vert.entropy,
        }
    }
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

/// Append the lengths of all true-runs of `cells` to `lengths`.
fn collect_runs(cells: impl Iterator<Item = bool>, lengths: &mut Vec<usize>) {
    let mut run = 0usize;
    for cell in cells {
        if cell {
            run += 1;
        } else if run > 0 {
            lengths.push(run);
            run = 0;
        }
    }
    if run > 0 {
        lengths.push(run);
    }
}

struct LineStats {
    points: usize,
    mean: f64,
    longest: usize,
    entropy: f64,
}

impl LineStats {
    fn from_lengths(lengths: &[usize], min_len: usize) -> Self {
        let counted: Vec<usize> = lengths.iter().copied().filter(|&l| l >= min_len).collect();
        if counted.is_empty() {
            return Self {
                points: 0,
                mean: 0.0,
                longest: 0,
                entropy: 0.0,
            };
        }

        let points: usize = counted.iter().sum();
        let longest = counted.iter().copied().max().unwrap_or(0);
        let mean = points as f64 / counted.len() as f64;

        // Shannon entropy of the line-length distribution, natural log.
        let max_len = longest;
        let mut histogram = vec![0usize; max_len + 1];
        for &l in &counted {
            histogram[l] += 1;
        }
        let total = counted.len() as f64;
        let entropy = histogram
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                -p * p.ln()
            })
            .sum();

        Self {
            points,
            mean,
            longest,
            entropy,
        }
    }
}

impl fmt::Display for RqaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recurrence analysis")?;
        writeln!(f, "===================")?;
        writeln!(f, "Samples:                        {}", self.samples)?;
        writeln!(f, "Recurrence rate (RR):           {:.6}", self.recurrence_rate)?;
        writeln!(f, "Determinism (DET):              {:.6}", self.determinism)?;
        writeln!(f, "Average diagonal line (L):      {:.6}", self.average_diagonal_line)?;
        writeln!(f, "Longest diagonal line (L_max):  {}", self.longest_diagonal_line)?;
        writeln!(f, "Divergence (DIV):               {:.6}", self.divergence)?;
        writeln!(f, "Entropy diagonal lines (L_entr): {:.6}", self.entropy_diagonal_lines)?;
        writeln!(f, "Laminarity (LAM):               {:.6}", self.laminarity)?;
        writeln!(f, "Trapping time (TT):             {:.6}", self.trapping_time)?;
        writeln!(f, "Longest vertical line (V_max):  {}", self.longest_vertical_line)?;
        write!(f, "Entropy vertical lines (V_entr): {:.6}", self.entropy_vertical_lines)
    }
}
