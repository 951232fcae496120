//! core/tier.rs — labeled time spans as delivered by the annotation layer.

/// One labeled span of an interval tier. Times are seconds from the start
/// of the recording; the mark is free text from the coding pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Interval {
    pub xmin: f64,
    pub xmax: f64,
    pub mark: String,
}

impl Interval {
    pub fn new(xmin: f64, xmax: f64, mark: impl Into<String>) -> Self {
        Self {
            xmin,
            xmax,
            mark: mark.into(),
        }
    }

    pub fn mark(&self) -> &str {
        &self.mark
    }

    pub fn set_mark(&mut self, mark: impl Into<String>) {
        self.mark = mark.into();
    }

    pub fn is_empty(&self) -> bool {
        self.mark.trim().is_empty()
    }
}

/// Time-ascending sequence of intervals. Marks need not be unique.
#[derive(Clone, Debug, Default)]
pub struct IntervalTier {
    pub name: String,
    intervals: Vec<Interval>,
}

impl IntervalTier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
        }
    }

    pub fn from_intervals(name: impl Into<String>, intervals: Vec<Interval>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }

    pub fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Interval> {
        self.intervals.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Interval> {
        self.intervals.get_mut(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    /// Drop intervals with blank marks. Rebuilds the sequence instead of
    /// deleting during iteration.
    pub fn delete_empty(&mut self) {
        self.intervals = self
            .intervals
            .drain(..)
            .filter(|iv| !iv.is_empty())
            .collect();
    }

    /// Truncate multi-character marks to their first character. The coding
    /// pass occasionally leaves trailing annotation text behind the code.
    pub fn truncate_marks(&mut self) {
        for iv in &mut self.intervals {
            let mut chars = iv.mark.chars();
            if let (Some(first), Some(_)) = (chars.next(), chars.next()) {
                iv.mark = first.to_string();
            }
        }
    }
}

impl<'a> IntoIterator for &'a IntervalTier {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(marks: &[&str]) -> IntervalTier {
        let intervals = marks
            .iter()
            .enumerate()
            .map(|(i, m)| Interval::new(i as f64, (i + 1) as f64, *m))
            .collect();
        IntervalTier::from_intervals("gaze", intervals)
    }

    #[test]
    fn delete_empty_keeps_order() {
        let mut t = tier(&["1", "", "2", "  ", "3"]);
        t.delete_empty();
        let marks: Vec<_> = t.iter().map(|iv| iv.mark()).collect();
        assert_eq!(marks, vec!["1", "2", "3"]);
    }

    #[test]
    fn truncate_marks_keeps_single_chars() {
        let mut t = tier(&["5", "3 unsure", "Tf2b"]);
        t.truncate_marks();
        let marks: Vec<_> = t.iter().map(|iv| iv.mark()).collect();
        assert_eq!(marks, vec!["5", "3", "T"]);
    }

    #[test]
    fn mark_replacement_is_in_place() {
        let mut t = tier(&["12"]);
        t.get_mut(0).unwrap().set_mark("1");
        assert_eq!(t.get(0).unwrap().mark(), "1");
        assert_eq!(t.get(0).unwrap().xmax, 1.0);
    }
}
