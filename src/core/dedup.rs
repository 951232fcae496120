//! core/dedup.rs — collapse runs of adjacent equal elements.
//!
//! The coding pass sometimes places two identical marks back to back (a
//! split interval, or a boundary resampled on both sides of a question
//! change). Collapsing keeps one element per run so downstream recurrence
//! analysis sees state changes, not annotation artifacts.

/// Collapse runs of elements equal under `key`. Comparison is always
/// against the most recent *retained* element, so a run of any length
/// collapses to its first element. Order is preserved; the result is
/// stable under re-application.
pub fn collapse_runs<T, K>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T>
where
    T: Clone,
    K: PartialEq,
{
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    let mut last_key: Option<K> = None;

    for item in items {
        let k = key(item);
        if last_key.as_ref() == Some(&k) {
            continue;
        }
        kept.push(item.clone());
        last_key = Some(k);
    }

    kept
}

/// Collapse under a composite `(primary, secondary)` key. An element is
/// dropped when its primary key matches the retained predecessor's and
/// either
///
/// - its secondary key matches the retained predecessor's too, or
/// - its secondary key matches the *raw* successor's (the next element of
///   the original sequence, removed or not).
///
/// The successor rule collapses boundary samples: an element that repeats
/// the previous primary key but already carries the next element's
/// secondary key sits on a transition and adds no information. The
/// asymmetry (successor match suffices even when the predecessor's
/// secondary differs) is intentional, documented behavior.
pub fn collapse_runs_composite<T, P, S>(
    items: &[T],
    primary: impl Fn(&T) -> P,
    secondary: impl Fn(&T) -> S,
) -> Vec<T>
where
    T: Clone,
    P: PartialEq,
    S: PartialEq,
{
    // Two passes: mark, then rebuild. The lookahead is evaluated against
    // the original sequence, so marking must not shift indices.
    let mut keep = vec![true; items.len()];
    let mut retained: Option<usize> = None;

    for i in 0..items.len() {
        let Some(prev) = retained else {
            retained = Some(i);
            continue;
        };

        let primary_matches = primary(&items[i]) == primary(&items[prev]);
        let secondary_matches_prev = secondary(&items[i]) == secondary(&items[prev]);
        let secondary_matches_next = items
            .get(i + 1)
            .is_some_and(|next| secondary(&items[i]) == secondary(next));

        if primary_matches && (secondary_matches_prev || secondary_matches_next) {
            keep[i] = false;
        } else {
            retained = Some(i);
        }
    }

    items
        .iter()
        .zip(&keep)
        .filter_map(|(item, &k)| k.then(|| item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_simple_runs() {
        let marks = ["1", "1", "2", "2", "5", "5", "3"];
        let out = collapse_runs(&marks, |m| *m);
        assert_eq!(out, vec!["1", "2", "5", "3"]);
    }

    #[test]
    fn compares_against_retained_not_raw_predecessor() {
        let marks = ["5", "5", "5", "5"];
        let out = collapse_runs(&marks, |m| *m);
        assert_eq!(out, vec!["5"]);
    }

    #[test]
    fn scalar_collapse_is_idempotent() {
        let marks = ["7", "7", "1", "1", "1", "7"];
        let once = collapse_runs(&marks, |m| *m);
        let twice = collapse_runs(&once, |m| *m);
        assert_eq!(once, twice);
        assert_eq!(once, vec!["7", "1", "7"]);
    }

    #[test]
    fn never_reorders_or_grows() {
        let marks = ["3", "1", "4", "1", "5", "5"];
        let out = collapse_runs(&marks, |m| *m);
        assert!(out.len() <= marks.len());
        // surviving elements appear in original order
        let mut cursor = marks.iter();
        for kept in &out {
            assert!(cursor.any(|m| m == kept));
        }
    }

    #[test]
    fn composite_collapses_when_both_fields_match() {
        let samples = [("1", 0), ("1", 0), ("2", 0)];
        let out = collapse_runs_composite(&samples, |s| s.0, |s| s.1);
        assert_eq!(out, vec![("1", 0), ("2", 0)]);
    }

    #[test]
    fn composite_keeps_repeat_across_question_change() {
        // same gaze mark on both sides of a question boundary: both stay,
        // the repetition carries the new question context
        let samples = [("1", 0), ("1", 1)];
        let out = collapse_runs_composite(&samples, |s| s.0, |s| s.1);
        assert_eq!(out, vec![("1", 0), ("1", 1)]);
    }

    // Known edge case, preserved on purpose: the boundary sample collapses
    // because its secondary field matches the successor's, even though it
    // differs from the retained predecessor's.
    #[test]
    fn collapses_boundary_sample_on_successor_match() {
        let samples = [("1", 0), ("1", 1), ("2", 1)];
        let out = collapse_runs_composite(&samples, |s| s.0, |s| s.1);
        assert_eq!(out, vec![("1", 0), ("2", 1)]);
    }

    #[test]
    fn lookahead_uses_the_original_sequence() {
        // Index 1 collapses by matching its raw successor's secondary
        // field. Index 2 is then compared against the retained element at
        // index 0 (not the removed index 1) and survives.
        let samples = [("1", 0), ("1", 1), ("1", 1)];
        let out = collapse_runs_composite(&samples, |s| s.0, |s| s.1);
        assert_eq!(out, vec![("1", 0), ("1", 1)]);
    }

    #[test]
    fn composite_collapse_is_idempotent() {
        let cases: Vec<Vec<(&str, usize)>> = vec![
            vec![("1", 0), ("1", 1), ("2", 1), ("2", 1), ("1", 2)],
            vec![("1", 0), ("1", 0), ("1", 1)],
            vec![("5", 0), ("5", 1), ("5", 0), ("5", 1)],
            vec![],
        ];
        for case in cases {
            let once = collapse_runs_composite(&case, |s| s.0, |s| s.1);
            let twice = collapse_runs_composite(&once, |s| s.0, |s| s.1);
            assert_eq!(once, twice, "not idempotent for {case:?}");
        }
    }
}
