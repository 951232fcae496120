//! core/align.rs — bind gaze intervals to the question span containing
//! them.
//!
//! Question tiers hold think/answer interval pairs: interval `n` (even)
//! carries the think phase, `n + 1` the answer phase, and together they
//! span one question. Annotation boundaries are hand-placed, so matching
//! relaxes in three steps: exact containment, floor-rounded start, then
//! nearest-integer start. Every step still requires containment, just at
//! coarser time resolution.

use tracing::{debug, warn};

use crate::core::tier::IntervalTier;

/// One think/answer pair, addressed by question index.
#[derive(Clone, Debug, PartialEq)]
pub struct QuestionSpan {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    /// Mark of the think-phase interval, e.g. "Tf3". The second character
    /// is the condition code.
    pub mark: String,
}

impl QuestionSpan {
    pub fn condition(&self) -> Option<char> {
        self.mark.chars().nth(1)
    }
}

/// One gaze interval bound to its enclosing question.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignedSample {
    pub gaze_mark: String,
    pub question_index: usize,
    pub question_mark: String,
}

impl AlignedSample {
    pub fn category(&self) -> Option<u8> {
        crate::core::transitions::parse_category(&self.gaze_mark)
    }

    pub fn condition(&self) -> Option<char> {
        self.question_mark.chars().nth(1)
    }
}

/// Fold a think/answer tier into question spans. A trailing unpaired
/// interval is dropped with a warning.
pub fn question_spans(tier: &IntervalTier) -> Vec<QuestionSpan> {
    let pairs = tier.len() / 2;
    if tier.len() % 2 != 0 {
        warn!(
            tier = %tier.name,
            intervals = tier.len(),
            "odd interval count in question tier, dropping trailing interval"
        );
    }

    (0..pairs)
        .map(|q| {
            let think = tier.get(2 * q).expect("pair bounds checked");
            let answer = tier.get(2 * q + 1).expect("pair bounds checked");
            QuestionSpan {
                index: q,
                start: think.xmin,
                end: answer.xmax,
                mark: think.mark.clone(),
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MatchTier {
    Exact,
    Floor,
    Round,
}

const MATCH_TIERS: [MatchTier; 3] = [MatchTier::Exact, MatchTier::Floor, MatchTier::Round];

fn contains(span: &QuestionSpan, gaze_start: f64, tier: MatchTier) -> bool {
    // Only the lower bound is coarsened; the upper bound always compares
    // the raw gaze start against the span end.
    let lower_ok = match tier {
        MatchTier::Exact => span.start <= gaze_start,
        MatchTier::Floor => span.start.floor() <= gaze_start.floor(),
        MatchTier::Round => span.start.round() <= gaze_start.round(),
    };
    lower_ok && gaze_start <= span.end
}

fn find_span<'a>(spans: &'a [QuestionSpan], gaze_start: f64) -> Option<(&'a QuestionSpan, MatchTier)> {
    for tier in MATCH_TIERS {
        if let Some(span) = spans.iter().find(|s| contains(s, gaze_start, tier)) {
            return Some((span, tier));
        }
    }
    None
}

/// Pair each gaze interval with the first question span that contains its
/// start time under one of the three match tiers. Unmatched intervals are
/// reported and excluded; output order follows the gaze tier.
pub fn align(gaze: &IntervalTier, questions: &IntervalTier) -> Vec<AlignedSample> {
    let spans = question_spans(questions);
    let mut samples = Vec::with_capacity(gaze.len());

    for interval in gaze {
        match find_span(&spans, interval.xmin) {
            Some((span, tier)) => {
                if tier != MatchTier::Exact {
                    debug!(
                        start = interval.xmin,
                        question = span.index,
                        ?tier,
                        "gaze interval matched on a relaxed tier"
                    );
                }
                samples.push(AlignedSample {
                    gaze_mark: interval.mark.clone(),
                    question_index: span.index,
                    question_mark: span.mark.clone(),
                });
            }
            None => {
                warn!(
                    start = interval.xmin,
                    end = interval.xmax,
                    mark = %interval.mark,
                    "no enclosing question span for gaze interval"
                );
            }
        }
    }

    samples
}
