//! plot/recplot.rs — rasterize a recurrence matrix and draw the sample
//! annotation margins.

use image::{Rgb, RgbImage};

use crate::core::align::AlignedSample;
use crate::core::rqa::RecurrenceMatrix;
use crate::error::{AnalysisError, Result};
use crate::plot::colors::ColorTables;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Clone, Copy, Debug)]
pub struct AnnotationOptions {
    /// Draw the question-parity column next to the condition column.
    pub with_questions: bool,
}

impl Default for AnnotationOptions {
    fn default() -> Self {
        Self {
            with_questions: true,
        }
    }
}

/// Render the recurrence matrix one pixel per sample pair, black on white.
/// The vertical axis is inverted: sample 0 sits in the bottom row.
pub fn render_recurrence_plot(matrix: &RecurrenceMatrix) -> RgbImage {
    let side = matrix.side() as u32;
    let mut img = RgbImage::from_pixel(side, side, WHITE);
    for i in 0..matrix.side() {
        for j in 0..matrix.side() {
            if matrix.at(i, j) {
                img.put_pixel(j as u32, side - 1 - i as u32, BLACK);
            }
        }
    }
    img
}

/// Widen the plot by the annotation margin and draw one pixel per sample:
/// gaze category in the margin column and the bottom row, question parity
/// and condition in the leftmost columns. Sample `i` is annotated at the
/// vertical position of plot row `i` (bottom row = sample 0).
pub fn annotate_recurrence_plot(
    plot: &RgbImage,
    samples: &[AlignedSample],
    tables: &ColorTables,
    opts: AnnotationOptions,
) -> Result<RgbImage> {
    if samples.len() != plot.width() as usize {
        return Err(AnalysisError::SampleCountMismatch {
            samples: samples.len(),
            side: plot.width() as usize,
        });
    }

    let offset: u32 = if opts.with_questions { 3 } else { 2 };
    let width = plot.width() + offset;
    let height = plot.height() + 1;

    let mut out = RgbImage::from_pixel(width, height, WHITE);
    for (x, y, px) in plot.enumerate_pixels() {
        out.put_pixel(x + offset, y, *px);
    }

    for (i, sample) in samples.iter().enumerate() {
        let i = i as u32;
        let row = height - 2 - i;

        let category = sample
            .category()
            .ok_or_else(|| AnalysisError::InvalidGazeMark {
                mark: sample.gaze_mark.clone(),
            })?;
        let gaze = tables.gaze_color(category)?;
        out.put_pixel(offset - 1, row, gaze);
        out.put_pixel(i + offset, height - 1, gaze);

        if opts.with_questions {
            out.put_pixel(1, row, tables.parity_color(sample.question_index));
        }

        let letter = sample
            .condition()
            .ok_or_else(|| AnalysisError::MissingCondition {
                mark: sample.question_mark.clone(),
            })?;
        out.put_pixel(0, row, tables.condition_color(letter)?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rqa::RecurrenceMatrix;

    fn sample(mark: &str, question: usize, qmark: &str) -> AlignedSample {
        AlignedSample {
            gaze_mark: mark.into(),
            question_index: question,
            question_mark: qmark.into(),
        }
    }

    fn small_plot() -> (RgbImage, Vec<AlignedSample>) {
        let matrix = RecurrenceMatrix::from_sequence(&[1.0, 2.0, 1.0], 0.65);
        let plot = render_recurrence_plot(&matrix);
        let samples = vec![
            sample("1", 0, "Tf1"),
            sample("2", 0, "Tf1"),
            sample("1", 1, "Tp2"),
        ];
        (plot, samples)
    }

    #[test]
    fn base_plot_inverts_the_vertical_axis() {
        let matrix = RecurrenceMatrix::from_sequence(&[1.0, 2.0, 1.0], 0.65);
        let plot = render_recurrence_plot(&matrix);
        assert_eq!(plot.dimensions(), (3, 3));
        // (i=0, j=2) is recurrent; sample 0 lives in the bottom row
        assert_eq!(*plot.get_pixel(2, 2), BLACK);
        assert_eq!(*plot.get_pixel(1, 2), WHITE);
    }

    #[test]
    fn annotation_widens_and_heightens() {
        let (plot, samples) = small_plot();
        let tables = ColorTables::default();

        let with_q =
            annotate_recurrence_plot(&plot, &samples, &tables, AnnotationOptions::default())
                .unwrap();
        assert_eq!(with_q.dimensions(), (6, 4));

        let without_q = annotate_recurrence_plot(
            &plot,
            &samples,
            &tables,
            AnnotationOptions {
                with_questions: false,
            },
        )
        .unwrap();
        assert_eq!(without_q.dimensions(), (5, 4));
    }

    #[test]
    fn annotation_pixels_land_where_expected() {
        let (plot, samples) = small_plot();
        let tables = ColorTables::default();
        let img =
            annotate_recurrence_plot(&plot, &samples, &tables, AnnotationOptions::default())
                .unwrap();

        let gaze1 = tables.gaze_color(1).unwrap();
        let gaze2 = tables.gaze_color(2).unwrap();

        // sample 0: margin column x=2, row height-2; bottom row x=3
        assert_eq!(*img.get_pixel(2, 2), gaze1);
        assert_eq!(*img.get_pixel(3, 3), gaze1);
        // sample 1 sits one row higher, one column further right
        assert_eq!(*img.get_pixel(2, 1), gaze2);
        assert_eq!(*img.get_pixel(4, 3), gaze2);

        // parity column alternates with the question index
        assert_eq!(*img.get_pixel(1, 2), tables.parity_color(0));
        assert_eq!(*img.get_pixel(1, 0), tables.parity_color(1));

        // condition column reads the second mark character
        assert_eq!(*img.get_pixel(0, 2), tables.condition_color('f').unwrap());
        assert_eq!(*img.get_pixel(0, 0), tables.condition_color('p').unwrap());

        // the pasted plot keeps its pixels at the offset
        assert_eq!(*img.get_pixel(3 + 2, 0), BLACK);
    }

    #[test]
    fn sample_count_mismatch_is_fatal() {
        let (plot, mut samples) = small_plot();
        samples.pop();
        let err = annotate_recurrence_plot(
            &plot,
            &samples,
            &ColorTables::default(),
            AnnotationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::SampleCountMismatch { .. }));
    }

    #[test]
    fn unknown_condition_letter_is_fatal() {
        let (plot, mut samples) = small_plot();
        samples[0].question_mark = "Tz9".into();
        let err = annotate_recurrence_plot(
            &plot,
            &samples,
            &ColorTables::default(),
            AnnotationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::MissingConditionColor { letter: 'z' }
        ));
    }

    #[test]
    fn bare_question_mark_is_fatal() {
        let (plot, mut samples) = small_plot();
        samples[2].question_mark = "T".into();
        let err = annotate_recurrence_plot(
            &plot,
            &samples,
            &ColorTables::default(),
            AnnotationOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingCondition { .. }));
    }
}
