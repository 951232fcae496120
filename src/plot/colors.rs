//! plot/colors.rs — color lookup tables for the annotated recurrence plot.
//!
//! The tables are configuration, not logic: they travel with the coding
//! scheme (see the coding grid sheet) and are passed into the annotator
//! explicitly. A category or condition letter without an entry is a fatal
//! mismatch between scheme and configuration.

use std::collections::BTreeMap;

use image::Rgb;

use crate::error::{AnalysisError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct ColorTables {
    gaze: BTreeMap<u8, Rgb<u8>>,
    parity: [Rgb<u8>; 2],
    condition: BTreeMap<char, Rgb<u8>>,
}

impl ColorTables {
    pub fn new(
        gaze: BTreeMap<u8, Rgb<u8>>,
        parity: [Rgb<u8>; 2],
        condition: BTreeMap<char, Rgb<u8>>,
    ) -> Self {
        Self {
            gaze,
            parity,
            condition,
        }
    }

    pub fn gaze_color(&self, category: u8) -> Result<Rgb<u8>> {
        self.gaze
            .get(&category)
            .copied()
            .ok_or(AnalysisError::MissingGazeColor { category })
    }

    /// Distinguishes alternating questions.
    pub fn parity_color(&self, question_index: usize) -> Rgb<u8> {
        self.parity[question_index % 2]
    }

    pub fn condition_color(&self, letter: char) -> Result<Rgb<u8>> {
        self.condition
            .get(&letter)
            .copied()
            .ok_or(AnalysisError::MissingConditionColor { letter })
    }
}

impl Default for ColorTables {
    fn default() -> Self {
        let gaze = BTreeMap::from([
            (0, Rgb([102, 102, 102])),
            (1, Rgb([0, 204, 255])),
            (2, Rgb([0, 0, 255])),
            (3, Rgb([0, 0, 128])),
            (4, Rgb([102, 255, 51])),
            (5, Rgb([0, 255, 0])),
            (6, Rgb([0, 128, 0])),
            (7, Rgb([255, 128, 128])),
            (8, Rgb([255, 0, 0])),
            (9, Rgb([128, 0, 0])),
        ]);
        let parity = [Rgb([191, 191, 191]), Rgb([64, 64, 64])];
        let condition = BTreeMap::from([
            ('f', Rgb([255, 165, 0])),
            ('p', Rgb([128, 0, 128])),
            ('s', Rgb([0, 128, 128])),
        ]);
        Self::new(gaze, parity, condition)
    }
}
