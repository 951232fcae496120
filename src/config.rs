use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::plot::colors::ColorTables;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrenceConfig {
    #[serde(default = "RecurrenceConfig::default_radius")]
    pub radius: f64,
    #[serde(default = "RecurrenceConfig::default_theiler")]
    pub theiler: usize,
    #[serde(default = "RecurrenceConfig::default_min_line")]
    pub min_line: usize,
}

impl RecurrenceConfig {
    fn default_radius() -> f64 {
        0.65
    }
    fn default_theiler() -> usize {
        1
    }
    fn default_min_line() -> usize {
        2
    }
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            theiler: Self::default_theiler(),
            min_line: Self::default_min_line(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    #[serde(default = "AnnotationConfig::default_with_questions")]
    pub with_questions: bool,
}

impl AnnotationConfig {
    fn default_with_questions() -> bool {
        true
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            with_questions: Self::default_with_questions(),
        }
    }
}

/// Color tables in config form: string keys, RGB triples. Converted to
/// [`ColorTables`] before analysis so table misses surface as errors at
/// the annotation site, not during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorsConfig {
    #[serde(default = "ColorsConfig::default_gaze")]
    pub gaze: BTreeMap<String, [u8; 3]>,
    #[serde(default = "ColorsConfig::default_parity")]
    pub parity: [[u8; 3]; 2],
    #[serde(default = "ColorsConfig::default_condition")]
    pub condition: BTreeMap<String, [u8; 3]>,
}

impl ColorsConfig {
    fn default_gaze() -> BTreeMap<String, [u8; 3]> {
        BTreeMap::from([
            ("0".into(), [102, 102, 102]),
            ("1".into(), [0, 204, 255]),
            ("2".into(), [0, 0, 255]),
            ("3".into(), [0, 0, 128]),
            ("4".into(), [102, 255, 51]),
            ("5".into(), [0, 255, 0]),
            ("6".into(), [0, 128, 0]),
            ("7".into(), [255, 128, 128]),
            ("8".into(), [255, 0, 0]),
            ("9".into(), [128, 0, 0]),
        ])
    }

    fn default_parity() -> [[u8; 3]; 2] {
        [[191, 191, 191], [64, 64, 64]]
    }

    fn default_condition() -> BTreeMap<String, [u8; 3]> {
        BTreeMap::from([
            ("f".into(), [255, 165, 0]),
            ("p".into(), [128, 0, 128]),
            ("s".into(), [0, 128, 128]),
        ])
    }

    /// Keys that are not a single category digit or condition letter are
    /// dropped; the annotator reports the resulting misses.
    pub fn to_tables(&self) -> ColorTables {
        let gaze = self
            .gaze
            .iter()
            .filter_map(|(k, rgb)| Some((k.parse::<u8>().ok().filter(|c| *c <= 9)?, Rgb(*rgb))))
            .collect();
        let parity = [Rgb(self.parity[0]), Rgb(self.parity[1])];
        let condition = self
            .condition
            .iter()
            .filter_map(|(k, rgb)| {
                let mut chars = k.chars();
                let letter = chars.next()?;
                chars.next().is_none().then_some((letter, Rgb(*rgb)))
            })
            .collect();
        ColorTables::new(gaze, parity, condition)
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            gaze: Self::default_gaze(),
            parity: Self::default_parity(),
            condition: Self::default_condition(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub recurrence: RecurrenceConfig,
    #[serde(default)]
    pub annotation: AnnotationConfig,
    #[serde(default)]
    pub colors: ColorsConfig,
}

impl AppConfig {
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        // File does not exist: write defaults and return them.
        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(_) => {
                eprintln!("Failed to serialize default config; continuing with defaults");
            }
        }
        default_cfg
    }
}
