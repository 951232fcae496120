use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Directory with the gaze-direction TextGrids
    #[arg(long, default_value = "VPs/Blickrichtungen")]
    pub gaze_dir: String,

    /// Directory with the think/answer TextGrids
    #[arg(long, default_value = "VPs/ThinkAnswer")]
    pub question_dir: String,

    /// Output directory for CSVs, graphs and recurrence plots
    #[arg(long, default_value = "Analysen")]
    pub out_dir: String,

    /// Include the off-task category (5) in matrices and sequences
    #[arg(long, default_value_t = true, num_args = 0..=1, default_missing_value = "true")]
    pub with_five: bool,

    /// Path to config TOML
    #[arg(long, default_value = "config.toml")]
    pub config: String,

    /// Enable debug-level output
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}
