use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "mdqti", version, about = "Convert markdown quizzes into QTI 1.2 packages")]
pub struct Cli {
    /// Markdown quiz file, or - for stdin
    pub input: String,

    /// Output archive [default: <input>.zip, or qti_export.zip for stdin]
    #[arg(short, long, value_name = "path")]
    pub output: Option<PathBuf>,

    /// Config file [default: <config dir>/mdqti/config.yaml]
    #[arg(long, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Seed for reproducible identifiers
    #[arg(long, value_name = "n")]
    pub seed: Option<u64>,

    /// Override the quiz title
    #[arg(long, value_name = "text")]
    pub title: Option<String>,

    /// Render prompts and feedback as markdown
    #[arg(long)]
    pub markdown: bool,

    /// Parse and encode, report warnings, write nothing
    #[arg(long)]
    pub check: bool,

    /// Print the parsed quiz instead of converting
    #[arg(long, value_name = "format")]
    pub dump: Option<DumpFormat>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DumpFormat {
    Yaml,
    Markdown,
}
