mod cli;

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::LevelFilter;

use mdqti::config::Config;
use mdqti::package::Converter;
use mdqti::parser;

use crate::cli::{Cli, DumpFormat};

const DEFAULT_OUTPUT: &str = "qti_export.zip";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    });
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn run(cli: Cli) -> mdqti::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if cli.markdown {
        config.package.render_markdown = true;
    }

    let content = read_input(&cli.input)?;
    let converter = Converter::new(config)
        .with_seed(cli.seed)
        .with_title(cli.title.clone());

    if let Some(format) = cli.dump {
        let quiz = converter.parse(&content)?;
        let text = match format {
            DumpFormat::Yaml => serde_yaml::to_string(&quiz)?,
            DumpFormat::Markdown => parser::write_quiz(&quiz),
        };
        print!("{}", text);
        return Ok(());
    }

    if cli.check {
        let quiz = converter.parse(&content)?;
        let package = converter.build(&quiz)?;
        for w in &package.warnings {
            println!("warning: {}", w);
        }
        println!(
            "{}: {} questions, {:.1} points, {} warnings",
            quiz.title,
            quiz.questions.len(),
            quiz.total_points(),
            package.warnings.len()
        );
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input));
    let conversion = converter.convert(&content, &output)?;

    println!("Created {}", conversion.path.display());
    println!("Quiz Title: {}", conversion.title);
    println!("Total Questions: {}", conversion.question_count);
    println!("Total Points: {:.1}", conversion.total_points);
    if !conversion.warnings.is_empty() {
        eprintln!("{} warnings (see log output)", conversion.warnings.len());
    }
    Ok(())
}

fn read_input(input: &str) -> mdqti::Result<String> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        Ok(content)
    } else {
        Ok(std::fs::read_to_string(input)?)
    }
}

fn default_output(input: &str) -> PathBuf {
    if input == "-" {
        return PathBuf::from(DEFAULT_OUTPUT);
    }
    Path::new(input).with_extension("zip")
}
