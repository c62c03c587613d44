//! Package assembly and archive writing.
//!
//! Layout of every package:
//!
//! ```text
//! imsmanifest.xml
//! <assessmentId>/<assessmentId>.xml
//! <assessmentId>/assessment_meta.xml
//! non_cc_assessments/
//! ```

use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use log::info;
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::{Config, PackageOptions, QuizSettings};
use crate::error::{Error, Result};
use crate::ident::IdGenerator;
use crate::manifest::{assessment_path, build_assessment_meta, build_manifest, meta_path};
use crate::model::Quiz;
use crate::parser;
use crate::qti::{encode_assessment, EncodeOptions, Warning};

pub const MANIFEST_FILE: &str = "imsmanifest.xml";
pub const NON_CC_DIR: &str = "non_cc_assessments/";

/// The three rendered documents of one export.
#[derive(Debug, Clone)]
pub struct Package {
    pub assessment_id: String,
    pub assessment_xml: String,
    pub manifest_xml: String,
    pub meta_xml: String,
    pub warnings: Vec<Warning>,
}

/// One archive entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<'a> {
    File { path: String, data: &'a [u8] },
    Directory(String),
}

/// Render a parsed quiz into its package documents.
///
/// Fails with [`Error::NoQuestions`] before anything is rendered when the
/// quiz is empty.
pub fn assemble(
    quiz: &Quiz,
    settings: &QuizSettings,
    options: &PackageOptions,
    ids: &mut IdGenerator,
    created: NaiveDate,
) -> Result<Package> {
    if quiz.questions.is_empty() {
        return Err(Error::NoQuestions);
    }

    let encode_options = EncodeOptions {
        allowed_attempts: settings.allowed_attempts,
        render_markdown: options.render_markdown,
    };
    let assessment = encode_assessment(quiz, ids, &encode_options);
    let assessment_xml = assessment.document.to_document()?;

    let manifest = build_manifest(&quiz.title, &assessment.ident, created, ids);
    let meta = build_assessment_meta(quiz, &assessment.ident, settings, ids);

    Ok(Package {
        manifest_xml: manifest.to_document()?,
        meta_xml: meta.to_document()?,
        assessment_xml,
        assessment_id: assessment.ident,
        warnings: assessment.warnings,
    })
}

impl Package {
    pub fn entries(&self) -> Vec<Entry<'_>> {
        vec![
            Entry::File {
                path: MANIFEST_FILE.to_string(),
                data: self.manifest_xml.as_bytes(),
            },
            Entry::File {
                path: assessment_path(&self.assessment_id),
                data: self.assessment_xml.as_bytes(),
            },
            Entry::File {
                path: meta_path(&self.assessment_id),
                data: self.meta_xml.as_bytes(),
            },
            Entry::Directory(NON_CC_DIR.to_string()),
        ]
    }

    pub fn write_zip<W: Write + Seek>(&self, writer: W, compression_level: i64) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let deflated = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level.clamp(0, 9)));

        for entry in self.entries() {
            match entry {
                Entry::File { path, data } => {
                    zip.start_file(path, deflated)?;
                    zip.write_all(data)?;
                }
                Entry::Directory(path) => {
                    zip.add_directory(path, deflated)?;
                }
            }
        }

        Ok(zip.finish()?)
    }

    pub fn to_zip_bytes(&self, compression_level: i64) -> Result<Vec<u8>> {
        let cursor = self.write_zip(Cursor::new(Vec::new()), compression_level)?;
        Ok(cursor.into_inner())
    }

    /// Write the archive to `path`. The file only appears once it is
    /// complete.
    pub fn save(&self, path: &Path, compression_level: i64) -> Result<()> {
        let bytes = self.to_zip_bytes(compression_level)?;
        atomic_write(path, &bytes)
    }
}

/// Write through a uniquely named temporary file in the target directory,
/// then move it into place. Nothing else in that directory is touched.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub path: PathBuf,
    pub assessment_id: String,
    pub title: String,
    pub question_count: usize,
    pub total_points: f64,
    pub warnings: Vec<Warning>,
}

/// Markdown-to-package conversion with a fixed configuration.
pub struct Converter {
    config: Config,
    seed: Option<u64>,
    title: Option<String>,
}

impl Converter {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            seed: None,
            title: None,
        }
    }

    /// Derive every generated identifier from `seed`.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Replace whatever quiz title the document declares.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    /// Parse `markdown` and apply the title override.
    pub fn parse(&self, markdown: &str) -> Result<Quiz> {
        let mut quiz = parser::parse_document(markdown)?;
        if let Some(ref title) = self.title {
            quiz.title = title.clone();
        }
        Ok(quiz)
    }

    /// Quiz settings after frontmatter overrides.
    pub fn settings_for(&self, quiz: &Quiz) -> QuizSettings {
        let mut settings = self.config.quiz.clone();
        if let Some(ref fm) = quiz.frontmatter {
            settings.apply(&fm.settings);
        }
        settings
    }

    /// Render the package documents without writing anything.
    pub fn build(&self, quiz: &Quiz) -> Result<Package> {
        let mut ids = match self.seed {
            Some(seed) => IdGenerator::with_seed(seed),
            None => IdGenerator::new(),
        };
        let settings = self.settings_for(quiz);
        assemble(
            quiz,
            &settings,
            &self.config.package,
            &mut ids,
            today(),
        )
    }

    /// Convert `markdown` into a package archive at `output`.
    pub fn convert(&self, markdown: &str, output: &Path) -> Result<Conversion> {
        let quiz = self.parse(markdown)?;
        let package = self.build(&quiz)?;
        package.save(output, self.config.package.compression_level)?;

        let conversion = Conversion {
            path: output.to_path_buf(),
            assessment_id: package.assessment_id,
            title: quiz.title.clone(),
            question_count: quiz.questions.len(),
            total_points: quiz.total_points(),
            warnings: package.warnings,
        };
        info!(
            "wrote {} ({:?}, {} questions, {:.1} points)",
            conversion.path.display(),
            conversion.title,
            conversion.question_count,
            conversion.total_points
        );
        Ok(conversion)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
