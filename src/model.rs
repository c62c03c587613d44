use serde::{Deserialize, Serialize};

use crate::config::SettingsOverride;

pub const DEFAULT_QUIZ_TITLE: &str = "Imported Quiz";

/// YAML block at the top of a quiz document, between `---` lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub title: Option<String>,
    #[serde(flatten)]
    pub settings: SettingsOverride,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quiz {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<Frontmatter>,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn total_points(&self) -> f64 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub title: String,
    pub display_text: String,
    pub body: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub points: f64,
    pub answers: Vec<Answer>,
    pub matching_pairs: Vec<MatchPair>,
    pub blanks: Vec<Blank>,
    pub tolerance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    pub feedback: Feedback,
}

impl Question {
    /// A fresh question as opened by the `number`-th `##` header.
    pub fn new(number: usize, display_text: impl Into<String>) -> Self {
        Self {
            title: format!("Question {}", number),
            display_text: display_text.into(),
            body: String::new(),
            kind: QuestionType::default(),
            points: 1.0,
            answers: Vec::new(),
            matching_pairs: Vec::new(),
            blanks: Vec::new(),
            tolerance: 0.0,
            formula: None,
            feedback: Feedback::default(),
        }
    }

    /// Text shown as the item prompt.
    pub fn prompt(&self) -> &str {
        if self.display_text.is_empty() {
            &self.body
        } else {
            &self.display_text
        }
    }

    pub fn correct_answers(&self) -> impl Iterator<Item = &Answer> {
        self.answers.iter().filter(|a| a.correct)
    }

    /// Insert or replace the acceptable answers of one blank, keeping
    /// first-declaration order.
    pub fn set_blank(&mut self, id: &str, answers: Vec<String>) {
        match self.blanks.iter_mut().find(|b| b.id == id) {
            Some(blank) => blank.answers = answers,
            None => self.blanks.push(Blank {
                id: id.to_string(),
                answers,
            }),
        }
    }
}

/// Question kinds the importer understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    MultipleAnswers,
    #[default]
    Essay,
    ShortAnswer,
    FillInMultipleBlanks,
    Matching,
    Numerical,
    FileUpload,
    TextOnly,
    Calculated,
}

impl QuestionType {
    pub const ALL: [QuestionType; 11] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::MultipleAnswers,
        QuestionType::Essay,
        QuestionType::ShortAnswer,
        QuestionType::FillInMultipleBlanks,
        QuestionType::Matching,
        QuestionType::Numerical,
        QuestionType::FileUpload,
        QuestionType::TextOnly,
        QuestionType::Calculated,
    ];

    /// Map a `Type:` directive value. Matching is case-insensitive; unknown
    /// names return `None` so the caller keeps the current type.
    pub fn from_directive(name: &str) -> Option<Self> {
        let kind = match name.trim().to_lowercase().as_str() {
            "multiple_choice" => QuestionType::MultipleChoice,
            "true_false" => QuestionType::TrueFalse,
            "fill_in_blank" => QuestionType::ShortAnswer,
            "fill_in_multiple_blanks" => QuestionType::FillInMultipleBlanks,
            "multiple_answers" => QuestionType::MultipleAnswers,
            "matching" => QuestionType::Matching,
            "numerical" => QuestionType::Numerical,
            "essay" => QuestionType::Essay,
            "file_upload" => QuestionType::FileUpload,
            "text" => QuestionType::TextOnly,
            "calculated" => QuestionType::Calculated,
            _ => return None,
        };
        Some(kind)
    }

    /// Name written to the markdown `Type:` directive.
    pub fn directive_name(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::MultipleAnswers => "multiple_answers",
            QuestionType::Essay => "essay",
            QuestionType::ShortAnswer => "fill_in_blank",
            QuestionType::FillInMultipleBlanks => "fill_in_multiple_blanks",
            QuestionType::Matching => "matching",
            QuestionType::Numerical => "numerical",
            QuestionType::FileUpload => "file_upload",
            QuestionType::TextOnly => "text",
            QuestionType::Calculated => "calculated",
        }
    }

    /// Tag recorded in the item's `question_type` metadata field.
    pub fn qti_tag(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice_question",
            QuestionType::TrueFalse => "true_false_question",
            QuestionType::MultipleAnswers => "multiple_answers_question",
            QuestionType::Essay => "essay_question",
            QuestionType::ShortAnswer => "short_answer_question",
            QuestionType::FillInMultipleBlanks => "fill_in_multiple_blanks_question",
            QuestionType::Matching => "matching_question",
            QuestionType::Numerical => "numerical_question",
            QuestionType::FileUpload => "file_upload_question",
            QuestionType::TextOnly => "text_only_question",
            QuestionType::Calculated => "calculated_question",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blank {
    pub id: String,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feedback {
    pub correct: String,
    pub incorrect: String,
    pub neutral: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Correct,
    Incorrect,
    Neutral,
}

impl Feedback {
    pub fn get(&self, kind: FeedbackKind) -> &str {
        match kind {
            FeedbackKind::Correct => &self.correct,
            FeedbackKind::Incorrect => &self.incorrect,
            FeedbackKind::Neutral => &self.neutral,
        }
    }

    pub fn get_mut(&mut self, kind: FeedbackKind) -> &mut String {
        match kind {
            FeedbackKind::Correct => &mut self.correct,
            FeedbackKind::Incorrect => &mut self.incorrect,
            FeedbackKind::Neutral => &mut self.neutral,
        }
    }
}
