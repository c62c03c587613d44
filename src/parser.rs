use log::debug;

use crate::error::{Error, Result};
use crate::model::*;

/// Top-level keys a frontmatter block may set.
const FRONTMATTER_KEYS: [&str; 9] = [
    "title",
    "description",
    "shuffle_answers",
    "scoring_policy",
    "quiz_type",
    "allowed_attempts",
    "show_correct_answers",
    "one_question_at_a_time",
    "cant_go_back",
];

/// Parse a full quiz document, including an optional YAML frontmatter block.
///
/// A leading `---` block counts as frontmatter only when it sets at least
/// one known key; otherwise the `---` lines are ordinary markdown and the
/// whole document is parsed as quiz text. Only a malformed frontmatter
/// block is an error.
pub fn parse_document(content: &str) -> Result<Quiz> {
    match split_frontmatter(content) {
        Some((yaml, body)) if declares_settings(yaml) => {
            let fm: Frontmatter =
                serde_yaml::from_str(yaml).map_err(|e| Error::Frontmatter(e.to_string()))?;
            let mut quiz = parse_quiz(body);
            if let Some(ref title) = fm.title {
                quiz.title = title.clone();
            }
            quiz.frontmatter = Some(fm);
            Ok(quiz)
        }
        _ => Ok(parse_quiz(content)),
    }
}

fn declares_settings(yaml: &str) -> bool {
    yaml.lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_once(':'))
        .any(|(key, _)| FRONTMATTER_KEYS.contains(&key.trim()))
}

/// Parse the markdown directive grammar into a quiz.
pub fn parse_quiz(content: &str) -> Quiz {
    content
        .trim()
        .lines()
        .fold(QuizParser::default(), QuizParser::feed)
        .finish()
}

/// Returns `(yaml, body)` when the document opens with a `---` line and has
/// a closing `---` line.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    let after_first = trimmed.strip_prefix("---")?;
    let after_first = after_first
        .strip_prefix("\r\n")
        .or_else(|| after_first.strip_prefix('\n'))?;

    if let Some(rest) = after_first.strip_prefix("---") {
        return Some(("", rest));
    }
    let end_pos = after_first.find("\n---")?;
    let yaml = after_first[..end_pos].trim();
    let body = &after_first[end_pos + 4..];
    Some((yaml, body))
}

/// Line-by-line parser state. Each line is fully handled before the next.
#[derive(Debug)]
pub struct QuizParser {
    title: String,
    questions: Vec<Question>,
    current: Option<Question>,
    body: Vec<String>,
    feedback: Option<FeedbackKind>,
    header_count: usize,
}

impl Default for QuizParser {
    fn default() -> Self {
        Self {
            title: DEFAULT_QUIZ_TITLE.to_string(),
            questions: Vec::new(),
            current: None,
            body: Vec::new(),
            feedback: None,
            header_count: 0,
        }
    }
}

impl QuizParser {
    pub fn feed(mut self, line: &str) -> Self {
        self.handle(line.trim());
        self
    }

    pub fn finish(mut self) -> Quiz {
        self.close_question();
        Quiz {
            title: self.title,
            frontmatter: None,
            questions: self.questions,
        }
    }

    fn handle(&mut self, line: &str) {
        if self.current.is_none() {
            if let Some(title) = line.strip_prefix("# ") {
                self.title = title.trim().to_string();
                return;
            }
        }

        if let Some(header) = line.strip_prefix("## ") {
            self.open_question(header.trim());
            return;
        }

        if let Some(kind) = feedback_marker(line) {
            // Capture needs a question to land in.
            if self.current.is_some() {
                self.feedback = kind;
            }
            return;
        }

        let Some(question) = self.current.as_mut() else {
            return;
        };

        if let Some(kind) = self.feedback {
            let field = question.feedback.get_mut(kind);
            field.push_str(line);
            field.push('\n');
            return;
        }

        if let Some(value) = line.strip_prefix("Title:") {
            question.title = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("Type:") {
            if let Some(kind) = QuestionType::from_directive(value) {
                question.kind = kind;
            }
        } else if let Some(value) = line.strip_prefix("Points:") {
            if let Some(points) = parse_decimal(value).filter(|p| *p >= 0.0) {
                question.points = points;
            }
        } else if let Some(value) = line.strip_prefix("Tolerance:") {
            if let Some(tolerance) = parse_decimal(value) {
                question.tolerance = tolerance;
            }
        } else if let Some(value) = line.strip_prefix("Formula:") {
            question.formula = Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("Match:") {
            if let Some((left, right)) = value.split_once('=') {
                question.matching_pairs.push(MatchPair {
                    left: left.trim().to_string(),
                    right: right.trim().to_string(),
                });
            }
        } else if let Some(value) = line.strip_prefix("Blank:") {
            if let Some((id, alternatives)) = value.split_once('=') {
                let id = id.trim();
                let answers: Vec<String> = alternatives
                    .split('|')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect();
                if !id.is_empty() && !answers.is_empty() {
                    question.set_blank(id, answers);
                }
            }
        } else if let Some(text) = line.strip_prefix("* ") {
            question.answers.push(Answer::new(text.trim(), true));
        } else if let Some(text) = line.strip_prefix("- ") {
            question.answers.push(Answer::new(text.trim(), false));
        } else if !line.is_empty() && question.kind != QuestionType::FillInMultipleBlanks {
            self.body.push(line.to_string());
        }
    }

    fn open_question(&mut self, header: &str) {
        self.close_question();
        self.header_count += 1;
        self.current = Some(Question::new(
            self.header_count,
            strip_numeral(header),
        ));
        self.feedback = None;
    }

    fn close_question(&mut self) {
        let Some(mut question) = self.current.take() else {
            return;
        };
        question.body = std::mem::take(&mut self.body).join("\n").trim().to_string();
        for kind in [
            FeedbackKind::Correct,
            FeedbackKind::Incorrect,
            FeedbackKind::Neutral,
        ] {
            let field = question.feedback.get_mut(kind);
            *field = field.trim().to_string();
        }
        debug!(
            "parsed {:?} ({:?}, {} answers, {} pairs, {} blanks)",
            question.title,
            question.kind,
            question.answers.len(),
            question.matching_pairs.len(),
            question.blanks.len()
        );
        self.questions.push(question);
        self.feedback = None;
    }
}

/// `Some(Some(kind))` opens capture, `Some(None)` closes it.
fn feedback_marker(line: &str) -> Option<Option<FeedbackKind>> {
    if line.starts_with("Feedback_Correct:") {
        Some(Some(FeedbackKind::Correct))
    } else if line.starts_with("Feedback_Incorrect:") {
        Some(Some(FeedbackKind::Incorrect))
    } else if line.starts_with("Feedback_Neutral:") {
        Some(Some(FeedbackKind::Neutral))
    } else if line.starts_with("End_Feedback") {
        Some(None)
    } else {
        None
    }
}

fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Drop a leading `"N. "` numbering from a question header.
fn strip_numeral(header: &str) -> &str {
    let digits = header.len() - header.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return header;
    }
    match header[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => header,
    }
}

/// Write a quiz back out in the directive grammar.
///
/// Parsing the result yields the same questions as the quiz it came from,
/// provided body lines do not themselves look like directives.
pub fn write_quiz(quiz: &Quiz) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n", quiz.title));

    for (i, q) in quiz.questions.iter().enumerate() {
        // Always numbered: re-parsing strips exactly one leading numeral.
        if q.display_text.is_empty() {
            out.push_str(&format!("\n## {}.\n", i + 1));
        } else {
            out.push_str(&format!("\n## {}. {}\n", i + 1, q.display_text));
        }
        for line in q.body.lines() {
            out.push_str(line);
            out.push('\n');
        }
        if q.title != format!("Question {}", i + 1) {
            out.push_str(&format!("Title: {}\n", q.title));
        }
        out.push_str(&format!("Type: {}\n", q.kind.directive_name()));
        if q.points != 1.0 {
            out.push_str(&format!("Points: {}\n", q.points));
        }
        if q.tolerance != 0.0 {
            out.push_str(&format!("Tolerance: {}\n", q.tolerance));
        }
        if let Some(ref formula) = q.formula {
            out.push_str(&format!("Formula: {}\n", formula));
        }
        for answer in &q.answers {
            let marker = if answer.correct { '*' } else { '-' };
            out.push_str(&format!("{} {}\n", marker, answer.text));
        }
        for pair in &q.matching_pairs {
            out.push_str(&format!("Match: {}={}\n", pair.left, pair.right));
        }
        for blank in &q.blanks {
            out.push_str(&format!("Blank: {}={}\n", blank.id, blank.answers.join("|")));
        }
        for (kind, label) in [
            (FeedbackKind::Correct, "Feedback_Correct:"),
            (FeedbackKind::Incorrect, "Feedback_Incorrect:"),
            (FeedbackKind::Neutral, "Feedback_Neutral:"),
        ] {
            let text = q.feedback.get(kind);
            if !text.is_empty() {
                out.push_str(label);
                out.push('\n');
                out.push_str(text);
                out.push_str("\nEnd_Feedback\n");
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeral_prefix_is_stripped() {
        assert_eq!(strip_numeral("3. What is Rust?"), "What is Rust?");
        assert_eq!(strip_numeral("12.Closures"), "Closures");
        assert_eq!(strip_numeral("2024 was a year"), "2024 was a year");
        assert_eq!(strip_numeral("Plain"), "Plain");
    }

    #[test]
    fn frontmatter_requires_opening_and_closing_fence() {
        assert!(split_frontmatter("# Quiz\n## Q").is_none());
        assert!(split_frontmatter("---\ntitle: x\n").is_none());
        let (yaml, body) = split_frontmatter("---\ntitle: x\n---\n## Q\n").unwrap();
        assert_eq!(yaml, "title: x");
        assert_eq!(body.trim(), "## Q");
    }

    #[test]
    fn only_known_keys_make_a_frontmatter_block() {
        assert!(declares_settings("title: Quiz"));
        assert!(declares_settings("# comment\nallowed_attempts: 2"));
        assert!(!declares_settings("# Quiz\n## Q1\nType: essay"));
        assert!(!declares_settings("  title: nested"));
        assert!(!declares_settings(""));
    }

    #[test]
    fn feedback_markers_are_recognized() {
        assert_eq!(feedback_marker("Feedback_Correct:"), Some(Some(FeedbackKind::Correct)));
        assert_eq!(feedback_marker("End_Feedback"), Some(None));
        assert_eq!(feedback_marker("Feedback"), None);
    }
}
