use std::fs;

use mdqti::model::{FeedbackKind, QuestionType};
use mdqti::parser::{parse_document, parse_quiz, write_quiz};

fn sample() -> String {
    fs::read_to_string("fixtures/sample_quiz.md").expect("Cannot read fixture")
}

#[test]
fn test_parse_sample_quiz() {
    let quiz = parse_quiz(&sample());

    assert_eq!(quiz.title, "Midterm: Systems Programming");
    assert_eq!(quiz.questions.len(), 11);

    let kinds: Vec<QuestionType> = quiz.questions.iter().map(|q| q.kind).collect();
    assert_eq!(
        kinds,
        vec![
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
        ]
    );

    let q1 = &quiz.questions[0];
    assert_eq!(q1.title, "Question 1");
    assert_eq!(q1.display_text, "Which system call creates a new process?");
    assert_eq!(q1.points, 2.0);
    assert_eq!(q1.answers.len(), 4);
    assert_eq!(q1.answers[1].text, "fork");
    assert!(q1.answers[1].correct);
    assert!(!q1.answers[0].correct);
    assert_eq!(
        q1.feedback.get(FeedbackKind::Correct),
        "Right, fork duplicates the calling process."
    );
    assert_eq!(
        q1.feedback.get(FeedbackKind::Incorrect),
        "Review the process lifecycle chapter."
    );

    assert_eq!(quiz.questions[1].title, "Ownership");
    assert_eq!(quiz.questions[3].points, 5.0);

    let blanks = &quiz.questions[5].blanks;
    assert_eq!(blanks.len(), 2);
    assert_eq!(blanks[0].id, "A");
    assert_eq!(blanks[0].answers, vec!["Iterator", "iterator"]);
    // Body lines after a multi-blank Type: are not collected.
    assert_eq!(quiz.questions[5].body, "");

    let pairs = &quiz.questions[6].matching_pairs;
    assert_eq!(pairs.len(), 3);
    assert_eq!(pairs[1].left, "ref");
    assert_eq!(pairs[1].right, "borrow in a pattern");

    assert_eq!(quiz.questions[7].tolerance, 0.5);
    assert_eq!(quiz.questions[10].formula.as_deref(), Some("x+y"));
    assert_eq!(quiz.total_points(), 26.0);
}

#[test]
fn test_default_titles_follow_header_order() {
    let quiz = parse_quiz("## First\n## Second\nTitle: Custom\n## Third\n");
    let titles: Vec<&str> = quiz.questions.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["Question 1", "Custom", "Question 3"]);
    assert_eq!(quiz.title, "Imported Quiz");
}

#[test]
fn test_malformed_numbers_keep_previous_value() {
    let quiz = parse_quiz(
        "## Q\nPoints: abc\nTolerance: ?\n## R\nPoints: 4\nPoints: nope\nPoints: 3 pts\n",
    );
    assert_eq!(quiz.questions[0].points, 1.0);
    assert_eq!(quiz.questions[0].tolerance, 0.0);
    assert_eq!(quiz.questions[1].points, 4.0);
}

#[test]
fn test_negative_points_are_rejected() {
    let quiz = parse_quiz("## Intro\nType: text\nPoints: 0\n## Q\nPoints: 2\nPoints: -5\n");
    assert_eq!(quiz.questions[0].points, 0.0);
    assert_eq!(quiz.questions[1].points, 2.0);
}

#[test]
fn test_unknown_type_keeps_current_type() {
    let quiz = parse_quiz("## Q\nType: Numerical\nType: hotspot\n");
    assert_eq!(quiz.questions[0].kind, QuestionType::Numerical);
}

#[test]
fn test_malformed_match_and_blank_lines_are_ignored() {
    let quiz = parse_quiz("## Q\nType: matching\nMatch: no separator\nMatch: a=1\nBlank: =x\nBlank: b=\n");
    let q = &quiz.questions[0];
    assert_eq!(q.matching_pairs.len(), 1);
    assert!(q.blanks.is_empty());
}

#[test]
fn test_blank_redeclaration_overwrites_in_place() {
    let quiz = parse_quiz("## Q\nBlank: a=1\nBlank: b=2\nBlank: a=3 | 4\n");
    let blanks = &quiz.questions[0].blanks;
    assert_eq!(blanks.len(), 2);
    assert_eq!(blanks[0].id, "a");
    assert_eq!(blanks[0].answers, vec!["3", "4"]);
}

#[test]
fn test_quiz_title_only_before_first_question() {
    let quiz = parse_quiz("# One\n# Two\n## Q\n# Not a title\n");
    assert_eq!(quiz.title, "Two");
    assert_eq!(quiz.questions[0].body, "# Not a title");
}

#[test]
fn test_feedback_capture_swallows_directives() {
    let content = "## Q\nFeedback_Neutral:\n* not an answer\nPoints: 9\n\nsecond line\nEnd_Feedback\nbody text\n";
    let quiz = parse_quiz(content);
    let q = &quiz.questions[0];
    assert!(q.answers.is_empty());
    assert_eq!(q.points, 1.0);
    assert_eq!(q.feedback.neutral, "* not an answer\nPoints: 9\n\nsecond line");
    assert_eq!(q.body, "body text");
}

#[test]
fn test_new_header_closes_open_feedback() {
    let quiz = parse_quiz("## Q\nFeedback_Correct:\nwell done\n## R\n* yes\n");
    assert_eq!(quiz.questions[0].feedback.correct, "well done");
    assert_eq!(quiz.questions[1].answers.len(), 1);
    assert!(quiz.questions[1].feedback.correct.is_empty());
}

#[test]
fn test_body_is_fallback_prompt() {
    let quiz = parse_quiz("## 4.\n\nLine one\n  Line two  \n\n");
    let q = &quiz.questions[0];
    assert_eq!(q.display_text, "");
    assert_eq!(q.body, "Line one\nLine two");
    assert_eq!(q.prompt(), "Line one\nLine two");
}

#[test]
fn test_no_headers_yields_no_questions() {
    let quiz = parse_quiz("# Title only\nSome text\n* stray answer\n");
    assert!(quiz.questions.is_empty());
}

#[test]
fn test_parsing_is_restartable() {
    let content = sample();
    assert_eq!(parse_quiz(&content), parse_quiz(&content));
}

#[test]
fn test_written_quiz_parses_back_identically() {
    let quiz = parse_quiz(&sample());
    let rewritten = parse_quiz(&write_quiz(&quiz));
    assert_eq!(rewritten, quiz);
}

#[test]
fn test_numbered_prompts_survive_rewriting() {
    let quiz = parse_quiz("## 1. 2. Second step\n* ok\n## 3.\nBody only\n## 10 items\n");
    assert_eq!(quiz.questions[0].display_text, "2. Second step");
    assert_eq!(quiz.questions[2].display_text, "10 items");

    let rewritten = parse_quiz(&write_quiz(&quiz));
    assert_eq!(rewritten, quiz);
}

#[test]
fn test_frontmatter_parsing() {
    let content = "---\ntitle: From Frontmatter\nshuffle_answers: true\nallowed_attempts: 2\n---\n# Body Title\n## Q\n";
    let quiz = parse_document(content).unwrap();
    assert_eq!(quiz.title, "From Frontmatter");
    let fm = quiz.frontmatter.as_ref().unwrap();
    assert_eq!(fm.settings.shuffle_answers, Some(true));
    assert_eq!(fm.settings.allowed_attempts, Some(2));
    assert_eq!(fm.settings.scoring_policy, None);
    assert_eq!(quiz.questions.len(), 1);
}

#[test]
fn test_invalid_frontmatter_is_an_error() {
    let err = parse_document("---\ntitle: [unclosed\n---\n## Q\n").unwrap_err();
    assert!(matches!(err, mdqti::Error::Frontmatter(_)));
}

#[test]
fn test_leading_rule_is_not_frontmatter() {
    let quiz = parse_document("---\n# Quiz\n## Q1\nType: essay\n---\n## Q2\n").unwrap();
    assert!(quiz.frontmatter.is_none());
    assert_eq!(quiz.title, "Quiz");
    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.questions[0].display_text, "Q1");
    assert_eq!(quiz.questions[1].display_text, "Q2");
}

#[test]
fn test_document_without_frontmatter() {
    let quiz = parse_document(&sample()).unwrap();
    assert!(quiz.frontmatter.is_none());
    assert_eq!(quiz.questions.len(), 11);
}
