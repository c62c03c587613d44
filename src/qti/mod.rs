//! QTI 1.2 assessment encoder.
//!
//! Every question becomes one `item` in the assessment's root section. The
//! per-type builders only produce a [`Fragment`]; assembling the item
//! (metadata, prompt, feedback) happens here.

mod calculated;
mod choice;
mod freetext;
mod pairing;

use std::borrow::Cow;
use std::fmt;

use log::warn;
use pulldown_cmark::{html, Parser};

use crate::ident::{IdGenerator, ShortIds};
use crate::model::{Answer, FeedbackKind, Question, QuestionType, Quiz};
use crate::xml::Element;

const QTI_NAMESPACE: &str = "http://www.imsglobal.org/xsd/ims_qtiasiv1p2";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const QTI_SCHEMA_LOCATION: &str = "http://www.imsglobal.org/xsd/ims_qtiasiv1p2 http://www.imsglobal.org/xsd/ims_qtiasiv1p2p1.xsd";

/// Response identifier shared by all single-response item types.
pub const RESPONSE_ID: &str = "response1";
pub const SCORE_VAR: &str = "SCORE";

/// Encoder switches that do not come from the questions themselves.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub allowed_attempts: i32,
    pub render_markdown: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            allowed_attempts: 1,
            render_markdown: false,
        }
    }
}

/// Something in the input that will not import the way the author likely
/// meant. Conversion still succeeds.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    TrueFalseWithoutCorrect { question: String },
    NoCorrectAnswer { question: String },
    ExtraCorrectAnswers { question: String, count: usize },
    UnparseableNumericAnswer { question: String, text: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::TrueFalseWithoutCorrect { question } => write!(
                f,
                "{}: true/false question has no answer marked correct and can never be scored",
                question
            ),
            Warning::NoCorrectAnswer { question } => {
                write!(f, "{}: no answer is marked correct", question)
            }
            Warning::ExtraCorrectAnswers { question, count } => write!(
                f,
                "{}: {} answers marked correct, only the first one is scored",
                question, count
            ),
            Warning::UnparseableNumericAnswer { question, text } => write!(
                f,
                "{}: answer {:?} is not a number, skipping its scoring condition",
                question, text
            ),
        }
    }
}

/// The rendered assessment document.
#[derive(Debug, Clone)]
pub struct EncodedAssessment {
    pub ident: String,
    pub document: Element,
    pub warnings: Vec<Warning>,
}

pub fn encode_assessment(
    quiz: &Quiz,
    ids: &mut IdGenerator,
    options: &EncodeOptions,
) -> EncodedAssessment {
    let ident = ids.long_id();
    let mut warnings = Vec::new();

    let items: Vec<Element> = quiz
        .questions
        .iter()
        .map(|q| encode_item(q, ids, options, &mut warnings))
        .collect();

    for w in &warnings {
        warn!("{}", w);
    }

    let assessment = Element::new("assessment")
        .attr("ident", ident.as_str())
        .attr("title", quiz.title.as_str())
        .child(Element::new("qtimetadata").child(metadata_field(
            "cc_maxattempts",
            options.allowed_attempts.to_string(),
        )))
        .child(
            Element::new("section")
                .attr("ident", "root_section")
                .children(items),
        );

    let document = Element::new("questestinterop")
        .attr("xmlns", QTI_NAMESPACE)
        .attr("xmlns:xsi", XSI_NAMESPACE)
        .attr("xsi:schemaLocation", QTI_SCHEMA_LOCATION)
        .child(assessment);

    EncodedAssessment {
        ident,
        document,
        warnings,
    }
}

/// What one question's item holds in the context of its type builder.
pub(crate) struct ItemContext<'q> {
    pub question: &'q Question,
    pub ident: &'q str,
    /// The question's answers; for true/false without explicit answers, the
    /// injected `True`/`False` pair.
    pub answers: Cow<'q, [Answer]>,
    /// One short identifier per entry of `answers`, in the same order.
    pub answer_ids: Vec<String>,
}

impl ItemContext<'_> {
    pub fn title(&self) -> String {
        self.question.title.clone()
    }

    pub fn has_feedback(&self, kind: FeedbackKind) -> bool {
        !self.question.feedback.get(kind).is_empty()
    }
}

/// Type-specific parts of an item.
#[derive(Debug, Default)]
pub(crate) struct Fragment {
    pub metadata: Vec<Element>,
    pub presentation: Vec<Element>,
    pub resprocessing: Option<Element>,
    pub extension: Option<Element>,
}

pub fn encode_item(
    question: &Question,
    ids: &mut IdGenerator,
    options: &EncodeOptions,
    warnings: &mut Vec<Warning>,
) -> Element {
    let ident = ids.long_id();
    let question_ref = ids.long_id();

    let answers: Cow<[Answer]> =
        if question.kind == QuestionType::TrueFalse && question.answers.is_empty() {
            Cow::Owned(vec![Answer::new("True", false), Answer::new("False", false)])
        } else {
            Cow::Borrowed(&question.answers)
        };

    let mut short = ids.item_scope();
    let answer_ids = short.take(answers.len());
    let item = ItemContext {
        question,
        ident: &ident,
        answers,
        answer_ids,
    };

    let fragment = build_fragment(&item, &mut short, warnings);

    let mut metadata = vec![
        metadata_field("question_type", question.kind.qti_tag()),
        metadata_field("points_possible", question.points.to_string()),
        metadata_field("assessment_question_identifierref", question_ref),
    ];
    if question.kind == QuestionType::TextOnly {
        metadata.push(metadata_field("passage", "true"));
    }
    if !item.answers.is_empty() {
        metadata.push(metadata_field(
            "original_answer_ids",
            item.answer_ids.join(","),
        ));
    } else if matches!(
        question.kind,
        QuestionType::Essay | QuestionType::FileUpload | QuestionType::TextOnly
    ) {
        metadata.push(metadata_field("original_answer_ids", ""));
    }
    metadata.extend(fragment.metadata);

    let prompt = Element::new("material").child(html_mattext(prompt_html(
        question.prompt(),
        options.render_markdown,
    )));

    let mut element = Element::new("item")
        .attr("ident", ident.as_str())
        .attr("title", question.title.as_str())
        .child(
            Element::new("itemmetadata").child(Element::new("qtimetadata").children(metadata)),
        )
        .child(
            Element::new("presentation")
                .child(prompt)
                .children(fragment.presentation),
        );
    if let Some(resprocessing) = fragment.resprocessing {
        element = element.child(resprocessing);
    }
    if let Some(extension) = fragment.extension {
        element = element.child(extension);
    }
    element.children(feedback_blocks(question, options.render_markdown))
}

fn build_fragment(
    item: &ItemContext,
    short: &mut ShortIds,
    warnings: &mut Vec<Warning>,
) -> Fragment {
    match item.question.kind {
        QuestionType::MultipleChoice => choice::multiple_choice(item, warnings),
        QuestionType::TrueFalse => choice::true_false(item, warnings),
        QuestionType::MultipleAnswers => choice::multiple_answers(item),
        QuestionType::Essay => freetext::essay(),
        QuestionType::ShortAnswer => freetext::short_answer(item, warnings),
        QuestionType::Numerical => freetext::numerical(item, warnings),
        QuestionType::FileUpload => freetext::file_upload(),
        QuestionType::FillInMultipleBlanks => pairing::fill_in_multiple_blanks(item, short),
        QuestionType::Matching => pairing::matching(item, short),
        QuestionType::Calculated => calculated::calculated(item, short),
        QuestionType::TextOnly => Fragment::default(),
    }
}

fn feedback_blocks(question: &Question, render_markdown: bool) -> Vec<Element> {
    [
        (FeedbackKind::Neutral, "general_fb"),
        (FeedbackKind::Correct, "correct_fb"),
        (FeedbackKind::Incorrect, "incorrect_fb"),
    ]
    .into_iter()
    .filter(|(kind, _)| !question.feedback.get(*kind).is_empty())
    .map(|(kind, ident)| {
        let text = question.feedback.get(kind);
        let body = if render_markdown {
            markdown_html(text)
        } else {
            text.to_string()
        };
        Element::new("itemfeedback").attr("ident", ident).child(
            Element::new("flow_mat").child(Element::new("material").child(html_mattext(body))),
        )
    })
    .collect()
}

fn prompt_html(text: &str, render_markdown: bool) -> String {
    if render_markdown {
        format!("<div>{}</div>", markdown_html(text))
    } else {
        format!("<div><p>{}</p></div>", text)
    }
}

fn markdown_html(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, Parser::new(text));
    out.trim_end().to_string()
}

// Shared element builders for the type modules.

pub(crate) fn metadata_field(label: &str, entry: impl Into<String>) -> Element {
    Element::new("qtimetadatafield")
        .child(Element::new("fieldlabel").text(label))
        .child(Element::new("fieldentry").text(entry))
}

pub(crate) fn html_mattext(text: impl Into<String>) -> Element {
    Element::new("mattext").attr("texttype", "text/html").text(text)
}

pub(crate) fn plain_material(text: &str) -> Element {
    Element::new("material").child(
        Element::new("mattext")
            .attr("texttype", "text/plain")
            .text(text),
    )
}

/// Material with no declared text type.
pub(crate) fn bare_material(text: &str) -> Element {
    Element::new("material").child(Element::new("mattext").text(text))
}

pub(crate) fn response_label(ident: &str, material: Element) -> Element {
    Element::new("response_label")
        .attr("ident", ident)
        .child(material)
}

/// `response_str` with a single free-text label.
pub(crate) fn text_response(render_fib: Element) -> Element {
    Element::new("response_str")
        .attr("ident", RESPONSE_ID)
        .attr("rcardinality", "Single")
        .child(render_fib)
}

/// `resprocessing` declaring the `SCORE` outcome, followed by `conditions`.
pub(crate) fn resprocessing(conditions: Vec<Element>) -> Element {
    Element::new("resprocessing")
        .child(
            Element::new("outcomes").child(
                Element::new("decvar")
                    .attr("maxvalue", "100")
                    .attr("minvalue", "0")
                    .attr("varname", SCORE_VAR)
                    .attr("vartype", "Decimal"),
            ),
        )
        .children(conditions)
}

pub(crate) fn varequal(respident: &str, value: &str) -> Element {
    Element::new("varequal")
        .attr("respident", respident)
        .text(value)
}

pub(crate) fn setvar(action: &str, value: impl Into<String>) -> Element {
    Element::new("setvar")
        .attr("action", action)
        .attr("varname", SCORE_VAR)
        .text(value)
}

pub(crate) fn conditionvar(tests: impl IntoIterator<Item = Element>) -> Element {
    Element::new("conditionvar").children(tests)
}

/// `respcondition continue="No"` giving full credit when `test` holds.
pub(crate) fn full_credit(test: Element) -> Element {
    Element::new("respcondition")
        .attr("continue", "No")
        .child(conditionvar([test]))
        .child(setvar("Set", "100"))
}

/// `respcondition` adding `points` when `test` holds.
pub(crate) fn partial_credit(test: Element, points: f64) -> Element {
    Element::new("respcondition")
        .child(conditionvar([test]))
        .child(setvar("Add", format!("{:.2}", points)))
}

pub(crate) fn display_feedback(linkrefid: &str) -> Element {
    Element::new("displayfeedback")
        .attr("feedbacktype", "Response")
        .attr("linkrefid", linkrefid)
}
