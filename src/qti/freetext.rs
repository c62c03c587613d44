use crate::model::FeedbackKind;
use crate::xml::Element;

use super::{
    conditionvar, display_feedback, metadata_field, resprocessing, setvar, text_response,
    varequal, Fragment, ItemContext, Warning, RESPONSE_ID,
};

fn answer_box() -> Element {
    Element::new("response_label")
        .attr("ident", "answer1")
        .attr("rshuffle", "No")
}

fn plain_fib() -> Element {
    Element::new("render_fib").child(answer_box())
}

/// Never scored automatically. The catch-all condition assigns nothing.
pub(super) fn essay() -> Fragment {
    let condition = Element::new("respcondition")
        .attr("continue", "No")
        .child(conditionvar([Element::new("other")]));

    Fragment {
        presentation: vec![text_response(plain_fib())],
        resprocessing: Some(resprocessing(vec![condition])),
        ..Default::default()
    }
}

/// Full credit when the submission equals any correct answer. Comparison
/// rules (case, whitespace) are the importer's business.
pub(super) fn short_answer(item: &ItemContext, warnings: &mut Vec<Warning>) -> Fragment {
    let mut fragment = Fragment {
        presentation: vec![text_response(plain_fib())],
        ..Default::default()
    };
    if item.answers.is_empty() {
        return fragment;
    }

    let accepted: Vec<Element> = item
        .question
        .correct_answers()
        .map(|a| varequal(RESPONSE_ID, &a.text))
        .collect();

    let conditions = if accepted.is_empty() {
        warnings.push(Warning::NoCorrectAnswer {
            question: item.title(),
        });
        Vec::new()
    } else {
        vec![Element::new("respcondition")
            .attr("continue", "No")
            .child(conditionvar(accepted))
            .child(setvar("Set", "100"))]
    };
    fragment.resprocessing = Some(resprocessing(conditions));
    fragment
}

/// Full credit when the submission lies within `tolerance` of a correct
/// answer, bounds included. Each correct answer gets its own range.
pub(super) fn numerical(item: &ItemContext, warnings: &mut Vec<Warning>) -> Fragment {
    let question = item.question;
    let tolerance = question.tolerance.abs();

    let mut fragment = Fragment {
        presentation: vec![text_response(
            Element::new("render_fib")
                .attr("fibtype", "Decimal")
                .attr("prompt", "Box")
                .attr("rows", "1")
                .attr("maxchars", "0")
                .child(answer_box()),
        )],
        ..Default::default()
    };

    if let (Some(first), Some(first_id)) = (item.answers.first(), item.answer_ids.first()) {
        if first.correct {
            if let Some(exact) = parse_number(&first.text) {
                fragment.metadata = vec![
                    metadata_field("assessment_question_identifierref", item.ident),
                    metadata_field(&format!("answer_{}", first_id), exact.to_string()),
                    metadata_field(
                        &format!("answer_tolerance_{}", first_id),
                        tolerance.to_string(),
                    ),
                    metadata_field(&format!("answer_type_{}", first_id), "exact_answer"),
                ];
            }
        }
    }

    if item.answers.is_empty() {
        return fragment;
    }

    let mut conditions = Vec::new();
    for answer in item.answers.iter().filter(|a| a.correct) {
        let Some(exact) = parse_number(&answer.text) else {
            warnings.push(Warning::UnparseableNumericAnswer {
                question: item.title(),
                text: answer.text.clone(),
            });
            continue;
        };

        let range = Element::new("and")
            .child(
                Element::new("vargte")
                    .attr("respident", RESPONSE_ID)
                    .text((exact - tolerance).to_string()),
            )
            .child(
                Element::new("varlte")
                    .attr("respident", RESPONSE_ID)
                    .text((exact + tolerance).to_string()),
            );

        let mut condition = Element::new("respcondition")
            .attr("continue", "No")
            .child(conditionvar([range]))
            .child(setvar("Set", "100"));
        if item.has_feedback(FeedbackKind::Correct) {
            condition = condition.child(display_feedback("correct_fb"));
        }
        conditions.push(condition);
    }

    if item.has_feedback(FeedbackKind::Incorrect) {
        conditions.push(
            Element::new("respcondition")
                .attr("continue", "Yes")
                .child(conditionvar([Element::new("other")]))
                .child(display_feedback("incorrect_fb")),
        );
    }

    fragment.resprocessing = Some(resprocessing(conditions));
    fragment
}

/// Uploads carry only the score declaration.
pub(super) fn file_upload() -> Fragment {
    Fragment {
        resprocessing: Some(resprocessing(Vec::new())),
        ..Default::default()
    }
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
