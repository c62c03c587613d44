use crate::xml::Element;

use super::{
    conditionvar, full_credit, plain_material, resprocessing, response_label, setvar, varequal,
    Fragment, ItemContext, Warning, RESPONSE_ID,
};

/// `response_lid` offering every answer of the item as a choice.
fn choice_lid(item: &ItemContext, cardinality: &str) -> Element {
    let labels = item
        .answers
        .iter()
        .zip(&item.answer_ids)
        .map(|(answer, id)| response_label(id, plain_material(&answer.text)));

    Element::new("response_lid")
        .attr("ident", RESPONSE_ID)
        .attr("rcardinality", cardinality)
        .child(Element::new("render_choice").children(labels))
}

/// Identifiers of the answers marked correct, in declaration order.
fn correct_ids<'a>(item: &'a ItemContext) -> Vec<&'a str> {
    item.answers
        .iter()
        .zip(&item.answer_ids)
        .filter(|(answer, _)| answer.correct)
        .map(|(_, id)| id.as_str())
        .collect()
}

pub(super) fn multiple_choice(item: &ItemContext, warnings: &mut Vec<Warning>) -> Fragment {
    let correct = correct_ids(item);
    match correct.len() {
        0 => warnings.push(Warning::NoCorrectAnswer {
            question: item.title(),
        }),
        1 => {}
        count => warnings.push(Warning::ExtraCorrectAnswers {
            question: item.title(),
            count,
        }),
    }

    let conditions = correct
        .first()
        .map(|id| full_credit(varequal(RESPONSE_ID, id)))
        .into_iter()
        .collect();

    Fragment {
        presentation: vec![choice_lid(item, "Single")],
        resprocessing: Some(resprocessing(conditions)),
        ..Default::default()
    }
}

pub(super) fn true_false(item: &ItemContext, warnings: &mut Vec<Warning>) -> Fragment {
    let correct = correct_ids(item);
    if correct.is_empty() {
        warnings.push(Warning::TrueFalseWithoutCorrect {
            question: item.title(),
        });
    }

    let conditions = correct
        .iter()
        .map(|id| full_credit(varequal(RESPONSE_ID, id)))
        .collect();

    Fragment {
        presentation: vec![choice_lid(item, "Single")],
        resprocessing: Some(resprocessing(conditions)),
        ..Default::default()
    }
}

/// Full credit only for exactly the set of correct answers: every correct
/// choice selected and every incorrect one left alone.
pub(super) fn multiple_answers(item: &ItemContext) -> Fragment {
    let tests = item
        .answers
        .iter()
        .zip(&item.answer_ids)
        .map(|(answer, id)| {
            if answer.correct {
                varequal(RESPONSE_ID, id)
            } else {
                Element::new("not").child(varequal(RESPONSE_ID, id))
            }
        });

    let condition = Element::new("respcondition")
        .attr("continue", "No")
        .child(conditionvar([Element::new("and").children(tests)]))
        .child(setvar("Set", "100"));

    Fragment {
        presentation: vec![choice_lid(item, "Multiple")],
        resprocessing: Some(resprocessing(vec![condition])),
        ..Default::default()
    }
}
