use crate::ident::ShortIds;
use crate::xml::Element;

use super::{conditionvar, resprocessing, setvar, text_response, Fragment, ItemContext};

const DEFAULT_FORMULA: &str = "x+y";

/// Variable ranges and the sample set emitted for every calculated item.
/// They are fixed: the declared formula is written out but not evaluated,
/// so a formula over other variables imports with mismatched samples.
const VARIABLES: [(&str, &str, &str); 2] = [("x", "2.0", "5.0"), ("y", "6.0", "9.0")];
const SAMPLE: [(&str, &str); 2] = [("x", "4"), ("y", "7")];
const SAMPLE_ANSWER: &str = "11.0";

pub(super) fn calculated(item: &ItemContext, short: &mut ShortIds) -> Fragment {
    let question = item.question;

    let presentation = text_response(
        Element::new("render_fib")
            .attr("fibtype", "Decimal")
            .child(Element::new("response_label").attr("ident", "answer1")),
    );

    let correct = Element::new("respcondition")
        .attr("title", "correct")
        .child(conditionvar([Element::new("other")]))
        .child(setvar("Set", "100"));
    let incorrect = Element::new("respcondition")
        .attr("title", "incorrect")
        .child(conditionvar([
            Element::new("not").child(Element::new("other"))
        ]))
        .child(setvar("Set", "0"));

    let tolerance = if question.tolerance == 0.0 {
        "1".to_string()
    } else {
        question.tolerance.to_string()
    };
    let formula = question
        .formula
        .as_deref()
        .filter(|f| !f.is_empty())
        .unwrap_or(DEFAULT_FORMULA);

    let vars = VARIABLES.iter().map(|(name, min, max)| {
        Element::new("var")
            .attr("name", *name)
            .attr("scale", "0")
            .child(Element::new("min").text(*min))
            .child(Element::new("max").text(*max))
    });
    let sample = SAMPLE
        .iter()
        .map(|(name, value)| Element::new("var").attr("name", *name).text(*value));

    let calculated = Element::new("calculated")
        .child(Element::new("answer_tolerance").text(tolerance))
        .child(
            Element::new("formulas")
                .attr("decimal_places", "0")
                .child(Element::new("formula").text(formula)),
        )
        .child(Element::new("vars").children(vars))
        .child(
            Element::new("var_sets").child(
                Element::new("var_set")
                    .attr("ident", short.next_id())
                    .children(sample)
                    .child(Element::new("answer").text(SAMPLE_ANSWER)),
            ),
        );

    Fragment {
        presentation: vec![presentation],
        resprocessing: Some(resprocessing(vec![correct, incorrect])),
        extension: Some(Element::new("itemproc_extension").child(calculated)),
        ..Default::default()
    }
}
