use crate::ident::ShortIds;
use crate::xml::Element;

use super::{
    bare_material, metadata_field, partial_credit, plain_material, resprocessing, response_label,
    varequal, Fragment, ItemContext,
};

/// One choice list per blank. Each blank is worth `100 / blanks` points,
/// earned by any of its acceptable alternatives.
pub(super) fn fill_in_multiple_blanks(item: &ItemContext, short: &mut ShortIds) -> Fragment {
    let blanks = &item.question.blanks;
    let mut presentation = Vec::with_capacity(blanks.len());
    let mut wiring = Vec::with_capacity(blanks.len());

    for blank in blanks {
        let respident = format!("response_{}", blank.id);
        let ids = short.take(blank.answers.len());

        let labels = blank
            .answers
            .iter()
            .zip(&ids)
            .map(|(text, id)| response_label(id, plain_material(text)));

        presentation.push(
            Element::new("response_lid")
                .attr("ident", respident.as_str())
                .child(bare_material(&blank.id))
                .child(Element::new("render_choice").children(labels)),
        );
        wiring.push((respident, ids));
    }

    let resprocessing = if blanks.is_empty() {
        None
    } else {
        let per_blank = 100.0 / blanks.len() as f64;
        let conditions = wiring
            .iter()
            .flat_map(|(respident, ids)| {
                ids.iter()
                    .map(move |id| partial_credit(varequal(respident, id), per_blank))
            })
            .collect();
        Some(resprocessing(conditions))
    };

    Fragment {
        presentation,
        resprocessing,
        ..Default::default()
    }
}

/// One response per left item, all sharing the pool of right items as
/// choices. Each correct pairing is worth `100 / pairs` points.
pub(super) fn matching(item: &ItemContext, short: &mut ShortIds) -> Fragment {
    let pairs = &item.question.matching_pairs;
    let mut left_ids = Vec::with_capacity(pairs.len());
    let mut right_ids = Vec::with_capacity(pairs.len());
    for _ in pairs {
        left_ids.push(short.next_id());
        right_ids.push(short.next_id());
    }

    let choice_pool: Vec<Element> = pairs
        .iter()
        .zip(&right_ids)
        .map(|(pair, id)| response_label(id, bare_material(&pair.right)))
        .collect();

    let presentation = pairs
        .iter()
        .zip(&left_ids)
        .map(|(pair, left_id)| {
            Element::new("response_lid")
                .attr("ident", format!("response_{}", left_id))
                .child(plain_material(&pair.left))
                .child(Element::new("render_choice").children(choice_pool.iter().cloned()))
        })
        .collect();

    let per_pair = if pairs.is_empty() {
        0.0
    } else {
        100.0 / pairs.len() as f64
    };
    let conditions = left_ids
        .iter()
        .zip(&right_ids)
        .map(|(left_id, right_id)| {
            partial_credit(
                varequal(&format!("response_{}", left_id), right_id),
                per_pair,
            )
        })
        .collect();

    Fragment {
        metadata: vec![metadata_field("bb_question_type", "Matching")],
        presentation,
        resprocessing: Some(resprocessing(conditions)),
        ..Default::default()
    }
}
