//! Package-level documents: `imsmanifest.xml` and `assessment_meta.xml`.

use chrono::NaiveDate;

use crate::config::QuizSettings;
use crate::ident::IdGenerator;
use crate::model::Quiz;
use crate::xml::Element;

const CP_NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsccv1p1/imscp_v1p1";
const LOM_NAMESPACE: &str = "http://ltsc.ieee.org/xsd/imsccv1p1/LOM/resource";
const IMSMD_NAMESPACE: &str = "http://www.imsglobal.org/xsd/imsmd_v1p2";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const MANIFEST_SCHEMA_LOCATION: &str = "http://www.imsglobal.org/xsd/imsccv1p1/imscp_v1p1 http://www.imsglobal.org/xsd/imscp_v1p1.xsd http://ltsc.ieee.org/xsd/imsccv1p1/LOM/resource http://www.imsglobal.org/profile/cc/ccv1p1/LOM/ccv1p1_lomresource_v1p0.xsd http://www.imsglobal.org/xsd/imsmd_v1p2 http://www.imsglobal.org/xsd/imsmd_v1p2p2.xsd";

const CANVAS_NAMESPACE: &str = "http://canvas.instructure.com/xsd/cccv1p0";
const CANVAS_SCHEMA_LOCATION: &str =
    "http://canvas.instructure.com/xsd/cccv1p0 https://canvas.instructure.com/xsd/cccv1p0.xsd";

const RIGHTS_DESCRIPTION: &str = "Private (Copyrighted) - http://en.wikipedia.org/wiki/Copyright";

pub const META_FILE: &str = "assessment_meta.xml";

/// Path of the assessment document inside the package.
pub fn assessment_path(assessment_id: &str) -> String {
    format!("{}/{}.xml", assessment_id, assessment_id)
}

pub fn meta_path(assessment_id: &str) -> String {
    format!("{}/{}", assessment_id, META_FILE)
}

fn text_el(name: &str, text: impl Into<String>) -> Element {
    Element::new(name).text(text)
}

fn flag(name: &str, value: bool) -> Element {
    text_el(name, value.to_string())
}

fn lom_string(name: &str, text: impl Into<String>) -> Element {
    Element::new(name).child(text_el("imsmd:string", text))
}

pub fn build_manifest(
    quiz_title: &str,
    assessment_id: &str,
    created: NaiveDate,
    ids: &mut IdGenerator,
) -> Element {
    let manifest_id = ids.long_id();
    let meta_resource_id = ids.long_id();

    let lom = Element::new("imsmd:lom")
        .child(Element::new("imsmd:general").child(lom_string(
            "imsmd:title",
            format!("QTI Quiz Export - {}", quiz_title),
        )))
        .child(
            Element::new("imsmd:lifeCycle").child(
                Element::new("imsmd:contribute").child(
                    Element::new("imsmd:date").child(text_el(
                        "imsmd:dateTime",
                        created.format("%Y-%m-%d").to_string(),
                    )),
                ),
            ),
        )
        .child(
            Element::new("imsmd:rights")
                .child(
                    Element::new("imsmd:copyrightAndOtherRestrictions")
                        .child(text_el("imsmd:value", "yes")),
                )
                .child(lom_string("imsmd:description", RIGHTS_DESCRIPTION)),
        );

    let metadata = Element::new("metadata")
        .child(text_el("schema", "IMS Content"))
        .child(text_el("schemaversion", "1.1.3"))
        .child(lom);

    let assessment_resource = Element::new("resource")
        .attr("identifier", assessment_id)
        .attr("type", "imsqti_xmlv1p2")
        .child(Element::new("file").attr("href", assessment_path(assessment_id)))
        .child(Element::new("dependency").attr("identifierref", meta_resource_id.as_str()));

    let meta_resource = Element::new("resource")
        .attr("identifier", meta_resource_id.as_str())
        .attr(
            "type",
            "associatedcontent/imscc_xmlv1p1/learning-application-resource",
        )
        .attr("href", meta_path(assessment_id))
        .child(Element::new("file").attr("href", meta_path(assessment_id)));

    Element::new("manifest")
        .attr("identifier", manifest_id)
        .attr("xmlns", CP_NAMESPACE)
        .attr("xmlns:lom", LOM_NAMESPACE)
        .attr("xmlns:imsmd", IMSMD_NAMESPACE)
        .attr("xmlns:xsi", XSI_NAMESPACE)
        .attr("xsi:schemaLocation", MANIFEST_SCHEMA_LOCATION)
        .child(metadata)
        .child(Element::new("organizations"))
        .child(
            Element::new("resources")
                .child(assessment_resource)
                .child(meta_resource),
        )
}

/// Canvas quiz settings document. Points possible is the sum of the
/// question points.
pub fn build_assessment_meta(
    quiz: &Quiz,
    assessment_id: &str,
    settings: &QuizSettings,
    ids: &mut IdGenerator,
) -> Element {
    let assignment_id = ids.long_id();
    let assignment_group_id = ids.long_id();
    let points = format!("{:.1}", quiz.total_points());
    let attempts = settings.allowed_attempts.to_string();

    let assignment = Element::new("assignment")
        .attr("identifier", assignment_id)
        .child(text_el("title", quiz.title.as_str()))
        .child(Element::new("due_at"))
        .child(Element::new("lock_at"))
        .child(Element::new("unlock_at"))
        .child(flag("module_locked", false))
        .child(text_el("workflow_state", "unpublished"))
        .child(Element::new("assignment_overrides"))
        .child(text_el("quiz_identifierref", assessment_id))
        .child(Element::new("allowed_extensions"))
        .child(flag("has_group_category", false))
        .child(text_el("points_possible", points.as_str()))
        .child(text_el("grading_type", "points"))
        .child(flag("all_day", false))
        .child(text_el("submission_types", "online_quiz"))
        .child(text_el("position", "1"))
        .child(flag("turnitin_enabled", false))
        .child(flag("vericite_enabled", false))
        .child(text_el("peer_review_count", "0"))
        .child(flag("peer_reviews", false))
        .child(flag("automatic_peer_reviews", false))
        .child(flag("anonymous_peer_reviews", false))
        .child(flag("grade_group_students_individually", false))
        .child(flag("freeze_on_copy", false))
        .child(flag("omit_from_final_grade", false))
        .child(flag("hide_in_gradebook", false))
        .child(flag("intra_group_peer_reviews", false))
        .child(flag("only_visible_to_overrides", false))
        .child(flag("post_to_sis", false))
        .child(flag("moderated_grading", false))
        .child(text_el("grader_count", "0"))
        .child(flag("grader_comments_visible_to_graders", true))
        .child(flag("anonymous_grading", false))
        .child(flag("graders_anonymous_to_graders", false))
        .child(flag("grader_names_visible_to_final_grader", true))
        .child(flag("anonymous_instructor_annotations", false))
        .child(Element::new("post_policy").child(flag("post_manually", false)));

    let description = if settings.description.is_empty() {
        Element::new("description")
    } else {
        text_el("description", settings.description.as_str())
    };

    Element::new("quiz")
        .attr("identifier", assessment_id)
        .attr("xmlns", CANVAS_NAMESPACE)
        .attr("xmlns:xsi", XSI_NAMESPACE)
        .attr("xsi:schemaLocation", CANVAS_SCHEMA_LOCATION)
        .child(text_el("title", quiz.title.as_str()))
        .child(description)
        .child(flag("shuffle_answers", settings.shuffle_answers))
        .child(text_el("scoring_policy", settings.scoring_policy.as_str()))
        .child(Element::new("hide_results"))
        .child(text_el("quiz_type", settings.quiz_type.as_str()))
        .child(text_el("points_possible", points))
        .child(flag("require_lockdown_browser", false))
        .child(flag("require_lockdown_browser_for_results", false))
        .child(flag("require_lockdown_browser_monitor", false))
        .child(Element::new("lockdown_browser_monitor_data"))
        .child(flag("show_correct_answers", settings.show_correct_answers))
        .child(flag("anonymous_submissions", false))
        .child(flag("could_be_locked", false))
        .child(flag("disable_timer_autosubmission", false))
        .child(text_el("allowed_attempts", attempts))
        .child(flag("one_question_at_a_time", settings.one_question_at_a_time))
        .child(flag("cant_go_back", settings.cant_go_back))
        .child(flag("available", false))
        .child(flag("one_time_results", false))
        .child(flag("show_correct_answers_last_attempt", false))
        .child(flag("only_visible_to_overrides", false))
        .child(flag("module_locked", false))
        .child(assignment)
        .child(text_el("assignment_group_identifierref", assignment_group_id))
        .child(Element::new("assignment_overrides"))
}
