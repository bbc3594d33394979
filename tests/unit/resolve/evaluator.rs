use super::*;
use crate::foundation::ids::AttrName;
use crate::resolve::graph::build;
use crate::scene::model::Element;

fn run_project(p: &Project) -> TimelineResult<Project> {
    let (graph, values) = build(p);
    run(p, &graph, values)
}

#[test]
fn writes_results_onto_the_copy() {
    let p = Project::new(1920, 1080, 10).with_element(
        Element::image("logo", "logo.png")
            .with(AttrName::Start, 0)
            .with(AttrName::Width, 300)
            .with(AttrName::X, "expr: (video.width - logo.width) / 2"),
    );
    let out = run_project(&p).unwrap();
    assert_eq!(
        out.element("logo").unwrap().attr(AttrName::X),
        Some(&AttrValue::Number(810.0))
    );
    assert_eq!(
        p.element("logo").unwrap().attr(AttrName::X),
        Some(&AttrValue::formula("(video.width - logo.width) / 2"))
    );
}

#[test]
fn missing_owner_names_owner_and_referrer() {
    let p = Project::new(1, 1, 1)
        .with_element(Element::rectangle("a").with(AttrName::Start, "expr: ghost.end"));
    let err = run_project(&p).unwrap_err();
    let TimelineError::AttributeReference(msg) = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(msg.contains("'ghost'"));
    assert!(msg.contains("a.start"));
}

#[test]
fn unknown_attribute_on_existing_owner() {
    let p = Project::new(1, 1, "expr: video.fps * 2");
    let err = run_project(&p).unwrap_err();
    assert!(matches!(err, TimelineError::AttributeReference(_)));
    assert!(err.to_string().contains("video.fps"));
}

#[test]
fn null_dependency_is_a_reference_error() {
    let p = Project::new(1, 1, 1)
        .with_element(Element::rectangle("A").with(AttrName::Start, 0))
        .with_element(Element::rectangle("B").with(AttrName::Start, "expr: A.end"));
    let err = run_project(&p).unwrap_err();
    let TimelineError::AttributeReference(msg) = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(msg.contains("A.end"));
    assert!(msg.contains("B.start"));
}

#[test]
fn sandbox_failures_are_wrapped_with_the_node() {
    let p = Project::new(1, 1, "expr: video.width / (video.height - 1)");
    let err = run_project(&p).unwrap_err();
    let TimelineError::Resolver(msg) = &err else {
        panic!("unexpected error: {err}");
    };
    assert!(msg.contains("video.duration"));
    assert!(msg.contains("division by zero"));
}

#[test]
fn unsafe_formula_is_a_resolver_error() {
    let p = Project::new(1, 1, "expr: __import__('os')");
    let err = run_project(&p).unwrap_err();
    assert!(matches!(err, TimelineError::Resolver(_)));
    assert!(err.to_string().contains("unsafe"));
}

#[test]
fn missing_seed_is_an_internal_fault() {
    let p = Project::new(1, 1, "expr: video.width + 1");
    let (graph, mut values) = build(&p);
    values.remove(&AttrId::video(AttrName::Width));
    let err = run(&p, &graph, values).unwrap_err();
    assert!(matches!(err, TimelineError::Resolver(_)));
}

#[test]
fn text_values_pass_through_plain_references() {
    let p = Project::new(1, 1, 1)
        .with_element(Element::rectangle("a").with(AttrName::Start, "intro"))
        .with_element(Element::rectangle("b").with(AttrName::Start, "expr: a.start"));
    let out = run_project(&p).unwrap();
    assert_eq!(
        out.element("b").unwrap().attr(AttrName::Start),
        Some(&AttrValue::Text("intro".to_owned()))
    );
}

#[test]
fn flattened_names_are_readable_directly() {
    let p = Project::new(100, "expr: video.width + video_width", 1);
    let out = run_project(&p).unwrap();
    assert_eq!(out.height, AttrValue::Number(200.0));
}
