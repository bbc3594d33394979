use super::*;
use crate::foundation::error::TimelineError;
use crate::foundation::ids::{AttrId, AttrName};
use crate::scene::model::{Element, Resolvable};
use crate::scene::value::AttrValue;

#[test]
fn resolve_validates_names_first() {
    let p = Project::new(1, 1, 1)
        .with_element(Element::rectangle("dup").with(AttrName::Start, 0))
        .with_element(Element::rectangle("dup").with(AttrName::Start, 1));
    assert!(matches!(resolve(&p), Err(TimelineError::Validation(_))));
}

#[test]
fn static_project_is_unchanged() {
    let p = Project::new(1280, 720, 5).with_element(
        Element::text("t", "hi")
            .with(AttrName::Start, 0)
            .with(AttrName::End, 5),
    );
    assert_eq!(resolve(&p).unwrap(), p);
}

#[test]
fn plan_lists_formula_dependencies_in_order() {
    let p = Project::new(1920, 1080, "expr: b.end")
        .with_element(Element::rectangle("a").with(AttrName::End, 5))
        .with_element(
            Element::rectangle("b")
                .with(AttrName::Start, "expr: a.end")
                .with(AttrName::End, "expr: self.start + 10"),
        );
    let plan = ResolutionPlan::build(&p).unwrap();
    assert_eq!(plan.order().len(), 3 + 24);

    let formulas: Vec<String> = plan.formulas().map(|s| s.id.to_string()).collect();
    assert_eq!(formulas, vec!["b.start", "b.end", "video.duration"]);

    let b_end = AttrId::element("b", AttrName::End);
    let step = plan.steps().iter().find(|s| s.id == b_end).unwrap();
    assert_eq!(step.deps, vec![AttrId::element("b", AttrName::Start)]);
    assert!(
        plan.position(&AttrId::element("a", AttrName::End)).unwrap()
            < plan.position(&AttrId::element("b", AttrName::Start)).unwrap()
    );
}

#[test]
fn plan_reports_cycles() {
    let p = Project::new("expr: video.height", "expr: video.width", 1);
    assert!(matches!(
        ResolutionPlan::build(&p),
        Err(TimelineError::CircularDependency { .. })
    ));
}

#[test]
fn resolved_project_has_no_formulas_left() {
    let p = Project::new(1920, 1080, "expr: 15.5 * 2").with_element(
        Element::rectangle("bar")
            .with(AttrName::Start, 0)
            .with(AttrName::Width, "expr: video.width / 4")
            .with(AttrName::X, "expr: video.width - self.width"),
    );
    let out = resolve(&p).unwrap();
    assert_eq!(out.duration, AttrValue::Number(31.0));
    let bar = out.element("bar").unwrap();
    for a in AttrName::ELEMENT {
        assert!(bar.attr(a).unwrap().as_formula().is_none());
    }
    assert_eq!(bar.attr(AttrName::X), Some(&AttrValue::Number(1440.0)));
}

#[test]
fn overflowing_arithmetic_fails_the_pass() {
    let p = Project::new(1, 1, "expr: 1e308 * 10 - 1e308 * 10");
    let err = resolve(&p).unwrap_err();
    let TimelineError::Resolver(msg) = &err else {
        panic!("expected resolver error, got {err:?}");
    };
    assert!(msg.contains("video.duration"));
    assert!(msg.contains("out of range"));
}

#[test]
fn overlong_formula_fails_the_pass() {
    let long = format!("expr: {}", vec!["video.width"; 5_000].join(" + "));
    let p = Project::new(1, 1, long.as_str());
    assert!(matches!(resolve(&p), Err(TimelineError::Resolver(_))));
}
