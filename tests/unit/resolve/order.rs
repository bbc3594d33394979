use super::*;
use crate::foundation::ids::AttrName;
use crate::resolve::graph::build;
use crate::scene::model::{Element, Project};

fn ids(graph: &DependencyGraph, order: &[usize]) -> Vec<String> {
    order.iter().map(|&i| graph.node(i).to_string()).collect()
}

#[test]
fn static_graph_keeps_base_order() {
    let (g, _) = build(&Project::new(1, 2, 3));
    let order = topo_order(&g).unwrap();
    assert_eq!(order, vec![0, 1, 2]);
}

#[test]
fn dependencies_come_first_and_ties_follow_base_order() {
    let p = Project::new("expr: video.height * 2", 540, "expr: b.end")
        .with_element(Element::rectangle("b").with(AttrName::Start, 0).with(AttrName::End, 4));
    let (g, _) = build(&p);
    let order = topo_order(&g).unwrap();
    let names = ids(&g, &order);

    // video.height (1) is ready before video.width (0) becomes ready.
    assert_eq!(names[0], "video.height");
    assert_eq!(names[1], "video.width");
    let end = names.iter().position(|n| n == "b.end").unwrap();
    let duration = names.iter().position(|n| n == "video.duration").unwrap();
    assert_eq!(duration, end + 1);
    assert_eq!(order.len(), g.len());
}

#[test]
fn two_node_cycle_is_reported_in_dependency_direction() {
    let p = Project::new(1, 1, 1)
        .with_element(Element::rectangle("A").with(AttrName::Start, "expr: B.start"))
        .with_element(Element::rectangle("B").with(AttrName::Start, "expr: A.start"));
    let (g, _) = build(&p);
    let Err(TimelineError::CircularDependency { cycle }) = topo_order(&g) else {
        panic!("expected a cycle");
    };
    let path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
    assert_eq!(path, vec!["A.start", "B.start", "A.start"]);
}

#[test]
fn cycle_path_skips_the_acyclic_prefix() {
    let p = Project::new(1, 1, 1)
        .with_element(Element::rectangle("a").with(AttrName::Start, "expr: b.start"))
        .with_element(
            Element::rectangle("b")
                .with(AttrName::Start, "expr: b.end")
                .with(AttrName::End, "expr: b.start"),
        );
    let (g, _) = build(&p);
    let Err(TimelineError::CircularDependency { cycle }) = topo_order(&g) else {
        panic!("expected a cycle");
    };
    let path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
    assert_eq!(path, vec!["b.start", "b.end", "b.start"]);
}

#[test]
fn self_loop_is_a_cycle() {
    let p = Project::new("expr: video.width", 1, 1);
    let (g, _) = build(&p);
    let err = topo_order(&g).unwrap_err();
    assert_eq!(
        err.to_string(),
        "circular dependency detected: video.width -> video.width"
    );
}

#[test]
fn order_is_reproducible() {
    let p = Project::new(1920, 1080, "expr: max(a.end, b.end)")
        .with_element(Element::rectangle("a").with(AttrName::End, "expr: b.end - 1"))
        .with_element(Element::rectangle("b").with(AttrName::End, 9));
    let (g1, _) = build(&p);
    let (g2, _) = build(&p);
    assert_eq!(topo_order(&g1).unwrap(), topo_order(&g2).unwrap());
}

#[test]
fn long_chains_do_not_recurse() {
    let mut p = Project::new(1, 1, 1);
    let n = 5_000;
    for i in 0..n {
        let start = format!("expr: e{}.start", (i + 1) % n);
        p = p.with_element(Element::rectangle(format!("e{i}")).with(AttrName::Start, start.as_str()));
    }
    let (g, _) = build(&p);
    let Err(TimelineError::CircularDependency { cycle }) = topo_order(&g) else {
        panic!("expected a cycle");
    };
    assert_eq!(cycle.len(), n + 1);
}
