use super::*;
use crate::scene::model::Element;

fn project() -> Project {
    Project::new(1920, 1080, "expr: intro.end + 5")
        .with_element(
            Element::rectangle("intro")
                .with(AttrName::Start, 0)
                .with(AttrName::End, 5),
        )
        .with_element(
            Element::image("logo", "logo.png")
                .with(AttrName::Start, "expr: intro.end")
                .with(AttrName::X, "expr: video.width - self.width - ghost.x"),
        )
}

#[test]
fn scans_every_attribute_in_base_order() {
    let (g, _) = build(&project());
    assert_eq!(g.len(), 3 + 12 + 12 + 1);
    assert_eq!(g.node(0), &AttrId::video(AttrName::Width));
    assert_eq!(g.node(2), &AttrId::video(AttrName::Duration));
    assert_eq!(g.node(3), &AttrId::element("intro", AttrName::Start));
    assert_eq!(g.node(14), &AttrId::element("intro", AttrName::MaxWidth));
    assert_eq!(g.node(15), &AttrId::element("logo", AttrName::Start));
    assert_eq!(g.node(27), &AttrId::element("ghost", AttrName::X));
}

#[test]
fn static_values_are_seeded_including_nulls() {
    let (g, values) = build(&project());
    assert_eq!(
        values.get(&AttrId::element("intro", AttrName::End)),
        Some(&AttrValue::Number(5.0))
    );
    assert_eq!(
        values.get(&AttrId::element("logo", AttrName::Width)),
        Some(&AttrValue::Null)
    );
    assert!(!values.contains_key(&AttrId::video(AttrName::Duration)));
    assert!(!values.contains_key(&AttrId::element("ghost", AttrName::X)));
    assert_eq!(g.kind(0), &NodeKind::Static);
}

#[test]
fn formula_nodes_point_at_their_references() {
    let (g, _) = build(&project());
    let x = AttrId::element("logo", AttrName::X);
    assert_eq!(
        g.deps_of(&x),
        vec![
            AttrId::video(AttrName::Width),
            AttrId::element("logo", AttrName::Width),
            AttrId::element("ghost", AttrName::X),
        ]
    );
    assert_eq!(
        g.deps_of(&AttrId::video(AttrName::Duration)),
        vec![AttrId::element("intro", AttrName::End)]
    );
    let i = g.index_of(&x).unwrap();
    assert!(matches!(g.kind(i), NodeKind::Formula(f) if f.source().starts_with("video.width")));
}

#[test]
fn unknown_targets_become_unscanned_nodes() {
    let (g, _) = build(&project());
    let ghost = g.index_of(&AttrId::element("ghost", AttrName::X)).unwrap();
    let x = g.index_of(&AttrId::element("logo", AttrName::X)).unwrap();
    assert_eq!(g.kind(ghost), &NodeKind::Unscanned { referenced_by: x });
    assert!(g.deps(ghost).is_empty());
}

#[test]
fn repeated_references_make_one_edge() {
    let p = Project::new("expr: video.height + video.height", 1, 1);
    let (g, _) = build(&p);
    assert_eq!(g.deps(0), &[1]);
}

#[test]
fn self_reference_is_an_edge_to_itself() {
    let p = Project::new(1, 1, 1)
        .with_element(Element::rectangle("a").with(AttrName::Start, "expr: self.start"));
    let (g, _) = build(&p);
    assert_eq!(g.deps(3), &[3]);
}

#[test]
fn empty_project_has_only_global_nodes() {
    let (g, values) = build(&Project::new(1, 2, 3));
    assert_eq!(g.len(), 3);
    assert_eq!(values.len(), 3);
    assert!(g.nodes().iter().all(|n| n.owner == Owner::Video));
}
