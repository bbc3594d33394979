use super::*;

#[test]
fn self_token_maps_to_current_element() {
    let cur = Owner::Element("logo".to_owned());
    assert_eq!(Owner::from_token("self", &cur), Some(cur.clone()));
    assert_eq!(Owner::from_token("video", &cur), Some(Owner::Video));
    assert_eq!(
        Owner::from_token("intro", &cur),
        Some(Owner::Element("intro".to_owned()))
    );
}

#[test]
fn self_has_no_meaning_in_project_scope() {
    assert_eq!(Owner::from_token("self", &Owner::Video), None);
}

#[test]
fn attr_names_round_trip_through_text() {
    for a in AttrName::ELEMENT.iter().chain(AttrName::PROJECT.iter()) {
        assert_eq!(AttrName::parse(a.as_str()), Some(*a));
    }
    assert_eq!(AttrName::parse("volume"), None);
}

#[test]
fn duration_is_project_only() {
    assert!(AttrName::Duration.applies_to(&Owner::Video));
    assert!(!AttrName::Duration.applies_to(&Owner::Element("a".to_owned())));
    assert!(!AttrName::Start.applies_to(&Owner::Video));
    assert!(AttrName::MaxWidth.applies_to(&Owner::Element("a".to_owned())));
}

#[test]
fn known_attr_respects_owner_schema() {
    assert_eq!(
        AttrId::element("a", AttrName::X).known_attr(),
        Some(AttrName::X)
    );
    assert_eq!(AttrId::new(Owner::Video, "x").known_attr(), None);
    assert_eq!(
        AttrId::new(Owner::Element("a".to_owned()), "colour").known_attr(),
        None
    );
}

#[test]
fn display_and_flat_name() {
    let id = AttrId::element("logo", AttrName::MediaWidth);
    assert_eq!(id.to_string(), "logo.media_width");
    assert_eq!(id.flat_name(), "logo_media_width");
    assert_eq!(AttrId::video(AttrName::Width).to_string(), "video.width");
}

#[test]
fn ordering_puts_project_scope_first() {
    let mut ids = vec![
        AttrId::element("b", AttrName::Start),
        AttrId::video(AttrName::Height),
        AttrId::element("a", AttrName::End),
    ];
    ids.sort();
    assert_eq!(ids[0], AttrId::video(AttrName::Height));
    assert_eq!(ids[1], AttrId::element("a", AttrName::End));
}
