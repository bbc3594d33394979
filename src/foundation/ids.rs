use std::fmt;

/// Owner token for the project's global scope.
pub const VIDEO_OWNER: &str = "video";
/// Owner token standing for "the element that owns this formula".
pub const SELF_OWNER: &str = "self";

/// Scope an attribute belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Owner {
    /// The project itself (`video.*`).
    Video,
    /// A named element.
    Element(String),
}

impl Owner {
    /// Map a reference's owner token to an owner, substituting `self` with `current`.
    ///
    /// Returns `None` for `self` when there is no current owner.
    pub fn from_token(token: &str, current: &Owner) -> Option<Self> {
        match token {
            VIDEO_OWNER => Some(Self::Video),
            SELF_OWNER => match current {
                Self::Video => None,
                Self::Element(_) => Some(current.clone()),
            },
            name => Some(Self::Element(name.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Video => VIDEO_OWNER,
            Self::Element(name) => name,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute names that may carry a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrName {
    Start,
    End,
    X,
    Y,
    Width,
    Height,
    Opacity,
    Rotation,
    MediaDuration,
    MediaWidth,
    MediaHeight,
    MaxWidth,
    /// Project-only.
    Duration,
}

impl AttrName {
    /// Scan order for the project's global attributes.
    pub const PROJECT: [AttrName; 3] = [Self::Width, Self::Height, Self::Duration];

    /// Scan order for every element.
    pub const ELEMENT: [AttrName; 12] = [
        Self::Start,
        Self::End,
        Self::X,
        Self::Y,
        Self::Width,
        Self::Height,
        Self::Opacity,
        Self::Rotation,
        Self::MediaDuration,
        Self::MediaWidth,
        Self::MediaHeight,
        Self::MaxWidth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Opacity => "opacity",
            Self::Rotation => "rotation",
            Self::MediaDuration => "media_duration",
            Self::MediaWidth => "media_width",
            Self::MediaHeight => "media_height",
            Self::MaxWidth => "max_width",
            Self::Duration => "duration",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let name = match s {
            "start" => Self::Start,
            "end" => Self::End,
            "x" => Self::X,
            "y" => Self::Y,
            "width" => Self::Width,
            "height" => Self::Height,
            "opacity" => Self::Opacity,
            "rotation" => Self::Rotation,
            "media_duration" => Self::MediaDuration,
            "media_width" => Self::MediaWidth,
            "media_height" => Self::MediaHeight,
            "max_width" => Self::MaxWidth,
            "duration" => Self::Duration,
            _ => return None,
        };
        Some(name)
    }

    /// Whether `owner` carries this attribute at all.
    pub fn applies_to(self, owner: &Owner) -> bool {
        match owner {
            Owner::Video => Self::PROJECT.contains(&self),
            Owner::Element(_) => Self::ELEMENT.contains(&self),
        }
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(owner, attribute)` key of a single resolvable value; the dependency graph's node key.
///
/// The attribute is kept as text so that references to names outside the scan list still get a
/// node (and a precise error) instead of vanishing from the graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttrId {
    pub owner: Owner,
    pub attr: String,
}

impl AttrId {
    pub fn new(owner: Owner, attr: impl Into<String>) -> Self {
        Self {
            owner,
            attr: attr.into(),
        }
    }

    pub fn video(attr: AttrName) -> Self {
        Self::new(Owner::Video, attr.as_str())
    }

    pub fn element(name: impl Into<String>, attr: AttrName) -> Self {
        Self::new(Owner::Element(name.into()), attr.as_str())
    }

    /// The attribute as a schema name, if it is one `owner` actually carries.
    pub fn known_attr(&self) -> Option<AttrName> {
        AttrName::parse(&self.attr).filter(|a| a.applies_to(&self.owner))
    }

    /// Identifier-safe binding name: `owner_attr`.
    pub fn flat_name(&self) -> String {
        format!("{}_{}", self.owner.as_str(), self.attr)
    }
}

impl fmt::Display for AttrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.attr)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
