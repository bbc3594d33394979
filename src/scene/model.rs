use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{TimelineError, TimelineResult};
use crate::foundation::ids::{AttrName, Owner, SELF_OWNER, VIDEO_OWNER};
use crate::scene::value::AttrValue;

/// Free-form styling/configuration map the resolver never looks into.
pub type ConfigMap = BTreeMap<String, serde_json::Value>;

/// Get/set access to an owner's resolvable attributes by name.
pub trait Resolvable {
    fn owner(&self) -> Owner;

    /// `None` when this owner does not carry `name`.
    fn attr(&self, name: AttrName) -> Option<&AttrValue>;

    fn attr_mut(&mut self, name: AttrName) -> Option<&mut AttrValue>;

    /// Overwrite `name`; returns `false` when this owner does not carry it.
    fn set_attr(&mut self, name: AttrName, value: AttrValue) -> bool {
        match self.attr_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// A composed video: global canvas attributes plus an ordered element list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "required")]
    pub width: AttrValue,
    #[serde(deserialize_with = "required")]
    pub height: AttrValue,
    #[serde(deserialize_with = "required")]
    pub duration: AttrValue,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub elements: Vec<Element>,
}

// A missing key is an error here, not an implicit null.
fn required<'de, D>(deserializer: D) -> Result<AttrValue, D::Error>
where
    D: serde::Deserializer<'de>,
{
    AttrValue::deserialize(deserializer)
}

fn default_background() -> String {
    "#000000".to_owned()
}

impl Project {
    pub fn new(
        width: impl Into<AttrValue>,
        height: impl Into<AttrValue>,
        duration: impl Into<AttrValue>,
    ) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
            duration: duration.into(),
            background_color: default_background(),
            elements: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn element(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    /// Element names must be non-empty, unique, and distinct from the reserved owner tokens.
    pub fn validate(&self) -> TimelineResult<()> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for (i, el) in self.elements.iter().enumerate() {
            let name = el.name();
            if name.trim().is_empty() {
                return Err(TimelineError::validation(format!(
                    "element #{i} ({}) has an empty name",
                    el.kind().as_str()
                )));
            }
            if name == VIDEO_OWNER || name == SELF_OWNER {
                return Err(TimelineError::validation(format!(
                    "element name '{name}' is reserved"
                )));
            }
            if !seen.insert(name) {
                return Err(TimelineError::validation(format!(
                    "duplicate element name '{name}'"
                )));
            }
        }
        Ok(())
    }
}

impl Resolvable for Project {
    fn owner(&self) -> Owner {
        Owner::Video
    }

    fn attr(&self, name: AttrName) -> Option<&AttrValue> {
        match name {
            AttrName::Width => Some(&self.width),
            AttrName::Height => Some(&self.height),
            AttrName::Duration => Some(&self.duration),
            _ => None,
        }
    }

    fn attr_mut(&mut self, name: AttrName) -> Option<&mut AttrValue> {
        match name {
            AttrName::Width => Some(&mut self.width),
            AttrName::Height => Some(&mut self.height),
            AttrName::Duration => Some(&mut self.duration),
            _ => None,
        }
    }
}

fn zero() -> AttrValue {
    AttrValue::Number(0.0)
}

fn one() -> AttrValue {
    AttrValue::Number(1.0)
}

/// Attributes every element kind shares, including all formula-capable ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(deserialize_with = "required")]
    pub start: AttrValue,
    #[serde(default)]
    pub end: AttrValue,
    #[serde(default = "zero")]
    pub x: AttrValue,
    #[serde(default = "zero")]
    pub y: AttrValue,
    #[serde(default)]
    pub width: AttrValue,
    #[serde(default)]
    pub height: AttrValue,
    #[serde(default = "one")]
    pub opacity: AttrValue,
    #[serde(default = "zero")]
    pub rotation: AttrValue,
    #[serde(default)]
    pub media_duration: AttrValue,
    #[serde(default)]
    pub media_width: AttrValue,
    #[serde(default)]
    pub media_height: AttrValue,
    #[serde(default)]
    pub max_width: AttrValue,
    #[serde(default)]
    pub filters: Vec<FilterDef>,
}

impl Layer {
    /// A layer with document defaults and no `start`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: AttrValue::Null,
            end: AttrValue::Null,
            x: zero(),
            y: zero(),
            width: AttrValue::Null,
            height: AttrValue::Null,
            opacity: one(),
            rotation: zero(),
            media_duration: AttrValue::Null,
            media_width: AttrValue::Null,
            media_height: AttrValue::Null,
            max_width: AttrValue::Null,
            filters: Vec::new(),
        }
    }
}

impl Resolvable for Layer {
    fn owner(&self) -> Owner {
        Owner::Element(self.name.clone())
    }

    fn attr(&self, name: AttrName) -> Option<&AttrValue> {
        Some(match name {
            AttrName::Start => &self.start,
            AttrName::End => &self.end,
            AttrName::X => &self.x,
            AttrName::Y => &self.y,
            AttrName::Width => &self.width,
            AttrName::Height => &self.height,
            AttrName::Opacity => &self.opacity,
            AttrName::Rotation => &self.rotation,
            AttrName::MediaDuration => &self.media_duration,
            AttrName::MediaWidth => &self.media_width,
            AttrName::MediaHeight => &self.media_height,
            AttrName::MaxWidth => &self.max_width,
            AttrName::Duration => return None,
        })
    }

    fn attr_mut(&mut self, name: AttrName) -> Option<&mut AttrValue> {
        Some(match name {
            AttrName::Start => &mut self.start,
            AttrName::End => &mut self.end,
            AttrName::X => &mut self.x,
            AttrName::Y => &mut self.y,
            AttrName::Width => &mut self.width,
            AttrName::Height => &mut self.height,
            AttrName::Opacity => &mut self.opacity,
            AttrName::Rotation => &mut self.rotation,
            AttrName::MediaDuration => &mut self.media_duration,
            AttrName::MediaWidth => &mut self.media_width,
            AttrName::MediaHeight => &mut self.media_height,
            AttrName::MaxWidth => &mut self.max_width,
            AttrName::Duration => return None,
        })
    }
}

/// A filter entry: `{ type: fade, duration: 1.0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub params: ConfigMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Image,
    Video,
    Audio,
    Rectangle,
    Text,
    Subtitles,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Rectangle => "rectangle",
            Self::Text => "text",
            Self::Subtitles => "subtitles",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Image(ImageElement),
    Video(VideoElement),
    Audio(AudioElement),
    Rectangle(RectangleElement),
    Text(TextElement),
    Subtitles(SubtitlesElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(flatten)]
    pub layer: Layer,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoElement {
    #[serde(flatten)]
    pub layer: Layer,
    pub path: String,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default, rename = "loop")]
    pub looped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioElement {
    #[serde(flatten)]
    pub layer: Layer,
    pub path: String,
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default, rename = "loop")]
    pub looped: bool,
}

fn default_volume() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RectangleElement {
    #[serde(flatten)]
    pub layer: Layer,
    #[serde(default = "default_rect_color")]
    pub color: String,
    #[serde(default)]
    pub corner_radius: f64,
}

fn default_rect_color() -> String {
    "#FFFFFF".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(flatten)]
    pub layer: Layer,
    pub text: String,
    #[serde(default)]
    pub font: ConfigMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitlesElement {
    #[serde(flatten)]
    pub layer: Layer,
    /// Transcript JSON, not a media file.
    pub path: String,
    #[serde(default)]
    pub font: ConfigMap,
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default = "default_margin_v")]
    pub margin_v: f64,
    #[serde(default = "default_max_lines")]
    pub max_lines: u32,
    #[serde(default = "default_max_words")]
    pub max_words: u32,
    #[serde(default = "default_line_spacing")]
    pub line_spacing_factor: f64,
    #[serde(default)]
    pub timing: ConfigMap,
    #[serde(default)]
    pub word_background: ConfigMap,
}

fn default_position() -> String {
    "bottom".to_owned()
}

fn default_margin_v() -> f64 {
    60.0
}

fn default_max_lines() -> u32 {
    2
}

fn default_max_words() -> u32 {
    8
}

fn default_line_spacing() -> f64 {
    1.0
}

impl Element {
    pub fn image(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Image(ImageElement {
            layer: Layer::new(name),
            path: path.into(),
        })
    }

    pub fn video(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Video(VideoElement {
            layer: Layer::new(name),
            path: path.into(),
            volume: default_volume(),
            looped: false,
        })
    }

    pub fn audio(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Audio(AudioElement {
            layer: Layer::new(name),
            path: path.into(),
            volume: default_volume(),
            looped: false,
        })
    }

    pub fn rectangle(name: impl Into<String>) -> Self {
        Self::Rectangle(RectangleElement {
            layer: Layer::new(name),
            color: default_rect_color(),
            corner_radius: 0.0,
        })
    }

    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text(TextElement {
            layer: Layer::new(name),
            text: text.into(),
            font: ConfigMap::new(),
        })
    }

    pub fn subtitles(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Subtitles(SubtitlesElement {
            layer: Layer::new(name),
            path: path.into(),
            font: ConfigMap::new(),
            position: default_position(),
            margin_v: default_margin_v(),
            max_lines: default_max_lines(),
            max_words: default_max_words(),
            line_spacing_factor: default_line_spacing(),
            timing: ConfigMap::new(),
            word_background: ConfigMap::new(),
        })
    }

    /// Builder-style attribute assignment. Strings carrying the formula marker become formulas.
    pub fn with(mut self, name: AttrName, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value.into());
        self
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Image(_) => ElementKind::Image,
            Self::Video(_) => ElementKind::Video,
            Self::Audio(_) => ElementKind::Audio,
            Self::Rectangle(_) => ElementKind::Rectangle,
            Self::Text(_) => ElementKind::Text,
            Self::Subtitles(_) => ElementKind::Subtitles,
        }
    }

    pub fn layer(&self) -> &Layer {
        match self {
            Self::Image(e) => &e.layer,
            Self::Video(e) => &e.layer,
            Self::Audio(e) => &e.layer,
            Self::Rectangle(e) => &e.layer,
            Self::Text(e) => &e.layer,
            Self::Subtitles(e) => &e.layer,
        }
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        match self {
            Self::Image(e) => &mut e.layer,
            Self::Video(e) => &mut e.layer,
            Self::Audio(e) => &mut e.layer,
            Self::Rectangle(e) => &mut e.layer,
            Self::Text(e) => &mut e.layer,
            Self::Subtitles(e) => &mut e.layer,
        }
    }

    pub fn name(&self) -> &str {
        &self.layer().name
    }

    /// Path of the external media file this element plays, if any.
    pub fn media_path(&self) -> Option<&str> {
        match self {
            Self::Image(e) => Some(&e.path),
            Self::Video(e) => Some(&e.path),
            Self::Audio(e) => Some(&e.path),
            Self::Rectangle(_) | Self::Text(_) | Self::Subtitles(_) => None,
        }
    }
}

impl Resolvable for Element {
    fn owner(&self) -> Owner {
        self.layer().owner()
    }

    fn attr(&self, name: AttrName) -> Option<&AttrValue> {
        self.layer().attr(name)
    }

    fn attr_mut(&mut self, name: AttrName) -> Option<&mut AttrValue> {
        self.layer_mut().attr_mut(name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
