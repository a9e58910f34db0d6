//! Style maps handed from components to the renderer.
//!
//! A [`Style`] maps property names to values and keeps insertion order, so a
//! renderer sees properties in the order they were declared. Overlaying one
//! style on another replaces values in place.

use std::fmt;

/// Maximum height of the box, in logical pixels.
pub const MAX_HEIGHT: &str = "max_height";
pub const HEIGHT: &str = "height";
pub const OVERFLOW_Y: &str = "overflow_y";
pub const OPACITY: &str = "opacity";

/// A single style value
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Logical pixels
    Px(f32),
    /// Unitless number (opacity, flex factors)
    Number(f32),
    /// Keyword or raw value (`auto`, `hidden`, `100%`)
    Keyword(String),
}

impl StyleValue {
    pub fn as_px(&self) -> Option<f32> {
        match self {
            StyleValue::Px(px) => Some(*px),
            _ => None,
        }
    }
}

impl From<f32> for StyleValue {
    fn from(px: f32) -> Self {
        StyleValue::Px(px)
    }
}

impl From<&str> for StyleValue {
    fn from(keyword: &str) -> Self {
        StyleValue::Keyword(keyword.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(keyword: String) -> Self {
        StyleValue::Keyword(keyword)
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Px(px) => write!(f, "{px}px"),
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Keyword(k) => f.write_str(k),
        }
    }
}

/// An ordered map of style properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    entries: Vec<(String, StyleValue)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Style::insert`]
    pub fn set(mut self, property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Insert a property, replacing an existing value in place.
    /// Returns the previous value.
    pub fn insert(
        &mut self,
        property: impl Into<String>,
        value: impl Into<StyleValue>,
    ) -> Option<StyleValue> {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == property) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((property, value));
                None
            }
        }
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, property: &str) -> Option<StyleValue> {
        let index = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Overlay `other` onto this style; values from `other` win on collision.
    pub fn extend(&mut self, other: &Style) {
        for (name, value) in &other.entries {
            self.insert(name.clone(), value.clone());
        }
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for Style {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut style = Style::new();
        for (property, value) in iter {
            style.insert(property, value);
        }
        style
    }
}

/// Merge partial styles into one; later styles override earlier ones.
pub fn merge_styles<'a>(styles: impl IntoIterator<Item = &'a Style>) -> Style {
    let mut merged = Style::new();
    for style in styles {
        merged.extend(style);
    }
    merged
}
