use std::fmt;

use xml::{attribute::OwnedAttribute, name::OwnedName};

use crate::color::Cmyk;
use crate::styles::Swatch;

/// IDML elements the contrast fix cares about.
#[derive(Debug)]
pub enum Tag {
    /// `<Color>`, already classified.
    Color { id: String, swatch: Swatch },
    /// `<Swatch>`, `<Tint>`, `<MixedInk>`, `<MixedInkGroup>`, `<Gradient>`:
    /// usable as a color reference but never as process inks.
    Swatch { id: String },
    ParagraphStyle(RawStyle),
    Properties,
    BasedOn,
    Content(String),
    Unknown { id: String },
}

/// A `<ParagraphStyle>` as written, color references unresolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawStyle {
    pub id: String,
    pub name: String,
    pub underline: Option<bool>,
    pub fill_color: Option<String>,
    pub underline_color: Option<String>,
    pub underline_tint: Option<f64>,
}

impl Tag {
    pub fn content(&self) -> Option<&String> {
        if let Tag::Content(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl TryFrom<(&OwnedName, &Vec<OwnedAttribute>)> for Tag {
    type Error = InputError;

    fn try_from(value: (&OwnedName, &Vec<OwnedAttribute>)) -> Result<Self, Self::Error> {
        let (name, atts) = value;
        let id = normalize(name);
        let attribute = |key: &str| {
            atts.iter()
                .find(|&a| normalize(&a.name) == key)
                .map(|a| a.value.as_str())
        };
        let tag = match id.as_str() {
            "Color" => {
                let Some(self_id) = attribute("Self") else {
                    return Err(InputError::MissingAttributes {
                        id,
                        missing: vec!["Self"],
                    });
                };
                let swatch = classify_color(
                    self_id,
                    attribute("Model"),
                    attribute("Space"),
                    attribute("ColorValue"),
                );
                Tag::Color {
                    id: self_id.to_string(),
                    swatch,
                }
            }
            "Swatch" | "Tint" | "MixedInk" | "MixedInkGroup" | "Gradient" => {
                let Some(self_id) = attribute("Self") else {
                    return Err(InputError::MissingAttributes {
                        id,
                        missing: vec!["Self"],
                    });
                };
                Tag::Swatch {
                    id: self_id.to_string(),
                }
            }
            "ParagraphStyle" => {
                let (Some(self_id), Some(style_name)) = (attribute("Self"), attribute("Name"))
                else {
                    let missing = ["Self", "Name"]
                        .into_iter()
                        .filter(|key| attribute(*key).is_none())
                        .collect();
                    return Err(InputError::MissingAttributes { id, missing });
                };
                Tag::ParagraphStyle(RawStyle {
                    id: self_id.to_string(),
                    name: style_key(self_id, style_name),
                    underline: attribute("Underline").and_then(|v| parse_bool(style_name, v)),
                    fill_color: attribute("FillColor").map(str::to_string),
                    underline_color: attribute("UnderlineColor").map(str::to_string),
                    underline_tint: attribute("UnderlineTint")
                        .and_then(|v| parse_tint(style_name, v)),
                })
            }
            "Properties" => Tag::Properties,
            "BasedOn" => Tag::BasedOn,
            _ => Tag::Unknown { id },
        };
        Ok(tag)
    }
}

fn classify_color(
    id: &str,
    model: Option<&str>,
    space: Option<&str>,
    value: Option<&str>,
) -> Swatch {
    if model != Some("Process") || space != Some("CMYK") {
        log::debug!("{id:?} is not a process CMYK color");
        return Swatch::Other;
    }
    let inks: Vec<f64> = value
        .unwrap_or_default()
        .split_whitespace()
        .filter_map(|v| v.parse().ok())
        .collect();
    match inks[..] {
        [c, m, y, k] => Swatch::Process(Cmyk::new(c, m, y, k)),
        _ => {
            log::warn!("{id:?} has an unreadable ColorValue {value:?}");
            Swatch::Other
        }
    }
}

fn parse_bool(style: &str, value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            log::warn!("{style:?} has an unreadable Underline {value:?}");
            None
        }
    }
}

/// Anything that is not a percentage counts as unset.
fn parse_tint(style: &str, value: &str) -> Option<f64> {
    match value.parse::<f64>() {
        Ok(tint) if (0.0..=100.0).contains(&tint) => Some(tint),
        _ => {
            log::debug!("{style:?} has no usable UnderlineTint ({value:?})");
            None
        }
    }
}

/// IDML prefixes built-in names with `$ID/`.
pub fn display_name(raw: &str) -> &str {
    raw.strip_prefix("$ID/").unwrap_or(raw)
}

/// Unique name of a paragraph style. `Name` only holds the last segment of
/// a grouped style, so the key comes from `Self`, where groups are joined
/// by an escaped colon (`ParagraphStyle/Notes%3aNote` is `Notes:Note`).
pub fn style_key(self_id: &str, name: &str) -> String {
    match self_id.strip_prefix("ParagraphStyle/") {
        Some(path) => display_name(&path.replace("%3a", ":")).to_string(),
        None => display_name(name).to_string(),
    }
}

#[derive(Debug)]
pub enum InputError {
    MissingAttributes {
        id: String,
        missing: Vec<&'static str>,
    },
    DuplicateStyle(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::MissingAttributes { id, missing } => {
                write!(f, "<{id}> is missing attributes {missing:?}")
            }
            InputError::DuplicateStyle(name) => {
                write!(f, "paragraph style {name:?} is defined more than once")
            }
        }
    }
}

impl std::error::Error for InputError {}

pub fn normalize(raw: &OwnedName) -> String {
    let mut id = if let Some(prefix) = raw.prefix_ref() {
        prefix.to_string() + ":"
    } else {
        "".to_string()
    };
    id.push_str(&raw.local_name);
    id
}
