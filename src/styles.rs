use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::color::Cmyk;

/// Built-in parent of styles that are based on nothing.
pub const NO_PARAGRAPH_STYLE: &str = "[No Paragraph Style]";

pub fn is_no_style(name: &str) -> bool {
    name.eq_ignore_ascii_case(NO_PARAGRAPH_STYLE)
}

/// A color as the host stores it. Only process colors carry inks.
#[derive(Debug, Clone, PartialEq)]
pub enum Swatch {
    Process(Cmyk),
    /// Spot, mixed ink, tint, "None" or non CMYK colors.
    Other,
}

impl Swatch {
    pub fn cmyk(&self) -> Option<Cmyk> {
        if let Swatch::Process(cmyk) = self {
            Some(*cmyk)
        } else {
            None
        }
    }
}

/// Effective attributes of a paragraph style, inheritance applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphStyle {
    pub name: String,
    pub underline: bool,
    pub fill_color: Option<Swatch>,
    pub underline_color: Option<Swatch>,
    /// Percent. `None` reads as 100.
    pub underline_tint: Option<f64>,
    /// Name of the parent, which may not exist.
    pub based_on: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StyleError {
    UnknownStyle(String),
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::UnknownStyle(name) => write!(f, "no paragraph style named {name:?}"),
        }
    }
}

impl std::error::Error for StyleError {}

/// What the contrast fix needs from a document.
#[cfg_attr(test, unimock::unimock(api = StyleHostMock))]
pub trait StyleHost {
    /// Every paragraph style name, in document order.
    fn style_names(&self) -> Result<Vec<String>, StyleError>;

    /// `None` when the style does not exist, e.g. it was deleted.
    fn paragraph_style(&self, name: &str) -> Option<ParagraphStyle>;

    fn set_underline_tint(&mut self, name: &str, tint: f64) -> Result<(), StyleError>;
}

/// Runs a unit of work that is committed or discarded as a whole.
pub trait Transaction {
    fn execute<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>;
}

/// Follows `based_on` up to the style that actually owns the inherited
/// attributes.
///
/// The walk stops at a missing parent, at the "no style" sentinel, or right
/// before a name it has already visited, so cycles return the last style
/// before the repeat.
pub fn resolve_root<H: StyleHost + ?Sized>(
    host: &H,
    name: &str,
) -> Result<ParagraphStyle, StyleError> {
    let mut current = host
        .paragraph_style(name)
        .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))?;
    let mut visited = HashSet::from([current.name.clone()]);

    while let Some(parent_name) = current.based_on.clone() {
        if is_no_style(&parent_name) {
            break;
        }
        let Some(parent) = host.paragraph_style(&parent_name) else {
            log::warn!("{:?} is based on missing style {parent_name:?}", current.name);
            break;
        };
        if !visited.insert(parent.name.clone()) {
            log::warn!(
                "Inheritance cycle through {:?}, stopping at {:?}",
                parent.name,
                current.name
            );
            break;
        }
        current = parent;
    }
    Ok(current)
}

/// Locally set attributes of a style, as authored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleRecord {
    pub name: String,
    pub underline: Option<bool>,
    pub fill_color: Option<Swatch>,
    pub underline_color: Option<Swatch>,
    pub underline_tint: Option<f64>,
    pub based_on: Option<String>,
}

/// In-memory style repository. Unset attributes are inherited from the
/// `based_on` chain when read.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    records: Vec<StyleRecord>,
    index: HashMap<String, usize>,
    changed: Vec<String>,
}

impl StyleSheet {
    pub fn new(records: Vec<StyleRecord>) -> StyleSheet {
        let mut sheet = StyleSheet::default();
        for record in records {
            sheet.insert(record);
        }
        sheet
    }

    /// A record with an existing name replaces the old one in place.
    pub fn insert(&mut self, record: StyleRecord) {
        if let Some(&i) = self.index.get(&record.name) {
            log::warn!("Duplicate paragraph style {:?}", record.name);
            self.records[i] = record;
        } else {
            self.index.insert(record.name.clone(), self.records.len());
            self.records.push(record);
        }
    }

    pub fn record(&self, name: &str) -> Option<&StyleRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names whose tint was written, in write order.
    pub fn changed(&self) -> &[String] {
        &self.changed
    }

    /// The style followed by its ancestors, stopping at a missing parent or
    /// a repeat.
    fn lineage(&self, name: &str) -> Vec<&StyleRecord> {
        let mut lineage = vec![];
        let mut seen = HashSet::new();
        let mut next = self.record(name);
        while let Some(record) = next {
            if !seen.insert(record.name.as_str()) {
                break;
            }
            lineage.push(record);
            next = record.based_on.as_deref().and_then(|parent| self.record(parent));
        }
        lineage
    }
}

impl StyleHost for StyleSheet {
    fn style_names(&self) -> Result<Vec<String>, StyleError> {
        Ok(self.records.iter().map(|r| r.name.clone()).collect())
    }

    fn paragraph_style(&self, name: &str) -> Option<ParagraphStyle> {
        let lineage = self.lineage(name);
        let own = lineage.first()?;
        Some(ParagraphStyle {
            name: own.name.clone(),
            underline: lineage.iter().find_map(|r| r.underline).unwrap_or(false),
            fill_color: lineage.iter().find_map(|r| r.fill_color.clone()),
            underline_color: lineage.iter().find_map(|r| r.underline_color.clone()),
            underline_tint: lineage.iter().find_map(|r| r.underline_tint),
            based_on: own.based_on.clone(),
        })
    }

    fn set_underline_tint(&mut self, name: &str, tint: f64) -> Result<(), StyleError> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))?;
        self.records[i].underline_tint = Some(tint);
        if !self.changed.iter().any(|n| n == name) {
            self.changed.push(name.to_string());
        }
        Ok(())
    }
}

impl Transaction for StyleSheet {
    fn execute<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        let mut working = self.clone();
        let result = work(&mut working);
        if result.is_ok() {
            *self = working;
        } else {
            log::warn!("Rolling back style changes");
        }
        result
    }
}
