//! Reading and writing the parts of an unzipped IDML package that hold
//! swatches and paragraph styles.

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
};

use xml::{
    attribute::Attribute,
    name::Name,
    reader::{EventReader, XmlEvent},
    writer::{EmitterConfig, EventWriter, XmlEvent as WriterEvent},
};

use crate::peekaboo::{blink, Boo};
use crate::styles::{StyleRecord, StyleSheet, Swatch};
use crate::tag::{display_name, normalize, style_key, InputError, RawStyle, Tag};
use crate::Error;

pub const GRAPHIC: &str = "Resources/Graphic.xml";
pub const STYLES: &str = "Resources/Styles.xml";

/// An unzipped `.idml` document.
#[derive(Debug)]
pub struct Package {
    root: PathBuf,
    pub styles: StyleSheet,
}

impl Package {
    pub fn open(root: impl AsRef<Path>) -> Result<Package, Error> {
        let root = root.as_ref().to_path_buf();
        let graphic = root.join(GRAPHIC);
        let styles = root.join(STYLES);
        if !graphic.is_file() || !styles.is_file() {
            return Err(Error::NoDocument(root));
        }

        log::debug!("Reading {:?}", &graphic);
        let mut parser = EventReader::new(BufReader::new(File::open(&graphic)?));
        let swatches = swatches(&mut parser)?;
        log::info!("Found {} swatches", swatches.len());

        log::debug!("Reading {:?}", &styles);
        let mut parser = EventReader::new(BufReader::new(File::open(&styles)?));
        let styles = paragraph_styles(&mut parser, &swatches)?;

        Ok(Package { root, styles })
    }

    /// Writes the changed tints back into `Styles.xml`.
    ///
    /// The new file is written next to the old one and renamed over it, so
    /// a failure leaves the document untouched.
    pub fn save(&self) -> Result<usize, Error> {
        let tints: HashMap<&str, f64> = self
            .styles
            .changed()
            .iter()
            .filter_map(|name| {
                let tint = self.styles.record(name)?.underline_tint?;
                Some((name.as_str(), tint))
            })
            .collect();
        if tints.is_empty() {
            log::info!("Nothing to save");
            return Ok(0);
        }

        let path = self.root.join(STYLES);
        let temp = path.with_extension("xml.tmp");
        log::debug!("Writing {:?}", &temp);
        match write_styles(&path, &temp, &tints) {
            Ok(count) => {
                fs::rename(&temp, &path)?;
                log::info!("Updated {count} paragraph styles in {:?}", &path);
                Ok(count)
            }
            Err(e) => {
                if let Err(cleanup) = fs::remove_file(&temp) {
                    log::warn!("Could not remove {:?}: {cleanup}", &temp);
                }
                Err(e)
            }
        }
    }
}

fn write_styles(path: &Path, temp: &Path, tints: &HashMap<&str, f64>) -> Result<usize, Error> {
    let mut parser = EventReader::new(BufReader::new(File::open(path)?));
    let mut writer = EmitterConfig::new()
        .perform_indent(false)
        .create_writer(BufWriter::new(File::create(temp)?));
    let count = rewrite_tints(&mut parser, &mut writer, tints)?;
    writer.into_inner().flush()?;
    Ok(count)
}

/// Every color-like element of `Graphic.xml`, keyed by `Self`.
pub fn swatches<R: Read>(parser: &mut EventReader<R>) -> Result<HashMap<String, Swatch>, Error> {
    let mut swatches = HashMap::new();
    loop {
        match parser.next() {
            Ok(XmlEvent::StartElement {
                name, attributes, ..
            }) => match Tag::try_from((&name, &attributes))? {
                Tag::Color { id, swatch } => {
                    swatches.insert(id, swatch);
                }
                Tag::Swatch { id } => {
                    swatches.insert(id, Swatch::Other);
                }
                _ => continue,
            },
            Ok(XmlEvent::EndDocument) => break,
            Ok(_) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(swatches)
}

/// `<ParagraphStyle><Properties><BasedOn>text`
fn based_on(boo: &Boo<Tag>) -> Option<&String> {
    boo.reset();
    let content = boo.peek()?.content()?;
    blink(matches!(boo.peek()?, Tag::BasedOn))?;
    blink(matches!(boo.peek()?, Tag::Properties))?;
    blink(matches!(boo.peek()?, Tag::ParagraphStyle(_)))?;
    Some(content)
}

/// Every `<ParagraphStyle>` of `Styles.xml`, in document order.
pub fn paragraph_styles<R: Read>(
    parser: &mut EventReader<R>,
    swatches: &HashMap<String, Swatch>,
) -> Result<StyleSheet, Error> {
    let mut stack = Boo::<Tag>::default();
    let mut raw: Vec<(RawStyle, Option<String>)> = vec![];
    loop {
        match parser.next() {
            Ok(XmlEvent::StartElement {
                name, attributes, ..
            }) => {
                let tag = Tag::try_from((&name, &attributes))?;
                if let Tag::ParagraphStyle(style) = &tag {
                    log::debug!("ParagraphStyle {:?}", style.name);
                    raw.push((style.clone(), None));
                }
                stack.push(tag);
            }
            Ok(XmlEvent::EndElement { .. }) => {
                stack.pop();
            }
            Ok(XmlEvent::Characters(content)) => {
                stack.push(Tag::Content(content));
                if let (Some(parent), Some((_, slot))) = (based_on(&stack), raw.last_mut()) {
                    *slot = Some(parent.clone());
                }
                stack.pop();
            }
            Ok(XmlEvent::EndDocument) => break,
            Ok(_) => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let mut seen = HashSet::new();
    for (style, _) in &raw {
        if !seen.insert(style.name.as_str()) {
            return Err(InputError::DuplicateStyle(style.name.clone()).into());
        }
    }

    let names: HashMap<&str, &str> = raw
        .iter()
        .map(|(style, _)| (style.id.as_str(), style.name.as_str()))
        .collect();
    let color = |reference: &Option<String>| {
        reference.as_deref().map(|id| {
            swatches.get(id).cloned().unwrap_or_else(|| {
                log::warn!("Unknown swatch {id:?}");
                Swatch::Other
            })
        })
    };
    let records = raw
        .iter()
        .map(|(style, parent)| StyleRecord {
            name: style.name.clone(),
            underline: style.underline,
            fill_color: color(&style.fill_color),
            underline_color: color(&style.underline_color),
            underline_tint: style.underline_tint,
            based_on: parent.as_deref().map(|reference| parent_name(&names, reference)),
        })
        .collect::<Vec<_>>();
    log::info!("Found {} paragraph styles", records.len());
    Ok(StyleSheet::new(records))
}

/// `BasedOn` holds a `Self` reference, or a bare name for built-in styles.
/// References to missing styles keep their name so they read as dangling.
fn parent_name(names: &HashMap<&str, &str>, reference: &str) -> String {
    if let Some(name) = names.get(reference) {
        return name.to_string();
    }
    let bare = reference
        .strip_prefix("ParagraphStyle/")
        .unwrap_or(reference);
    display_name(bare).to_string()
}

/// Copies `Styles.xml` event by event, setting `UnderlineTint` on the
/// paragraph styles named in `tints`. Styles are matched by the same key
/// the reader gives them. Returns how many elements changed.
pub fn rewrite_tints<R: Read, W: Write>(
    parser: &mut EventReader<R>,
    writer: &mut EventWriter<W>,
    tints: &HashMap<&str, f64>,
) -> Result<usize, Error> {
    let mut count = 0;
    loop {
        let event = parser.next()?;
        match &event {
            XmlEvent::StartElement {
                name,
                attributes,
                namespace,
            } if normalize(name) == "ParagraphStyle" => {
                let attribute = |key: &str| {
                    attributes
                        .iter()
                        .find(|a| normalize(&a.name) == key)
                        .map(|a| a.value.as_str())
                };
                let tint = attribute("Self")
                    .zip(attribute("Name"))
                    .and_then(|(self_id, style_name)| {
                        tints.get(style_key(self_id, style_name).as_str())
                    });
                if let Some(tint) = tint {
                    let value = tint.to_string();
                    let mut found = false;
                    let mut atts: Vec<Attribute<'_>> = attributes
                        .iter()
                        .map(|a| {
                            if normalize(&a.name) == "UnderlineTint" {
                                found = true;
                                Attribute::new(a.name.borrow(), &value)
                            } else {
                                a.borrow()
                            }
                        })
                        .collect();
                    if !found {
                        atts.push(Attribute::new(Name::local("UnderlineTint"), &value));
                    }
                    writer.write(WriterEvent::StartElement {
                        name: name.borrow(),
                        attributes: Cow::Owned(atts),
                        namespace: Cow::Borrowed(namespace),
                    })?;
                    count += 1;
                    continue;
                }
            }
            XmlEvent::EndDocument => break,
            _ => {}
        }
        if let Some(event) = event.as_writer_event() {
            writer.write(event)?;
        }
    }
    Ok(count)
}
