use std::{fmt, path::PathBuf};

pub mod batch;
pub mod color;
pub mod idml;
pub mod peekaboo;
pub mod styles;
pub mod tag;
pub mod tint;

pub use batch::{fix_style, fix_underline_contrast, process, Adjustment, Report};
pub use color::{cmyk_to_rgb, contrast_ratio, relative_luminance, Cmyk, Rgb};
pub use idml::Package;
pub use styles::{resolve_root, ParagraphStyle, StyleError, StyleHost, StyleSheet, Swatch};
pub use tint::{find_minimum_passing_tint, Config, TintOutcome};

#[derive(Debug)]
pub enum Error {
    /// No document to work on.
    NoDocument(PathBuf),
    /// The document has no paragraph styles at all.
    NoStyles,
    Config(String),
    Io(std::io::Error),
    Xml(xml::reader::Error),
    Emit(xml::writer::Error),
    Input(tag::InputError),
    Style(StyleError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoDocument(path) => write!(
                f,
                "Please open a document first: no unzipped IDML package at {path:?}"
            ),
            Error::NoStyles => write!(f, "The document has no paragraph styles"),
            Error::Config(message) => write!(f, "Invalid configuration: {message}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Xml(e) => write!(f, "Malformed XML: {e}"),
            Error::Emit(e) => write!(f, "Could not write XML: {e}"),
            Error::Input(e) => write!(f, "Malformed IDML: {e}"),
            Error::Style(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Xml(e) => Some(e),
            Error::Emit(e) => Some(e),
            Error::Input(e) => Some(e),
            Error::Style(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<xml::reader::Error> for Error {
    fn from(value: xml::reader::Error) -> Self {
        Error::Xml(value)
    }
}

impl From<xml::writer::Error> for Error {
    fn from(value: xml::writer::Error) -> Self {
        Error::Emit(value)
    }
}

impl From<tag::InputError> for Error {
    fn from(value: tag::InputError) -> Self {
        Error::Input(value)
    }
}

impl From<StyleError> for Error {
    fn from(value: StyleError) -> Self {
        Error::Style(value)
    }
}
