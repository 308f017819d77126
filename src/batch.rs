use std::collections::HashSet;
use std::fmt;

use crate::styles::{resolve_root, StyleError, StyleHost, Transaction};
use crate::tint::{find_minimum_passing_tint, Config, TintOutcome};
use crate::Error;

/// A tint that was changed on a style.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjustment {
    pub style_name: String,
    pub initial_tint: f64,
    pub new_tint: f64,
}

/// Result of a whole run, printed for the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub adjustments: Vec<Adjustment>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Underline Contrast Fix Complete")?;
        writeln!(f)?;
        if self.adjustments.is_empty() {
            writeln!(f, "No contrast adjustments were needed.")?;
            write!(
                f,
                "All underlined paragraph styles already meet the contrast threshold."
            )
        } else {
            writeln!(f, "Contrast Errors")?;
            for adjustment in &self.adjustments {
                writeln!(
                    f,
                    "Paragraph Style Name: {} Adjustment: {}% -> {}%",
                    adjustment.style_name, adjustment.initial_tint, adjustment.new_tint
                )?;
            }
            Ok(())
        }
    }
}

/// Fixes the underline tint of one style, in place.
///
/// Returns `None` for styles that are not underlined or whose text or
/// underline color is not a process CMYK color. The found tint is written
/// back even when it did not change.
pub fn fix_style<H: StyleHost + ?Sized>(
    host: &mut H,
    name: &str,
    config: &Config,
) -> Result<Option<TintOutcome>, StyleError> {
    let style = host
        .paragraph_style(name)
        .ok_or_else(|| StyleError::UnknownStyle(name.to_string()))?;
    if !style.underline {
        return Ok(None);
    }
    let (Some(fill), Some(underline)) = (&style.fill_color, &style.underline_color) else {
        log::debug!("{name:?} has no text or underline color");
        return Ok(None);
    };
    let (Some(text), Some(underline)) = (fill.cmyk(), underline.cmyk()) else {
        log::debug!("{name:?} does not use process CMYK colors");
        return Ok(None);
    };

    let outcome = find_minimum_passing_tint(text, underline, style.underline_tint, config);
    host.set_underline_tint(name, outcome.new_tint)?;
    Ok(Some(outcome))
}

/// Fixes every underlined style, once per root style.
///
/// Adjustments come in the order their roots were first reached.
pub fn process<H: StyleHost + ?Sized>(
    host: &mut H,
    config: &Config,
) -> Result<Vec<Adjustment>, StyleError> {
    let mut adjustments = vec![];
    let mut processed_roots = HashSet::new();

    for name in host.style_names()? {
        if name.starts_with('[') {
            continue;
        }
        let underlined = host.paragraph_style(&name).is_some_and(|s| s.underline);
        if !underlined {
            continue;
        }
        let root = resolve_root(&*host, &name)?;
        if !processed_roots.insert(root.name.clone()) {
            log::debug!("{name:?} shares root {:?}, already processed", root.name);
            continue;
        }
        log::info!("Checking {:?} (root of {name:?})", root.name);
        if let Some(outcome) = fix_style(host, &root.name, config)? {
            if outcome.adjusted {
                log::info!(
                    "{:?}: {}% -> {}%",
                    root.name,
                    outcome.initial_tint,
                    outcome.new_tint
                );
                adjustments.push(Adjustment {
                    style_name: root.name,
                    initial_tint: outcome.initial_tint,
                    new_tint: outcome.new_tint,
                });
            }
        }
    }
    Ok(adjustments)
}

/// Runs [`process`] as one transaction and builds the report.
///
/// A document without any style is refused before anything runs.
pub fn fix_underline_contrast<H>(host: &mut H, config: &Config) -> Result<Report, Error>
where
    H: StyleHost + Transaction,
{
    if host.style_names()?.is_empty() {
        return Err(Error::NoStyles);
    }
    let adjustments = host.execute(|host| process(host, config))?;
    Ok(Report { adjustments })
}
