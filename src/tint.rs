use crate::color::{cmyk_to_rgb, contrast_ratio, Cmyk};
use crate::Error;

/// Contrast an underline must reach against its text.
pub const DEFAULT_MIN_CONTRAST: f64 = 5.0;
/// Distance between two tried tints, in percentage points.
pub const DEFAULT_TINT_STEP: f64 = 1.0;
/// Lowest tint the search tries, in percent. Also the fallback.
pub const DEFAULT_MIN_TINT: f64 = 7.5;
/// Finest accepted step, in percentage points. Keeps the search under
/// ten thousand tries.
pub const MIN_TINT_STEP: f64 = 0.01;

/// Tunables of the tint search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    min_contrast: f64,
    tint_step: f64,
    min_tint: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_contrast: DEFAULT_MIN_CONTRAST,
            tint_step: DEFAULT_TINT_STEP,
            min_tint: DEFAULT_MIN_TINT,
        }
    }
}

impl Config {
    pub fn new(min_contrast: f64, tint_step: f64) -> Result<Config, Error> {
        Config::default()
            .with_min_contrast(min_contrast)?
            .with_tint_step(tint_step)
    }

    pub fn with_min_contrast(mut self, min_contrast: f64) -> Result<Config, Error> {
        if !min_contrast.is_finite() || min_contrast < 1.0 {
            return Err(Error::Config(format!(
                "minimum contrast must be a number of at least 1, got {min_contrast}"
            )));
        }
        self.min_contrast = min_contrast;
        Ok(self)
    }

    pub fn with_tint_step(mut self, tint_step: f64) -> Result<Config, Error> {
        if !tint_step.is_finite() || tint_step < MIN_TINT_STEP {
            return Err(Error::Config(format!(
                "tint step must be at least {MIN_TINT_STEP} percentage points, got {tint_step}"
            )));
        }
        self.tint_step = tint_step;
        Ok(self)
    }

    pub fn with_min_tint(mut self, min_tint: f64) -> Result<Config, Error> {
        if !(0.0..=100.0).contains(&min_tint) {
            return Err(Error::Config(format!(
                "minimum tint must be a percentage, got {min_tint}"
            )));
        }
        self.min_tint = min_tint;
        Ok(self)
    }

    pub fn min_contrast(&self) -> f64 {
        self.min_contrast
    }

    pub fn tint_step(&self) -> f64 {
        self.tint_step
    }

    pub fn min_tint(&self) -> f64 {
        self.min_tint
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintOutcome {
    pub initial_tint: f64,
    pub new_tint: f64,
    pub adjusted: bool,
}

/// Anything that is not a percentage counts as full strength.
pub fn effective_tint(tint: Option<f64>) -> f64 {
    match tint {
        Some(tint) if (0.0..=100.0).contains(&tint) => tint,
        _ => 100.0,
    }
}

/// Walks the underline tint down from `initial_tint` until the underline
/// contrasts enough with the text, or gives up at the configured floor.
///
/// The first (highest) passing tint wins and is returned as a whole percent.
/// When nothing passes the floor is returned as is. `adjusted` compares the
/// returned tint with the initial one on both paths, so a search that starts
/// at the floor and fails reports no adjustment.
pub fn find_minimum_passing_tint(
    text: Cmyk,
    underline: Cmyk,
    initial_tint: Option<f64>,
    config: &Config,
) -> TintOutcome {
    let initial_tint = effective_tint(initial_tint);
    let text_rgb = cmyk_to_rgb(text);

    // Both ends are percentages and the step is bounded below, so this is
    // a small whole number.
    let steps = ((initial_tint - config.min_tint) / config.tint_step).floor();
    let tries = if steps >= 0.0 { steps as u32 + 1 } else { 0 };
    for i in 0..tries {
        let tint = (initial_tint - f64::from(i) * config.tint_step) / 100.0;
        let underline_rgb = cmyk_to_rgb(underline.tinted(tint));
        let ratio = contrast_ratio(text_rgb, underline_rgb);
        log::debug!("Tint {:.2} gives contrast {ratio:.3}", tint * 100.0);
        if ratio >= config.min_contrast {
            let new_tint = (tint * 100.0).round();
            return TintOutcome {
                initial_tint,
                new_tint,
                adjusted: new_tint != initial_tint,
            };
        }
    }

    log::debug!(
        "No tint reaches {}:1, falling back to {}%",
        config.min_contrast,
        config.min_tint
    );
    let new_tint = config.min_tint;
    TintOutcome {
        initial_tint,
        new_tint,
        adjusted: new_tint != initial_tint,
    }
}
