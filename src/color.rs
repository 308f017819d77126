/// Ink coverage in percent, each channel nominally in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmyk {
    pub c: f64,
    pub m: f64,
    pub y: f64,
    pub k: f64,
}

/// Display color, each channel nominally in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Cmyk {
    pub fn new(c: f64, m: f64, y: f64, k: f64) -> Cmyk {
        Cmyk { c, m, y, k }
    }

    /// Scales every channel by `tint` (a fraction, `1.0` is full strength)
    /// and rounds each to a whole ink percentage.
    pub fn tinted(&self, tint: f64) -> Cmyk {
        Cmyk {
            c: (self.c * tint).round(),
            m: (self.m * tint).round(),
            y: (self.y * tint).round(),
            k: (self.k * tint).round(),
        }
    }
}

/// Naive conversion without any color profile.
/// Out of range inks are not validated.
pub fn cmyk_to_rgb(cmyk: Cmyk) -> Rgb {
    let c = cmyk.c / 100.0;
    let m = cmyk.m / 100.0;
    let y = cmyk.y / 100.0;
    let k = cmyk.k / 100.0;
    Rgb {
        r: 255.0 * (1.0 - c) * (1.0 - k),
        g: 255.0 * (1.0 - m) * (1.0 - k),
        b: 255.0 * (1.0 - y) * (1.0 - k),
    }
}

/// sRGB transfer function on a `[0, 255]` channel.
pub fn linearize(channel: f64) -> f64 {
    let v = channel / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

pub fn relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * linearize(rgb.r) + 0.7152 * linearize(rgb.g) + 0.0722 * linearize(rgb.b)
}

/// WCAG contrast ratio, in `[1, 21]` for in-gamut colors.
/// Argument order does not matter.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    (la.max(lb) + 0.05) / (la.min(lb) + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const WHITE: Rgb = Rgb { r: 255.0, g: 255.0, b: 255.0 };
    const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    #[rstest]
    #[case(Cmyk::new(0.0, 0.0, 0.0, 0.0), WHITE)]
    #[case(Cmyk::new(0.0, 0.0, 0.0, 100.0), BLACK)]
    #[case(Cmyk::new(100.0, 0.0, 0.0, 0.0), Rgb { r: 0.0, g: 255.0, b: 255.0 })]
    #[case(Cmyk::new(0.0, 0.0, 0.0, 50.0), Rgb { r: 127.5, g: 127.5, b: 127.5 })]
    fn converts_cmyk(#[case] cmyk: Cmyk, #[case] expected: Rgb) {
        assert_eq!(cmyk_to_rgb(cmyk), expected);
    }

    #[test]
    fn rgb_stays_in_gamut() {
        for c in (0..=100).step_by(10) {
            for m in (0..=100).step_by(20) {
                for y in (0..=100).step_by(25) {
                    for k in (0..=100).step_by(5) {
                        let rgb = cmyk_to_rgb(Cmyk::new(c as f64, m as f64, y as f64, k as f64));
                        for channel in [rgb.r, rgb.g, rgb.b] {
                            assert!((0.0..=255.0).contains(&channel), "{rgb:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn linearize_uses_both_branches() {
        assert_eq!(linearize(0.0), 0.0);
        assert!((linearize(10.0) - 10.0 / 255.0 / 12.92).abs() < 1e-12);
        assert!((linearize(255.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn black_on_white_is_21() {
        assert!((contrast_ratio(BLACK, WHITE) - 21.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(BLACK)]
    #[case(WHITE)]
    #[case(Rgb { r: 12.0, g: 200.0, b: 99.5 })]
    fn identical_colors_have_no_contrast(#[case] rgb: Rgb) {
        assert_eq!(contrast_ratio(rgb, rgb), 1.0);
    }

    #[rstest]
    #[case(BLACK, WHITE)]
    #[case(Rgb { r: 255.0, g: 0.0, b: 0.0 }, WHITE)]
    #[case(Rgb { r: 30.0, g: 41.0, b: 59.0 }, Rgb { r: 200.0, g: 180.0, b: 0.0 })]
    fn contrast_is_symmetric(#[case] a: Rgb, #[case] b: Rgb) {
        assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
    }

    #[test]
    fn tint_rounds_each_channel() {
        let tinted = Cmyk::new(15.0, 100.0, 33.0, 0.0).tinted(0.5);
        assert_eq!(tinted, Cmyk::new(8.0, 50.0, 17.0, 0.0));
    }
}
