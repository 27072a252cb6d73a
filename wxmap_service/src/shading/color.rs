/// Temperature-to-color mapping.
///
/// A temperature is normalized into a fraction of the snapshot's min-max
/// range and then placed on a fixed four-segment gradient:
///
/// ```text
/// 0.00        0.25        0.50        0.75        1.00
/// BLUE ─────► CYAN ─────► YELLOW ───► ORANGE ───► RED
/// (cold)                  (middle)                (hot)
/// ```
///
/// Everything here is cosmetic, so nothing fails: malformed input falls back
/// to the midpoint color and out-of-range temperatures are clamped.

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Color {
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    /// CSS orange, #FFA500.
    pub const ORANGE: Color = Color::rgb(1.0, 165.0 / 255.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    /// Fill for features that belong to no region.
    pub const TRANSPARENT: Color = Color {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
        alpha: 0.0,
    };

    pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Color {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Component-wise linear interpolation. Exact at `t == 0` and `t == 1`.
    pub fn lerp(start: Color, end: Color, t: f32) -> Color {
        let mix = |a: f32, b: f32| (1.0 - t) * a + t * b;
        Color {
            red: mix(start.red, end.red),
            green: mix(start.green, end.green),
            blue: mix(start.blue, end.blue),
            alpha: mix(start.alpha, end.alpha),
        }
    }

    /// CSS color string: `rgb(r,g,b)` when opaque, `rgba(r,g,b,a)` otherwise.
    pub fn to_css_string(&self) -> String {
        let (r, g, b) = (
            float_to_byte(self.red),
            float_to_byte(self.green),
            float_to_byte(self.blue),
        );
        if self.alpha >= 1.0 {
            format!("rgb({},{},{})", r, g, b)
        } else {
            format!("rgba({},{},{},{})", r, g, b, self.alpha)
        }
    }
}

fn float_to_byte(value: f32) -> u8 {
    if value >= 1.0 {
        255
    } else if value <= 0.0 || value.is_nan() {
        0
    } else {
        (value * 256.0) as u8
    }
}

// ---------------------------------------------------------------------------
// Gradient
// ---------------------------------------------------------------------------

/// Fraction of the range at which the gradient reads as its middle color.
pub const MIDPOINT_FRACTION: f64 = 0.5;

/// Segment start fraction, start color, end color.
const SEGMENTS: [(f64, Color, Color); 4] = [
    (0.0, Color::BLUE, Color::CYAN),
    (0.25, Color::CYAN, Color::YELLOW),
    (0.5, Color::YELLOW, Color::ORANGE),
    (0.75, Color::ORANGE, Color::RED),
];

/// Position of `temperature` within `[min, max]`, clamped to `[0, 1]`.
///
/// Returns the midpoint for a degenerate range (`min == max`) and for any
/// non-finite input.
pub fn fraction(temperature: f64, min: f64, max: f64) -> f64 {
    if !temperature.is_finite() || !min.is_finite() || !max.is_finite() || min == max {
        return MIDPOINT_FRACTION;
    }
    let f = (temperature - min) / (max - min);
    if f.is_finite() {
        f.clamp(0.0, 1.0)
    } else {
        MIDPOINT_FRACTION
    }
}

/// Gradient color at a fraction in `[0, 1]`. Each segment's upper boundary
/// is inclusive, so 0.25 is exactly CYAN, 0.5 YELLOW, 0.75 ORANGE.
pub fn gradient_at(fraction: f64) -> Color {
    let fraction = if fraction.is_nan() {
        MIDPOINT_FRACTION
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let (start, from, to) = SEGMENTS
        .iter()
        .copied()
        .find(|&(start, _, _)| fraction <= start + 0.25)
        .unwrap_or(SEGMENTS[3]);
    Color::lerp(from, to, ((fraction - start) * 4.0) as f32)
}

/// Opaque gradient color for a temperature in the given range.
pub fn color_for(temperature: f64, min: f64, max: f64) -> Color {
    gradient_at(fraction(temperature, min, max))
}

/// Same as [`color_for`] for a raw textual value from the data source.
/// Text that does not parse as a number yields the midpoint color.
pub fn color_for_text(raw: &str, min: f64, max: f64) -> Color {
    match raw.trim().parse::<f64>() {
        Ok(t) => color_for(t, min, max),
        Err(_) => gradient_at(MIDPOINT_FRACTION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Color, expected: Color) {
        let eps = 1e-6;
        assert!(
            (actual.red - expected.red).abs() < eps
                && (actual.green - expected.green).abs() < eps
                && (actual.blue - expected.blue).abs() < eps
                && (actual.alpha - expected.alpha).abs() < eps,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_range_endpoints_are_blue_and_red() {
        assert_eq!(color_for(0.0, 0.0, 20.0), Color::BLUE);
        assert_eq!(color_for(20.0, 0.0, 20.0), Color::RED);
    }

    #[test]
    fn test_exact_middle_is_yellow() {
        assert_eq!(color_for(10.0, 0.0, 20.0), Color::YELLOW);
    }

    #[test]
    fn test_degenerate_range_gives_midpoint_for_any_temperature() {
        for t in [-40.0, 0.0, 12.5, 99.0] {
            assert_eq!(color_for(t, 12.5, 12.5), Color::YELLOW);
        }
    }

    #[test]
    fn test_segment_boundaries_are_continuous() {
        // Approach each boundary from below and check it lands on the
        // shared color from both formulas.
        for (boundary, expected) in [(0.25, Color::CYAN), (0.5, Color::YELLOW), (0.75, Color::ORANGE)] {
            assert_eq!(gradient_at(boundary), expected);
            assert_close(gradient_at(boundary - 1e-9), expected);
            assert_close(gradient_at(boundary + 1e-9), expected);
        }
    }

    #[test]
    fn test_quarter_fraction_is_cyan() {
        assert_eq!(color_for(5.0, 0.0, 20.0), Color::CYAN);
    }

    #[test]
    fn test_interpolates_within_segment() {
        // fraction 0.125 is halfway from BLUE to CYAN.
        assert_close(gradient_at(0.125), Color::rgb(0.0, 0.5, 1.0));
        // fraction 0.875 is halfway from ORANGE to RED.
        assert_close(gradient_at(0.875), Color::rgb(1.0, 165.0 / 255.0 / 2.0, 0.0));
    }

    #[test]
    fn test_fraction_is_monotonic() {
        let (min, max) = (-5.0, 30.0);
        let mut previous = fraction(min, min, max);
        let mut t = min;
        while t <= max {
            let f = fraction(t, min, max);
            assert!(f >= previous, "fraction decreased at t={}", t);
            previous = f;
            t += 0.25;
        }
    }

    #[test]
    fn test_out_of_range_temperatures_are_clamped() {
        assert_eq!(fraction(-100.0, 0.0, 20.0), 0.0);
        assert_eq!(fraction(100.0, 0.0, 20.0), 1.0);
        assert_eq!(color_for(-100.0, 0.0, 20.0), Color::BLUE);
        assert_eq!(color_for(100.0, 0.0, 20.0), Color::RED);
    }

    #[test]
    fn test_non_finite_input_gives_midpoint() {
        assert_eq!(color_for(f64::NAN, 0.0, 20.0), Color::YELLOW);
        assert_eq!(color_for(10.0, f64::NAN, 20.0), Color::YELLOW);
        assert_eq!(color_for(10.0, 0.0, f64::INFINITY), Color::YELLOW);
        assert_eq!(gradient_at(f64::NAN), Color::YELLOW);
    }

    #[test]
    fn test_textual_temperatures() {
        assert_eq!(color_for_text("20", 0.0, 20.0), Color::RED);
        assert_eq!(color_for_text(" 0.0 ", 0.0, 20.0), Color::BLUE);
        assert_eq!(color_for_text("n/a", 0.0, 20.0), Color::YELLOW);
        assert_eq!(color_for_text("", 0.0, 20.0), Color::YELLOW);
    }

    #[test]
    fn test_colors_are_opaque() {
        for f in [0.0, 0.3, 0.6, 0.9, 1.0] {
            assert_eq!(gradient_at(f).alpha, 1.0);
        }
    }

    #[test]
    fn test_css_strings() {
        assert_eq!(Color::RED.to_css_string(), "rgb(255,0,0)");
        assert_eq!(Color::ORANGE.to_css_string(), "rgb(255,165,0)");
        assert_eq!(Color::TRANSPARENT.to_css_string(), "rgba(255,255,255,0)");
        assert_eq!(Color::BLUE.with_alpha(0.5).to_css_string(), "rgba(0,0,255,0.5)");
    }
}
