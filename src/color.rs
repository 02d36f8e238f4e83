// PICO-8 quantization compares colors in HSL space. Hue is kept in degrees
// while saturation/lightness stay normalized to [0, 1]; the distance metric
// below mixes those units on purpose, since changing the scaling would change
// which palette index every pixel maps to.

pub type ColorRGB = [u8; 3];

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub hue: f64,        // degrees, [0, 360)
    pub saturation: f64, // [0, 1]
    pub lightness: f64,  // [0, 1]
}

impl Color {
    pub fn from_rgb(rgb: ColorRGB) -> Self {
        let [red, green, blue] = rgb;
        let r = red as f64 / 255.0;
        let g = green as f64 / 255.0;
        let b = blue as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;

        let (hue, saturation) = if max == min {
            // Achromatic (gray): hue is meaningless, pin it to 0.
            (0.0, 0.0)
        } else {
            let delta = max - min;
            let s = if lightness > 0.5 {
                delta / (2.0 - max - min)
            } else {
                delta / (max + min)
            };
            // Sector rule keyed on the dominant channel, in sixths of a turn.
            let mut h = if max == r {
                let mut h = (g - b) / delta;
                if g < b {
                    h += 6.0;
                }
                h
            } else if max == g {
                (b - r) / delta + 2.0
            } else {
                (r - g) / delta + 4.0
            };
            h = h / 6.0 * 360.0;
            (h, s)
        };

        Color {
            red,
            green,
            blue,
            hue,
            saturation,
            lightness,
        }
    }

    /// Euclidean distance in HSL space, with hue taken as the shorter arc
    /// around the circle. Lower values are closer.
    pub fn hsl_distance(&self, other: &Color) -> f64 {
        let mut dh = (self.hue - other.hue).abs();
        if dh > 180.0 {
            dh = 360.0 - dh;
        }
        let ds = self.saturation - other.saturation;
        let dl = self.lightness - other.lightness;
        (dh * dh + ds * ds + dl * dl).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_is_achromatic() {
        let c = Color::from_rgb([0, 0, 0]);
        assert_eq!(c.hue, 0.0);
        assert_eq!(c.saturation, 0.0);
        assert_eq!(c.lightness, 0.0);
    }

    #[test]
    fn white_has_full_lightness() {
        let c = Color::from_rgb([255, 255, 255]);
        assert_eq!(c.hue, 0.0);
        assert_eq!(c.saturation, 0.0);
        assert_eq!(c.lightness, 1.0);
    }

    #[test]
    fn primaries_land_on_expected_hues() {
        assert_eq!(Color::from_rgb([255, 0, 0]).hue, 0.0);
        assert_eq!(Color::from_rgb([0, 255, 0]).hue, 120.0);
        assert_eq!(Color::from_rgb([0, 0, 255]).hue, 240.0);
    }

    #[test]
    fn components_stay_in_range() {
        // Sparse sweep of the RGB cube.
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let c = Color::from_rgb([r as u8, g as u8, b as u8]);
                    assert!((0.0..360.0).contains(&c.hue), "hue {} out of range", c.hue);
                    assert!((0.0..=1.0).contains(&c.saturation));
                    assert!((0.0..=1.0).contains(&c.lightness));
                }
            }
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Color::from_rgb([29, 43, 83]);
        let b = Color::from_rgb([255, 163, 0]);
        assert_eq!(a.hsl_distance(&b), b.hsl_distance(&a));
    }

    #[test]
    fn distance_to_self_is_zero() {
        let c = Color::from_rgb([126, 37, 83]);
        assert_eq!(c.hsl_distance(&c), 0.0);
    }

    #[test]
    fn hue_difference_wraps_around_the_circle() {
        let mut a = Color::from_rgb([255, 0, 0]);
        let mut b = Color::from_rgb([255, 0, 0]);
        a.hue = 1.0;
        b.hue = 359.0;
        assert_eq!(a.hsl_distance(&b), 2.0);
    }
}
