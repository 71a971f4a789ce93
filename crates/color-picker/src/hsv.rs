//! ARGB packing and HSV conversion
//!
//! Hue is in degrees `[0, 360)`, saturation and value in `[0, 1]`.

#[inline]
pub fn alpha(argb: u32) -> u8 {
    (argb >> 24) as u8
}

#[inline]
pub fn red(argb: u32) -> u8 {
    (argb >> 16) as u8
}

#[inline]
pub fn green(argb: u32) -> u8 {
    (argb >> 8) as u8
}

#[inline]
pub fn blue(argb: u32) -> u8 {
    argb as u8
}

#[inline]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    (a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Replace the alpha channel of `argb`
#[inline]
pub fn with_alpha(argb: u32, a: u8) -> u32 {
    (argb & 0x00FF_FFFF) | (a as u32) << 24
}

/// Split the RGB channels of `argb` into `[hue, saturation, value]`.
/// Alpha is ignored. Grays report hue 0.
pub fn argb_to_hsv(argb: u32) -> [f32; 3] {
    let r = red(argb) as f32 / 255.0;
    let g = green(argb) as f32 / 255.0;
    let b = blue(argb) as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = max;
    let saturation = if max > 0.0 { delta / max } else { 0.0 };
    if delta <= 0.0 {
        return [0.0, saturation, value];
    }

    let sector = if max == r {
        (g - b) / delta
    } else if max == g {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    let hue = (sector * 60.0).rem_euclid(360.0);
    [hue, saturation, value]
}

/// Opaque `0xFFRRGGBB` for the given hue, saturation and value
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> u32 {
    // rem_euclid can round tiny negatives up to exactly 360
    let hue = match hue.rem_euclid(360.0) {
        h if h >= 360.0 => 0.0,
        h => h,
    };
    let s = saturation.clamp(0.0, 1.0);
    let v = value.clamp(0.0, 1.0);

    let sector = hue / 60.0;
    let i = sector.floor();
    let f = sector - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    argb(0xFF, to_channel(r), to_channel(g), to_channel(b))
}

#[inline]
fn to_channel(unit: f32) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        let c = 0x80_40_20_10;
        assert_eq!((alpha(c), red(c), green(c), blue(c)), (0x80, 0x40, 0x20, 0x10));
        assert_eq!(argb(0x80, 0x40, 0x20, 0x10), c);
        assert_eq!(with_alpha(0xFF12_3456, 0x00), 0x0012_3456);
    }

    #[test]
    fn test_primaries() {
        assert_eq!(argb_to_hsv(0xFFFF_0000), [0.0, 1.0, 1.0]);
        assert_eq!(argb_to_hsv(0xFF00_FF00), [120.0, 1.0, 1.0]);
        assert_eq!(argb_to_hsv(0xFF00_00FF), [240.0, 1.0, 1.0]);
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), 0xFFFF_0000);
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), 0xFF00_FF00);
        assert_eq!(hsv_to_rgb(240.0, 1.0, 1.0), 0xFF00_00FF);
        assert_eq!(hsv_to_rgb(360.0, 1.0, 1.0), 0xFFFF_0000);
    }

    #[test]
    fn test_grays_have_no_hue() {
        let [h, s, v] = argb_to_hsv(0x8080_8080);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(hsv_to_rgb(h, s, v), 0xFF80_8080);
        assert_eq!(argb_to_hsv(0x0000_0000), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_rgb_survives_hsv() {
        for rgb in [0xFF12_3456, 0xFFFE_DCBA, 0xFF7F_0080, 0xFF01_0203, 0xFFFF_FF00] {
            let [h, s, v] = argb_to_hsv(rgb);
            assert_eq!(hsv_to_rgb(h, s, v), rgb, "{rgb:#010x}");
        }
    }
}
