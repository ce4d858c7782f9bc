//! sRGB hex → linear RGB conversion.
//!
//! Colours are authored as sRGB hex triples (`0xRRGGBB`) and shaded in
//! linear space; the surface format re-encodes to sRGB on write.

/// Decode one 8-bit sRGB channel to linear.
#[must_use]
pub fn srgb_channel_to_linear(c: u8) -> f32 {
    let c = f32::from(c) / 255.0;
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Linear RGB from an sRGB hex triple.
#[must_use]
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    let [_, r, g, b] = hex.to_be_bytes();
    [
        srgb_channel_to_linear(r),
        srgb_channel_to_linear(g),
        srgb_channel_to_linear(b),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
        let white = hex_to_linear(0xffffff);
        for c in white {
            assert!((c - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn mid_grey_is_darker_in_linear() {
        let [r, g, b] = hex_to_linear(0x7f7f7f);
        assert!((r - 0.212).abs() < 0.001);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn channels_unpack_in_rgb_order() {
        let [r, g, b] = hex_to_linear(0xc63d2f);
        assert!(r > g && g > b);
    }
}
