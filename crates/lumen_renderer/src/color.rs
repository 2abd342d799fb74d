//! Colour conversions and the debug heat map.

use lumen_math::Vec3;

/// Linear RGB colour.
pub type Color = Vec3;

const GAMMA: f32 = 2.2;

/// Convert an 8-bit display-encoded colour to linear.
pub fn rgb8(r: u8, g: u8, b: u8) -> Color {
    Color::new(r as f32, g as f32, b as f32)
        .map(|c| (c / 255.0).powf(GAMMA))
}

/// Gamma-encode a linear colour and quantize it to 8 bits.
pub fn to_rgb8(color: Color) -> [u8; 3] {
    let encode = |c: f32| (c.max(0.0).powf(1.0 / GAMMA) * 255.0).clamp(0.0, 255.0) as u8;
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Viridis, sampled at 25 points.
const HEAT_MAP: [[u8; 3]; 25] = [
    [68, 1, 84],
    [71, 17, 100],
    [72, 31, 112],
    [71, 45, 123],
    [68, 58, 131],
    [64, 70, 136],
    [59, 82, 139],
    [54, 93, 141],
    [49, 104, 142],
    [44, 114, 142],
    [40, 124, 142],
    [36, 134, 142],
    [33, 144, 140],
    [31, 154, 138],
    [32, 164, 134],
    [39, 173, 129],
    [53, 183, 121],
    [71, 193, 110],
    [93, 200, 99],
    [117, 208, 84],
    [143, 215, 68],
    [170, 220, 50],
    [199, 224, 32],
    [227, 228, 24],
    [253, 231, 37],
];

/// Map `t` in `[0, 1]` onto the heat map. Anything outside is pure red.
pub fn heat_map(t: f32) -> Color {
    if !(0.0..=1.0).contains(&t) {
        return rgb8(255, 0, 0);
    }

    let scaled = t * (HEAT_MAP.len() - 1) as f32;
    let index = (scaled.floor() as usize).min(HEAT_MAP.len() - 2);
    let frac = scaled - index as f32;

    let [r0, g0, b0] = HEAT_MAP[index];
    let [r1, g1, b1] = HEAT_MAP[index + 1];
    let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * frac).clamp(0.0, 255.0) as u8;
    rgb8(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
