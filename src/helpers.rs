use crate::common::ColorRGB;

pub fn lerp_color(dark: ColorRGB, light: ColorRGB, t: f32) -> ColorRGB {
    let mut out: ColorRGB = [0, 0, 0];
    for i in 0..3 {
        let v = dark[i] as f32 + (light[i] as f32 - dark[i] as f32) * t;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

// Squared Euclidean distance in RGB space.
pub fn color_distance(a: ColorRGB, b: ColorRGB) -> u32 {
    let mut d = 0;
    for i in 0..3 {
        let diff = a[i] as i32 - b[i] as i32;
        d += (diff * diff) as u32;
    }
    d
}

pub fn parse_rgb(s: &str) -> Option<ColorRGB> {
    let parts: Vec<&str> = s.split(',').map(|p| p.trim()).collect();
    if parts.len() != 3 {
        return None;
    }
    let mut out: ColorRGB = [0, 0, 0];
    for i in 0..3 {
        out[i] = parts[i].parse().ok()?;
    }
    Some(out)
}
