const SHADES: [char; 5] = [' ', '.', ':', 'o', '#'];

/// Renders a row-major pixel matrix (values in `[0, 1]`) as ASCII art, one
/// line per row. A `width` of zero yields an empty string.
pub fn render_ascii(pixels: &[f64], width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    pixels
        .chunks(width)
        .map(|row| row.iter().map(|&p| shade(p)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Side length of a square image with `len` pixels, if it is square.
pub fn square_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len).then_some(side)
}

fn shade(pixel: f64) -> char {
    let clamped = if pixel.is_nan() { 0.0 } else { pixel.clamp(0.0, 1.0) };
    let index = (clamped * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[index]
}
