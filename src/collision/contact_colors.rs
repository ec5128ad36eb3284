use crate::math::Real;
use alloc::vec::Vec;

/// The color of cells without contact.
pub const NEUTRAL_COLOR: [u8; 3] = [255, 255, 255];

/// Hue (in turns) of the last contacting cell. The first one is red (hue `0`).
const LAST_CONTACT_HUE: Real = 2.0 / 3.0;

/// Converts a color from HSV (all components in `[0, 1]`) to 8-bit RGB.
pub fn hsv_to_rgb(hue: Real, saturation: Real, value: Real) -> [u8; 3] {
    let h = (hue.rem_euclid(1.0)) * 6.0;
    let sector = h.floor();
    let f = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    let (r, g, b) = match sector as u32 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };

    [r, g, b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// The color of the `i`-th of `n` contacting cells: a hue ramp from red to blue.
pub fn contact_color(i: usize, n: usize) -> [u8; 4] {
    let t = if n > 1 {
        i as Real / (n - 1) as Real
    } else {
        0.0
    };
    let [r, g, b] = hsv_to_rgb(t * LAST_CONTACT_HUE, 1.0, 1.0);
    [r, g, b, 255]
}

/// Computes one RGBA color per cell of a mesh with `num_cells` cells.
///
/// Cells listed in `contacting_cells` are colored along a hue ramp following their order in
/// the list (a cell listed several times keeps its last color). Other cells get the
/// neutral color, whose alpha is `255 * opacity` if there is at least one contact.
pub fn contact_cell_colors(num_cells: usize, contacting_cells: &[u32], opacity: Real) -> Vec<[u8; 4]> {
    let alpha = if contacting_cells.is_empty() {
        255
    } else {
        (opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    let [r, g, b] = NEUTRAL_COLOR;
    let mut colors = vec![[r, g, b, alpha]; num_cells];

    for (i, cell) in contacting_cells.iter().enumerate() {
        if let Some(color) = colors.get_mut(*cell as usize) {
            *color = contact_color(i, contacting_cells.len());
        }
    }

    colors
}
