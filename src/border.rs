//! The rotating gradient drawn around the panel.
//!
//! Purely decorative: everything here is a function of elapsed time.

use std::f32::consts::TAU;

use eframe::egui::{pos2, Color32, Painter, Pos2, Rect, Stroke};

/// Seconds for one full revolution of the gradient.
pub const REVOLUTION_SECS: f64 = 12.0;
pub const BORDER_WIDTH: f32 = 3.0;

/// Evenly spaced stops (unmultiplied RGBA); the last one wraps to the first.
const STOPS: [[u8; 4]; 4] = [
    [0, 255, 255, 102],
    [0, 255, 255, 0],
    [128, 0, 128, 102],
    [128, 0, 128, 0],
];

const ARC_SEGMENTS: usize = 8;

/// Gradient rotation in degrees after `elapsed` seconds.
pub fn rotation_degrees(elapsed: f64) -> f32 {
    (elapsed.rem_euclid(REVOLUTION_SECS) / REVOLUTION_SECS * 360.0) as f32
}

/// Color of an angular gradient at `angle` radians when rotated by `rotation`
/// degrees.
pub fn gradient_color(angle: f32, rotation: f32) -> Color32 {
    let turn = ((angle - rotation.to_radians()) / TAU).rem_euclid(1.0);
    let scaled = turn * STOPS.len() as f32;
    let index = (scaled as usize).min(STOPS.len() - 1);
    let t = scaled - index as f32;
    let from = STOPS[index];
    let to = STOPS[(index + 1) % STOPS.len()];
    let channel = |i: usize| (from[i] as f32 + (to[i] as f32 - from[i] as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(channel(0), channel(1), channel(2), channel(3))
}

/// Points around a rounded rectangle, clockwise from the top-left corner.
fn outline(rect: Rect, radius: f32) -> Vec<Pos2> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    let corners = [
        (pos2(rect.min.x + r, rect.min.y + r), 0.5),
        (pos2(rect.max.x - r, rect.min.y + r), 0.75),
        (pos2(rect.max.x - r, rect.max.y - r), 0.0),
        (pos2(rect.min.x + r, rect.max.y - r), 0.25),
    ];
    let mut points = Vec::with_capacity(corners.len() * (ARC_SEGMENTS + 1) + 1);
    for (center, start_turn) in corners {
        for step in 0..=ARC_SEGMENTS {
            let a = (start_turn + 0.25 * step as f32 / ARC_SEGMENTS as f32) * TAU;
            points.push(center + r * eframe::egui::vec2(a.cos(), a.sin()));
        }
    }
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    points
}

/// Strokes the border of `rect`, coloring each segment by its angle around
/// the center.
pub fn paint(painter: &Painter, rect: Rect, radius: f32, elapsed: f64) {
    let rotation = rotation_degrees(elapsed);
    let inset = rect.shrink(BORDER_WIDTH / 2.0);
    let center = inset.center();
    for pair in outline(inset, radius).windows(2) {
        let mid = pair[0].lerp(pair[1], 0.5) - center;
        let color = gradient_color(mid.y.atan2(mid.x), rotation);
        painter.line_segment([pair[0], pair[1]], Stroke::new(BORDER_WIDTH, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_revolution_every_twelve_seconds() {
        assert_eq!(rotation_degrees(0.0), 0.0);
        assert_eq!(rotation_degrees(3.0), 90.0);
        assert_eq!(rotation_degrees(12.0), 0.0);
        assert!((rotation_degrees(18.0) - 180.0).abs() < 1e-3);
    }

    #[test]
    fn stops_land_on_quarter_turns() {
        let cyan = Color32::from_rgba_unmultiplied(0, 255, 255, 102);
        let purple = Color32::from_rgba_unmultiplied(128, 0, 128, 102);
        assert_eq!(gradient_color(0.0, 0.0), cyan);
        assert_eq!(gradient_color(TAU / 2.0, 0.0), purple);
        assert_eq!(gradient_color(TAU / 4.0, 0.0).a(), 0);
    }

    #[test]
    fn rotation_moves_the_gradient() {
        assert_eq!(gradient_color(TAU / 2.0, 180.0), gradient_color(0.0, 0.0));
    }

    #[test]
    fn outline_is_closed_and_stays_inside() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(200.0, 100.0));
        let points = outline(rect, 22.0);
        assert_eq!(points.first(), points.last());
        assert!(points.iter().all(|p| rect.expand(0.01).contains(*p)));
    }
}
