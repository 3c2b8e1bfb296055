//! Pinch-distance metering and cursor mapping for the virtual mouse.

use nalgebra::Point2;

use crate::filter::{Ema, Filter};
use crate::image::{Rect, Resolution};
use crate::num::remap;

/// Pinch span below which a pinch counts as a click, in pixels.
pub const CLICK_THRESHOLD: f32 = 50.0;

/// The usable pinch span range, in pixels. Spans outside clamp to the nearest bound.
pub const SPAN_RANGE: std::ops::RangeInclusive<f32> = 50.0..=300.0;

/// A pinch span mapped onto the UI bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchReading {
    /// Y coordinate of the top of the on-screen bar, between 400 (empty) and 150 (full).
    pub bar: f32,
    /// Fill percentage, between 0 and 150.
    pub percent: f32,
}

/// Maps the thumb-tip/index-tip span through a fixed linear interpolation onto a bar height and
/// a percentage.
#[derive(Debug, Default, Clone, Copy)]
pub struct PinchMeter;

impl PinchMeter {
    /// Pixel range of the bar overlay: span 50 maps to 400 (empty bar), span 300 to 150.
    pub const BAR_RANGE: std::ops::RangeInclusive<f32> = 400.0..=150.0;

    pub const PERCENT_RANGE: std::ops::RangeInclusive<f32> = 0.0..=150.0;

    /// Maps a pinch span length onto the bar scale.
    pub fn read(&self, length: f32) -> PinchReading {
        PinchReading {
            bar: remap(length, SPAN_RANGE, Self::BAR_RANGE),
            percent: remap(length, SPAN_RANGE, Self::PERCENT_RANGE),
        }
    }

    /// Returns whether a span of `length` counts as a click.
    ///
    /// This is a stateless threshold test with no hysteresis: a span that oscillates around
    /// [`CLICK_THRESHOLD`] re-triggers within the same gesture.
    pub fn is_click(&self, length: f32) -> bool {
        length < CLICK_THRESHOLD
    }
}

/// Maps a fingertip position from camera frame coordinates to host screen coordinates, smoothing
/// each axis with an EMA filter.
pub struct CursorControl {
    frame: Rect,
    screen: Resolution,
    filter_x: Ema,
    filter_y: Ema,
}

impl CursorControl {
    pub const DEFAULT_SMOOTHING: f32 = 0.5;

    /// Creates a cursor mapping from the given frame rectangle onto a screen of the given size.
    pub fn new(frame: Rect, screen: Resolution) -> Self {
        Self {
            frame,
            screen,
            filter_x: Ema::new(Self::DEFAULT_SMOOTHING),
            filter_y: Ema::new(Self::DEFAULT_SMOOTHING),
        }
    }

    /// Maps `fingertip` onto the screen and advances the smoothing filters.
    pub fn update(&mut self, fingertip: Point2<i32>) -> Point2<i32> {
        let x = remap(
            fingertip.x as f32,
            self.frame.x() as f32..=(self.frame.x() + self.frame.width() as i32) as f32,
            0.0..=(self.screen.width() - 1) as f32,
        );
        let y = remap(
            fingertip.y as f32,
            self.frame.y() as f32..=(self.frame.y() + self.frame.height() as i32) as f32,
            0.0..=(self.screen.height() - 1) as f32,
        );
        Point2::new(
            self.filter_x.push(x) as i32,
            self.filter_y.push(y) as i32,
        )
    }

    /// Drops the smoothing history. Call when the hand leaves the frame, so the cursor does not
    /// glide from its last position when tracking resumes.
    pub fn reset(&mut self) {
        self.filter_x.reset();
        self.filter_y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_maps_span_endpoints() {
        let meter = PinchMeter;
        assert_eq!(
            meter.read(50.0),
            PinchReading {
                bar: 400.0,
                percent: 0.0
            }
        );
        assert_eq!(
            meter.read(300.0),
            PinchReading {
                bar: 150.0,
                percent: 150.0
            }
        );
    }

    #[test]
    fn meter_clamps_outside_span_range() {
        let meter = PinchMeter;
        assert_eq!(meter.read(10.0).bar, 400.0);
        assert_eq!(meter.read(10.0).percent, 0.0);
        assert_eq!(meter.read(500.0).bar, 150.0);
        assert_eq!(meter.read(500.0).percent, 150.0);
    }

    #[test]
    fn click_threshold() {
        let meter = PinchMeter;
        assert!(meter.is_click(49.9));
        assert!(!meter.is_click(50.0));
    }

    #[test]
    fn cursor_maps_frame_corners_to_screen_corners() {
        let mut cursor = CursorControl::new(
            Rect::from_top_left(0, 0, 640, 480),
            Resolution::new(1920, 1080),
        );
        assert_eq!(cursor.update(Point2::new(0, 0)), Point2::new(0, 0));

        cursor.reset();
        assert_eq!(
            cursor.update(Point2::new(640, 480)),
            Point2::new(1919, 1079)
        );
    }

    #[test]
    fn cursor_smooths_between_updates() {
        let mut cursor =
            CursorControl::new(Rect::from_top_left(0, 0, 100, 100), Resolution::new(101, 101));
        assert_eq!(cursor.update(Point2::new(0, 0)), Point2::new(0, 0));
        // Halfway between the previous position and the new target.
        assert_eq!(cursor.update(Point2::new(100, 100)), Point2::new(50, 50));
    }
}
