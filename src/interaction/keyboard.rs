//! The virtual keyboard: a static key grid with debounced pinch activation.

use std::time::{Duration, Instant};

use itertools::Itertools;
use nalgebra::Point2;

use crate::image::Rect;

/// Index/middle fingertip span below which a hover counts as a key press, in pixels.
pub const PINCH_THRESHOLD: f32 = 30.0;

/// Minimum time between two activations of the same key.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(400);

/// How long the frame loop pauses after an activation, giving the hand time to move off the key.
///
/// The pause blocks the whole loop, a known responsiveness limitation.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

const ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL;", "ZXCVBNM,. "];

/// A single key of the on-screen keyboard.
///
/// Keys live for the whole session; the only mutation is the activation timestamp that drives
/// the debounce window.
#[derive(Debug, Clone)]
pub struct Key {
    rect: Rect,
    label: char,
    last_activation: Option<Instant>,
}

impl Key {
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn label(&self) -> char {
        self.label
    }
}

/// What a fingertip did to the keypad in one frame.
///
/// A key has no other states: it goes from idle to activated (emitting its label and resetting
/// the debounce timer) and straight back to idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Touch {
    /// The fingertip is over no key.
    Miss,
    /// The fingertip hovers over the key with this index, without activating it.
    Hover(usize),
    /// The key with this index was activated and emits its label.
    Press { key: usize, label: char },
}

/// A static grid of [`Key`]s laid out at fixed pixel offsets.
pub struct Keypad {
    keys: Vec<Key>,
}

impl Keypad {
    /// Horizontal and vertical distance between neighboring key origins, in pixels.
    pub const PITCH: u32 = 100;

    /// Width and height of a key, in pixels.
    pub const KEY_SIZE: u32 = 85;

    /// Offset of the first key from the top-left image corner, in pixels.
    pub const ORIGIN: u32 = 50;

    /// Creates the standard three-row QWERTY grid.
    pub fn qwerty() -> Self {
        let keys = ROWS
            .iter()
            .enumerate()
            .flat_map(|(row, labels)| {
                labels.chars().enumerate().map(move |(col, label)| Key {
                    rect: Rect::from_top_left(
                        (Self::PITCH * col as u32 + Self::ORIGIN) as i32,
                        (Self::PITCH * row as u32 + Self::ORIGIN) as i32,
                        Self::KEY_SIZE,
                        Self::KEY_SIZE,
                    ),
                    label,
                    last_activation: None,
                })
            })
            .collect_vec();
        Self { keys }
    }

    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Applies one frame of fingertip input to the keypad.
    ///
    /// `fingertip` is the index fingertip position, `pinch` the index/middle fingertip span
    /// length. A key activates when the fingertip is inside its rectangle, the pinch span is
    /// below [`PINCH_THRESHOLD`], and [`DEBOUNCE_WINDOW`] has elapsed since the key's previous
    /// activation.
    ///
    /// `now` is passed in explicitly so that the debounce logic does not depend on the wall
    /// clock.
    pub fn touch(&mut self, fingertip: Point2<i32>, pinch: f32, now: Instant) -> Touch {
        for (i, key) in self.keys.iter_mut().enumerate() {
            if !key.rect.contains(fingertip) {
                continue;
            }

            let debounced = key
                .last_activation
                .map_or(true, |last| now.saturating_duration_since(last) > DEBOUNCE_WINDOW);
            if pinch < PINCH_THRESHOLD && debounced {
                key.last_activation = Some(now);
                return Touch::Press {
                    key: i,
                    label: key.label,
                };
            }

            return Touch::Hover(i);
        }

        Touch::Miss
    }
}

/// Session state threaded through the frame loop.
///
/// Holds the accumulated transcript of typed characters. Kept in an explicit struct so the loop
/// owns all mutable state.
#[derive(Debug, Default)]
pub struct Session {
    typed: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an activated key's label to the transcript.
    pub fn push(&mut self, label: char) {
        self.typed.push(label);
    }

    /// The text typed so far in this session.
    #[inline]
    pub fn text(&self) -> &str {
        &self.typed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_of(keypad: &Keypad, index: usize) -> Point2<i32> {
        keypad.keys()[index].rect().center()
    }

    #[test]
    fn qwerty_layout() {
        let keypad = Keypad::qwerty();
        assert_eq!(keypad.keys().len(), 30);

        let q = &keypad.keys()[0];
        assert_eq!(q.label(), 'Q');
        assert_eq!(q.rect(), Rect::from_top_left(50, 50, 85, 85));

        assert_eq!(keypad.keys()[10].label(), 'A');
        assert_eq!(keypad.keys()[29].label(), ' ');
        assert_eq!(
            keypad.keys()[29].rect(),
            Rect::from_top_left(950, 250, 85, 85)
        );
    }

    #[test]
    fn press_requires_pinch() {
        let mut keypad = Keypad::qwerty();
        let pos = center_of(&keypad, 0);
        let now = Instant::now();

        assert_eq!(keypad.touch(pos, 80.0, now), Touch::Hover(0));
        assert_eq!(
            keypad.touch(pos, 10.0, now),
            Touch::Press { key: 0, label: 'Q' }
        );
    }

    #[test]
    fn fingertip_outside_grid_misses() {
        let mut keypad = Keypad::qwerty();
        assert_eq!(
            keypad.touch(Point2::new(0, 0), 10.0, Instant::now()),
            Touch::Miss
        );
    }

    #[test]
    fn debounce_swallows_rapid_activation() {
        let mut keypad = Keypad::qwerty();
        let mut session = Session::new();
        let pos = center_of(&keypad, 1);
        let t0 = Instant::now();

        for now in [t0, t0 + Duration::from_millis(100)] {
            if let Touch::Press { label, .. } = keypad.touch(pos, 10.0, now) {
                session.push(label);
            }
        }
        assert_eq!(session.text(), "W");
    }

    #[test]
    fn debounce_allows_spaced_activations() {
        let mut keypad = Keypad::qwerty();
        let mut session = Session::new();
        let pos = center_of(&keypad, 1);
        let t0 = Instant::now();

        for now in [t0, t0 + Duration::from_millis(500)] {
            if let Touch::Press { label, .. } = keypad.touch(pos, 10.0, now) {
                session.push(label);
            }
        }
        assert_eq!(session.text(), "WW");
    }

    #[test]
    fn debounce_is_per_key() {
        let mut keypad = Keypad::qwerty();
        let now = Instant::now();

        assert!(matches!(
            keypad.touch(center_of(&keypad, 0), 10.0, now),
            Touch::Press { .. }
        ));
        // A different key is not affected by the first key's timestamp.
        assert!(matches!(
            keypad.touch(center_of(&keypad, 1), 10.0, now),
            Touch::Press { .. }
        ));
    }
}
