//! Per-hand geometry: bounding boxes, finger extension state, and fingertip spans.

use nalgebra::{Point2, Rotation2, Vector2};

use crate::image::{draw, Color, Image, Rect};
use crate::landmark::{LandmarkIdx, Landmarks, CONNECTIVITY, NUM_LANDMARKS, PALM_LANDMARKS};

/// Which side of the body a detected hand belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

/// The distance between two landmarks, along with the points that produced it.
///
/// The midpoint is computed in integer pixel space and truncates, mirroring the landmark
/// storage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: Point2<i32>,
    pub end: Point2<i32>,
    pub length: f32,
    pub midpoint: Point2<i32>,
}

/// One detected hand in one frame.
///
/// Hands are ephemeral: the provider recreates them every frame, and nothing in here persists.
#[derive(Debug, Clone)]
pub struct Hand {
    landmarks: Landmarks,
    handedness: Handedness,
    score: f32,
}

impl Hand {
    /// Creates a hand from a full set of landmarks.
    ///
    /// # Panics
    ///
    /// Panics unless `landmarks` holds exactly [`NUM_LANDMARKS`] positions.
    pub fn new(landmarks: Landmarks, handedness: Handedness, score: f32) -> Self {
        assert_eq!(
            landmarks.len(),
            NUM_LANDMARKS,
            "a hand requires {NUM_LANDMARKS} landmarks"
        );
        Self {
            landmarks,
            handedness,
            score,
        }
    }

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    #[inline]
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Detection confidence reported by the landmark provider, in range 0.0 to 1.0.
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns the position of a landmark in pixel coordinates.
    #[inline]
    pub fn position(&self, idx: LandmarkIdx) -> Point2<i32> {
        self.landmarks.get(idx)
    }

    /// Computes the axis-aligned bounding rectangle of all landmarks.
    pub fn bounding_rect(&self) -> Option<Rect> {
        self.landmarks.bounding_rect()
    }

    /// Determines which fingers are extended, thumb first.
    ///
    /// The thumb compares its tip x-coordinate against the IP joint; the four fingers compare
    /// their tip y-coordinate against the PIP joint (two indices back). The thumb comparison
    /// depends on which way the hand faces the camera and is *not* corrected for handedness;
    /// a mirrored hand reports the opposite thumb state.
    pub fn fingers_up(&self) -> [bool; 5] {
        use LandmarkIdx::*;

        let lm = |idx| self.landmarks.get(idx);
        [
            lm(ThumbTip).x > lm(ThumbIp).x,
            lm(IndexFingerTip).y < lm(IndexFingerPip).y,
            lm(MiddleFingerTip).y < lm(MiddleFingerPip).y,
            lm(RingFingerTip).y < lm(RingFingerPip).y,
            lm(PinkyTip).y < lm(PinkyPip).y,
        ]
    }

    /// Measures the Euclidean distance between two landmarks.
    ///
    /// The returned [`Span`] also carries the (truncated) midpoint, which serves as the cursor
    /// anchor and as the click indicator position.
    pub fn span(&self, a: LandmarkIdx, b: LandmarkIdx) -> Span {
        let start = self.landmarks.get(a);
        let end = self.landmarks.get(b);
        let d = end - start;
        let length = f32::hypot(d.x as f32, d.y as f32);
        let midpoint = Point2::new((start.x + end.x) / 2, (start.y + end.y) / 2);
        Span {
            start,
            end,
            length,
            midpoint,
        }
    }

    /// Computes the center of the palm by averaging the palm landmarks.
    pub fn palm_center(&self) -> Point2<i32> {
        let mut sum = Vector2::new(0i64, 0i64);
        for idx in PALM_LANDMARKS {
            let pos = self.landmarks.get(*idx);
            sum += Vector2::new(pos.x as i64, pos.y as i64);
        }
        let n = PALM_LANDMARKS.len() as i64;
        Point2::new((sum.x / n) as i32, (sum.y / n) as i32)
    }

    /// Computes the clockwise rotation of the hand compared to an upright position.
    ///
    /// A rotation of 0° means that fingers are pointed upwards.
    pub fn rotation_radians(&self) -> f32 {
        let mcp = self.landmarks.get(LandmarkIdx::MiddleFingerMcp);
        let wrist = self.landmarks.get(LandmarkIdx::Wrist);

        let rel = Vector2::new((wrist.x - mcp.x) as f32, (wrist.y - mcp.y) as f32);
        Rotation2::rotation_between(&Vector2::y(), &rel).angle()
    }

    /// Draws the hand skeleton and per-hand annotations onto `target`.
    pub fn draw(&self, target: &mut Image) {
        let hand = match self.handedness {
            Handedness::Left => "L",
            Handedness::Right => "R",
        };

        let mcp = self.position(LandmarkIdx::MiddleFingerMcp);
        let wrist = self.position(LandmarkIdx::Wrist);
        draw::line(target, mcp, wrist).color(Color::from_rgb8(127, 127, 127));
        draw::text(
            target,
            wrist,
            &format!("{:.1} deg", self.rotation_radians().to_degrees()),
        )
        .align_top();

        let palm = self.palm_center();
        draw::text(target, palm - Vector2::new(0, 5), hand);
        draw::text(
            target,
            palm + Vector2::new(0, 5),
            &format!("score={:.2}", self.score),
        );

        for (a, b) in CONNECTIVITY {
            draw::line(target, self.position(*a), self.position(*b)).color(Color::GREEN);
        }
        for pos in self.landmarks.iter() {
            draw::marker(target, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// Builds a hand from 21 explicit pixel positions.
    fn hand_from(points: [(i32, i32); NUM_LANDMARKS], handedness: Handedness) -> Hand {
        Hand::new(
            Landmarks::from_pixels(points.iter().map(|&(x, y)| Point2::new(x, y))),
            handedness,
            1.0,
        )
    }

    /// An open right hand facing the camera: all fingertips above their PIP joints (smaller y),
    /// thumb tip to the right of its IP joint (larger x).
    fn open_hand(handedness: Handedness) -> Hand {
        hand_from(
            [
                (50, 100), // wrist
                (35, 92),
                (28, 82),
                (22, 72),
                (26, 64), // thumb: tip.x > ip.x
                (42, 62),
                (42, 48),
                (42, 38),
                (42, 28), // index
                (52, 60),
                (52, 45),
                (52, 33),
                (52, 22), // middle
                (62, 62),
                (62, 48),
                (62, 37),
                (62, 27), // ring
                (72, 66),
                (72, 55),
                (72, 46),
                (72, 38), // pinky
            ],
            handedness,
        )
    }

    #[test]
    fn all_fingers_up_on_open_hand() {
        assert_eq!(open_hand(Handedness::Right).fingers_up(), [true; 5]);
    }

    #[test]
    fn curled_finger_reports_folded() {
        let mut points = [(0, 0); NUM_LANDMARKS];
        let open = open_hand(Handedness::Right);
        for (i, pt) in points.iter_mut().enumerate() {
            let p = open.landmarks().iter().nth(i).unwrap();
            *pt = (p.x, p.y);
        }
        // Curl the index finger: tip drops below its PIP joint.
        points[LandmarkIdx::IndexFingerTip as usize] = (42, 55);
        let hand = hand_from(points, Handedness::Right);
        assert_eq!(hand.fingers_up(), [true, false, true, true, true]);
    }

    /// The thumb heuristic only looks at the x-ordering of tip and IP joint. Mirroring the hand
    /// flips the reported state even though the anatomical pose is unchanged, and the handedness
    /// label has no influence. This preserves the original behavior rather than fixing it.
    #[test]
    fn thumb_state_follows_orientation_not_handedness() {
        let hand = open_hand(Handedness::Right);
        assert!(hand.fingers_up()[0]);

        let mut mirrored = hand.landmarks().clone();
        mirrored.flip_horizontal(200);
        for handedness in [Handedness::Left, Handedness::Right] {
            let flipped = Hand::new(mirrored.clone(), handedness, 1.0);
            assert!(!flipped.fingers_up()[0]);
        }
    }

    #[test]
    fn span_of_3_4_5_triangle() {
        let mut points = [(50, 50); NUM_LANDMARKS];
        points[LandmarkIdx::ThumbTip as usize] = (0, 0);
        points[LandmarkIdx::IndexFingerTip as usize] = (3, 4);
        let hand = hand_from(points, Handedness::Right);

        let span = hand.span(LandmarkIdx::ThumbTip, LandmarkIdx::IndexFingerTip);
        assert_eq!(span.length, 5.0);
        // Integer pixel storage truncates the exact midpoint (1.5, 2.0).
        assert_eq!(span.midpoint, Point2::new(1, 2));
    }

    #[test]
    fn upright_hand_has_no_rotation() {
        let hand = open_hand(Handedness::Right);
        // Wrist is directly below the middle finger MCP.
        let mut points = [(0, 0); NUM_LANDMARKS];
        for (i, pt) in points.iter_mut().enumerate() {
            let p = hand.landmarks().iter().nth(i).unwrap();
            *pt = (p.x, p.y);
        }
        points[LandmarkIdx::Wrist as usize] = (52, 100);
        let hand = hand_from(points, Handedness::Right);
        assert_relative_eq!(hand.rotation_radians(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn bounding_rect_covers_hand() {
        let hand = open_hand(Handedness::Right);
        let rect = hand.bounding_rect().unwrap();
        assert_eq!((rect.x(), rect.y()), (22, 22));
        assert!(rect.contains(Point2::new(50, 100 - 1)));
    }
}
