//! Hand landmark data model.
//!
//! A landmark provider yields, per detected hand, an ordered list of [`NUM_LANDMARKS`] points
//! whose indices carry fixed anatomical meaning (see [`LandmarkIdx`]). The indices are stable
//! across frames, so all geometry logic indexes by them.

use nalgebra::Point2;

use crate::image::{Rect, Resolution};

/// Number of landmarks that describe one hand.
pub const NUM_LANDMARKS: usize = 21;

/// Names for the hand landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// The fingertip landmarks, thumb first.
pub const FINGERTIPS: [LandmarkIdx; 5] = {
    use LandmarkIdx::*;
    [ThumbTip, IndexFingerTip, MiddleFingerTip, RingFingerTip, PinkyTip]
};

pub(crate) const PALM_LANDMARKS: &[LandmarkIdx] = {
    use LandmarkIdx::*;
    &[
        Wrist,
        ThumbCmc,
        IndexFingerMcp,
        MiddleFingerMcp,
        RingFingerMcp,
        PinkyMcp,
    ]
};

/// Landmark pairs connected by a bone, used to draw the hand skeleton.
pub const CONNECTIVITY: &[(LandmarkIdx, LandmarkIdx)] = {
    use LandmarkIdx::*;
    &[
        // Surround the palm:
        (Wrist, ThumbCmc),
        (ThumbCmc, IndexFingerMcp),
        (IndexFingerMcp, MiddleFingerMcp),
        (MiddleFingerMcp, RingFingerMcp),
        (RingFingerMcp, PinkyMcp),
        (PinkyMcp, Wrist),
        // Thumb:
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        // Index:
        (IndexFingerMcp, IndexFingerPip),
        (IndexFingerPip, IndexFingerDip),
        (IndexFingerDip, IndexFingerTip),
        // Middle:
        (MiddleFingerMcp, MiddleFingerPip),
        (MiddleFingerPip, MiddleFingerDip),
        (MiddleFingerDip, MiddleFingerTip),
        // Ring:
        (RingFingerMcp, RingFingerPip),
        (RingFingerPip, RingFingerDip),
        (RingFingerDip, RingFingerTip),
        // Pinky:
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// An ordered collection of landmark positions for one hand in one frame.
///
/// Positions are stored as integer pixel coordinates in the source image's coordinate system.
/// The collection is recreated every frame; nothing is persisted across frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmarks {
    positions: Box<[Point2<i32>]>,
}

impl Landmarks {
    /// Creates a landmark collection from pixel positions.
    pub fn from_pixels<I: IntoIterator<Item = Point2<i32>>>(positions: I) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    /// Converts normalized coordinates (0.0 to 1.0 relative to the image size) to pixel
    /// positions.
    ///
    /// Coordinates are truncated towards zero, matching the integer pixel storage used
    /// throughout the geometry layer.
    pub fn from_normalized<I: IntoIterator<Item = [f32; 2]>>(
        normalized: I,
        res: Resolution,
    ) -> Self {
        Self {
            positions: normalized
                .into_iter()
                .map(|[x, y]| {
                    Point2::new(
                        (x * res.width() as f32) as i32,
                        (y * res.height() as f32) as i32,
                    )
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the position of a landmark.
    ///
    /// # Panics
    ///
    /// Panics when the collection holds fewer landmarks than `idx` requires.
    #[inline]
    pub fn get(&self, idx: LandmarkIdx) -> Point2<i32> {
        self.positions[idx as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = Point2<i32>> + '_ {
        self.positions.iter().copied()
    }

    /// Computes the axis-aligned bounding rectangle of all landmarks.
    ///
    /// Returns [`None`] when the collection is empty.
    pub fn bounding_rect(&self) -> Option<Rect> {
        Rect::bounding(self.iter())
    }

    /// Mirrors all landmark positions around the vertical center line of an image that is
    /// `width` pixels wide.
    pub fn flip_horizontal(&mut self, width: u32) {
        for pos in self.positions.iter_mut() {
            pos.x = width as i32 - 1 - pos.x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_coordinates_truncate() {
        let lms = Landmarks::from_normalized([[0.5, 0.5], [0.999, 0.0]], Resolution::new(99, 10));
        assert_eq!(lms.get(LandmarkIdx::Wrist), Point2::new(49, 5));
        assert_eq!(lms.get(LandmarkIdx::ThumbCmc), Point2::new(98, 0));
    }

    #[test]
    fn bounding_rect_spans_all_landmarks() {
        let lms = Landmarks::from_pixels([Point2::new(0, 0), Point2::new(100, 100)]);
        let rect = lms.bounding_rect().unwrap();
        assert_eq!((rect.x(), rect.y()), (0, 0));
        assert_eq!((rect.width(), rect.height()), (100, 100));
    }

    #[test]
    fn bounding_rect_of_empty_hand() {
        let lms = Landmarks::from_pixels([]);
        assert_eq!(lms.bounding_rect(), None);
    }

    #[test]
    fn fingertip_indices_are_stable() {
        let tips = FINGERTIPS.map(|idx| idx as usize);
        assert_eq!(tips, [4, 8, 12, 16, 20]);
    }
}
