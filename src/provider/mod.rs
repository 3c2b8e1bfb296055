//! Landmark detection providers.
//!
//! Hand-pose estimation is not implemented in this crate. It is an external capability: given an
//! image, a provider returns zero or more hands, each as an ordered list of 21 labeled landmark
//! points. The [`LandmarkProvider`] trait is the seam; [`sidecar::MediaPipeSidecar`] is the
//! default implementation, delegating to a MediaPipe process.

pub mod sidecar;

use crate::hand::Hand;
use crate::image::Image;

pub use sidecar::{MediaPipeSidecar, SidecarOptions};

/// A source of per-frame hand landmarks.
pub trait LandmarkProvider {
    /// Detects hands in `image`.
    ///
    /// Returns an empty list when no hands are in view; that is not an error.
    fn detect(&mut self, image: &Image) -> anyhow::Result<Vec<Hand>>;
}
