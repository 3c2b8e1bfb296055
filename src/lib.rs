//! Mudra hand-gesture interaction library.
//!
//! Turns per-frame hand landmarks into virtual input: a pinch-distance meter with click
//! detection ([`interaction::mouse`]) and an on-screen keyboard with debounced key activation
//! ([`interaction::keyboard`]). Landmark detection itself is delegated to an external provider
//! (see [`provider`]).
//!
//! # Coordinates
//!
//! Landmarks are stored as integer pixel coordinates in the camera image's coordinate system:
//! X points right, Y points *down*, matching how the provider reports them.
//!
//! # Environment Variables
//!
//! Some parts of Mudra can be overridden by setting environment variables:
//!
//! * `MUDRA_WEBCAM_NAME`: Forces the device to use for [`Webcam`]s created without an explicit
//!   device name. If unset, the first device that supports a compatible image format will be
//!   used.
//! * `MUDRA_SIDECAR`: Path of the landmark sidecar script to spawn. Defaults to
//!   `sidecar/hand_landmarks.py`.
//! * `MUDRA_PYTHON`: Interpreter used to run the sidecar. Defaults to `python3`.
//!
//! [`Webcam`]: video::webcam::Webcam

use log::LevelFilter;

pub mod filter;
pub mod gui;
pub mod hand;
pub mod image;
pub mod interaction;
pub mod landmark;
pub mod num;
pub mod provider;
pub mod timer;
pub mod video;

/// macro-use only, not part of public API.
#[doc(hidden)]
pub fn init_logger(calling_crate: &'static str) {
    let log_level = LevelFilter::Debug;
    env_logger::Builder::new()
        .filter(Some(calling_crate), log_level)
        .filter(Some(env!("CARGO_PKG_NAME")), log_level)
        .filter(Some("wgpu"), LevelFilter::Warn)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging to *stderr*.
///
/// The calling crate and Mudra will log at *debug* level; `wgpu` will log at *warn* level.
///
/// If a global logger is already registered, this macro will do nothing.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}
