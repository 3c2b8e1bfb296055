//! MediaPipe sidecar process.
//!
//! Spawns `sidecar/hand_landmarks.py` and speaks a line-oriented protocol with it:
//!
//! - On startup the sidecar prints `READY`.
//! - For every frame, we send a header line `<width> <height>` followed by the raw RGB24 pixel
//!   data, and receive one line of JSON holding the detected hands with normalized landmark
//!   coordinates.
//!
//! The script location can be overridden with the `MUDRA_SIDECAR` environment variable, the
//! Python interpreter with `MUDRA_PYTHON`.

use std::{
    env,
    io::{BufRead, BufReader, Write},
    path::PathBuf,
    process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};

use anyhow::{bail, Context};
use serde::Deserialize;

use crate::hand::{Hand, Handedness};
use crate::image::Image;
use crate::landmark::{Landmarks, NUM_LANDMARKS};
use crate::provider::LandmarkProvider;
use crate::timer::Timer;

const ENV_VAR_SIDECAR: &str = "MUDRA_SIDECAR";
const ENV_VAR_PYTHON: &str = "MUDRA_PYTHON";
const DEFAULT_SCRIPT: &str = "sidecar/hand_landmarks.py";

/// Detector configuration options.
pub struct SidecarOptions {
    script: Option<PathBuf>,
    max_hands: u32,
    min_confidence: f32,
}

impl Default for SidecarOptions {
    fn default() -> Self {
        Self {
            script: None,
            max_hands: 1,
            min_confidence: 0.5,
        }
    }
}

impl SidecarOptions {
    /// Sets the path of the sidecar script to spawn.
    #[inline]
    pub fn script(mut self, script: impl Into<PathBuf>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Sets the maximum number of hands the detector reports per frame.
    #[inline]
    pub fn max_hands(mut self, max_hands: u32) -> Self {
        self.max_hands = max_hands;
        self
    }

    /// Sets the minimum detection confidence. Hands scoring below are not reported.
    #[inline]
    pub fn min_confidence(mut self, confidence: f32) -> Self {
        self.min_confidence = confidence;
        self
    }
}

#[derive(Deserialize)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[allow(dead_code)]
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize)]
struct HandJson {
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize)]
struct FrameJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// A [`LandmarkProvider`] backed by a MediaPipe Hands process.
pub struct MediaPipeSidecar {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    t_detect: Timer,
}

impl MediaPipeSidecar {
    /// Spawns the sidecar process and waits for it to signal readiness.
    ///
    /// Model loading happens inside the sidecar, so this can block for a noticeable amount of
    /// time.
    pub fn spawn(options: SidecarOptions) -> anyhow::Result<Self> {
        let script = options
            .script
            .or_else(|| env::var_os(ENV_VAR_SIDECAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT));
        if !script.exists() {
            bail!("landmark sidecar script not found at '{}'", script.display());
        }
        let python = env::var(ENV_VAR_PYTHON).unwrap_or_else(|_| "python3".into());

        log::info!("starting landmark sidecar: {} {}", python, script.display());
        let mut child = Command::new(python)
            .arg(&script)
            .arg("--max-hands")
            .arg(options.max_hands.to_string())
            .arg("--min-confidence")
            .arg(options.min_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn landmark sidecar")?;

        let stdin = child.stdin.take().context("sidecar stdin unavailable")?;
        let stdout = child.stdout.take().context("sidecar stdout unavailable")?;
        let mut stdout = BufReader::new(stdout);

        let mut line = String::new();
        stdout.read_line(&mut line)?;
        if line.trim() != "READY" {
            bail!("sidecar did not signal readiness (got '{}')", line.trim());
        }
        log::info!("landmark sidecar ready");

        Ok(Self {
            child,
            stdin,
            stdout,
            t_detect: Timer::new("detect"),
        })
    }

    /// Returns profiling timers for the sidecar round-trip.
    pub fn timers(&self) -> impl Iterator<Item = &Timer> + '_ {
        [&self.t_detect].into_iter()
    }

    fn round_trip(
        stdin: &mut ChildStdin,
        stdout: &mut BufReader<ChildStdout>,
        image: &Image,
    ) -> anyhow::Result<FrameJson> {
        writeln!(stdin, "{} {}", image.width(), image.height())?;
        stdin.write_all(&image.to_rgb24())?;
        stdin.flush()?;

        let mut line = String::new();
        if stdout.read_line(&mut line)? == 0 {
            bail!("landmark sidecar exited unexpectedly");
        }
        serde_json::from_str(&line).context("malformed sidecar response")
    }
}

impl LandmarkProvider for MediaPipeSidecar {
    fn detect(&mut self, image: &Image) -> anyhow::Result<Vec<Hand>> {
        let Self {
            stdin,
            stdout,
            t_detect,
            ..
        } = self;
        let guard = t_detect.start();
        let frame = Self::round_trip(stdin, stdout, image)?;
        drop(guard);

        if let Some(error) = frame.error {
            bail!("landmark sidecar error: {error}");
        }

        let mut hands = Vec::with_capacity(frame.hands.len());
        for hand in frame.hands {
            if hand.landmarks.len() != NUM_LANDMARKS {
                bail!(
                    "sidecar reported {} landmarks per hand (expected {})",
                    hand.landmarks.len(),
                    NUM_LANDMARKS,
                );
            }
            let handedness = match &*hand.handedness {
                "Left" => Handedness::Left,
                "Right" => Handedness::Right,
                other => bail!("unknown handedness '{other}'"),
            };
            let landmarks = Landmarks::from_normalized(
                hand.landmarks.iter().map(|lm| [lm.x, lm.y]),
                image.resolution(),
            );
            hands.push(Hand::new(landmarks, handedness, hand.score));
        }

        Ok(hands)
    }
}

impl Drop for MediaPipeSidecar {
    fn drop(&mut self) {
        if let Err(e) = self.child.kill() {
            log::warn!("failed to kill landmark sidecar: {e}");
        }
        self.child.wait().ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sidecar_response() {
        let json = r#"{"hands": [{"handedness": "Right", "score": 0.92,
            "landmarks": [{"x": 0.1, "y": 0.2, "z": 0.0}]}]}"#;
        let frame: FrameJson = serde_json::from_str(json).unwrap();
        assert_eq!(frame.hands.len(), 1);
        assert_eq!(frame.hands[0].handedness, "Right");
        assert_eq!(frame.hands[0].landmarks.len(), 1);
        assert_eq!(frame.error, None);
    }

    #[test]
    fn parses_empty_frame() {
        let frame: FrameJson = serde_json::from_str("{}").unwrap();
        assert!(frame.hands.is_empty());
        assert_eq!(frame.error, None);
    }
}
