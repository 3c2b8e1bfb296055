//! Hand-tracking virtual keyboard: hover a key with the index fingertip and pinch index and
//! middle fingertips to type it. Activated keys are forwarded to the host input system and
//! collected in an on-screen transcript.

use std::{thread, time::Instant};

use enigo::{Direction, Enigo, Key as HostKey, Keyboard, Settings};
use nalgebra::Point2;

use mudra::{
    gui,
    image::{draw, Color, Image, Rect, Resolution},
    interaction::keyboard::{Key, Keypad, Session, Touch, SETTLE_DELAY},
    landmark::LandmarkIdx,
    num::TotalF32,
    provider::{LandmarkProvider, MediaPipeSidecar, SidecarOptions},
    timer::FpsCounter,
    video::webcam::{Webcam, WebcamOptions},
};

const CAPTURE_RESOLUTION: Resolution = Resolution::new(1280, 720);

fn main() -> anyhow::Result<()> {
    mudra::init_logger!();
    gui::run(run)
}

fn run() -> anyhow::Result<()> {
    let mut webcam = Webcam::open(WebcamOptions::default().resolution(CAPTURE_RESOLUTION))?;
    let mut provider = MediaPipeSidecar::spawn(
        SidecarOptions::default().max_hands(2).min_confidence(0.8),
    )?;
    let mut enigo = Enigo::new(&Settings::default())?;

    let mut keypad = Keypad::qwerty();
    let mut session = Session::new();
    let mut fps = FpsCounter::new("virtual keyboard");

    while !gui::exit_requested() {
        // Mirror the feed so that on-screen hand motion matches the user's.
        let mut image = webcam.read()?.flip_horizontal();
        let hands = provider.detect(&image)?;

        let touch = match hands.iter().max_by_key(|hand| TotalF32(hand.score())) {
            Some(hand) => {
                let fingertip = hand.position(LandmarkIdx::IndexFingerTip);
                let pinch = hand.span(LandmarkIdx::IndexFingerTip, LandmarkIdx::MiddleFingerTip);
                keypad.touch(fingertip, pinch.length, Instant::now())
            }
            None => Touch::Miss,
        };

        for key in keypad.keys() {
            draw_key(&mut image, key, Color::from_rgb8(255, 30, 255));
        }
        match touch {
            Touch::Miss => {}
            Touch::Hover(index) => {
                draw_key(&mut image, &keypad.keys()[index], Color::from_rgb8(175, 0, 175));
            }
            Touch::Press { key: index, label } => {
                draw_key(&mut image, &keypad.keys()[index], Color::GREEN);

                enigo.key(HostKey::Unicode(label), Direction::Click)?;
                session.push(label);
                log::info!("typed '{label}', transcript: {:?}", session.text());
            }
        }

        draw_transcript(&mut image, &session);
        gui::show_image("virtual keyboard", &image);
        fps.tick_with(webcam.timers().chain(provider.timers()));

        if matches!(touch, Touch::Press { .. }) {
            // Blocks the whole loop, so no frames are processed while the hand settles.
            thread::sleep(SETTLE_DELAY);
        }
    }

    Ok(())
}

fn draw_key(image: &mut Image, key: &Key, color: Color) {
    draw::rect(image, key.rect()).color(color).fill();
    draw::text(image, key.rect().center(), &key.label().to_string()).large();
}

fn draw_transcript(image: &mut Image, session: &Session) {
    draw::rect(image, Rect::from_top_left(50, 350, 650, 100))
        .color(Color::GREEN)
        .fill();
    draw::text(image, Point2::new(60, 400), session.text())
        .large()
        .align_left()
        .color(Color::WHITE);
}
