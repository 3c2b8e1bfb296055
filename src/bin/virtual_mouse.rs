//! Webcam-driven pinch visualizer: maps the thumb/index fingertip distance onto a bar and
//! percentage, and optionally steers the host cursor.

use enigo::{Coordinate, Enigo, Mouse, Settings};
use nalgebra::Point2;

use mudra::{
    gui,
    hand::Hand,
    image::{draw, Color, Image, Rect, Resolution},
    interaction::mouse::{CursorControl, PinchMeter, PinchReading},
    landmark::LandmarkIdx,
    num::TotalF32,
    provider::{LandmarkProvider, MediaPipeSidecar, SidecarOptions},
    timer::FpsCounter,
    video::webcam::{Webcam, WebcamOptions},
};

const CAPTURE_RESOLUTION: Resolution = Resolution::new(640, 480);

/// If `true`, the smoothed midpoint position is forwarded to the host pointer.
const MOVE_HOST_CURSOR: bool = false;

/// If `true`, the full hand skeleton and per-hand annotations are drawn.
const DRAW_HAND_OVERLAY: bool = true;

fn main() -> anyhow::Result<()> {
    mudra::init_logger!();
    gui::run(run)
}

fn run() -> anyhow::Result<()> {
    let mut webcam = Webcam::open(WebcamOptions::default().resolution(CAPTURE_RESOLUTION))?;
    let mut provider = MediaPipeSidecar::spawn(
        SidecarOptions::default().max_hands(2).min_confidence(0.5),
    )?;

    let mut enigo = MOVE_HOST_CURSOR
        .then(|| Enigo::new(&Settings::default()))
        .transpose()?;
    let screen = match &enigo {
        Some(enigo) => {
            let (w, h) = enigo.main_display()?;
            Resolution::new(w as u32, h as u32)
        }
        None => Resolution::new(1920, 1080),
    };

    let meter = PinchMeter;
    let mut cursor = CursorControl::new(
        Rect::from_top_left(
            0,
            0,
            CAPTURE_RESOLUTION.width(),
            CAPTURE_RESOLUTION.height(),
        ),
        screen,
    );

    let mut fps = FpsCounter::new("virtual mouse");
    let mut reading = PinchReading {
        bar: 400.0,
        percent: 0.0,
    };
    while !gui::exit_requested() {
        let mut image = webcam.read()?;
        let hands = provider.detect(&image)?;

        // No hand in view is a silent no-op: the bar keeps its last value.
        if let Some(hand) = hands.iter().max_by_key(|hand| TotalF32(hand.score())) {
            reading = process_hand(hand, &meter, &mut image);

            let span = hand.span(LandmarkIdx::ThumbTip, LandmarkIdx::IndexFingerTip);
            let pos = cursor.update(span.midpoint);
            if let Some(enigo) = &mut enigo {
                enigo.move_mouse(pos.x, pos.y, Coordinate::Abs)?;
            }
        } else {
            cursor.reset();
        }

        draw_bar(&mut image, reading);
        draw::text(
            &mut image,
            Point2::new(40, 50),
            &format!("FPS: {}", fps.rate() as i32),
        )
        .large()
        .align_left()
        .color(Color::BLUE);

        gui::show_image("virtual mouse", &image);
        fps.tick_with(webcam.timers().chain(provider.timers()));
    }

    Ok(())
}

fn process_hand(hand: &Hand, meter: &PinchMeter, image: &mut Image) -> PinchReading {
    if let Some(rect) = hand.bounding_rect() {
        let rect = rect.grow(20);
        draw::rect(image, rect).color(Color::GREEN).stroke_width(2);

        let extended = hand.fingers_up().iter().filter(|up| **up).count();
        draw::text(
            image,
            Point2::new(rect.x(), rect.y()),
            &format!("{extended} up"),
        )
        .align_left()
        .align_bottom()
        .color(Color::GREEN);
    }

    if DRAW_HAND_OVERLAY {
        hand.draw(image);
    }

    let span = hand.span(LandmarkIdx::ThumbTip, LandmarkIdx::IndexFingerTip);
    draw::line(image, span.start, span.end)
        .color(Color::MAGENTA)
        .stroke_width(3);
    draw::circle(image, span.start, 20).color(Color::MAGENTA).fill();
    draw::circle(image, span.end, 20).color(Color::MAGENTA).fill();

    // The midpoint doubles as the click indicator: it flips to green while the pinch is below
    // the click threshold.
    let midpoint_color = if meter.is_click(span.length) {
        Color::GREEN
    } else {
        Color::MAGENTA
    };
    draw::circle(image, span.midpoint, 20)
        .color(midpoint_color)
        .fill();

    meter.read(span.length)
}

fn draw_bar(image: &mut Image, reading: PinchReading) {
    draw::rect(image, Rect::span(50, reading.bar as i32, 85, 400))
        .color(Color::MAGENTA)
        .fill();
    draw::rect(image, Rect::span(50, 150, 85, 400)).color(Color::MAGENTA);
    draw::text(
        image,
        Point2::new(40, 450),
        &format!("{}", reading.percent as i32),
    )
    .large()
    .align_left()
    .color(Color::MAGENTA);
}
