//! A simple, single-window display loop.
//!
//! winit requires its event loop to run on the main thread, so [`run`] inverts control: it runs
//! the event loop itself and executes the application on a second thread. The application sends
//! frames over with [`show_image`] and polls [`exit_requested`] to observe the Esc key and the
//! window close button.

mod renderer;

use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, OnceLock,
    },
};

use winit::{
    event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy},
};

use crate::image::{Image, Resolution};

use self::renderer::Renderer;

enum Msg {
    Image {
        title: String,
        res: Resolution,
        data: Vec<u8>,
    },
}

struct Display {
    proxy: Mutex<EventLoopProxy<Msg>>,
}

static DISPLAY: OnceLock<Display> = OnceLock::new();
static EXIT: AtomicBool = AtomicBool::new(false);

/// Runs `app` on its own thread while the display event loop takes over the calling (main)
/// thread.
///
/// The process exits when `app` returns: with status 0 on `Ok`, status 1 on `Err` (after logging
/// the error), mirroring what returning from `main` would do.
///
/// # Panics
///
/// Panics when called more than once.
pub fn run(app: impl FnOnce() -> anyhow::Result<()> + Send + 'static) -> ! {
    let event_loop = EventLoopBuilder::with_user_event().build();
    let proxy = event_loop.create_proxy();
    DISPLAY
        .set(Display {
            proxy: Mutex::new(proxy),
        })
        .ok()
        .expect("display already initialized");

    std::thread::spawn(move || match catch_unwind(AssertUnwindSafe(app)) {
        Ok(Ok(())) => process::exit(0),
        Ok(Err(e)) => {
            log::error!("{e:?}");
            process::exit(1);
        }
        // The panic hook has printed the message already; exit with 101 to mimic libstd.
        Err(_payload) => process::exit(101),
    });

    let mut window: Option<Renderer> = None;
    event_loop.run(move |event, target, flow| {
        *flow = ControlFlow::Wait;
        match event {
            Event::UserEvent(Msg::Image { title, res, data }) => {
                let renderer = window.get_or_insert_with(|| {
                    log::debug!("creating window '{title}' at {res}");
                    Renderer::create(target, &title, res).unwrap()
                });
                renderer.update_texture(res, &data);
                renderer.window().request_redraw();
            }
            Event::RedrawRequested(_) => {
                if let Some(renderer) = &mut window {
                    renderer.redraw();
                }
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => EXIT.store(true, Ordering::Relaxed),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => EXIT.store(true, Ordering::Relaxed),
                _ => {}
            },
            _ => {}
        }
    });
}

/// Displays an image in the window, creating it on first use.
///
/// # Panics
///
/// Panics when the display loop is not running (the application was not started via [`run`]).
pub fn show_image(title: impl Into<String>, image: &Image) {
    // Image data is RGBA8 internally so that no conversion before GPU upload is needed.
    let msg = Msg::Image {
        title: title.into(),
        res: image.resolution(),
        data: image.data().to_vec(),
    };

    DISPLAY
        .get()
        .expect("display not initialized")
        .proxy
        .lock()
        .unwrap()
        .send_event(msg)
        .ok()
        .expect("display event loop has shut down");
}

/// Returns whether the user asked to quit (Esc key or window close button).
pub fn exit_requested() -> bool {
    EXIT.load(Ordering::Relaxed)
}
