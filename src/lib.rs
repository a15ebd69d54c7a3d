//! Browser canvas shell.
//!
//! Forwards DOM input events (click, keyboard, pointer-locked mouse
//! motion, window resize) and animation frames to an embedded
//! application implementing [`App`]. Pointer lock is requested on click
//! and mouse deltas only flow while the canvas holds the capture.
//!
//! The event dispatch lives in [`bridge`] and is browser-free; the DOM
//! wiring in [`dom`] exists only on wasm32 and drives the bridge from
//! the page.

pub mod bridge;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod input;

pub use bridge::{App, Bridge, BrowserCommand};
#[cfg(target_arch = "wasm32")]
pub use dom::run;
pub use input::KeyEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Module start hook: installs the panic hook and the console logger.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("canvas shell initialized");
}
