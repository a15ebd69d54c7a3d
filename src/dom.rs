use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};

use crate::bridge::{App, Bridge, BrowserCommand};
use crate::input::KeyEvent;

/// Wire the bridge to the page and start the frame loop.
///
/// Locates the element with id "canvas", creates the application
/// instance, registers the event listeners, and kicks off the
/// self-perpetuating animation-frame loop. Fails if the canvas is
/// missing; the error surfaces as a thrown exception at the wasm
/// boundary.
pub fn run<A: App + 'static>() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document
        .get_element_by_id("canvas")
        .ok_or("Canvas not found")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| "Element is not a canvas")?;

    // Key events only reach the canvas once it can take focus.
    canvas.set_tab_index(0);

    let bridge = Bridge::<A>::create().map_err(|e| JsValue::from_str(&e))?;
    let bridge = Rc::new(RefCell::new(bridge));

    // The mouse-move listener is attached and detached as pointer lock
    // comes and goes. Adding and removing must hand the browser the same
    // function object, so the closure is leaked once and only its JS
    // handle is kept.
    let mouse_move_fn = {
        let bridge = bridge.clone();
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            bridge
                .borrow_mut()
                .handle_mouse_move(f64::from(event.movement_x()), f64::from(event.movement_y()));
        });
        let function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        closure.forget();
        function
    };

    // click: request pointer capture while unlocked, forward while locked
    {
        let bridge = bridge.clone();
        let canvas_ref = canvas.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            if bridge.borrow_mut().handle_click() == Some(BrowserCommand::RequestPointerLock) {
                canvas_ref.request_pointer_lock();
            }
        });
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // keyup / keydown, forwarded as-is
    {
        let bridge = bridge.clone();
        let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            bridge.borrow_mut().handle_key_up(&key_event(&event));
        });
        canvas.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let bridge = bridge.clone();
        let closure = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            bridge.borrow_mut().handle_key_down(&key_event(&event));
        });
        canvas.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // pointerlockchange: observe who holds the lock, toggle the
    // mouse-move listener on transitions
    {
        let bridge = bridge.clone();
        let document_ref = document.clone();
        let canvas_element = Element::from(canvas.clone());
        let mouse_move_fn = mouse_move_fn.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let locked = document_ref
                .pointer_lock_element()
                .map(|element| element == canvas_element)
                .unwrap_or(false);

            let command = bridge.borrow_mut().handle_lock_change(locked);
            match command {
                Some(BrowserCommand::AttachMouseMove) => {
                    log::info!("pointer lock acquired");
                    document_ref
                        .add_event_listener_with_callback("mousemove", &mouse_move_fn)
                        .expect("failed to add mousemove listener");
                }
                Some(BrowserCommand::DetachMouseMove) => {
                    log::info!("pointer lock released");
                    document_ref
                        .remove_event_listener_with_callback("mousemove", &mouse_move_fn)
                        .expect("failed to remove mousemove listener");
                }
                _ => {}
            }
        });
        document
            .add_event_listener_with_callback("pointerlockchange", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // resize, forwarded without debouncing
    {
        let bridge = bridge.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            bridge.borrow_mut().handle_resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop(&window, bridge)?;

    log::info!("canvas shell running");

    Ok(())
}

/// Start the self-perpetuating animation-frame loop.
///
/// Each invocation hands the application the current high-resolution
/// timestamp and reschedules itself. The loop is never cancelled; the
/// Rc cycle keeps the closure alive for the page lifetime.
fn start_frame_loop<A: App + 'static>(
    window: &Window,
    bridge: Rc<RefCell<Bridge<A>>>,
) -> Result<(), JsValue> {
    let holder: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let starter = holder.clone();

    let window_ref = window.clone();
    *starter.borrow_mut() = Some(Closure::new(move || {
        let now = window_ref.performance().map(|p| p.now()).unwrap_or(0.0);
        bridge.borrow_mut().handle_frame(now);
        request_frame(
            &window_ref,
            holder.borrow().as_ref().expect("frame closure missing"),
        )
        .expect("requestAnimationFrame failed");
    }));

    request_frame(
        window,
        starter.borrow().as_ref().expect("frame closure missing"),
    )
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Result<(), JsValue> {
    // The request id is unused: the loop runs for the page lifetime.
    window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    Ok(())
}

fn key_event(event: &KeyboardEvent) -> KeyEvent {
    KeyEvent::new(&event.key(), &event.code(), event.repeat())
}
