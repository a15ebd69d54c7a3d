use crate::input::KeyEvent;

/// Browser operation the DOM layer must perform after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserCommand {
    /// Ask the browser to capture the pointer on the canvas.
    RequestPointerLock,
    /// Start delivering mouse motion to the bridge.
    AttachMouseMove,
    /// Stop delivering mouse motion to the bridge.
    DetachMouseMove,
}

/// The embedded application driven by the shell.
///
/// The shell instantiates the application exactly once at startup and
/// owns it for the lifetime of the page. All calls are fire-and-forget;
/// nothing flows back into the shell.
pub trait App: Sized {
    /// Instantiate the application. Called exactly once, at startup.
    fn create() -> Result<Self, String>;

    /// A click landed on the canvas while the pointer was captured.
    fn on_click(&mut self);

    /// A key was released.
    fn on_key_up(&mut self, event: &KeyEvent);

    /// A key was pressed. Key repeat is delivered as-is, not suppressed.
    fn on_key_down(&mut self, event: &KeyEvent);

    /// Relative pointer motion while captured: horizontal delta, then vertical.
    fn on_mouse_move(&mut self, dx: f64, dy: f64);

    /// The window was resized.
    fn on_resize(&mut self);

    /// Per-frame tick with the monotonic timestamp in milliseconds.
    fn update(&mut self, now: f64);
}

/// Event dispatch between the browser and the application.
///
/// Mirrors the pointer-lock state the browser last reported so that
/// click dispatch and mouse-move gating agree with the lock-change
/// notifications. Handlers that need a browser-side follow-up return a
/// [`BrowserCommand`] for the DOM layer to apply.
pub struct Bridge<A> {
    app: A,
    pointer_locked: bool,
}

impl<A: App> Bridge<A> {
    /// Create the application instance. The pointer starts unlocked.
    pub fn create() -> Result<Self, String> {
        Ok(Self {
            app: A::create()?,
            pointer_locked: false,
        })
    }

    /// A click landed on the canvas.
    ///
    /// While unlocked the click only requests pointer capture; the
    /// application hears about clicks only once the pointer is locked.
    pub fn handle_click(&mut self) -> Option<BrowserCommand> {
        if self.pointer_locked {
            self.app.on_click();
            None
        } else {
            Some(BrowserCommand::RequestPointerLock)
        }
    }

    /// The browser reported a pointer-lock change.
    ///
    /// `canvas_locked` is whether the canvas now holds the lock. Only a
    /// transition produces a command; a notification repeating the
    /// current state returns `None`, so the mouse-move listener is never
    /// attached or detached twice.
    pub fn handle_lock_change(&mut self, canvas_locked: bool) -> Option<BrowserCommand> {
        if canvas_locked == self.pointer_locked {
            return None;
        }
        self.pointer_locked = canvas_locked;
        Some(if canvas_locked {
            BrowserCommand::AttachMouseMove
        } else {
            BrowserCommand::DetachMouseMove
        })
    }

    /// Relative pointer motion. Dropped unless the pointer is locked.
    pub fn handle_mouse_move(&mut self, dx: f64, dy: f64) {
        if self.pointer_locked {
            self.app.on_mouse_move(dx, dy);
        }
    }

    pub fn handle_key_up(&mut self, event: &KeyEvent) {
        self.app.on_key_up(event);
    }

    pub fn handle_key_down(&mut self, event: &KeyEvent) {
        self.app.on_key_down(event);
    }

    pub fn handle_resize(&mut self) {
        self.app.on_resize();
    }

    /// One animation frame. `now` comes from the frame callback argument.
    pub fn handle_frame(&mut self, now: f64) {
        self.app.update(now);
    }

    /// The lock state the browser last reported.
    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }
}
