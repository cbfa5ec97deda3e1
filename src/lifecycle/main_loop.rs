//! Main thread event loop
//!
//! On macOS, `global-hotkey` registers Carbon hotkeys whose presses are
//! dispatched by the application event loop. The main thread therefore
//! pumps NSApplication events until shutdown is requested.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

/// Length of one pump slice between checks of the running flag
const TICK: Duration = Duration::from_millis(100);

/// Runs on the main thread until stopped
pub struct MainLoop {
    running: Arc<AtomicBool>,
}

/// Stops a [`MainLoop`] from any thread
#[derive(Clone)]
pub struct MainLoopHandle {
    running: Arc<AtomicBool>,
}

impl MainLoop {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn handle(&self) -> MainLoopHandle {
        MainLoopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Pump the current thread until [`MainLoopHandle::stop`] is called
    pub fn run(&self) {
        let pump = Pump::new();
        debug!(drives_app = pump.drives_app(), "main loop running");
        while self.running.load(Ordering::SeqCst) {
            pump.tick(TICK);
        }
        debug!("main loop stopped");
    }
}

impl Default for MainLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl MainLoopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        wake();
    }
}

/// Dispatches NSApplication events when created on the main thread
#[cfg(target_os = "macos")]
struct Pump {
    app: Option<objc2::rc::Retained<objc2_app_kit::NSApplication>>,
}

#[cfg(target_os = "macos")]
impl Pump {
    fn new() -> Self {
        use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy};
        use objc2_foundation::MainThreadMarker;

        let app = MainThreadMarker::new().map(|mtm| {
            let app = NSApplication::sharedApplication(mtm);
            // No Dock icon or menu bar
            app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
            app
        });
        Self { app }
    }

    fn drives_app(&self) -> bool {
        self.app.is_some()
    }

    fn tick(&self, tick: Duration) {
        use objc2_app_kit::NSEventMask;
        use objc2_foundation::{NSDate, NSDefaultRunLoopMode};

        let Some(app) = &self.app else {
            std::thread::sleep(tick);
            return;
        };

        let until = NSDate::dateWithTimeIntervalSinceNow(tick.as_secs_f64());
        unsafe {
            let event = app.nextEventMatchingMask_untilDate_inMode_dequeue(
                NSEventMask::Any,
                Some(&until),
                NSDefaultRunLoopMode,
                true,
            );
            if let Some(event) = event {
                app.sendEvent(&event);
            }
        }
    }
}

/// Sleeps in slices; there is no application event loop to drive
#[cfg(not(target_os = "macos"))]
struct Pump;

#[cfg(not(target_os = "macos"))]
impl Pump {
    fn new() -> Self {
        Self
    }

    fn drives_app(&self) -> bool {
        false
    }

    fn tick(&self, tick: Duration) {
        std::thread::sleep(tick);
    }
}

/// Cut the current wait on the main run loop short
#[cfg(target_os = "macos")]
fn wake() {
    core_foundation::runloop::CFRunLoop::get_main().stop();
}

#[cfg(not(target_os = "macos"))]
fn wake() {}
