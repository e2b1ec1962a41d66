//! Top-level application loop.
//!
//! `App` owns the dispatcher and everything it was built from.  Each pass
//! of the loop polls the window, drains device events into the dispatcher,
//! reveals placeholders that have waited long enough, and renders the
//! selected tutorial.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use leap_frame::InteractionBox;

use crate::config::AppConfig;
use crate::device::{spawn_device_source, DeviceEvent};
use crate::dispatcher::FrameDispatcher;
use crate::error::Result;
use crate::tutorial::{canvas_size, Tutorial, TutorialEvent};
use crate::viewer::Viewer;

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App {
    dispatcher:        FrameDispatcher,
    placeholder_delay: Duration,
    connected:         bool,
    frames:            u64,
    last_event:        Option<TutorialEvent>,
}

impl App {
    pub fn new(cfg: &AppConfig) -> Self {
        let mut dispatcher = FrameDispatcher::new();
        for t in &cfg.tutorials {
            let mut tutorial = Tutorial::for_viewport(t.name(), &t.kind, cfg.viewport_height);
            tutorial.set_active(t.active);
            dispatcher.register(tutorial);
        }
        info!(tutorials = dispatcher.len(), "tutorials registered");
        App {
            dispatcher,
            placeholder_delay: cfg.placeholder_delay(),
            connected:         false,
            frames:            0,
            last_event:        None,
        }
    }

    pub fn dispatcher(&self) -> &FrameDispatcher { &self.dispatcher }
    pub fn is_connected(&self) -> bool { self.connected }
    pub fn frames(&self) -> u64 { self.frames }

    /// Process one device event.  Returns false once the source has quit.
    pub fn handle(&mut self, event: DeviceEvent) -> bool {
        match &event {
            DeviceEvent::Quit               => return false,
            DeviceEvent::Frame(_) => {
                // Only the very first frame connects; later frames leave the link alone.
                if self.dispatcher.previous_frame().is_none() {
                    self.connected = true;
                }
                self.frames += 1;
            }
            DeviceEvent::DeviceConnected    => self.connected = true,
            DeviceEvent::DeviceDisconnected => self.connected = false,
        }
        for e in self.dispatcher.handle(event) {
            match &e {
                TutorialEvent::Navigate { tutorial, target } => {
                    info!(%tutorial, link = %target, "open link");
                }
            }
            self.last_event = Some(e);
        }
        true
    }

    /// Drain everything queued on `rx`.  Returns false once the source is gone.
    pub fn drain(&mut self, rx: &Receiver<DeviceEvent>) -> bool {
        loop {
            match rx.try_recv() {
                Ok(event) => {
                    if !self.handle(event) { return false; }
                }
                Err(TryRecvError::Empty)        => return true,
                Err(TryRecvError::Disconnected) => {
                    warn!("device source disconnected");
                    return false;
                }
            }
        }
    }

    /// Per-loop housekeeping.
    pub fn tick(&mut self, elapsed: Duration) {
        let delay = self.placeholder_delay;
        for t in self.dispatcher.iter_mut().filter(|t| t.is_active()) {
            t.poll_placeholder(elapsed, delay);
        }
    }

    pub fn status(&self, selected: usize) -> String {
        let name = self.dispatcher.iter().nth(selected).map(|t| t.name()).unwrap_or("-");
        let link = if self.connected { "CONNECTED" } else { "NO DEVICE" };
        let mut s = format!("{}  {}  FRAMES {}", name, link, self.frames);
        if let Some(TutorialEvent::Navigate { target, .. }) = &self.last_event {
            s.push_str("  LINK ");
            s.push_str(target);
        }
        s
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> Result<()> {
    cfg.validate()?;
    let (canvas_w, canvas_h) = canvas_size(cfg.viewport_height);
    let ibox = InteractionBox::default();

    // ── Device source ─────────────────────────────────────────────────────
    #[cfg(feature = "leap")]
    let (device_rx, sim_tx) = {
        info!("device: LeapMotion hardware");
        (spawn_device_source(crate::device::LeapDeviceSource { ibox }), None)
    };
    #[cfg(not(feature = "leap"))]
    let (device_rx, sim_tx) = {
        info!("device: mouse simulation");
        let (sim_tx, sim_rx) = std::sync::mpsc::channel();
        (
            spawn_device_source(crate::device::SimDeviceSource { rx: sim_rx, ibox }),
            Some(sim_tx),
        )
    };

    let mut app = App::new(&cfg);
    let names: Vec<String> = app.dispatcher().iter().map(|t| t.name().to_string()).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut viewer = Viewer::new(canvas_w, canvas_h, names.len(), cfg.initial_tab, sim_tx)?;
    let started = Instant::now();

    // ── Main loop ─────────────────────────────────────────────────────────
    while viewer.is_open() {
        if !viewer.poll_input(&name_refs) { break; }
        if !app.drain(&device_rx) { break; }
        app.tick(started.elapsed());
        let status = app.status(viewer.selected());
        viewer.render(app.dispatcher(), &status);
    }

    info!(frames = app.frames(), "viewer closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
