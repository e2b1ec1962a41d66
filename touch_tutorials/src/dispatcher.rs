//! Frame fan-out.
//!
//! The dispatcher owns every tutorial in registration order and turns the
//! device's three notifications (frame, connect, disconnect) into calls on
//! the active ones.  It keeps the current and previous frame so each
//! tutorial can compare the two.  Everything runs on the caller's thread;
//! a frame is fully drawn by every active tutorial before `on_frame`
//! returns.

use tracing::{debug, info};

use leap_frame::FrameSnapshot;

use crate::device::DeviceEvent;
use crate::tutorial::{Tutorial, TutorialEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TutorialId(usize);

impl TutorialId {
    pub fn index(self) -> usize { self.0 }
}

#[derive(Default)]
pub struct FrameDispatcher {
    tutorials: Vec<Tutorial>,
    current:   Option<FrameSnapshot>,
    previous:  Option<FrameSnapshot>,
}

impl FrameDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tutorial; it draws after everything registered before it.
    pub fn register(&mut self, tutorial: Tutorial) -> TutorialId {
        debug!(tutorial = tutorial.name(), active = tutorial.is_active(), "registered");
        self.tutorials.push(tutorial);
        TutorialId(self.tutorials.len() - 1)
    }

    pub fn len(&self) -> usize { self.tutorials.len() }
    pub fn is_empty(&self) -> bool { self.tutorials.is_empty() }

    pub fn get(&self, id: TutorialId) -> Option<&Tutorial> {
        self.tutorials.get(id.0)
    }

    pub fn get_mut(&mut self, id: TutorialId) -> Option<&mut Tutorial> {
        self.tutorials.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tutorial> {
        self.tutorials.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tutorial> {
        self.tutorials.iter_mut()
    }

    pub fn find(&self, name: &str) -> Option<TutorialId> {
        self.tutorials.iter().position(|t| t.name() == name).map(TutorialId)
    }

    pub fn set_active(&mut self, id: TutorialId, active: bool) {
        if let Some(t) = self.tutorials.get_mut(id.0) {
            t.set_active(active);
        }
    }

    pub fn current_frame(&self)  -> Option<&FrameSnapshot> { self.current.as_ref() }
    pub fn previous_frame(&self) -> Option<&FrameSnapshot> { self.previous.as_ref() }

    /// Route one device notification.
    pub fn handle(&mut self, event: DeviceEvent) -> Vec<TutorialEvent> {
        match event {
            DeviceEvent::Frame(frame)       => self.on_frame(frame),
            DeviceEvent::DeviceConnected    => { self.on_device_connected(); Vec::new() }
            DeviceEvent::DeviceDisconnected => { self.on_device_disconnected(); Vec::new() }
            DeviceEvent::Quit               => Vec::new(),
        }
    }

    /// Draw `frame` on every active tutorial, in registration order.
    ///
    /// The very first frame counts as a connect: a device that was plugged
    /// in before we started never sends a connect notification.
    pub fn on_frame(&mut self, frame: FrameSnapshot) -> Vec<TutorialEvent> {
        if self.previous.is_none() {
            info!("first frame received; treating device as connected");
            self.previous = Some(frame.clone());
            self.on_device_connected();
        }

        let current: &FrameSnapshot = self.current.insert(frame);
        let previous = self.previous.as_ref().unwrap_or(current);

        let mut events = Vec::new();
        for t in self.tutorials.iter_mut().filter(|t| t.is_active()) {
            t.draw(current, previous, &mut events);
        }

        self.previous = self.current.take();
        events
    }

    pub fn on_device_connected(&mut self) {
        for t in self.tutorials.iter_mut().filter(|t| t.is_active()) {
            t.device_connect();
        }
    }

    pub fn on_device_disconnected(&mut self) {
        for t in self.tutorials.iter_mut().filter(|t| t.is_active()) {
            t.device_disconnect();
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutorial::{LinkState, Scene, Stage};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Scene that records its name and the ids of the frames it saw.
    struct Probe {
        name: &'static str,
        log:  Log,
    }

    impl Scene for Probe {
        fn draw(&mut self, stage: &mut Stage<'_>) {
            self.log
                .borrow_mut()
                .push(format!("{}:{}<{}", self.name, stage.frame.id, stage.previous.id));
        }
    }

    fn probe(name: &'static str, log: &Log) -> Tutorial {
        Tutorial::new(name, 20, 10, Box::new(Probe { name, log: Rc::clone(log) }))
    }

    fn frame(id: i64) -> FrameSnapshot {
        FrameSnapshot { id, ..Default::default() }
    }

    #[test]
    fn draws_active_in_registration_order() {
        let log: Log = Rc::default();
        let mut d = FrameDispatcher::new();
        d.register(probe("A", &log));
        let b = d.register(probe("B", &log));
        d.register(probe("C", &log));
        d.set_active(b, false);

        d.on_frame(frame(1));
        assert_eq!(*log.borrow(), vec!["A:1<1", "C:1<1"]);
    }

    #[test]
    fn previous_frame_trails_by_one() {
        let log: Log = Rc::default();
        let mut d = FrameDispatcher::new();
        d.register(probe("A", &log));
        d.on_frame(frame(1));
        d.on_frame(frame(2));
        d.on_frame(frame(3));
        assert_eq!(*log.borrow(), vec!["A:1<1", "A:2<1", "A:3<2"]);
        assert_eq!(d.previous_frame().map(|f| f.id), Some(3));
        assert!(d.current_frame().is_none());
    }

    #[test]
    fn first_frame_connects_active_only() {
        let log: Log = Rc::default();
        let mut d = FrameDispatcher::new();
        let a = d.register(probe("A", &log));
        let b = d.register(probe("B", &log));
        d.set_active(b, false);
        d.on_frame(frame(1));
        assert_eq!(d.get(a).unwrap().link(), LinkState::Connected);
        assert_eq!(d.get(b).unwrap().link(), LinkState::Disconnected);
        assert_eq!(d.get(b).unwrap().frames_drawn(), 0);
    }

    #[test]
    fn lifecycle_events_reach_active_tutorials() {
        let log: Log = Rc::default();
        let mut d = FrameDispatcher::new();
        let a = d.register(probe("A", &log));
        let b = d.register(probe("B", &log));
        d.set_active(b, false);

        d.handle(DeviceEvent::DeviceConnected);
        assert!(d.get(a).unwrap().is_plugged_in());
        assert!(!d.get(b).unwrap().is_plugged_in());

        d.handle(DeviceEvent::DeviceDisconnected);
        assert!(!d.get(a).unwrap().is_plugged_in());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn disconnect_does_not_stop_frames() {
        let log: Log = Rc::default();
        let mut d = FrameDispatcher::new();
        let a = d.register(probe("A", &log));
        d.on_frame(frame(1));
        d.on_device_disconnected();
        d.on_frame(frame(2));
        // Later frames never re-run the implicit connect.
        assert_eq!(d.get(a).unwrap().link(), LinkState::Disconnected);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn reactivated_tutorial_resumes() {
        let log: Log = Rc::default();
        let mut d = FrameDispatcher::new();
        let a = d.register(probe("A", &log));
        d.set_active(a, false);
        d.on_frame(frame(1));
        d.set_active(a, true);
        d.on_frame(frame(2));
        assert_eq!(*log.borrow(), vec!["A:2<1"]);
        assert_eq!(d.find("A"), Some(a));
    }
}
