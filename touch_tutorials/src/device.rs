//! Frame sources — LeapMotion hardware or mouse/keyboard simulation.
//!
//! Either way the output is a stream of [`DeviceEvent`]s over an `mpsc`
//! channel.  The source runs on its own thread; the receiving end is
//! drained on the render thread, which feeds the dispatcher.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use leap_frame::{FrameSnapshot, Gesture, GestureKind, Hand, InteractionBox, Pointable, TouchZone, Vec3};

// ════════════════════════════════════════════════════════════════════════════
// DeviceEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    Frame(FrameSnapshot),
    DeviceConnected,
    DeviceDisconnected,
    /// The source is shutting down.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// DeviceSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

pub trait DeviceSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<DeviceEvent>);
}

/// Spawn a device source on its own thread and return the receiving end.
pub fn spawn_device_source<S: DeviceSource>(source: S) -> Receiver<DeviceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

/// Exponential smoothing used for stabilized tip positions.
pub fn stabilize(previous: Option<Vec3>, tip: Vec3, follow: f32) -> Vec3 {
    match previous {
        Some(p) => p.add(tip.sub(p).scale(follow)),
        None => tip,
    }
}

/// Velocity between two timestamped tip samples, in mm/s.  Zero when the
/// timestamps do not advance.
pub fn tip_velocity(previous: Vec3, previous_us: i64, tip: Vec3, now_us: i64) -> Vec3 {
    let dt = (now_us - previous_us) as f32 / 1_000_000.0;
    if dt > 0.0 {
        tip.sub(previous).scale(1.0 / dt)
    } else {
        Vec3::zero()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TipTracker — per-finger history for sources that only report raw tips
// ════════════════════════════════════════════════════════════════════════════

struct TipHistory {
    tip:          Vec3,
    timestamp_us: i64,
    stabilized:   Vec3,
    touching:     bool,
}

/// What the tracker derived for one finger in one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipSample {
    pub stabilized:    Vec3,
    pub velocity:      Vec3,
    /// The finger just crossed into the touch zone.
    pub touch_started: bool,
}

/// Keyed by pointable id.  Call [`TipTracker::retain`] with the ids of each
/// finished frame so fingers that vanish (or curl) start fresh next time.
pub struct TipTracker {
    follow: f32,
    tips:   HashMap<i32, TipHistory>,
}

impl TipTracker {
    pub fn new(follow: f32) -> Self {
        TipTracker { follow, tips: HashMap::new() }
    }

    pub fn len(&self) -> usize { self.tips.len() }
    pub fn is_empty(&self) -> bool { self.tips.is_empty() }

    pub fn update(&mut self, id: i32, tip: Vec3, timestamp_us: i64, touching: bool) -> TipSample {
        let previous = self.tips.get(&id);
        let sample = TipSample {
            stabilized: stabilize(previous.map(|h| h.stabilized), tip, self.follow),
            velocity: previous
                .map(|h| tip_velocity(h.tip, h.timestamp_us, tip, timestamp_us))
                .unwrap_or_else(Vec3::zero),
            touch_started: touching && !previous.map_or(false, |h| h.touching),
        };
        self.tips.insert(id, TipHistory { tip, timestamp_us, stabilized: sample.stabilized, touching });
        sample
    }

    /// Forget every finger not in `ids`.
    pub fn retain(&mut self, ids: &[i32]) {
        self.tips.retain(|id, _| ids.contains(id));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Simulation
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the viewer window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer over the tutorial canvas, normalised: `(0, 0)` top-left,
    /// `(1, 1)` bottom-right.  `pressed` pushes the finger through the plane.
    Pointer { u: f32, v: f32, pressed: bool },
    /// Nudge the resting hover distance.
    AdjustHover(f32),
    /// Number of fingers to report, fanned out from the pointer.
    Fingers(u8),
    TogglePlug,
    Quit,
}

const PRESS_DISTANCE: f32 = -0.3;
const MIN_HOVER:      f32 = 0.05;
const DEPTH_EASE:     f32 = 0.35;
const STABILIZE:      f32 = 0.5;
const FINGER_SPACING: f32 = 20.0;
const PALM_DROP:      f32 = 40.0;

/// Turns [`SimInput`] into frames: a synthetic hand that follows the mouse.
///
/// Pressing does not snap the finger through the plane; its depth eases
/// toward the target over a few frames so tip velocity looks like a real tap.
pub struct SimDevice {
    ibox:       InteractionBox,
    hover:      f32,
    fingers:    u8,
    plugged:    bool,
    z:          f32,
    last_tip:   Option<Vec3>,
    stabilized: Option<Vec3>,
    last_zone:  TouchZone,
    frame_id:   i64,
    gesture_id: i32,
}

impl SimDevice {
    pub fn new(ibox: InteractionBox) -> Self {
        let hover = 0.5;
        SimDevice {
            ibox,
            hover,
            fingers:    1,
            plugged:    true,
            z:          hover * ibox.depth / 2.0,
            last_tip:   None,
            stabilized: None,
            last_zone:  TouchZone::Hovering,
            frame_id:   0,
            gesture_id: 0,
        }
    }

    pub fn hover(&self)      -> f32  { self.hover }
    pub fn fingers(&self)    -> u8   { self.fingers }
    pub fn is_plugged(&self) -> bool { self.plugged }

    /// Apply one input.  `dt` is seconds since the previous input.
    pub fn step(&mut self, input: SimInput, timestamp_us: i64, dt: f32) -> Option<DeviceEvent> {
        match input {
            SimInput::Pointer { u, v, pressed } => {
                if !self.plugged {
                    return None;
                }
                Some(DeviceEvent::Frame(self.frame(u, v, pressed, timestamp_us, dt)))
            }
            SimInput::AdjustHover(delta) => {
                self.hover = (self.hover + delta).clamp(MIN_HOVER, 1.0);
                None
            }
            SimInput::Fingers(n) => {
                self.fingers = n;
                None
            }
            SimInput::TogglePlug => {
                self.plugged = !self.plugged;
                self.last_tip = None;
                self.stabilized = None;
                info!(plugged = self.plugged, "simulated device plug toggled");
                Some(if self.plugged { DeviceEvent::DeviceConnected } else { DeviceEvent::DeviceDisconnected })
            }
            SimInput::Quit => Some(DeviceEvent::Quit),
        }
    }

    fn frame(&mut self, u: f32, v: f32, pressed: bool, timestamp_us: i64, dt: f32) -> FrameSnapshot {
        let half_depth = self.ibox.depth / 2.0;
        let target = if pressed { PRESS_DISTANCE } else { self.hover } * half_depth;
        self.z += (target - self.z) * DEPTH_EASE;

        let floor = self.ibox.center.y - self.ibox.height / 2.0;
        let tip = Vec3::new(
            (u - 0.5) * self.ibox.width,
            floor + (1.0 - v) * self.ibox.height,
            self.z,
        );
        let velocity = match self.last_tip {
            Some(last) if dt > 0.0 => tip.sub(last).scale(1.0 / dt),
            _ => Vec3::zero(),
        };
        self.last_tip = Some(tip);
        let stabilized = stabilize(self.stabilized, tip, STABILIZE);
        self.stabilized = Some(stabilized);

        let touch_distance = self.z / half_depth;
        let zone = TouchZone::from_distance(touch_distance);

        let mut frame = FrameSnapshot {
            id: self.frame_id,
            timestamp_us,
            interaction_box: self.ibox,
            ..Default::default()
        };
        self.frame_id += 1;

        for i in 0..self.fingers {
            let shift = Vec3::new(i as f32 * FINGER_SPACING, 0.0, 0.0);
            frame.pointables.push(Pointable {
                id: i as i32,
                hand_id: 1,
                tip_position: tip.add(shift),
                stabilized_tip_position: stabilized.add(shift),
                tip_velocity: velocity,
                touch_distance,
                touch_zone: zone,
            });
        }
        if self.fingers > 0 {
            frame.hands.push(Hand {
                id: 1,
                palm_position: Vec3::new(tip.x, tip.y - PALM_DROP, tip.z),
                palm_velocity: velocity,
            });
            if zone == TouchZone::Touching && self.last_zone != TouchZone::Touching {
                self.gesture_id += 1;
                debug!(id = self.gesture_id, "simulated screen tap");
                frame.gestures.push(Gesture {
                    id: self.gesture_id,
                    kind: GestureKind::ScreenTap,
                    pointable_ids: vec![0],
                });
            }
            self.last_zone = zone;
        }
        frame
    }
}

/// Device source driven by [`SimInput`] events from the viewer window.
pub struct SimDeviceSource {
    pub rx:   Receiver<SimInput>,
    pub ibox: InteractionBox,
}

impl DeviceSource for SimDeviceSource {
    fn run(self: Box<Self>, tx: Sender<DeviceEvent>) {
        let mut device = SimDevice::new(self.ibox);
        let start = Instant::now();
        let mut last = start;
        for input in self.rx {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            let ts = now.duration_since(start).as_micros() as i64;
            match device.step(input, ts, dt) {
                Some(DeviceEvent::Quit) => {
                    let _ = tx.send(DeviceEvent::Quit);
                    return;
                }
                Some(event) => {
                    if tx.send(event).is_err() { return; }
                }
                None => {}
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapDeviceSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Device source backed by a real LeapMotion controller via LeapC.
///
/// LeapC reports hands and joints only, so the touch model is rebuilt here:
/// a virtual touch plane sits at `z = 0` and touch distance is the tip depth
/// over half the interaction-box depth.  A finger counts as a pointable
/// while it is extended.
#[cfg(feature = "leap")]
pub struct LeapDeviceSource {
    pub ibox: InteractionBox,
}

#[cfg(feature = "leap")]
impl DeviceSource for LeapDeviceSource {
    fn run(self: Box<Self>, tx: Sender<DeviceEvent>) {
        use leaprs::*;
        use tracing::error;

        const EXTENDED: f32 = 0.7;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                error!(error = ?e, "failed to create LeapC connection");
                let _ = tx.send(DeviceEvent::Quit);
                return;
            }
        };
        if let Err(e) = connection.open() {
            error!(error = ?e, "failed to open LeapMotion device");
            let _ = tx.send(DeviceEvent::Quit);
            return;
        }

        let half_depth = self.ibox.depth / 2.0;
        let start = Instant::now();
        let mut frame_id = 0i64;
        let mut tracker = TipTracker::new(0.3);
        let mut gesture_id = 0i32;

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            let event = match msg.event() {
                Event::Device { .. } => DeviceEvent::DeviceConnected,
                Event::DeviceLost { .. } => DeviceEvent::DeviceDisconnected,
                Event::Tracking(tracking) => {
                    let mut frame = FrameSnapshot {
                        id: frame_id,
                        timestamp_us: start.elapsed().as_micros() as i64,
                        interaction_box: self.ibox,
                        ..Default::default()
                    };
                    frame_id += 1;

                    for hand in tracking.hands() {
                        let hand_id = hand.id() as i32;
                        let palm = hand.palm();
                        let pp = palm.position();
                        let pv = palm.velocity();
                        let palm_velocity = Vec3::new(pv.x, pv.y, pv.z);
                        frame.hands.push(Hand {
                            id: hand_id,
                            palm_position: Vec3::new(pp.x, pp.y, pp.z),
                            palm_velocity,
                        });

                        for (i, digit) in hand.digits().enumerate() {
                            if finger_extension(&digit) < EXTENDED {
                                continue;
                            }
                            let t = digit.distal().next_joint();
                            let tip = Vec3::new(t.x, t.y, t.z);
                            let id = hand_id * 10 + i as i32;

                            let touch_distance = (tip.z / half_depth).clamp(-1.0, 1.0);
                            let zone = if tip.z > half_depth {
                                TouchZone::None
                            } else {
                                TouchZone::from_distance(touch_distance)
                            };
                            let sample = tracker.update(id, tip, frame.timestamp_us, zone.is_touching());
                            if sample.touch_started {
                                gesture_id += 1;
                                frame.gestures.push(Gesture {
                                    id: gesture_id,
                                    kind: GestureKind::ScreenTap,
                                    pointable_ids: vec![id],
                                });
                            }
                            frame.pointables.push(Pointable {
                                id,
                                hand_id,
                                tip_position: tip,
                                stabilized_tip_position: sample.stabilized,
                                tip_velocity: sample.velocity,
                                touch_distance,
                                touch_zone: zone,
                            });
                        }
                    }
                    let ids: Vec<i32> = frame.pointables.iter().map(|p| p.id).collect();
                    tracker.retain(&ids);
                    DeviceEvent::Frame(frame)
                }
                _ => continue,
            };

            if tx.send(event).is_err() { return; }
        }
    }
}

#[cfg(feature = "leap")]
fn finger_extension(digit: &leaprs::Digit) -> f32 {
    // Ratio of (tip – metacarpal base) distance to a typical finger length.
    // 1.0 = fully extended, ~0.0 = fully curled.
    let base = digit.metacarpal().prev_joint();
    let tip  = digit.distal().next_joint();
    let dx   = tip.x - base.x;
    let dy   = tip.y - base.y;
    let dz   = tip.z - base.z;
    let dist = (dx*dx + dy*dy + dz*dz).sqrt();
    (dist / 80.0).clamp(0.0, 1.0)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const DT: f32 = 1.0 / 60.0;

    fn pointer(sim: &mut SimDevice, u: f32, v: f32, pressed: bool) -> FrameSnapshot {
        match sim.step(SimInput::Pointer { u, v, pressed }, 0, DT) {
            Some(DeviceEvent::Frame(f)) => f,
            other => panic!("expected a frame, got {:?}", other),
        }
    }

    #[test]
    fn pointer_maps_into_interaction_box() {
        let ibox = InteractionBox::default();
        let mut sim = SimDevice::new(ibox);
        let f = pointer(&mut sim, 0.5, 1.0, false);
        let p = f.first_pointable().unwrap();
        assert_eq!(p.tip_position.x, 0.0);
        assert_eq!(p.tip_position.y, ibox.center.y - ibox.height / 2.0);
        let (x, y) = ibox.to_canvas(p.tip_position, 300.0, 200.0);
        assert_eq!((x, y), (0.0, 0.0));
    }

    #[test]
    fn press_eases_through_plane() {
        let mut sim = SimDevice::new(InteractionBox::default());
        let first = pointer(&mut sim, 0.5, 0.5, true);
        assert_eq!(first.first_pointable().unwrap().touch_zone, TouchZone::Hovering);
        let mut touched = None;
        for i in 0..20 {
            let f = pointer(&mut sim, 0.5, 0.5, true);
            if f.is_touching() {
                touched = Some((i, f));
                break;
            }
        }
        let (_, f) = touched.expect("finger should reach the plane");
        assert!(f.first_pointable().unwrap().tip_velocity.z < 0.0);
        assert_eq!(f.gestures.len(), 1);
        assert_eq!(f.gestures[0].kind, GestureKind::ScreenTap);
        // Holding the press does not tap again.
        let held = pointer(&mut sim, 0.5, 0.5, true);
        assert!(held.gestures.is_empty());
    }

    #[test]
    fn fingers_fan_out_from_pointer() {
        let mut sim = SimDevice::new(InteractionBox::default());
        sim.step(SimInput::Fingers(3), 0, DT);
        let f = pointer(&mut sim, 0.5, 0.5, false);
        assert_eq!(f.pointables.len(), 3);
        assert_eq!(f.hands.len(), 1);
        assert_eq!(f.pointables[2].tip_position.x, 2.0 * FINGER_SPACING);

        sim.step(SimInput::Fingers(0), 0, DT);
        let f = pointer(&mut sim, 0.5, 0.5, false);
        assert!(f.pointables.is_empty());
        assert!(f.hands.is_empty());
    }

    #[test]
    fn unplugged_device_sends_no_frames() {
        let mut sim = SimDevice::new(InteractionBox::default());
        assert_eq!(sim.step(SimInput::TogglePlug, 0, DT), Some(DeviceEvent::DeviceDisconnected));
        assert_eq!(sim.step(SimInput::Pointer { u: 0.5, v: 0.5, pressed: false }, 0, DT), None);
        assert_eq!(sim.step(SimInput::TogglePlug, 0, DT), Some(DeviceEvent::DeviceConnected));
        assert!(matches!(
            sim.step(SimInput::Pointer { u: 0.5, v: 0.5, pressed: false }, 0, DT),
            Some(DeviceEvent::Frame(_))
        ));
    }

    #[test]
    fn hover_adjustment_is_bounded() {
        let mut sim = SimDevice::new(InteractionBox::default());
        sim.step(SimInput::AdjustHover(-5.0), 0, DT);
        assert_eq!(sim.hover(), MIN_HOVER);
        sim.step(SimInput::AdjustHover(5.0), 0, DT);
        assert_eq!(sim.hover(), 1.0);
    }

    #[test]
    fn frame_ids_increase() {
        let mut sim = SimDevice::new(InteractionBox::default());
        let a = pointer(&mut sim, 0.2, 0.2, false);
        let b = pointer(&mut sim, 0.3, 0.2, false);
        assert_eq!(b.id, a.id + 1);
        assert!(b.first_pointable().unwrap().tip_velocity.x > 0.0);
    }

    #[test]
    fn stabilize_moves_part_way() {
        let s = stabilize(Some(Vec3::zero()), Vec3::new(10.0, 0.0, 0.0), 0.5);
        assert_eq!(s, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(stabilize(None, Vec3::new(1.0, 2.0, 3.0), 0.5), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn tip_velocity_uses_timestamp_delta() {
        // 20 mm toward the plane in 50 ms.
        let v = tip_velocity(Vec3::new(0.0, 0.0, 30.0), 1_000_000, Vec3::new(0.0, 0.0, 10.0), 1_050_000);
        assert!((v.z + 400.0).abs() < 1e-2);
        assert_eq!(tip_velocity(Vec3::zero(), 5, Vec3::new(1.0, 1.0, 1.0), 5), Vec3::zero());
    }

    #[test]
    fn tracker_reports_tip_not_palm_motion() {
        let mut tracker = TipTracker::new(0.3);
        let first = tracker.update(11, Vec3::new(0.0, 150.0, 30.0), 0, false);
        assert_eq!(first.velocity, Vec3::zero());
        assert_eq!(first.stabilized, Vec3::new(0.0, 150.0, 30.0));
        let dip = tracker.update(11, Vec3::new(0.0, 150.0, 10.0), 50_000, false);
        assert!((dip.velocity.z + 400.0).abs() < 1e-2);
        assert!(dip.stabilized.z > 10.0 && dip.stabilized.z < 30.0);
    }

    #[test]
    fn tracker_taps_once_per_touch() {
        let mut tracker = TipTracker::new(0.3);
        let tip = Vec3::new(0.0, 150.0, -5.0);
        assert!(tracker.update(11, tip, 0, true).touch_started);
        assert!(!tracker.update(11, tip, 10_000, true).touch_started);
        assert!(!tracker.update(11, tip, 20_000, false).touch_started);
        assert!(tracker.update(11, tip, 30_000, true).touch_started);
    }

    #[test]
    fn retain_forgets_missing_fingers() {
        let mut tracker = TipTracker::new(0.3);
        let tip = Vec3::new(0.0, 150.0, -5.0);
        tracker.update(11, tip, 0, true);
        tracker.update(12, tip, 0, false);
        tracker.update(21, tip, 0, false);
        tracker.retain(&[12]);
        assert_eq!(tracker.len(), 1);

        // A finger that curled away while touching taps again when it returns.
        assert!(tracker.update(11, tip, 40_000, true).touch_started);
        // And its velocity starts from scratch rather than spanning the gap.
        assert_eq!(tracker.update(21, Vec3::new(50.0, 150.0, -5.0), 40_000, false).velocity, Vec3::zero());
    }

    #[test]
    fn sim_source_forwards_and_quits() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let rx = spawn_device_source(SimDeviceSource { rx: sim_rx, ibox: InteractionBox::default() });
        sim_tx.send(SimInput::Pointer { u: 0.5, v: 0.5, pressed: false }).unwrap();
        sim_tx.send(SimInput::Quit).unwrap();
        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(matches!(first, DeviceEvent::Frame(_)));
        assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), DeviceEvent::Quit);
    }
}
