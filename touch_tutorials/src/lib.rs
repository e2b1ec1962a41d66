//! # touch_tutorials
//!
//! Interactive tutorials that teach touch interaction with a LeapMotion
//! controller.  Every tutorial owns a canvas, receives each tracking frame
//! together with the previous one, and repaints from scratch.
//!
//! ## Tutorials
//!
//! | Name | What it teaches |
//! |---|---|
//! | `touchDistance` | Hover vs. touch: the finger grows as it nears the plane, glows when through |
//! | `touchScroll` | Touch and drag a grid; it keeps gliding with momentum after release |
//! | `numberOf` | How many fingers the device sees, and what each count does |
//! | `touchSpeed` | Tap buttons gently; fast jabs are graded red |
//! | `readMore` | Touch a panel to follow its link |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the mouse is the finger.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse move | Finger position (hovering) |
//! | Left button held | Push through the touch plane |
//! | `Up` / `Down` | Hover distance while not pressed |
//! | `0`–`5` | Number of fingers reported |
//! | `P` | Plug / unplug the device |
//! | `Tab` | Next tutorial |
//! | `Q` / `Esc` | Quit |

pub mod error;
pub mod canvas;
pub mod finger;
pub mod button;
pub mod tutorial;
pub mod dispatcher;
pub mod device;
pub mod config;
pub mod viewer;
pub mod app;
