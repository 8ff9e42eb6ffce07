//! # gesture_particles
//!
//! A spinning point-cloud template whose size follows the distance between
//! your two index fingertips, with a software-rendered visualizer.
//!
//! ## Gesture → scale mapping
//!
//! | Hands in view | Effect |
//! |---|---|
//! | none | scale snaps back to 1.0 |
//! | one | scale shrinks slowly (× 0.98 per detection) |
//! | two | fingertip distance 0.05–0.3 maps onto scale 0.5–2.0 |
//!
//! The field and its translucent dome are scaled together every frame; the
//! field also spins slowly about X and Y.
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**: keyboard keys stand in for the camera.
//! * `leap`: **Hardware mode**: polls a real LeapMotion controller via LeapC.
//!
//! ### Keyboard
//!
//! | Key | Action |
//! |---|---|
//! | `1`–`6` | sphere / heart / flower / saturn / buddha / fireworks |
//! | `C` | next color |
//! | `+` / `-` | double / halve the particle count |
//! | `H` | start hand tracking |
//! | `R` | reset scale to 1.0 |
//! | `Q` / `Escape` | quit |
//!
//! ### Simulation keys
//!
//! | Key | Simulated hands |
//! |---|---|
//! | `N` / `O` / `B` | none / one / both hands in view |
//! | `Up` / hold | spread the fingertips |
//! | `Down` / hold | bring the fingertips together |

pub mod detection;
pub mod sim;
#[cfg(feature = "leap")]
pub mod leap;
pub mod render_loop;
pub mod visualizer;
pub mod app;
