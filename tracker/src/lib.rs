//! Position tracking and grid-map engine for the robot operator console.
//!
//! This crate is compiled both natively (for the console runtime and tests)
//! and to WebAssembly (for the browser map). It owns the tracking state
//! machine end to end: decoding live positional events, reducing them into
//! channel state, animating the rendered device position, converting between
//! grid and pixel space, and turning pointer input into target requests. The
//! host is responsible only for I/O: feeding raw messages and frame
//! timestamps in, and carrying the resulting [`tracking::Action`]s to the
//! backend.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`tracking`] | Top-level [`tracking::TrackingView`] and the canvas-bound [`tracking::GridMap`] |
//! | [`channel`] | Derived live-channel state and the message reducer |
//! | [`message`] | Live-channel wire messages and decoding |
//! | [`transform`] | Grid ⇄ pixel coordinate conversions |
//! | [`animation`] | Eased interpolation of rendered positions |
//! | [`interaction`] | Pointer hover/click state |
//! | [`device`] | Rendered device state and readouts |
//! | [`drive`] | Edge-triggered WASD drive controller |
//! | [`render`] | Scene rendering to a 2D canvas context |
//! | [`consts`] | Shared numeric constants (grid size, padding, durations) |

pub mod animation;
pub mod channel;
pub mod consts;
pub mod device;
pub mod drive;
pub mod interaction;
pub mod message;
pub mod render;
pub mod tracking;
pub mod transform;
