// SPDX-License-Identifier: GPL-3.0-only

//! Glassboard - animation and layout core for a translucent on-screen
//! keyboard.
//!
//! This crate is the engine behind a floating soft-keyboard overlay: it
//! computes key geometry, runs the keyframe transform animations, performs
//! hit-testing for the matrix and the extra-keys popup, and reports
//! triggered key actions. It deliberately stops at the data boundary —
//! rendering, keystroke injection, window management and configuration
//! files are external collaborators.
//!
//! # Architecture
//!
//! - [`animation`]: easing library, transform keyframes, timelines and the
//!   per-tick animator registry
//! - [`layout`]: the serde data model for layouts, the key matrix sizer and
//!   the canvas size resolver
//! - [`board`]: the keyboard hub — laid-out key matrix, popup layer, role
//!   registry and pointer interaction
//! - [`input`]: interaction mode, modifier tracking and the debounced
//!   key-holding timer
//! - [`events`]: observer lists for resize/layout/action notifications
//! - [`tick`]: frame clock helpers for the external tick driver
//!
//! # Driving the core
//!
//! The embedding application owns the loop: it forwards window resizes to
//! [`Keyboard::set_canvas_size`], pointer events to the `pointer_*`
//! methods, and calls [`Keyboard::update`] once per rendered frame with
//! the elapsed seconds. Everything the renderer needs — key rectangles,
//! label caches, the popup's interpolated transform — is readable between
//! ticks.

pub mod animation;
pub mod app_settings;
pub mod board;
pub mod events;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod tick;

pub use board::{Keyboard, KeyRef};

// ============================================================================
// Integration Tests
// ============================================================================
