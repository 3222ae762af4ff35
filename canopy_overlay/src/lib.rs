// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Overlay: a deterministic overlay stack for layered UI surfaces.
//!
//! This crate coordinates the floating surfaces of a user interface — popovers,
//! tooltips, modals, pickers — as one ordered stack with a shared open/close
//! protocol. It models:
//!
//! - An **overlay stack** ([`OverlayStack`]) that owns the ordered collection
//!   of open overlays and the global dismissal rules: outside click and Escape
//!   close the top overlay, clicks with modifier keys or non-primary buttons
//!   never dismiss, and a modal on top additionally traps Tab navigation and
//!   captures context-menu events.
//! - **Interaction modes** ([`Interaction`]) that give each overlay its
//!   dismissal and focus policy: `Click`, `Hover`, `Modal`, `Replace`,
//!   `Inline`, and `None`.
//! - A **hover-intent timer** ([`OverlayTimer`]) that debounces delayed opens
//!   and stays warm between consecutive hovers, so moving the pointer along a
//!   row of triggers feels immediate.
//! - The **trigger/content contract** ([`OverlayContent`]) and the document
//!   seams ([`OverlayHost`], [`OverlayElement`]) behind which focus, geometry,
//!   and presentation live.
//!
//! The stack never reads a clock and schedules no callbacks of its own.
//! Opens and closes queue, and [`OverlayStack::settle`] commits them in
//! request order with a host-supplied `u64` millisecond timestamp; hosts call
//! it from their frame callback. This keeps every protocol decision
//! reproducible under test.
//!
//! ## Minimal example
//!
//! A host that only tracks which content is attached, driving a
//! click-to-open popover:
//!
//! ```rust
//! use canopy_overlay::{
//!     Interaction, Key, OpenDetails, OpenOutcome, OverlayElement, OverlayHost, OverlayStack,
//! };
//!
//! struct Element;
//! impl OverlayElement for Element {}
//!
//! #[derive(Default)]
//! struct Host {
//!     attached: Vec<u32>,
//! }
//!
//! impl OverlayHost<u32> for Host {
//!     type Element = Element;
//!
//!     fn create_element(&mut self, _details: &OpenDetails<u32>) -> Element {
//!         Element
//!     }
//!     fn append(&mut self, content: u32) {
//!         self.attached.push(content);
//!     }
//!     fn remove(&mut self, content: u32) {
//!         self.attached.retain(|&c| c != content);
//!     }
//! }
//!
//! let mut stack = OverlayStack::new(Host::default());
//!
//! // Clicking trigger 10 opens content 1; the push commits at the next settle.
//! let outcome = stack.open_overlay(OpenDetails::new(1_u32, 10, Interaction::Click), 0);
//! assert_eq!(outcome, OpenOutcome::Opened);
//! stack.settle(0);
//! assert_eq!(stack.top().map(|overlay| overlay.content()), Some(1));
//!
//! // Escape dismisses the top overlay.
//! stack.handle_keyup(Key::Escape);
//! assert!(stack.is_empty());
//! assert!(stack.host().attached.is_empty());
//! ```
//!
//! The core types are generic over the node identifier `K`, so callers can
//! use any small, copyable handle (a slotmap key, an element id, a DOM
//! reference wrapper). Pointer positions are expressed as [`kurbo::Point`],
//! matching the rest of the Canopy crates.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for
//!   floating-point math; typically used when integrating into embedded or
//!   `no_std` environments.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod active;
mod contract;
mod stack;
mod timer;
mod types;

pub use active::ActiveOverlay;
pub use contract::{OverlayContent, OverlayElement, OverlayHost};
pub use stack::OverlayStack;
pub use timer::OverlayTimer;
pub use types::{
    Interaction, Key, Modifiers, OpenDetails, OpenOutcome, OverlayState, Placement, PointerClick,
    ReceivesFocus, PRIMARY_BUTTON,
};
