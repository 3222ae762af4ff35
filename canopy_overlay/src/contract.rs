// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seams between the coordinator and its collaborators.
//!
//! Three traits bound the core:
//!
//! - [`OverlayContent`]: the trigger/content contract. Components that want
//!   lifecycle callbacks declare conformance once, at registration, instead
//!   of being capability-checked on every call.
//! - [`OverlayElement`]: the narrow per-overlay visual contract. Position
//!   calculation and animation live behind it; the coordinator only drives
//!   the lifecycle.
//! - [`OverlayHost`]: the document collaborator — element factory, focus and
//!   containment queries, tab trapping, and event dispatch.
//!
//! All methods other than the host's element factory and attachment have
//! default implementations, so hosts and elements implement exactly the
//! surface they care about.

use kurbo::Point;

use crate::types::{Interaction, OpenDetails};

/// Lifecycle hooks a content element may conform to.
///
/// Registered per content key via
/// [`OverlayStack::register_content`](crate::OverlayStack::register_content).
/// Unregistered content participates fully in the stack but receives no
/// callbacks and no open-flag writes.
pub trait OverlayContent<K> {
    /// The coordinator flips this when an open or close completes.
    fn set_open(&mut self, open: bool);

    /// Called before a (possibly delayed) open is attempted.
    fn will_open(&mut self, trigger: K) {
        let _ = trigger;
    }

    /// Called once the overlay has been committed to the stack.
    fn opened(&mut self, trigger: K) {
        let _ = trigger;
    }

    /// Called when a delayed open was cancelled before its delay elapsed.
    /// Fires exactly once per cancelled request; the overlay never existed.
    fn open_cancelled(&mut self, trigger: K) {
        let _ = trigger;
    }

    /// Called when the overlay has been hidden.
    fn closed(&mut self, trigger: K) {
        let _ = trigger;
    }
}

/// The per-overlay visual element, created by the host's factory.
///
/// Every method has a no-op default so presentation-free elements (tests,
/// headless ports) can write `impl OverlayElement for T {}`.
pub trait OverlayElement {
    /// Complete the opening presentation. Runs after the overlay is pushed
    /// onto the stack, before the content's open flag flips.
    fn open(&mut self) {}

    /// Run the exit presentation. Return `true` when the exit finished; an
    /// element may return `false` to report an interrupted exit, leaving the
    /// overlay in `Closing` until a later close request resumes it.
    fn close(&mut self, animated: bool) -> bool {
        let _ = animated;
        true
    }

    /// De-emphasize beneath a newly opened overlay of the given interaction.
    fn obscure(&mut self, by: Interaction) {
        let _ = by;
    }

    /// Re-promote to the active presentation after the overlay above closed.
    fn feature(&mut self) {}

    /// Move focus into the overlay.
    fn focus(&mut self) {}

    /// Recompute the trigger-relative position (resize pass).
    fn update_position(&mut self) {}

    /// Release visual resources. Called after removal from the document.
    fn dispose(&mut self) {}
}

/// The document the stack operates on.
///
/// Keys are host-chosen copyable handles; the host owns every element
/// lifetime. Queries have conservative defaults (`None`/`false`) so a host
/// only implements what its document model supports.
pub trait OverlayHost<K> {
    /// The visual element type produced by [`create_element`](Self::create_element).
    type Element: OverlayElement;

    /// Build the visual element for an open request.
    fn create_element(&mut self, details: &OpenDetails<K>) -> Self::Element;

    /// Attach the content element to the overlay root.
    fn append(&mut self, content: K);

    /// Detach the content element from the overlay root.
    fn remove(&mut self, content: K);

    /// Called once, before the first overlay opens, so the host can bind its
    /// global listeners.
    fn attach_listeners(&mut self) {}

    /// Move document focus to `node`.
    fn focus_element(&mut self, node: K) {
        let _ = node;
    }

    /// The currently focused element, if any.
    fn active_element(&self) -> Option<K> {
        None
    }

    /// Whether `node` lives inside `ancestor`, crossing shadow boundaries.
    fn contains(&self, ancestor: K, node: K) -> bool {
        let _ = (ancestor, node);
        false
    }

    /// The root (document or shadow root) containing `node`.
    fn root_of(&self, node: K) -> K {
        node
    }

    /// The shadow host of `root`, when `root` is a shadow root.
    fn host_of(&self, root: K) -> Option<K> {
        let _ = root;
        None
    }

    /// Prepare the document for tab trapping (wrap the body content in a
    /// trap container). Idempotent; called at most once per stack. Return
    /// `false` when the document cannot trap, disabling trapping for the
    /// stack's lifetime.
    fn init_tab_trap(&mut self) -> bool {
        true
    }

    /// Engage or release the tab trap prepared by
    /// [`init_tab_trap`](Self::init_tab_trap).
    fn set_tab_trap(&mut self, active: bool) {
        let _ = active;
    }

    /// The element at `position`, searched within `within`'s shadow root, or
    /// within the document when `within` is `None`. The coordinator descends
    /// nested shadow boundaries by calling this repeatedly.
    fn element_from_point(&self, within: Option<K>, position: Point) -> Option<K> {
        let _ = (within, position);
        None
    }

    /// Re-dispatch a context menu at the element under the pointer, after a
    /// modal overlay swallowed the original.
    fn dispatch_context_menu(&mut self, target: K, position: Point) {
        let _ = (target, position);
    }

    /// Dispatch the cancelable, composed `closed` notification on the
    /// trigger. Return `false` when a listener cancelled it.
    fn dispatch_closed(&mut self, trigger: K, interaction: Interaction) -> bool {
        let _ = (trigger, interaction);
        true
    }

    /// Hand a Tab keystroke back to the trigger (replace-interaction close).
    fn redispatch_tab(&mut self, trigger: K, shift: bool) {
        let _ = (trigger, shift);
    }

    /// Place a transient, zero-duration focusable anchor immediately after
    /// the trigger so backward tab order continues past it (inline
    /// Shift+Tab).
    fn insert_backward_tab_anchor(&mut self, trigger: K) {
        let _ = trigger;
    }
}
