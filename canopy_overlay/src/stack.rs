// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay stack coordinator.
//!
//! [`OverlayStack`] owns the ordered collection of open overlays, the global
//! dismissal listeners, tab-trap state, and the open/close protocol. Overlays
//! are ordered bottom (oldest) to top (most recent); only the top entry
//! receives outside-click and Escape dismissal.
//!
//! ## Two-phase commit
//!
//! Opening is the only multi-step operation. [`OverlayStack::open_overlay`]
//! runs the synchronous part of the protocol (duplicate check, tab trapping,
//! hover/click suppression, element creation, obscuring the previous top) and
//! queues the stack push; [`OverlayStack::settle`] commits queued work in
//! request order. The one-tick deferral lets a close requested earlier in the
//! same frame land before the push, so there is never a window with two "top"
//! overlays. Hosts call `settle` from their frame callback; non-browser ports
//! call it explicitly.
//!
//! Timestamps are host-supplied `u64` milliseconds and only feed the
//! hover-intent [`OverlayTimer`].

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use kurbo::Point;

use crate::active::ActiveOverlay;
use crate::contract::{OverlayContent, OverlayHost};
use crate::timer::OverlayTimer;
use crate::types::{
    Interaction, Key, OpenDetails, OpenOutcome, OverlayState, PointerClick, ReceivesFocus,
};

/// Work queued for the next [`OverlayStack::settle`], in request order.
enum Deferred<K, E> {
    /// Push a created overlay onto the stack and finish its open.
    Commit {
        overlay: ActiveOverlay<K, E>,
        receives_focus: ReceivesFocus,
    },
    /// Find the overlay for `content` and run the close protocol.
    Close { content: K },
}

/// Coordinator for the process-wide collection of open overlays.
///
/// Explicitly constructed (one per document) and handed its
/// [`OverlayHost`]; there is no implicit global instance, which keeps the
/// stack resettable between tests.
pub struct OverlayStack<K, H: OverlayHost<K>> {
    host: H,
    overlays: Vec<ActiveOverlay<K, H::Element>>,
    contents: HashMap<K, Box<dyn OverlayContent<K>>>,
    timer: OverlayTimer<K>,
    /// Open requests waiting on the timer, keyed by content.
    delayed: HashMap<K, OpenDetails<K>>,
    deferred: VecDeque<Deferred<K, H::Element>>,
    /// Most recent timestamp seen; stands in for "now" on paths that have no
    /// timestamp of their own (dismissal handlers).
    clock: u64,
    prevent_mouse_root_close: bool,
    handling_resize: bool,
    /// One-shot: the click that opened a long-press overlay must not also
    /// close it.
    does_not_close_on_first_click: bool,
    trapping_inited: bool,
    can_tab_trap: bool,
    trap_active: bool,
    events_bound: bool,
}

impl<K, H> OverlayStack<K, H>
where
    K: Copy + Eq + Hash,
    H: OverlayHost<K>,
{
    /// A stack with the default hover-intent timer.
    pub fn new(host: H) -> Self {
        Self::with_timer(host, OverlayTimer::new())
    }

    /// A stack with a custom hover-intent timer.
    pub fn with_timer(host: H, timer: OverlayTimer<K>) -> Self {
        Self {
            host,
            overlays: Vec::new(),
            contents: HashMap::new(),
            timer,
            delayed: HashMap::new(),
            deferred: VecDeque::new(),
            clock: 0,
            prevent_mouse_root_close: false,
            handling_resize: false,
            does_not_close_on_first_click: false,
            trapping_inited: false,
            can_tab_trap: true,
            trap_active: false,
            events_bound: false,
        }
    }

    /// The document collaborator.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the document collaborator.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Declare `content`'s conformance to the lifecycle contract.
    ///
    /// Conformance is checked here, once, instead of per call; content
    /// registered after an overlay opened simply starts receiving callbacks
    /// from then on.
    pub fn register_content(&mut self, content: K, hooks: Box<dyn OverlayContent<K>>) {
        self.contents.insert(content, hooks);
    }

    /// Remove `content`'s lifecycle registration, returning it.
    pub fn unregister_content(&mut self, content: &K) -> Option<Box<dyn OverlayContent<K>>> {
        self.contents.remove(content)
    }

    // --- Queries ---

    /// Number of committed overlays, bottom to top.
    pub fn depth(&self) -> usize {
        self.overlays.len()
    }

    /// Whether no overlay is committed.
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// The most recently opened, still-open overlay.
    pub fn top(&self) -> Option<&ActiveOverlay<K, H::Element>> {
        self.overlays.last()
    }

    /// The committed overlays, bottom to top.
    pub fn overlays(&self) -> impl Iterator<Item = &ActiveOverlay<K, H::Element>> {
        self.overlays.iter()
    }

    /// The committed overlay displaying `content`, if any.
    pub fn overlay_for(&self, content: K) -> Option<&ActiveOverlay<K, H::Element>> {
        self.overlays.iter().find(|o| o.content() == content)
    }

    /// Whether the tab trap is currently engaged.
    pub fn is_tab_trapping(&self) -> bool {
        self.trap_active
    }

    fn find_index(&self, content: K) -> Option<usize> {
        self.overlays.iter().position(|o| o.content() == content)
    }

    /// Whether `content` has a committed overlay, a queued commit, or a
    /// pending delayed open. Guards the at-most-one-overlay-per-content
    /// invariant across the deferral window.
    fn is_content_active(&self, content: K) -> bool {
        self.find_index(content).is_some()
            || self.delayed.contains_key(&content)
            || self.deferred.iter().any(|op| match op {
                Deferred::Commit { overlay, .. } => overlay.content() == content,
                Deferred::Close { .. } => false,
            })
    }

    fn is_click_overlay_active_for_trigger(&self, trigger: K) -> bool {
        self.overlays
            .iter()
            .any(|o| o.trigger() == trigger && o.interaction() == Interaction::Click)
    }

    // --- Open protocol ---

    /// Request an overlay for `details.content`.
    ///
    /// `now` is the host's millisecond timestamp, consumed by the
    /// hover-intent timer. See [`OpenOutcome`] for the possible results; on
    /// `Opened` the push lands at the next [`settle`](Self::settle).
    pub fn open_overlay(&mut self, details: OpenDetails<K>, now: u64) -> OpenOutcome {
        self.clock = self.clock.max(now);
        if !self.events_bound {
            self.events_bound = true;
            self.host.attach_listeners();
        }
        if self.is_content_active(details.content) {
            return OpenOutcome::AlreadyOpen;
        }
        if details.not_immediately_closable {
            self.does_not_close_on_first_click = true;
        }
        if details.interaction == Interaction::Modal {
            // The rest of the document must leave the tab order before the
            // overlay becomes visible.
            self.start_tab_trapping();
        }
        if let Some(hooks) = self.contents.get_mut(&details.content) {
            hooks.will_open(details.trigger);
        }
        if details.delayed {
            self.timer.schedule_open(details.content, now);
            self.delayed.insert(details.content, details);
            return OpenOutcome::Delayed;
        }
        self.proceed_open(details)
    }

    /// The open pipeline past the delay gate: suppression, element creation,
    /// obscuring, and the queued commit.
    fn proceed_open(&mut self, details: OpenDetails<K>) -> OpenOutcome {
        match details.interaction {
            // Click takes priority over ephemeral hover popovers.
            Interaction::Click => self.close_all_hover_overlays(),
            Interaction::Hover if self.is_click_overlay_active_for_trigger(details.trigger) => {
                return OpenOutcome::SuppressedByClick;
            }
            _ => {}
        }

        let has_modal_root = details.interaction == Interaction::Modal
            || self.overlays.iter().any(|o| {
                (o.interaction() == Interaction::Modal || o.has_modal_root())
                    && self.host.contains(o.content(), details.trigger)
            });

        let element = self.host.create_element(&details);
        let overlay = ActiveOverlay::new(&details, element, has_modal_root);

        if let Some(top) = self.overlays.last_mut() {
            top.obscure(details.interaction);
        }

        self.host.append(details.content);

        self.deferred.push_back(Deferred::Commit {
            overlay,
            receives_focus: details.receives_focus,
        });
        OpenOutcome::Opened
    }

    fn commit_open(&mut self, overlay: ActiveOverlay<K, H::Element>, receives_focus: ReceivesFocus) {
        let content = overlay.content();
        let trigger = overlay.trigger();
        self.overlays.push(overlay);
        if let Some(top) = self.overlays.last_mut() {
            top.open();
        }
        if let Some(hooks) = self.contents.get_mut(&content) {
            hooks.set_open(true);
            hooks.opened(trigger);
        }
        if receives_focus == ReceivesFocus::Auto
            && let Some(top) = self.overlays.last_mut()
        {
            top.focus();
        }
    }

    // --- Close protocol ---

    /// Request that the overlay for `content` close.
    ///
    /// Cancels a pending delayed open (firing the content's `open_cancelled`
    /// hook); otherwise the close resolves at the next
    /// [`settle`](Self::settle). Unknown content is ignored.
    pub fn close_overlay(&mut self, content: K) {
        self.timer.cancel(&content);
        if let Some(details) = self.delayed.remove(&content) {
            if let Some(hooks) = self.contents.get_mut(&content) {
                hooks.open_cancelled(details.trigger);
            }
            return;
        }
        self.deferred.push_back(Deferred::Close { content });
    }

    /// Cancel a pending delayed open without touching a committed overlay.
    ///
    /// The explicit form of the caller-supplied abort signal: returns `true`
    /// when a pending open existed (its `open_cancelled` hook fires exactly
    /// once).
    pub fn abort_open(&mut self, content: K) -> bool {
        self.timer.cancel(&content);
        let Some(details) = self.delayed.remove(&content) else {
            return false;
        };
        if let Some(hooks) = self.contents.get_mut(&content) {
            hooks.open_cancelled(details.trigger);
        }
        true
    }

    fn close_top_overlay(&mut self) {
        let Some(top) = self.overlays.last() else {
            return;
        };
        let content = top.content();
        self.hide_and_close(content, true);
    }

    fn close_all_hover_overlays(&mut self) {
        let hovers: Vec<K> = self
            .overlays
            .iter()
            .filter(|o| o.interaction() == Interaction::Hover)
            .map(|o| o.content())
            .collect();
        for content in hovers {
            self.hide_and_close(content, false);
        }
    }

    /// The close protocol: hide, notify, pop, re-feature or restore focus,
    /// remove and dispose, dispatch `closed`.
    fn hide_and_close(&mut self, content: K, animated: bool) {
        let Some(index) = self.find_index(content) else {
            return;
        };

        let state = self.overlays[index].hide(animated);
        let trigger = self.overlays[index].trigger();
        if let Some(hooks) = self.contents.get_mut(&content) {
            hooks.set_open(false);
            hooks.closed(trigger);
        }

        // An interrupted exit stays on the stack; only a final disposal
        // proceeds past this point.
        if state != OverlayState::Dispose {
            return;
        }

        let mut overlay = self.overlays.remove(index);
        if self.overlays.is_empty() {
            self.manage_focus_when_last(&mut overlay);
        } else {
            self.manage_focus_when_overlays_remain();
        }

        if overlay.interaction() == Interaction::Hover {
            self.timer.note_close(self.clock);
        }

        self.host.remove(content);
        overlay.dispose();
        self.host.dispatch_closed(overlay.trigger(), overlay.interaction());
    }

    /// Re-promote the new top after a close that leaves overlays behind.
    fn manage_focus_when_overlays_remain(&mut self) {
        let mut modal_context = false;
        if let Some(top) = self.overlays.last_mut() {
            top.feature();
            modal_context = top.interaction() == Interaction::Modal || top.has_modal_root();
        }
        if modal_context {
            if let Some(top) = self.overlays.last_mut() {
                top.focus();
            }
        } else {
            self.stop_tab_trapping();
        }
    }

    /// Decide whether the trigger gets focus back after the last overlay
    /// closes.
    fn manage_focus_when_last(&mut self, overlay: &mut ActiveOverlay<K, H::Element>) {
        self.stop_tab_trapping();
        let is_modal = overlay.interaction() == Interaction::Modal;
        let returns_to_trigger = matches!(
            overlay.interaction(),
            Interaction::Replace | Interaction::Inline
        ) && !overlay.tabbing_away;
        overlay.tabbing_away = false;
        if !is_modal && !returns_to_trigger {
            return;
        }
        // Return focus to the trigger as long as the user hasn't actively
        // focused something outside the overlay interface: content, trigger
        // root, or its shadow host.
        if is_modal || self.active_element_within_interface(overlay.content(), overlay.trigger()) {
            self.host.focus_element(overlay.trigger());
        }
    }

    fn active_element_within_interface(&self, content: K, trigger: K) -> bool {
        let Some(active) = self.host.active_element() else {
            return false;
        };
        if self.host.contains(content, active) {
            return true;
        }
        let trigger_root = self.host.root_of(trigger);
        if self.host.contains(trigger_root, active) {
            return true;
        }
        self.host.host_of(trigger_root) == Some(active)
    }

    // --- Scheduler tick ---

    /// Commit one frame of deferred work.
    ///
    /// Processes closes and open commits queued since the previous settle in
    /// request order, then fires delayed opens whose warm-up elapsed (their
    /// commits land at the *next* settle), then runs the coalesced resize
    /// reposition pass.
    pub fn settle(&mut self, now: u64) {
        self.clock = self.clock.max(now);

        let mut queued = core::mem::take(&mut self.deferred);
        for op in queued.drain(..) {
            match op {
                Deferred::Close { content } => self.hide_and_close(content, true),
                Deferred::Commit {
                    overlay,
                    receives_focus,
                } => self.commit_open(overlay, receives_focus),
            }
        }

        for content in self.timer.due(now) {
            if let Some(details) = self.delayed.remove(&content) {
                // Cancellation can no longer reach this open; suppression
                // still can, and reports through the usual outcome rules.
                let _ = self.proceed_open(details);
            }
        }

        if self.handling_resize {
            for overlay in &mut self.overlays {
                overlay.update_position();
            }
            self.handling_resize = false;
        }
    }

    // --- Global dismissal listeners ---

    /// Root capture-phase click: decide whether the bubble phase may close
    /// the top overlay.
    ///
    /// Clicks with a modifier key or a non-primary button never dismiss, nor
    /// do clicks whose composed path includes the top overlay's content.
    pub fn handle_click_capture(&mut self, click: &PointerClick<K>) {
        let Some(top) = self.overlays.last() else {
            self.prevent_mouse_root_close = true;
            return;
        };
        if click.target.is_none() || !click.modifiers.is_empty() || !click.is_primary() {
            self.prevent_mouse_root_close = true;
            return;
        }
        self.prevent_mouse_root_close = click.path.contains(&top.content());
    }

    /// Root bubble-phase click: close the top overlay unless suppressed.
    pub fn handle_click_bubble(&mut self, click: &PointerClick<K>) {
        if self.does_not_close_on_first_click {
            // The click that created a long-press overlay is part of the
            // long-press, not of closing it.
            self.does_not_close_on_first_click = false;
            return;
        }
        if self.prevent_mouse_root_close || click.default_prevented {
            return;
        }
        self.close_top_overlay();
    }

    /// Document key-up: Escape closes the top overlay unconditionally.
    pub fn handle_keyup(&mut self, key: Key) {
        if key == Key::Escape {
            self.close_top_overlay();
        }
    }

    /// Tab keydown observed inside the overlay for `content`.
    ///
    /// Implements the replace/inline dismissal policies; other interactions
    /// have no per-keystroke wiring. Returns `true` when the keystroke was
    /// consumed (callers should stop propagation).
    pub fn handle_overlay_keydown(&mut self, content: K, key: Key) -> bool {
        let Key::Tab { shift } = key else {
            return false;
        };
        let Some(index) = self.find_index(content) else {
            return false;
        };
        let trigger = self.overlays[index].trigger();
        match self.overlays[index].interaction() {
            Interaction::Replace => {
                self.overlays[index].tabbing_away = true;
                self.close_overlay(content);
                self.host.focus_element(trigger);
                self.host.redispatch_tab(trigger, shift);
                true
            }
            Interaction::Inline => {
                self.overlays[index].tabbing_away = true;
                if shift {
                    // Backward tab order continues past the trigger; the
                    // overlay stays open and the keystroke keeps propagating.
                    self.host.insert_backward_tab_anchor(trigger);
                    return false;
                }
                if let Some(hooks) = self.contents.get_mut(&trigger) {
                    hooks.set_open(false);
                }
                self.close_overlay(content);
                self.host.focus_element(trigger);
                true
            }
            _ => false,
        }
    }

    /// Window resize: coalesce into a single reposition pass at the next
    /// settle.
    pub fn handle_resize(&mut self) {
        if self.handling_resize {
            return;
        }
        self.handling_resize = true;
    }

    /// Captured context menu on the trapped region.
    ///
    /// While a modal overlay is on top, closes it and re-dispatches the
    /// context menu at the element actually under the pointer, found by
    /// descending nested shadow boundaries. Returns `true` when the event
    /// was consumed.
    pub fn handle_context_menu(&mut self, position: Point) -> bool {
        let Some(top) = self.overlays.last() else {
            return false;
        };
        if top.interaction() != Interaction::Modal {
            return false;
        }
        self.close_top_overlay();

        let mut target = self.host.element_from_point(None, position);
        while let Some(outer) = target {
            match self.host.element_from_point(Some(outer), position) {
                Some(inner) if inner != outer => target = Some(inner),
                _ => break,
            }
        }
        if let Some(target) = target {
            self.host.dispatch_context_menu(target, position);
        }
        true
    }

    // --- Tab trapping ---

    fn start_tab_trapping(&mut self) {
        if !self.trapping_inited {
            self.can_tab_trap = self.host.init_tab_trap();
            self.trapping_inited = true;
        }
        if !self.can_tab_trap {
            return;
        }
        self.trap_active = true;
        self.host.set_tab_trap(true);
    }

    fn stop_tab_trapping(&mut self) {
        if !self.trapping_inited || !self.can_tab_trap || !self.trap_active {
            return;
        }
        self.trap_active = false;
        self.host.set_tab_trap(false);
    }
}

impl<K, H> fmt::Debug for OverlayStack<K, H>
where
    K: fmt::Debug,
    H: OverlayHost<K>,
    ActiveOverlay<K, H::Element>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayStack")
            .field("overlays", &self.overlays)
            .field("clock", &self.clock)
            .field("prevent_mouse_root_close", &self.prevent_mouse_root_close)
            .field("handling_resize", &self.handling_resize)
            .field("trap_active", &self.trap_active)
            .finish_non_exhaustive()
    }
}
