// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One entry in the overlay stack.

use core::fmt;

use crate::contract::OverlayElement;
use crate::types::{Interaction, OpenDetails, OverlayState, Placement};

/// A currently displayed overlay: the content/trigger relationship, its
/// interaction mode and lifecycle state, and the host-built visual element.
///
/// Created by the coordinator when an open survives its delay and
/// suppression checks; destroyed once a close completes with state
/// [`Dispose`](OverlayState::Dispose). The content and trigger are held as
/// non-owning keys.
pub struct ActiveOverlay<K, E> {
    content: K,
    trigger: K,
    interaction: Interaction,
    placement: Placement,
    state: OverlayState,
    /// Set while focus is leaving via Tab, so a close caused by tab
    /// navigation skips the focus-restore step.
    pub(crate) tabbing_away: bool,
    has_modal_root: bool,
    obscured: bool,
    element: E,
}

impl<K: Copy, E: OverlayElement> ActiveOverlay<K, E> {
    pub(crate) fn new(details: &OpenDetails<K>, element: E, has_modal_root: bool) -> Self {
        Self {
            content: details.content,
            trigger: details.trigger,
            interaction: details.interaction,
            placement: details.placement,
            state: OverlayState::Opening,
            tabbing_away: false,
            has_modal_root,
            obscured: false,
            element,
        }
    }

    /// The content key this overlay displays.
    pub fn content(&self) -> K {
        self.content
    }

    /// The element that opened this overlay.
    pub fn trigger(&self) -> K {
        self.trigger
    }

    /// The dismissal and focus policy.
    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// The requested trigger-relative placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// The lifecycle state.
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Whether this overlay sits beneath a more recently opened one.
    pub fn is_obscured(&self) -> bool {
        self.obscured
    }

    /// Whether this overlay or an ancestor enforces modal focus containment.
    pub fn has_modal_root(&self) -> bool {
        self.has_modal_root
    }

    /// The host-built visual element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Complete the opening presentation; the overlay is now `Open`.
    pub(crate) fn open(&mut self) {
        self.element.open();
        self.state = OverlayState::Open;
    }

    /// Demote beneath a newly opened overlay of interaction `by`.
    pub(crate) fn obscure(&mut self, by: Interaction) {
        self.obscured = true;
        self.element.obscure(by);
    }

    /// Re-promote after the overlay above closed.
    pub(crate) fn feature(&mut self) {
        self.obscured = false;
        self.element.feature();
    }

    /// Run the exit presentation and return the resulting state.
    ///
    /// Reaches `Dispose` when the element reports a finished exit; stays in
    /// `Closing` when the exit was interrupted, in which case a later close
    /// resumes it. A disposed overlay is left untouched.
    pub(crate) fn hide(&mut self, animated: bool) -> OverlayState {
        if self.state == OverlayState::Dispose {
            return self.state;
        }
        self.state = OverlayState::Closing;
        if self.element.close(animated) {
            self.state = OverlayState::Dispose;
        }
        self.state
    }

    pub(crate) fn focus(&mut self) {
        self.element.focus();
    }

    pub(crate) fn update_position(&mut self) {
        self.element.update_position();
    }

    pub(crate) fn dispose(&mut self) {
        self.element.dispose();
        self.state = OverlayState::Dispose;
    }
}

impl<K: fmt::Debug, E> fmt::Debug for ActiveOverlay<K, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveOverlay")
            .field("content", &self.content)
            .field("trigger", &self.trigger)
            .field("interaction", &self.interaction)
            .field("state", &self.state)
            .field("tabbing_away", &self.tabbing_away)
            .field("has_modal_root", &self.has_modal_root)
            .field("obscured", &self.obscured)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct StubElement {
        finish_close: Cell<bool>,
        closes: Cell<u32>,
    }

    impl OverlayElement for &StubElement {
        fn close(&mut self, _animated: bool) -> bool {
            self.closes.set(self.closes.get() + 1);
            self.finish_close.get()
        }
    }

    fn overlay(element: &StubElement) -> ActiveOverlay<u32, &StubElement> {
        let details = OpenDetails::new(1_u32, 2, Interaction::Click);
        ActiveOverlay::new(&details, element, false)
    }

    #[test]
    fn open_reaches_open_state() {
        let stub = StubElement {
            finish_close: Cell::new(true),
            closes: Cell::new(0),
        };
        let mut overlay = overlay(&stub);
        assert_eq!(overlay.state(), OverlayState::Opening);
        overlay.open();
        assert_eq!(overlay.state(), OverlayState::Open);
    }

    #[test]
    fn finished_hide_disposes() {
        let stub = StubElement {
            finish_close: Cell::new(true),
            closes: Cell::new(0),
        };
        let mut overlay = overlay(&stub);
        overlay.open();
        assert_eq!(overlay.hide(true), OverlayState::Dispose);
        // A disposed overlay ignores further hides.
        assert_eq!(overlay.hide(true), OverlayState::Dispose);
        assert_eq!(stub.closes.get(), 1);
    }

    #[test]
    fn interrupted_hide_stays_closing_and_resumes() {
        let stub = StubElement {
            finish_close: Cell::new(false),
            closes: Cell::new(0),
        };
        let mut overlay = overlay(&stub);
        overlay.open();
        assert_eq!(overlay.hide(true), OverlayState::Closing);
        stub.finish_close.set(true);
        assert_eq!(overlay.hide(true), OverlayState::Dispose);
        assert_eq!(stub.closes.get(), 2);
    }

    #[test]
    fn obscure_and_feature_toggle() {
        let stub = StubElement {
            finish_close: Cell::new(true),
            closes: Cell::new(0),
        };
        let mut overlay = overlay(&stub);
        assert!(!overlay.is_obscured());
        overlay.obscure(Interaction::Modal);
        assert!(overlay.is_obscured());
        overlay.feature();
        assert!(!overlay.is_obscured());
    }
}
