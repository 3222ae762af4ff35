// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the overlay stack: interaction modes, lifecycle states,
//! open requests, and the dismissal input events.

use kurbo::Point;
use smallvec::SmallVec;

/// Policy tag governing how an overlay opens, closes, and traps focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Opened by an activating click; closed by outside click or Escape.
    /// Opening a click overlay closes every open hover overlay.
    Click,
    /// Opened by hover intent, usually through the delayed-open timer.
    /// Never opens while a click overlay is active for the same trigger.
    Hover,
    /// Blocks the rest of the document: starts tab trapping before it becomes
    /// visible and always restores focus to its trigger on final close.
    Modal,
    /// Visually replaces its trigger; Tab inside closes it and hands the
    /// keystroke back to the trigger.
    Replace,
    /// Participates in the trigger's inline tab order; forward Tab closes it,
    /// backward Tab continues past the trigger without closing.
    Inline,
    /// No special dismissal wiring beyond the global Escape/outside-click
    /// handling.
    None,
}

/// Lifecycle state of an active overlay.
///
/// States only move forward: `Opening → Open → Closing → Dispose`. `Dispose`
/// is terminal; an overlay whose exit presentation was interrupted stays in
/// `Closing` until a later close request resumes it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlayState {
    /// Created but not yet committed to the stack.
    Opening,
    /// Committed and visible.
    Open,
    /// Exit presentation in progress.
    Closing,
    /// Fully hidden; ready for removal.
    Dispose,
}

/// Whether a newly opened overlay should receive focus once committed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReceivesFocus {
    /// Focus moves into the overlay when its opening update completes.
    Auto,
    /// Focus is left where it is.
    #[default]
    No,
}

/// Requested placement of the overlay relative to its trigger.
///
/// Placement is consumed by the host's element factory; the coordinator only
/// carries it through.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs, reason = "side/alignment variants are self-describing")]
pub enum Placement {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
    Right,
    RightStart,
    RightEnd,
    /// No trigger-relative placement (for example, centered modals).
    None,
}

bitflags::bitflags! {
    /// Modifier keys held during a pointer click.
    ///
    /// Any modifier suppresses close-on-outside-click, so modified clicks
    /// (for example, opening a link in a new tab) never dismiss overlays.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control key.
        const CTRL  = 0b0000_0001;
        /// Alt/Option key.
        const ALT   = 0b0000_0010;
        /// Shift key.
        const SHIFT = 0b0000_0100;
        /// Meta/Command key.
        const META  = 0b0000_1000;
    }
}

/// The primary (left) pointer button.
pub const PRIMARY_BUTTON: u8 = 0;

/// A pointer click as seen by the global dismissal listeners.
///
/// The same value is fed to both dismissal phases: first
/// [`OverlayStack::handle_click_capture`](crate::OverlayStack::handle_click_capture)
/// (root capture phase), then
/// [`OverlayStack::handle_click_bubble`](crate::OverlayStack::handle_click_bubble)
/// (root bubble phase).
#[derive(Clone, Debug)]
pub struct PointerClick<K> {
    /// Element under the pointer, if any.
    pub target: Option<K>,
    /// Button that produced the click. `0` is the primary button.
    pub button: u8,
    /// Modifier keys held during the click.
    pub modifiers: Modifiers,
    /// Pointer position in document coordinates.
    pub position: Point,
    /// Composed event path from the target to the document root, crossing
    /// shadow boundaries.
    pub path: SmallVec<[K; 8]>,
    /// Whether an earlier listener already prevented the default action.
    pub default_prevented: bool,
}

impl<K> PointerClick<K> {
    /// An unmodified primary-button click on `target`.
    pub fn primary(target: K, position: Point) -> Self
    where
        K: Copy,
    {
        Self {
            target: Some(target),
            button: PRIMARY_BUTTON,
            modifiers: Modifiers::empty(),
            position,
            path: SmallVec::from_slice(&[target]),
            default_prevented: false,
        }
    }

    /// Whether the primary button produced this click.
    pub fn is_primary(&self) -> bool {
        self.button == PRIMARY_BUTTON
    }
}

/// Keyboard input routed to the stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape; closes the top overlay on key-up.
    Escape,
    /// Tab navigation, with the shift (backward) flag.
    Tab {
        /// True for Shift+Tab.
        shift: bool,
    },
}

/// An open request handed to [`OverlayStack::open_overlay`](crate::OverlayStack::open_overlay).
#[derive(Clone, Debug)]
pub struct OpenDetails<K> {
    /// The content element to display. At most one overlay may exist per
    /// content key at any time.
    pub content: K,
    /// The element that opened the overlay. Held as a non-owning key; the
    /// host owns its lifetime.
    pub trigger: K,
    /// Dismissal and focus policy.
    pub interaction: Interaction,
    /// Trigger-relative placement, forwarded to the element factory.
    pub placement: Placement,
    /// Whether the overlay receives focus once committed.
    pub receives_focus: ReceivesFocus,
    /// Route the open through the overlay timer (hover-intent debounce).
    pub delayed: bool,
    /// Suppress the click that opened this overlay from also closing it
    /// (long-press-originated overlays open before their click lands).
    pub not_immediately_closable: bool,
}

impl<K> OpenDetails<K> {
    /// An open request with default options: immediate, default placement,
    /// no automatic focus.
    pub fn new(content: K, trigger: K, interaction: Interaction) -> Self {
        Self {
            content,
            trigger,
            interaction,
            placement: Placement::default(),
            receives_focus: ReceivesFocus::No,
            delayed: false,
            not_immediately_closable: false,
        }
    }

    /// Set the trigger-relative placement.
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set whether the overlay receives focus once committed.
    pub fn receives_focus(mut self, receives_focus: ReceivesFocus) -> Self {
        self.receives_focus = receives_focus;
        self
    }

    /// Route the open through the overlay timer.
    pub fn delayed(mut self, delayed: bool) -> Self {
        self.delayed = delayed;
        self
    }

    /// Arm the one-shot suppression of the first outside click.
    pub fn not_immediately_closable(mut self, value: bool) -> Self {
        self.not_immediately_closable = value;
        self
    }
}

/// Outcome of an open request.
///
/// Callers that only care whether the request was refused outright can
/// collapse the variants through [`OpenOutcome::suppressed`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpenOutcome {
    /// The overlay was created and commits at the next
    /// [`settle`](crate::OverlayStack::settle).
    Opened,
    /// The content already has an active, queued, or pending overlay; nothing
    /// was created.
    AlreadyOpen,
    /// A delayed open is pending on the overlay timer. It resolves through
    /// the content's `opened` or `open_cancelled` hook.
    Delayed,
    /// A hover open was refused because a click overlay is active for the
    /// same trigger; nothing was created.
    SuppressedByClick,
}

impl OpenOutcome {
    /// Whether the request was refused outright. `AlreadyOpen` and `Delayed`
    /// are not refusals: the content is (or may yet be) on the stack.
    pub const fn suppressed(self) -> bool {
        matches!(self, Self::SuppressedByClick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_click_has_no_modifiers() {
        let click = PointerClick::primary(7_u32, Point::new(4.0, 2.0));
        assert!(click.is_primary());
        assert!(click.modifiers.is_empty());
        assert_eq!(click.path.as_slice(), &[7]);
        assert!(!click.default_prevented);
    }

    #[test]
    fn open_details_builder_defaults() {
        let details = OpenDetails::new(1_u32, 2, Interaction::Click);
        assert_eq!(details.placement, Placement::Bottom);
        assert_eq!(details.receives_focus, ReceivesFocus::No);
        assert!(!details.delayed);
        assert!(!details.not_immediately_closable);

        let details = details
            .placement(Placement::TopStart)
            .receives_focus(ReceivesFocus::Auto)
            .delayed(true)
            .not_immediately_closable(true);
        assert_eq!(details.placement, Placement::TopStart);
        assert_eq!(details.receives_focus, ReceivesFocus::Auto);
        assert!(details.delayed);
        assert!(details.not_immediately_closable);
    }

    #[test]
    fn suppressed_covers_only_refusals() {
        assert!(OpenOutcome::SuppressedByClick.suppressed());
        assert!(!OpenOutcome::Opened.suppressed());
        assert!(!OpenOutcome::AlreadyOpen.suppressed());
        assert!(!OpenOutcome::Delayed.suppressed());
    }
}
