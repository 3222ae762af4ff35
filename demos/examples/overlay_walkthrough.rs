// Copyright 2026 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay stack walkthrough: hover intent, click priority, and a modal.
//!
//! This example drives a [`canopy_overlay::OverlayStack`] against a toy host
//! that just prints what the stack asks it to do:
//! - a tooltip opened through the hover-intent timer,
//! - a click popover that closes the tooltip when it opens,
//! - a confirmation modal stacked above the popover, with tab trapping and
//!   focus restore on close.
//!
//! Run:
//! - `cargo run -p canopy_demos --example overlay_walkthrough`

use canopy_overlay::{
    Interaction, Key, OpenDetails, OverlayElement, OverlayHost, OverlayStack, PointerClick,
    ReceivesFocus,
};
use kurbo::Point;

const SAVE_BUTTON: u32 = 1;
const SAVE_TOOLTIP: u32 = 2;
const MENU_BUTTON: u32 = 3;
const MENU_POPOVER: u32 = 4;
const DELETE_ITEM: u32 = 5;
const CONFIRM_DIALOG: u32 = 6;

fn name(node: u32) -> &'static str {
    match node {
        SAVE_BUTTON => "save-button",
        SAVE_TOOLTIP => "save-tooltip",
        MENU_BUTTON => "menu-button",
        MENU_POPOVER => "menu-popover",
        DELETE_ITEM => "delete-item",
        CONFIRM_DIALOG => "confirm-dialog",
        _ => "somewhere-else",
    }
}

struct DemoElement {
    content: u32,
}

impl OverlayElement for DemoElement {
    fn open(&mut self) {
        println!("  [element] {} fades in", name(self.content));
    }
    fn close(&mut self, animated: bool) -> bool {
        let how = if animated { "fades out" } else { "disappears" };
        println!("  [element] {} {how}", name(self.content));
        true
    }
    fn obscure(&mut self, _by: Interaction) {
        println!("  [element] {} drops behind the new overlay", name(self.content));
    }
    fn feature(&mut self) {
        println!("  [element] {} is frontmost again", name(self.content));
    }
    fn focus(&mut self) {
        println!("  [element] focus moves into {}", name(self.content));
    }
}

#[derive(Default)]
struct DemoHost;

impl OverlayHost<u32> for DemoHost {
    type Element = DemoElement;

    fn create_element(&mut self, details: &OpenDetails<u32>) -> DemoElement {
        DemoElement {
            content: details.content,
        }
    }
    fn append(&mut self, content: u32) {
        println!("  [host] attach {}", name(content));
    }
    fn remove(&mut self, content: u32) {
        println!("  [host] detach {}", name(content));
    }
    fn focus_element(&mut self, node: u32) {
        println!("  [host] focus returns to {}", name(node));
    }
    fn set_tab_trap(&mut self, active: bool) {
        let verb = if active { "engaged" } else { "released" };
        println!("  [host] tab trap {verb}");
    }
    fn dispatch_closed(&mut self, trigger: u32, interaction: Interaction) -> bool {
        println!(
            "  [host] 'closed' notification on {} ({interaction:?})",
            name(trigger)
        );
        true
    }
}

fn dump(stack: &OverlayStack<u32, DemoHost>) {
    let contents: Vec<&str> = stack.overlays().map(|o| name(o.content())).collect();
    println!("  stack (bottom..top): {contents:?}\n");
}

fn main() {
    let mut stack = OverlayStack::new(DemoHost::default());

    println!("== Hover intent: tooltip waits out the warm-up ==");
    let outcome = stack.open_overlay(
        OpenDetails::new(SAVE_TOOLTIP, SAVE_BUTTON, Interaction::Hover).delayed(true),
        0,
    );
    println!("  open request at t=0ms: {outcome:?}");
    stack.settle(400);
    println!("  t=400ms: nothing yet, depth={}", stack.depth());
    stack.settle(1000);
    stack.settle(1016);
    println!("  t=1016ms: the warm-up elapsed");
    dump(&stack);

    println!("== Click priority: opening the menu closes hover overlays ==");
    let outcome = stack.open_overlay(
        OpenDetails::new(MENU_POPOVER, MENU_BUTTON, Interaction::Click),
        1200,
    );
    println!("  open request: {outcome:?}");
    stack.settle(1200);
    dump(&stack);

    println!("== A modal stacks above and traps tabbing ==");
    let outcome = stack.open_overlay(
        OpenDetails::new(CONFIRM_DIALOG, DELETE_ITEM, Interaction::Modal)
            .receives_focus(ReceivesFocus::Auto),
        1400,
    );
    println!("  open request: {outcome:?}");
    stack.settle(1400);
    println!("  tab trapping: {}", stack.is_tab_trapping());
    dump(&stack);

    println!("== Clicks inside the dialog never dismiss it ==");
    let click = PointerClick::primary(CONFIRM_DIALOG, Point::new(10.0, 10.0));
    stack.handle_click_capture(&click);
    stack.handle_click_bubble(&click);
    dump(&stack);

    println!("== Escape unwinds the stack one overlay at a time ==");
    stack.handle_keyup(Key::Escape);
    dump(&stack);
    stack.handle_keyup(Key::Escape);
    dump(&stack);
    println!("  tab trapping: {}", stack.is_tab_trapping());
}
