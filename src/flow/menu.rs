//! Vertical button menus
//!
//! Each item carries a plain command value. Activation (keyboard or pointer)
//! returns that value to the owning screen, which maps it to a signal; no
//! callbacks are stored on the widget.

use glam::Vec2;

use super::Layout;
use crate::platform::{InputSnapshot, Key};
use crate::render::{RenderCommand, centered_text};
use crate::settings::Theme;
use crate::sim::Rect;

/// Button geometry in reference pixels
const BUTTON_WIDTH: f32 = 340.0;
const BUTTON_HEIGHT: f32 = 48.0;
const BUTTON_GAP: f32 = 14.0;
const STACK_CENTER_Y: f32 = 360.0;
const STACK_MIN_TOP: f32 = 150.0;
const LABEL_SIZE: f32 = 26.0;

#[derive(Debug, Clone)]
pub struct MenuItem<C> {
    pub command: C,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Menu<C> {
    items: Vec<MenuItem<C>>,
    selected: usize,
}

impl<C: Copy> Menu<C> {
    pub fn new(items: impl IntoIterator<Item = (C, String)>) -> Self {
        Self {
            items: items
                .into_iter()
                .map(|(command, label)| MenuItem { command, label })
                .collect(),
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<C> {
        self.items.get(self.selected).map(|i| i.command)
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) {
        if let Some(item) = self.items.get_mut(index) {
            item.label = label.into();
        }
    }

    /// Button rectangles in reference pixels
    fn reference_rects(&self) -> Vec<Rect> {
        let n = self.items.len() as f32;
        let total = n * BUTTON_HEIGHT + (n - 1.0).max(0.0) * BUTTON_GAP;
        let top = (STACK_CENTER_Y - total * 0.5).max(STACK_MIN_TOP);
        let left = (crate::consts::REFERENCE_WIDTH - BUTTON_WIDTH) * 0.5;
        (0..self.items.len())
            .map(|i| {
                Rect::new(
                    left,
                    top + i as f32 * (BUTTON_HEIGHT + BUTTON_GAP),
                    BUTTON_WIDTH,
                    BUTTON_HEIGHT,
                )
            })
            .collect()
    }

    /// Button rectangles in output pixels
    pub fn item_rects(&self, layout: &Layout) -> Vec<Rect> {
        self.reference_rects()
            .iter()
            .map(|r| layout.rect(r))
            .collect()
    }

    /// Arrow keys move the highlight; Enter/Space or a click activates
    pub fn handle(&mut self, input: &InputSnapshot, layout: &Layout) -> Option<C> {
        if self.items.is_empty() {
            return None;
        }
        let n = self.items.len();

        if let Some(pos) = input.clicks().next() {
            let rects = self.item_rects(layout);
            if let Some(i) = rects.iter().position(|r| r.contains_point(pos)) {
                self.selected = i;
                return Some(self.items[i].command);
            }
        }

        for key in &input.keys_pressed {
            match key {
                Key::Up => self.selected = (self.selected + n - 1) % n,
                Key::Down => self.selected = (self.selected + 1) % n,
                Key::Enter | Key::Space => return self.selected(),
                _ => {}
            }
        }
        None
    }

    pub fn render(&self, layout: &Layout, theme: &Theme, out: &mut Vec<RenderCommand>) {
        for (i, (item, rect)) in self
            .items
            .iter()
            .zip(self.item_rects(layout))
            .enumerate()
        {
            let (fill, text) = if i == self.selected {
                (theme.accent, theme.background)
            } else {
                (theme.button, theme.text)
            };
            out.push(RenderCommand::FillRect { rect, color: fill });
            let label_pos = rect.center() - Vec2::new(0.0, layout.len(LABEL_SIZE) * 0.5);
            out.push(centered_text(
                item.label.clone(),
                label_pos,
                layout.len(LABEL_SIZE),
                text,
            ));
        }
    }
}
