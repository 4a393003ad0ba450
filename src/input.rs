use egui::{Context, Key, Modifiers, PointerButton, Pos2, Rect, Response, Vec2};

use crate::view::ZoomDirection;

/// Input events the measurement engine understands.
///
/// Positions are in screen space relative to the canvas origin, i.e. the
/// top-left corner of the area the image is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary button clicked on the canvas
    Click { position: Pos2 },
    /// Canvas dragged with the middle or secondary button
    Pan { delta: Vec2 },
    /// One scroll-wheel notch over the canvas
    Zoom { direction: ZoomDirection },
    /// Pointer moved over the canvas, or left it (`None`)
    PointerMove { position: Option<Pos2> },
    /// Undo shortcut pressed
    Undo,
}

/// Convert an absolute egui position into canvas-local coordinates
pub fn to_canvas_local(pos: Pos2, canvas_rect: Rect) -> Pos2 {
    (pos - canvas_rect.min).to_pos2()
}

/// Handles converting raw egui input into `InputEvent`s
#[derive(Debug)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Rect,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Rect::NOTHING)
    }
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    fn local(&self, pos: Pos2) -> Pos2 {
        to_canvas_local(pos, self.canvas_rect)
    }

    /// Collect the events for this frame from the canvas response
    pub fn process_input(&mut self, ctx: &Context, response: &Response) -> Vec<InputEvent> {
        let mut events = Vec::new();

        // Pointer tracking
        let hover = response.hover_pos();
        if hover != self.last_pointer_pos {
            events.push(InputEvent::PointerMove {
                position: hover.map(|pos| self.local(pos)),
            });
            self.last_pointer_pos = hover;
        }

        if response.clicked_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                events.push(InputEvent::Click {
                    position: self.local(pos),
                });
            }
        }

        if response.dragged_by(PointerButton::Middle) || response.dragged_by(PointerButton::Secondary) {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                events.push(InputEvent::Pan { delta });
            }
        }

        if response.hovered() {
            let scroll = ctx.input(|input| input.raw_scroll_delta.y);
            if let Some(direction) = ZoomDirection::from_scroll(scroll) {
                events.push(InputEvent::Zoom { direction });
            }
        }

        // A focused text field keeps its own undo
        if !ctx.wants_keyboard_input() && ctx.input_mut(|input| input.consume_key(Modifiers::COMMAND, Key::Z)) {
            events.push(InputEvent::Undo);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_local() {
        let rect = Rect::from_min_size(Pos2::new(300.0, 20.0), Vec2::new(800.0, 600.0));
        assert_eq!(to_canvas_local(Pos2::new(310.0, 25.0), rect), Pos2::new(10.0, 5.0));
    }
}
