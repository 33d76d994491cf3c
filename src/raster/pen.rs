use serde::{Deserialize, Serialize};

use super::StrokeRaster;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum PointerEvent {
    Press { x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Release { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum PenState {
    #[default]
    Idle,
    Drawing { last_x: i32, last_y: i32 },
}

impl PenState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, PenState::Drawing { .. })
    }

    /// Applies one pointer event. Returns true when the raster was drawn on.
    ///
    /// Only moves while the button is held draw; a press and a release just
    /// move the pen, and a move while idle is ignored.
    pub fn handle(&mut self, event: PointerEvent, raster: &mut StrokeRaster) -> bool {
        match (*self, event) {
            (_, PointerEvent::Press { x, y }) => {
                // A press while already drawing means the release got lost;
                // start a fresh stroke instead of joining the two.
                *self = PenState::Drawing { last_x: x, last_y: y };
                false
            }
            (PenState::Drawing { last_x, last_y }, PointerEvent::Move { x, y }) => {
                raster.append_segment(last_x, last_y, x, y);
                *self = PenState::Drawing { last_x: x, last_y: y };
                true
            }
            (PenState::Idle, PointerEvent::Move { .. }) => false,
            (_, PointerEvent::Release { .. }) => {
                *self = PenState::Idle;
                false
            }
        }
    }

    pub fn reset(&mut self) {
        *self = PenState::Idle;
    }
}
