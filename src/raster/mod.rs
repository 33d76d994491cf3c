pub mod pen;
pub mod stroke;

pub use pen::{PenState, PointerEvent};
pub use stroke::{Pen, StrokeRaster, BACKGROUND};
