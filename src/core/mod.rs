pub mod scale;
pub mod ticks;
pub mod types;

pub use scale::LinearScale;
pub use ticks::{TickValues, format_tick_label, nice_ticks};
pub use types::{DataPoint, PixelRange, Region, Viewport};
