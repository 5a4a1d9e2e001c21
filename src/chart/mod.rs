mod plan;
mod render;

pub use plan::{ChartPlan, Slice};
pub use render::{ChartRenderer, encode_png};
