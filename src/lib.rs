pub mod types;
pub mod geometry;
pub mod color;
pub mod tessellation;
pub mod locale;
pub mod prompt;
pub mod render;
pub mod gpu_canvas;
pub mod application;

/// The width and height of the square canvas in logical units
pub const CANVAS_SIZE: f64 = 500.0;
/// The smallest number of hexagons allowed in a row
pub const MIN_HEXAGONS: usize = 4;
/// The largest number of hexagons allowed in a row
pub const MAX_HEXAGONS: usize = 20;
const SQRT_3: f64 = 1.7320508075688772935274463415058723669428052538103806280558069794;
