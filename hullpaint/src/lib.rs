pub use hull::{Color, Hull, PaintError};
pub use navigator::{Heading, Navigator, Point, Turn};
pub use robot::{paint_hull, Robot};

pub mod hull;
pub mod navigator;
pub mod robot;
