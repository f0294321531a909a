//! Canvas rendering module
//!
//! Projects engine state into a list of filled rectangles and text labels.
//! Painting the list onto a `<canvas>` happens in the binary.

pub mod frame;
pub mod shapes;

pub use frame::{Colors, FillRect, Frame, TextAlign, TextLabel, css_color};
pub use shapes::{project, project_pong, project_snake, project_tetris};
