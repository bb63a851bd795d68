//! Color representation shared by the frame loop and renderers.

pub mod color;

pub use color::Color;
