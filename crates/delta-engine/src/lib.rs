//! Delta engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the triangle demo:
//! device/surface setup, the window loop, shader validation and the triangle
//! renderer itself.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod paint;
pub mod render;
pub mod shader;

#[cfg(test)]
mod test_support;
