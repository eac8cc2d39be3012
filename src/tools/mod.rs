//! External image tools, driven as child processes.
//!
//! Nothing in this crate touches pixels. Every resize, rotation and preview
//! is a separate ImageMagick process:
//!
//! - **Parameters**: what to do ([`ResizeParams`], [`RotateParams`], [`Scale`], [`Rotation`])
//! - **Backend**: [`ImageTool`] plans an [`Invocation`]; spawning it yields a [`Job`]
//! - **Magick**: [`MagickTool`], the `convert` / `display` implementation

pub mod backend;
pub mod magick;
mod params;

pub use backend::{ImageTool, Invocation, Job, ToolError};
pub use magick::MagickTool;
pub use params::{ResizeParams, RotateParams, Rotation, Scale};
