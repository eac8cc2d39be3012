//! # Photo Album
//!
//! A batch photo album builder for Unix. Given a list of images it produces
//! thumbnails, medium-size copies, optional quarter-turn rotations and a
//! static `index.html`, asking the user for a caption for every image along
//! the way.
//!
//! The crate never decodes an image. Every pixel operation is an ImageMagick
//! child process; what the crate does is create those processes, wait for
//! them, and terminate them when they are no longer wanted.
//!
//! # Architecture: Overlapping Stages
//!
//! ```text
//! 1. Thumbnails  inputs     →  NNN-name-thumb.ext     (bounded pool of `convert`)
//! 2. Questions   thumbnail  →  caption + rotation     (`display` while asking)
//! 3. Finishing   source     →  NNN-name-medium.ext    (background `convert`s)
//! 4. Harvest     results    →  manifest.json + index.html
//! ```
//!
//! Stages 1–3 overlap: later thumbnails are converted and earlier images are
//! finished while the user answers questions. Harvesting is sequential and in
//! input order, so the page always lists images in the order given.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`tools`] | Planned invocations of `convert` / `display`, running child jobs |
//! | [`pool`] | Bounded pool of thumbnail children, terminated on drop |
//! | [`prompt`] | Caption and rotation questions (terminal or unattended) |
//! | [`finish`] | Background medium-size copy and deferred rotations per image |
//! | [`pipeline`] | Orchestrates the four stages and reports progress events |
//! | [`album`] | The harvested album and its `manifest.json` |
//! | [`html`] | The fixed `index.html` template |
//! | [`menu`] | Interactive single-image menu (display, thumbnail, rotate) |
//! | [`naming`] | Output file names and name-derived captions |
//! | [`config`] | `album.toml` loading, merging and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Processes, Not Libraries
//!
//! Resizing and rotation stay ImageMagick's job. Each operation is planned as
//! an [`tools::Invocation`] by an [`tools::ImageTool`] and only then spawned.
//! Planning is pure, which lets tests substitute a tool whose children are
//! tiny shell scripts and still exercise real spawning, waiting and signals.
//!
//! ## Bounded Concurrency
//!
//! `processing.max_processes` caps the number of thumbnail children alive at
//! once and the number of finisher workers. Unset, it follows the CPU count;
//! set, it can only lower it.
//!
//! ## No Orphans
//!
//! Viewers are closed with SIGTERM as soon as the questions about their image
//! are answered. When the build fails, the thumbnail pool terminates whatever
//! is still running before the error reaches the caller.

pub mod album;
pub mod config;
pub mod finish;
pub mod html;
pub mod menu;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod pool;
pub mod prompt;
pub mod tools;
