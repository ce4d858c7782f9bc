// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Three-viewport camera demo built on wgpu.
//!
//! One window is split into three views of the same small scene (a ground
//! slab, a centre box, and two cone markers):
//!
//! - the **overview** on the left, a fixed camera whose distance follows
//!   the scroll wheel,
//! - the **red** view at the top right and the **green** view at the
//!   bottom right, each rendered from a tracked camera that always looks
//!   at the origin.
//!
//! Each tracked camera is drawn in the overview as a cone of its view's
//! colour. Pressing `1` or `2` attaches a translate gizmo to the green or
//! red cone; dragging a handle moves the camera along that axis. A
//! parameter panel edits the same position records.
//!
//! # Key entry points
//!
//! - [`TriviewEngine`] - owns the GPU context, the scene, and the gizmo
//! - [`Options`] - position records, lighting, and key bindings (TOML
//!   presets, JSON schema for the panel)
//! - [`Viewer`] - standalone winit window (feature `viewer`)
//! - `web::start` - browser canvas entry point (feature `web`)

pub mod camera;
pub mod engine;
pub mod error;
pub mod gizmo;
pub mod gpu;
#[cfg(feature = "gui")]
pub mod gui;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
pub mod viewport;
#[cfg(feature = "web")]
pub mod web;

pub use engine::command::TriviewCommand;
pub use engine::TriviewEngine;
pub use error::TriviewError;
pub use input::{InputEvent, InputProcessor, KeyAction, MouseButton};
pub use options::Options;
pub use scene::TrackedCamera;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
pub use viewport::ViewId;
