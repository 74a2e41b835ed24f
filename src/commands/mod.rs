//! CLI commands for feis-release
//!
//! - **bump**: rewrite version metadata, commit and tag
//! - **package**: stage and archive a compiled release
//! - **wrap**: save meson files of a wrap-git subproject into its overlay
//! - **sample**: visualise a bad-sample dump from the audio engine
//! - **icon**: render the SVG logo into a Windows `.ico`
//!
//! Commands that work on the project tree accept `&ReleaseContext`; nothing reads the
//! process working directory.

pub mod bump;
pub mod icon;
pub mod package;
pub mod sample;
pub mod wrap;

pub use bump::run_bump;
pub use icon::run_render_icon;
pub use package::{PackageArgs, run_package};
pub use sample::run_sample;
pub use wrap::run_wrap_save;
