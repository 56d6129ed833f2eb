pub mod compile;
pub mod dependency;
pub mod error;
pub mod executor;
pub mod fetch;
pub mod init;
pub mod link;
pub mod manifest;
pub mod output;
pub mod process;
pub mod project;
pub mod resolve;
pub mod toolchain;
pub mod validate;

use std::path::Path;

pub use dependency::{Dependency, Mechanism};
pub use error::{BuildError, DependencyError, Error, Phase, ValidationError};
pub use executor::{build, BuildReport, BuildState, Executor, Stage};
pub use output::{Language, Output, OutputKind};
pub use project::{Layout, Project};
pub use toolchain::Toolchain;

/// Reads `cbuild.toml` from `dir` into a project rooted at `dir`.
///
/// Only the shape of the file is checked here; the project still has to pass
/// [`validate::validate`], which [`build`] does before anything runs.
pub fn parse_project(dir: &Path) -> Result<Project, anyhow::Error> {
	let manifest = manifest::read_manifest(dir)?;
	let project = match manifest.into_project(dir) {
		Ok(x) => x,
		Err(e) => return Err(anyhow::anyhow!("Error in {}: {}", dir.join(manifest::CBUILD_TOML).display(), e)),
	};
	Ok(project)
}
