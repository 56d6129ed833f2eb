use core::fmt;
use std::{io, path::PathBuf};

use thiserror::Error;

/// Exit status reported when an external program could not be started at all.
pub const SPAWN_FAILURE_CODE: i32 = 127;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
	Compile,
	Link,
}

impl fmt::Display for Phase {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Phase::Compile => write!(f, "compile"),
			Phase::Link => write!(f, "link"),
		}
	}
}

/// A malformed project description. Raised before any side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
	pub field: String,
	pub reason: String,
}

impl ValidationError {
	pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
		ValidationError { field: field.into(), reason: reason.into() }
	}
}

#[derive(Debug, Error)]
pub enum DependencyError {
	#[error("Error fetching dependency \"{identifier}\" from {uri}: {reason}")]
	Fetch { identifier: String, uri: String, reason: String },

	#[error("pkg-config query for [{}] exited with code {exit_code}: {stderr}", .packages.join(", "))]
	PackageConfig { packages: Vec<String>, exit_code: i32, stderr: String },

	#[error("Error executing \"{program}\" for dependency resolution: {source}")]
	Spawn {
		program: String,
		#[source]
		source: io::Error,
	},

	#[error("Error preparing dependency directory \"{}\": {source}", .path.display())]
	Filesystem {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl DependencyError {
	pub fn exit_code(&self) -> i32 {
		match self {
			DependencyError::PackageConfig { exit_code, .. } => *exit_code,
			DependencyError::Spawn { .. } => SPAWN_FAILURE_CODE,
			DependencyError::Fetch { .. } | DependencyError::Filesystem { .. } => 1,
		}
	}
}

#[derive(Debug, Error)]
pub enum BuildError {
	/// The external toolchain ran and reported failure.
	#[error("{phase} of {subject} failed with exit code {exit_code}")]
	Failed { phase: Phase, subject: String, exit_code: i32 },

	#[error("{phase} of {subject}: error executing \"{program}\": {source}")]
	Spawn {
		phase: Phase,
		subject: String,
		program: String,
		#[source]
		source: io::Error,
	},

	#[error("{phase} of {subject}: error preparing \"{}\": {source}", .path.display())]
	Filesystem {
		phase: Phase,
		subject: String,
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

impl BuildError {
	pub fn phase(&self) -> Phase {
		match self {
			BuildError::Failed { phase, .. } | BuildError::Spawn { phase, .. } | BuildError::Filesystem { phase, .. } => {
				*phase
			}
		}
	}

	pub fn exit_code(&self) -> i32 {
		match self {
			BuildError::Failed { exit_code, .. } => *exit_code,
			BuildError::Spawn { .. } => SPAWN_FAILURE_CODE,
			BuildError::Filesystem { .. } => 1,
		}
	}
}

/// Any failure that aborts a build. Only the first one is ever reported.
#[derive(Debug, Error)]
pub enum Error {
	#[error("Invalid project description: {0}")]
	Validation(#[from] ValidationError),

	#[error(transparent)]
	Dependency(#[from] DependencyError),

	#[error(transparent)]
	Build(#[from] BuildError),
}

impl Error {
	/// Process exit status for this failure, never zero.
	pub fn exit_code(&self) -> i32 {
		let code = match self {
			Error::Validation(_) => 1,
			Error::Dependency(e) => e.exit_code(),
			Error::Build(e) => e.exit_code(),
		};
		if code == 0 {
			1
		} else {
			code
		}
	}
}
