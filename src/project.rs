use std::path::{Path, PathBuf};

use crate::output::Output;

pub const DEFAULT_OBJECT_DIR: &str = "build";
pub const DEFAULT_LIB_DIR: &str = "lib";
pub const DEFAULT_BIN_DIR: &str = "bin";
pub const DEFAULT_DEPS_DIR: &str = "_deps";

/// Where a project's sources live and where its build products go.
///
/// The directories are kept relative to `root`, which is also the working
/// directory of every spawned tool, so command lines stay short and readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
	pub root: PathBuf,
	pub object_dir: PathBuf,
	pub lib_dir: PathBuf,
	pub bin_dir: PathBuf,
	pub deps_dir: PathBuf,
}

impl Layout {
	pub fn new(root: &Path) -> Self {
		Layout {
			root: root.to_owned(),
			object_dir: PathBuf::from(DEFAULT_OBJECT_DIR),
			lib_dir: PathBuf::from(DEFAULT_LIB_DIR),
			bin_dir: PathBuf::from(DEFAULT_BIN_DIR),
			deps_dir: PathBuf::from(DEFAULT_DEPS_DIR),
		}
	}

	/// Resolves a project-relative path against the project root for
	/// filesystem access. Absolute paths are returned unchanged.
	pub fn on_disk(&self, rel: &Path) -> PathBuf {
		self.root.join(rel) // If rel is absolute, it replaces the root.
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
	pub name: String,
	pub layout: Layout,
	pub outputs: Vec<Output>,
}

impl Project {
	pub fn new(name: &str, root: &Path, outputs: Vec<Output>) -> Self {
		Project { name: name.to_owned(), layout: Layout::new(root), outputs }
	}

	pub fn find_output(&self, name: &str) -> Option<&Output> {
		self.outputs.iter().find(|x| x.name == name)
	}

	/// Project-relative path of the artifact `output` produces.
	pub fn artifact_path(&self, output: &Output) -> PathBuf {
		let dir = if output.kind.is_library() { &self.layout.lib_dir } else { &self.layout.bin_dir };
		dir.join(output.artifact_file_name())
	}
}
