use std::path::Path;

use super::Compiler;

/// gcc, g++ and anything that accepts the same command line (clang included).
pub(crate) struct Gcc {
	pub(crate) cmd: Vec<String>,
}

impl Compiler for Gcc {
	fn id(&self) -> String {
		self.cmd.first().cloned().unwrap_or_default()
	}

	fn cmd(&self) -> Vec<String> {
		self.cmd.clone()
	}

	fn compile_only_flag(&self) -> String {
		"-c".to_owned()
	}

	fn out_flag(&self) -> String {
		"-o".to_owned()
	}

	fn include_flag(&self, dir: &Path) -> String {
		format!("-I{}", dir.display())
	}

	fn strict_warning_flags(&self) -> Vec<String> {
		vec!["-Wall".to_owned(), "-Werror".to_owned()]
	}

	fn position_independent_code_flag(&self) -> Option<String> {
		Some("-fPIC".to_owned())
	}

	fn shared_library_flag(&self) -> String {
		"-shared".to_owned()
	}

	fn rpath_flag(&self, dir: &Path) -> Option<String> {
		Some(format!("-Wl,-rpath,{}", dir.display()))
	}
}
