mod gcc;

use std::path::Path;

pub(crate) use gcc::Gcc;

/// A C or C++ compiler driver that also performs the final link.
pub trait Compiler {
	fn id(&self) -> String;

	fn cmd(&self) -> Vec<String>;
	fn compile_only_flag(&self) -> String;
	fn out_flag(&self) -> String;
	fn include_flag(&self, dir: &Path) -> String;
	/// Flags that turn warnings into hard errors.
	fn strict_warning_flags(&self) -> Vec<String>;
	fn position_independent_code_flag(&self) -> Option<String>;
	fn shared_library_flag(&self) -> String;
	fn rpath_flag(&self, dir: &Path) -> Option<String>;
}
