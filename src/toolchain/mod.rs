pub(crate) mod compiler;

use crate::output::Language;

pub use compiler::Compiler;
use compiler::Gcc;

/// The external tools a build runs. Which compiler compiles an output is a
/// pure function of its language, see [`Toolchain::compiler`].
pub struct Toolchain {
	pub c_compiler: Box<dyn Compiler>,
	pub cpp_compiler: Box<dyn Compiler>,
	pub static_linker: Vec<String>,
	pub pkg_config: Vec<String>,
}

fn to_cmd(cmd: &str) -> Vec<String> {
	cmd.split_whitespace().map(String::from).collect()
}

impl Toolchain {
	/// gcc, g++, `ar rcs` and `pkg-config` from `PATH`.
	pub fn gnu() -> Self {
		Toolchain {
			c_compiler: Box::new(Gcc { cmd: to_cmd("gcc") }),
			cpp_compiler: Box::new(Gcc { cmd: to_cmd("g++") }),
			static_linker: to_cmd("ar rcs"),
			pkg_config: to_cmd("pkg-config"),
		}
	}

	pub fn compiler(&self, language: Language) -> &dyn Compiler {
		match language {
			Language::C => self.c_compiler.as_ref(),
			Language::Cpp => self.cpp_compiler.as_ref(),
		}
	}
}

impl Default for Toolchain {
	fn default() -> Self {
		Toolchain::gnu()
	}
}
