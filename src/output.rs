use core::fmt;
use std::{env, str::FromStr};

use crate::{dependency::Dependency, error::ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
	C,
	Cpp,
}

impl FromStr for Language {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"c" | "C" => Ok(Language::C),
			"cpp" | "c++" | "C++" | "cxx" => Ok(Language::Cpp),
			other => Err(ValidationError::new("language", format!("must be c (C) or cpp (C++), got \"{}\"", other))),
		}
	}
}

impl fmt::Display for Language {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Language::C => write!(f, "C"),
			Language::Cpp => write!(f, "C++"),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
	StaticLib,
	SharedLib,
	Executable,
}

impl OutputKind {
	pub fn is_library(&self) -> bool {
		matches!(self, OutputKind::StaticLib | OutputKind::SharedLib)
	}
}

impl FromStr for OutputKind {
	type Err = ValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"static_lib" => Ok(OutputKind::StaticLib),
			"shared_lib" => Ok(OutputKind::SharedLib),
			"executable" => Ok(OutputKind::Executable),
			other => Err(ValidationError::new(
				"type",
				format!("must be one of static_lib, shared_lib, executable, got \"{}\"", other),
			)),
		}
	}
}

impl fmt::Display for OutputKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OutputKind::StaticLib => write!(f, "static_lib"),
			OutputKind::SharedLib => write!(f, "shared_lib"),
			OutputKind::Executable => write!(f, "executable"),
		}
	}
}

/// One buildable artifact of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
	pub name: String,
	pub language: Language,
	pub kind: OutputKind,
	pub sources: Vec<String>,
	pub include_path: Option<String>,
	pub dependencies: Vec<Dependency>,
}

impl Output {
	pub fn new(name: &str, language: Language, kind: OutputKind, sources: &[&str]) -> Self {
		Output {
			name: name.to_owned(),
			language,
			kind,
			sources: sources.iter().copied().map(String::from).collect(),
			include_path: None,
			dependencies: Vec::new(),
		}
	}

	pub fn with_dependency(mut self, dep: Dependency) -> Self {
		self.dependencies.push(dep);
		self
	}

	pub fn with_include(mut self, include: &str) -> Self {
		self.include_path = Some(include.to_owned());
		self
	}

	/// File name of the produced artifact, without directory.
	pub fn artifact_file_name(&self) -> String {
		match self.kind {
			OutputKind::StaticLib => format!("lib{}.a", self.name),
			OutputKind::SharedLib => format!("lib{}.so", self.name),
			OutputKind::Executable => format!("{}{}", self.name, env::consts::EXE_SUFFIX),
		}
	}

	/// Position independent code is required for anything that is linked
	/// into a shared object or a PIE. Archives are left as the compiler defaults.
	pub fn needs_pic(&self) -> bool {
		self.kind != OutputKind::StaticLib
	}
}

impl fmt::Display for Output {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			r#"Output{{
   name: {},
   language: {},
   kind: {},
   sources: [{}],
   include_path: {},
   dependencies: [{}],
}}"#,
			self.name,
			self.language,
			self.kind,
			self.sources.join(", "),
			self.include_path.clone().unwrap_or("None".to_owned()),
			self.dependencies.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(", "),
		)
	}
}
