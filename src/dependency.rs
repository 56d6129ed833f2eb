use core::fmt;

/// How an external dependency is brought into a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanism {
	/// Flags come from the system package registry (`pkg-config`).
	PackageConfig,
	/// Sources are fetched from `source_uri` into the project's deps directory.
	SourceFetch,
}

impl fmt::Display for Mechanism {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Mechanism::PackageConfig => write!(f, "pkg-config"),
			Mechanism::SourceFetch => write!(f, "fetch"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
	pub identifier: String,
	pub mechanism: Mechanism,
	pub source_uri: Option<String>,
}

impl Dependency {
	pub fn package(identifier: &str) -> Self {
		Dependency { identifier: identifier.to_owned(), mechanism: Mechanism::PackageConfig, source_uri: None }
	}

	pub fn fetch(identifier: &str, uri: &str) -> Self {
		Dependency {
			identifier: identifier.to_owned(),
			mechanism: Mechanism::SourceFetch,
			source_uri: Some(uri.to_owned()),
		}
	}
}

impl fmt::Display for Dependency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.source_uri {
			Some(uri) => write!(f, "{} ({}: {})", self.identifier, self.mechanism, uri),
			None => write!(f, "{} ({})", self.identifier, self.mechanism),
		}
	}
}
