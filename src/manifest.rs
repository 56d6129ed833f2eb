use std::{fs, path::Path, str::FromStr};

use serde::Deserialize;

use crate::{
	dependency::{Dependency, Mechanism},
	error::ValidationError,
	fetch::local_name,
	output::{Language, Output, OutputKind},
	project::{Layout, Project},
};

pub const CBUILD_TOML: &str = "cbuild.toml";

/// `cbuild.toml` as written on disk. Every field is optional here so that a
/// missing key is reported with its full path instead of a bare serde error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Manifest {
	pub name: Option<String>,
	pub build_dir: Option<String>,
	pub lib_dir: Option<String>,
	pub bin_dir: Option<String>,
	pub deps_dir: Option<String>,
	pub outputs: Option<Vec<OutputManifest>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputManifest {
	pub name: Option<String>,
	pub language: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub src: Option<Sources>,
	pub include: Option<String>,
	#[serde(default)]
	pub deps: Vec<DependencyManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Sources {
	One(String),
	Many(Vec<String>),
}

impl Sources {
	fn into_vec(self) -> Vec<String> {
		match self {
			Sources::One(x) => vec![x],
			Sources::Many(x) => x,
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyManifest {
	pub name: Option<String>,
	#[serde(rename = "use")]
	pub mechanism: Option<String>,
	pub uri: Option<String>,
}

pub fn read_manifest(dir: &Path) -> Result<Manifest, anyhow::Error> {
	let manifest_path = dir.join(CBUILD_TOML);
	let cbuild_toml = match fs::read_to_string(&manifest_path) {
		Ok(x) => x,
		Err(e) => return Err(anyhow::anyhow!("Error opening {}: {}", manifest_path.display(), e)),
	};

	let manifest = match toml::from_str::<Manifest>(&cbuild_toml) {
		Ok(x) => x,
		Err(e) => return Err(anyhow::anyhow!("Error reading {}: {}", manifest_path.display(), e)),
	};

	Ok(manifest)
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
	value.ok_or_else(|| ValidationError::new(field, "is required"))
}

fn parse_field<T: FromStr<Err = ValidationError>>(value: &str, field: &str) -> Result<T, ValidationError> {
	value.parse::<T>().map_err(|e| ValidationError::new(field, e.reason))
}

fn parse_mechanism(value: &str, field: &str) -> Result<Mechanism, ValidationError> {
	match value {
		"pkg-config" | "pkgconfig" | "system" => Ok(Mechanism::PackageConfig),
		"git" | "fetch" => Ok(Mechanism::SourceFetch),
		other => Err(ValidationError::new(field, format!("must be pkg-config, git or fetch, got \"{}\"", other))),
	}
}

impl DependencyManifest {
	fn into_dependency(self, path: &str) -> Result<Dependency, ValidationError> {
		let mechanism = parse_mechanism(&required(self.mechanism, &format!("{path}.use"))?, &format!("{path}.use"))?;
		let identifier = match (self.name, mechanism, &self.uri) {
			(Some(name), _, _) => name,
			(None, Mechanism::SourceFetch, Some(uri)) => local_name(uri),
			(None, Mechanism::SourceFetch, None) => {
				return Err(ValidationError::new(format!("{path}.uri"), "is required"))
			}
			(None, _, _) => return Err(ValidationError::new(format!("{path}.name"), "is required")),
		};
		Ok(Dependency { identifier, mechanism, source_uri: self.uri })
	}
}

impl OutputManifest {
	fn into_output(self, path: &str) -> Result<Output, ValidationError> {
		let name = required(self.name, &format!("{path}.name"))?;
		let kind = required(self.kind, &format!("{path}.type"))?;
		let language = required(self.language, &format!("{path}.language"))?;
		let kind = parse_field::<OutputKind>(&kind, &format!("{path}.type"))?;
		let language = parse_field::<Language>(&language, &format!("{path}.language"))?;

		let dependencies = self
			.deps
			.into_iter()
			.enumerate()
			.map(|(i, dep)| dep.into_dependency(&format!("{path}.deps[{i}]")))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Output {
			name,
			language,
			kind,
			sources: self.src.map(Sources::into_vec).unwrap_or_default(),
			include_path: self.include,
			dependencies,
		})
	}
}

impl Manifest {
	/// Converts the on-disk description into typed descriptors rooted at
	/// `root`. Only presence and enum membership are checked here; the rest of
	/// the structural checks belong to [`crate::validate::validate`].
	pub fn into_project(self, root: &Path) -> Result<Project, ValidationError> {
		let name = required(self.name, "name")?;
		let outputs = required(self.outputs, "outputs")?
			.into_iter()
			.enumerate()
			.map(|(i, out)| out.into_output(&format!("outputs[{i}]")))
			.collect::<Result<Vec<_>, _>>()?;

		let mut layout = Layout::new(root);
		if let Some(dir) = self.build_dir {
			layout.object_dir = dir.into();
		}
		if let Some(dir) = self.lib_dir {
			layout.lib_dir = dir.into();
		}
		if let Some(dir) = self.bin_dir {
			layout.bin_dir = dir.into();
		}
		if let Some(dir) = self.deps_dir {
			layout.deps_dir = dir.into();
		}

		Ok(Project { name, layout, outputs })
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use super::*;

	fn parse(text: &str) -> Result<Project, ValidationError> {
		let manifest = toml::from_str::<Manifest>(text).expect("manifest should deserialize");
		manifest.into_project(Path::new("/proj"))
	}

	#[test]
	fn full_manifest() {
		let project = parse(
			r#"
name = "demo"
build-dir = "obj"

[[outputs]]
name = "core"
language = "c"
type = "static_lib"
src = ["a.c", "b.c"]
include = "include"

[[outputs]]
name = "app"
language = "cpp"
type = "executable"
src = "main.cpp"

[[outputs.deps]]
name = "core"
use = "pkg-config"

[[outputs.deps]]
use = "git"
uri = "https://github.com/nothings/stb.git"
"#,
		)
		.unwrap();

		assert_eq!(project.name, "demo");
		assert_eq!(project.layout.object_dir, PathBuf::from("obj"));
		assert_eq!(project.layout.lib_dir, PathBuf::from("lib"));
		assert_eq!(project.outputs.len(), 2);
		assert_eq!(project.outputs[0].sources, vec!["a.c", "b.c"]);
		assert_eq!(project.outputs[0].include_path.as_deref(), Some("include"));
		let app = &project.outputs[1];
		assert_eq!(app.language, Language::Cpp);
		assert_eq!(app.sources, vec!["main.cpp"]);
		assert_eq!(app.dependencies[0], Dependency::package("core"));
		assert_eq!(app.dependencies[1], Dependency::fetch("stb", "https://github.com/nothings/stb.git"));
	}

	#[test]
	fn missing_language_reports_path() {
		let err = parse(
			r#"
name = "demo"
[[outputs]]
name = "core"
type = "static_lib"
src = ["a.c"]
"#,
		)
		.unwrap_err();
		assert_eq!(err.field, "outputs[0].language");
	}

	#[test]
	fn unknown_type_is_not_defaulted() {
		let err = parse(
			r#"
name = "demo"
[[outputs]]
name = "core"
language = "c"
type = "dll"
src = ["a.c"]
"#,
		)
		.unwrap_err();
		assert_eq!(err.field, "outputs[0].type");
	}

	#[test]
	fn missing_outputs() {
		assert_eq!(parse(r#"name = "demo""#).unwrap_err().field, "outputs");
		assert_eq!(parse(r#"outputs = []"#).unwrap_err().field, "name");
	}

	#[test]
	fn missing_src_becomes_empty() {
		let project = parse(
			r#"
name = "demo"
[[outputs]]
name = "core"
language = "c"
type = "static_lib"
"#,
		)
		.unwrap();
		assert!(project.outputs[0].sources.is_empty());
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(toml::from_str::<Manifest>("name = \"x\"\nflavour = \"y\"").is_err());
	}

	#[test]
	fn fetch_without_name_or_uri_reports_uri() {
		let err = parse(
			r#"
name = "demo"
[[outputs]]
name = "app"
language = "c"
type = "executable"
src = ["main.c"]
[[outputs.deps]]
use = "git"
"#,
		)
		.unwrap_err();
		assert_eq!(err.field, "outputs[0].deps[0].uri");
	}

	#[test]
	fn package_with_uri_fails_validation() {
		let project = parse(
			r#"
name = "demo"
[[outputs]]
name = "app"
language = "c"
type = "executable"
src = ["main.c"]
[[outputs.deps]]
name = "zlib"
use = "pkg-config"
uri = "https://github.com/madler/zlib.git"
"#,
		)
		.unwrap();
		let err = crate::validate::validate(&project).unwrap_err();
		assert_eq!(err.field, "outputs[0].deps[0].uri");
	}
}
