use std::{fs, path::PathBuf};

use crate::{
	dependency::{Dependency, Mechanism},
	error::DependencyError,
	fetch::{local_name, Fetcher},
	output::{Output, OutputKind},
	process::{CommandRunner, Invocation},
	project::Project,
	toolchain::Toolchain,
};

/// Everything an output's dependencies contribute to its compile and link.
/// Paths are relative to the project root unless noted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedDeps {
	/// `pkg-config --cflags` output, one argument per element.
	pub compile_flags: Vec<String>,
	/// `pkg-config --libs` output, one argument per element.
	pub link_flags: Vec<String>,
	pub include_dirs: Vec<PathBuf>,
	/// Artifacts of in-project libraries, linked by path.
	pub project_libs: Vec<PathBuf>,
	/// On-disk directories of in-project shared libraries, for the runtime search path.
	pub runtime_dirs: Vec<PathBuf>,
	pub system_packages: Vec<String>,
	pub uses_system_libs: bool,
}

/// An in-project library this output links against, if `dep` names one.
fn project_library<'a>(dep: &Dependency, output: &Output, project: &'a Project) -> Option<&'a Output> {
	if dep.mechanism != Mechanism::PackageConfig || dep.identifier == output.name {
		return None;
	}
	project.find_output(&dep.identifier).filter(|x| x.kind.is_library())
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, item: T) {
	if !list.contains(&item) {
		list.push(item);
	}
}

fn fetch_dependency(
	dep: &Dependency,
	project: &Project,
	fetcher: &mut dyn Fetcher,
	resolved: &mut ResolvedDeps,
) -> Result<(), DependencyError> {
	let uri = match &dep.source_uri {
		Some(x) => x,
		None => {
			return Err(DependencyError::Fetch {
				identifier: dep.identifier.clone(),
				uri: String::new(),
				reason: "no uri given".to_owned(),
			})
		}
	};
	let layout = &project.layout;
	let name = local_name(uri);
	let rel_dest = layout.deps_dir.join(&name);
	let dest = layout.on_disk(&rel_dest);

	if dest.exists() {
		log::info!("Dependency {} already present at {}, not fetching", dep.identifier, rel_dest.display());
	} else {
		let deps_dir = layout.on_disk(&layout.deps_dir);
		fs::create_dir_all(&deps_dir).map_err(|e| DependencyError::Filesystem { path: deps_dir, source: e })?;
		log::info!("Fetching {} from {}", dep.identifier, uri);
		fetcher.fetch(uri, &dest).map_err(|e| DependencyError::Fetch {
			identifier: dep.identifier.clone(),
			uri: uri.clone(),
			reason: format!("{:#}", e),
		})?;
	}

	let include = rel_dest.join("include");
	if layout.on_disk(&include).is_dir() {
		push_unique(&mut resolved.include_dirs, include);
	} else {
		push_unique(&mut resolved.include_dirs, rel_dest);
	}
	Ok(())
}

fn query_package_config(
	flag: &str,
	packages: &[String],
	project: &Project,
	toolchain: &Toolchain,
	runner: &mut dyn CommandRunner,
) -> Result<Vec<String>, DependencyError> {
	let mut inv = Invocation::new(&toolchain.pkg_config, &project.layout.root);
	inv.arg(flag).args(packages);
	log::debug!("{}", inv);
	let captured = runner
		.capture(&inv)
		.map_err(|e| DependencyError::Spawn { program: inv.program.clone(), source: e })?;
	if !captured.success() {
		return Err(DependencyError::PackageConfig {
			packages: packages.to_vec(),
			exit_code: captured.code,
			stderr: captured.stderr.trim().to_owned(),
		});
	}
	Ok(captured.stdout.split_whitespace().map(String::from).collect())
}

/// Resolves `output`'s dependencies in declaration order.
///
/// Fetched sources are written under the project's deps directory; a
/// destination that already exists counts as fetched. The system package
/// registry is queried at most once per flag kind and not at all when no
/// dependency needs it.
pub fn resolve(
	output: &Output,
	project: &Project,
	toolchain: &Toolchain,
	runner: &mut dyn CommandRunner,
	fetcher: &mut dyn Fetcher,
) -> Result<ResolvedDeps, DependencyError> {
	let mut resolved = ResolvedDeps::default();

	for dep in &output.dependencies {
		if let Some(lib) = project_library(dep, output, project) {
			log::debug!("{} links in-project library {}", output.name, lib.name);
			push_unique(&mut resolved.project_libs, project.artifact_path(lib));
			if let Some(include) = &lib.include_path {
				push_unique(&mut resolved.include_dirs, PathBuf::from(include));
			}
			if lib.kind == OutputKind::SharedLib {
				push_unique(&mut resolved.runtime_dirs, project.layout.on_disk(&project.layout.lib_dir));
			}
			continue;
		}
		match dep.mechanism {
			Mechanism::PackageConfig => {
				push_unique(&mut resolved.system_packages, dep.identifier.clone());
				resolved.uses_system_libs = true;
			}
			Mechanism::SourceFetch => fetch_dependency(dep, project, fetcher, &mut resolved)?,
		}
	}

	if resolved.uses_system_libs {
		resolved.compile_flags =
			query_package_config("--cflags", &resolved.system_packages, project, toolchain, runner)?;
		resolved.link_flags = query_package_config("--libs", &resolved.system_packages, project, toolchain, runner)?;
	}

	Ok(resolved)
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::*;
	use crate::output::Language;

	fn project() -> Project {
		Project::new(
			"p",
			Path::new("/p"),
			vec![
				Output::new("core", Language::C, OutputKind::StaticLib, &["a.c"]),
				Output::new("tool", Language::C, OutputKind::Executable, &["t.c"]),
				Output::new("app", Language::C, OutputKind::Executable, &["m.c"]),
			],
		)
	}

	#[test]
	fn only_libraries_are_project_links() {
		let p = project();
		let app = &p.outputs[2];
		assert!(project_library(&Dependency::package("core"), app, &p).is_some());
		assert!(project_library(&Dependency::package("tool"), app, &p).is_none());
		assert!(project_library(&Dependency::package("zlib"), app, &p).is_none());
		assert!(project_library(&Dependency::fetch("core", "https://x/core.git"), app, &p).is_none());
	}

	#[test]
	fn self_reference_is_not_a_project_link() {
		let p = project();
		assert!(project_library(&Dependency::package("core"), &p.outputs[0], &p).is_none());
	}
}
