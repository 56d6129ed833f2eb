use std::{
	fs, io,
	path::{Path, PathBuf},
};

use crate::{
	compile::ObjectFiles,
	error::{BuildError, Phase},
	output::{Output, OutputKind},
	process::{CommandRunner, Invocation},
	project::Project,
	resolve::ResolvedDeps,
	toolchain::Toolchain,
};

/// Creates `dir` and its parents. Succeeds if it already exists.
pub fn ensure_directory(dir: &Path) -> io::Result<()> {
	fs::create_dir_all(dir)
}

/// Removes a previously built artifact so the tool writes a fresh one. `ar`
/// in particular appends to an existing archive. A missing file is fine.
pub fn ensure_fresh_archive(artifact: &Path) -> io::Result<()> {
	match fs::remove_file(artifact) {
		Ok(()) => {
			log::debug!("Removed stale {}", artifact.display());
			Ok(())
		}
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
		Err(e) => Err(e),
	}
}

fn link_invocation(
	output: &Output,
	objects: &ObjectFiles,
	deps: &ResolvedDeps,
	artifact: &Path,
	project: &Project,
	toolchain: &Toolchain,
) -> Invocation {
	let root = &project.layout.root;
	match output.kind {
		OutputKind::StaticLib => {
			let mut inv = Invocation::new(&toolchain.static_linker, root);
			inv.arg(artifact).args(objects);
			inv
		}
		OutputKind::SharedLib => {
			let compiler = toolchain.compiler(output.language);
			let mut inv = Invocation::new(&compiler.cmd(), root);
			inv.arg(compiler.shared_library_flag()).arg(compiler.out_flag()).arg(artifact);
			inv.args(objects).args(&deps.project_libs).args(&deps.link_flags);
			inv
		}
		OutputKind::Executable => {
			let compiler = toolchain.compiler(output.language);
			let mut inv = Invocation::new(&compiler.cmd(), root);
			inv.arg(compiler.out_flag()).arg(artifact);
			inv.args(objects).args(&deps.project_libs);
			inv.args(deps.runtime_dirs.iter().filter_map(|x| compiler.rpath_flag(x)));
			inv.args(&deps.link_flags).args(&deps.compile_flags);
			inv
		}
	}
}

/// Produces the final artifact of `output` from its object files and returns
/// its project-relative path.
pub fn link(
	output: &Output,
	objects: &ObjectFiles,
	deps: &ResolvedDeps,
	project: &Project,
	toolchain: &Toolchain,
	runner: &mut dyn CommandRunner,
) -> Result<PathBuf, BuildError> {
	let layout = &project.layout;
	let artifact = project.artifact_path(output);
	let fs_err = |path: PathBuf, e: io::Error| BuildError::Filesystem {
		phase: Phase::Link,
		subject: output.name.clone(),
		path,
		source: e,
	};

	let target_dir = layout.on_disk(artifact.parent().unwrap_or(Path::new("")));
	ensure_directory(&target_dir).map_err(|e| fs_err(target_dir.clone(), e))?;
	let on_disk = layout.on_disk(&artifact);
	ensure_fresh_archive(&on_disk).map_err(|e| fs_err(on_disk.clone(), e))?;

	let inv = link_invocation(output, objects, deps, &artifact, project, toolchain);
	log::info!("Linking {} {}", output.kind, artifact.display());
	log::debug!("{}", inv);
	let code = runner.status(&inv).map_err(|e| BuildError::Spawn {
		phase: Phase::Link,
		subject: output.name.clone(),
		program: inv.program.clone(),
		source: e,
	})?;
	if code != 0 {
		return Err(BuildError::Failed { phase: Phase::Link, subject: output.name.clone(), exit_code: code });
	}

	Ok(artifact)
}
