use std::{
	fs,
	path::{Path, PathBuf},
};

use crate::{
	error::{BuildError, Phase},
	output::Output,
	process::{CommandRunner, Invocation},
	project::Project,
	resolve::ResolvedDeps,
	toolchain::Toolchain,
};

/// Object files of one output, in source order.
pub type ObjectFiles = Vec<PathBuf>;

/// `<object_dir>/<stem>.o`, where the stem is the source's file name without
/// its final extension. The source's directory does not appear in the name.
pub fn object_path(object_dir: &Path, source: &str) -> PathBuf {
	let stem = Path::new(source).file_stem().map(|x| x.to_string_lossy().into_owned()).unwrap_or_default();
	object_dir.join(stem + ".o")
}

/// Compiles every source of `output` into the project's object directory.
///
/// Sources are compiled one at a time in declaration order; the first one the
/// compiler rejects stops the output and its exit code is returned.
pub fn compile(
	output: &Output,
	deps: &ResolvedDeps,
	project: &Project,
	toolchain: &Toolchain,
	runner: &mut dyn CommandRunner,
) -> Result<ObjectFiles, BuildError> {
	let layout = &project.layout;
	let compiler = toolchain.compiler(output.language);
	log::info!("Compiling {} ({}) with {}", output.name, output.language, compiler.id());

	let mut include_dirs: Vec<PathBuf> = output.include_path.iter().map(PathBuf::from).collect();
	for dir in &deps.include_dirs {
		if !include_dirs.contains(dir) {
			include_dirs.push(dir.clone());
		}
	}

	let mut objects = ObjectFiles::new();
	for src in &output.sources {
		let object_dir = layout.on_disk(&layout.object_dir);
		fs::create_dir_all(&object_dir).map_err(|e| BuildError::Filesystem {
			phase: Phase::Compile,
			subject: src.clone(),
			path: object_dir,
			source: e,
		})?;

		let object = object_path(&layout.object_dir, src);
		if objects.contains(&object) {
			log::warn!("{}: {} overwrites an object file of the same name", output.name, object.display());
		}

		let mut inv = Invocation::new(&compiler.cmd(), &layout.root);
		inv.arg(compiler.compile_only_flag()).arg(src).args(&deps.compile_flags);
		inv.args(include_dirs.iter().map(|x| compiler.include_flag(x)));
		inv.args(compiler.strict_warning_flags());
		if output.needs_pic() {
			if let Some(flag) = compiler.position_independent_code_flag() {
				inv.arg(flag);
			}
		}
		inv.arg(compiler.out_flag()).arg(&object);

		log::info!("  {} -> {}", src, object.display());
		log::debug!("{}", inv);
		let code = runner.status(&inv).map_err(|e| BuildError::Spawn {
			phase: Phase::Compile,
			subject: src.clone(),
			program: inv.program.clone(),
			source: e,
		})?;
		if code != 0 {
			return Err(BuildError::Failed { phase: Phase::Compile, subject: src.clone(), exit_code: code });
		}
		objects.push(object);
	}

	Ok(objects)
}
