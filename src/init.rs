use std::{fs, io, path::Path};

use anyhow::{bail, Context};
use serde::Serialize;

use crate::manifest::CBUILD_TOML;

const GITIGNORE: &str = ".gitignore";
const IGNORED: [&str; 7] = ["bin/", "lib/", "build/", "_deps/", "*.a", "*.so", "*.exe"];

#[derive(Serialize)]
struct StarterManifest<'a> {
	name: &'a str,
	outputs: Vec<StarterOutput>,
}

#[derive(Serialize)]
struct StarterOutput {
	name: &'static str,
	language: &'static str,
	#[serde(rename = "type")]
	kind: &'static str,
	src: Vec<&'static str>,
}

fn starter_manifest(name: &str) -> Result<String, toml::ser::Error> {
	toml::to_string(&StarterManifest {
		name,
		outputs: vec![StarterOutput { name: "main", language: "c", kind: "executable", src: vec!["main.c"] }],
	})
}

/// The `.gitignore` contents with the build directories added, or `None` if
/// they are all listed already. A missing file counts as empty.
fn updated_gitignore(path: &Path) -> Result<Option<String>, anyhow::Error> {
	let existing = match fs::read_to_string(path) {
		Ok(x) => x,
		Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
		Err(e) => return Err(e).with_context(|| format!("Error reading {}", path.display())),
	};
	let missing = IGNORED
		.iter()
		.filter(|x| !existing.lines().any(|line| line.trim() == **x))
		.copied()
		.collect::<Vec<_>>();
	if missing.is_empty() {
		return Ok(None);
	}
	let mut contents = existing;
	if !contents.is_empty() && !contents.ends_with('\n') {
		contents.push('\n');
	}
	contents += &missing.join("\n");
	contents.push('\n');
	Ok(Some(contents))
}

/// Writes a starter `cbuild.toml` into `dir` and makes sure the build
/// directories are git-ignored. An existing manifest is never overwritten,
/// and nothing is written if the existing `.gitignore` can't be read.
pub fn init(dir: &Path, name: &str) -> Result<(), anyhow::Error> {
	let manifest_path = dir.join(CBUILD_TOML);
	if manifest_path.exists() {
		bail!("{} already exists", manifest_path.display());
	}
	let gitignore_path = dir.join(GITIGNORE);
	let gitignore = updated_gitignore(&gitignore_path)?;
	let manifest = starter_manifest(name).context("Error serializing starter manifest")?;

	fs::create_dir_all(dir).with_context(|| format!("Error creating directory {}", dir.display()))?;
	fs::write(&manifest_path, manifest).with_context(|| format!("Error writing {}", manifest_path.display()))?;
	log::info!("Created {}", manifest_path.display());

	if let Some(contents) = gitignore {
		fs::write(&gitignore_path, contents).with_context(|| format!("Error writing {}", gitignore_path.display()))?;
	}
	Ok(())
}
