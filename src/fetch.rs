use std::{
	fs,
	io::Cursor,
	path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use flate2::read::GzDecoder;

use crate::process::{CommandRunner, Invocation, SystemRunner};

const ARCHIVE_SUFFIXES: [&str; 2] = [".tar.gz", ".tgz"];

/// Materializes external sources on disk.
pub trait Fetcher {
	/// Fetches `uri` into `dest`. `dest` does not exist when this is called.
	fn fetch(&mut self, uri: &str, dest: &Path) -> Result<(), anyhow::Error>;
}

fn is_archive(uri: &str) -> bool {
	ARCHIVE_SUFFIXES.iter().any(|suffix| uri.ends_with(suffix))
}

/// Directory name a fetched URI is stored under: its last path segment
/// without a trailing `/`, `.git` or archive suffix.
pub fn local_name(uri: &str) -> String {
	let mut name = uri.trim_end_matches('/');
	for suffix in [".git"].iter().chain(ARCHIVE_SUFFIXES.iter()) {
		if let Some(stripped) = name.strip_suffix(suffix) {
			name = stripped;
			break;
		}
	}
	// `git@host:owner/repo` has no slash before the owner
	let name = name.rsplit(|c: char| c == '/' || c == ':').next().unwrap_or(name);
	name.to_owned()
}

/// Bare host paths such as `github.com/owner/repo` are taken to be https.
pub fn normalize_uri(uri: &str) -> String {
	let is_local = uri.starts_with('/') || uri.starts_with('.');
	if uri.contains("://") || uri.starts_with("git@") || is_local {
		uri.to_owned()
	} else {
		format!("https://{}", uri)
	}
}

/// Clones repositories with `git` and downloads `.tar.gz` archives over HTTP.
pub struct DefaultFetcher {
	pub git: Vec<String>,
}

impl Default for DefaultFetcher {
	fn default() -> Self {
		DefaultFetcher { git: vec!["git".to_owned()] }
	}
}

impl DefaultFetcher {
	fn clone_repo(&self, uri: &str, dest: &Path) -> Result<(), anyhow::Error> {
		let cwd = Path::new(".");
		let mut inv = Invocation::new(&self.git, cwd);
		inv.args(["clone", "--depth=1", uri]).arg(dest);
		log::info!("Cloning {} into {}", uri, dest.display());
		let code = SystemRunner
			.status(&inv)
			.with_context(|| format!("Error executing \"{}\"", inv))?;
		if code != 0 {
			bail!("\"{}\" exited with code {}", inv, code);
		}
		Ok(())
	}

	fn download_archive(&self, uri: &str, dest: &Path) -> Result<(), anyhow::Error> {
		log::info!("Downloading {}", uri);
		let bytes = reqwest::blocking::get(uri)
			.and_then(|resp| resp.error_for_status())
			.and_then(|resp| resp.bytes())
			.with_context(|| format!("Error downloading {}", uri))?;

		let staging = staging_dir(dest);
		if staging.exists() {
			fs::remove_dir_all(&staging).with_context(|| format!("Error removing {}", staging.display()))?;
		}
		let mut archive = tar::Archive::new(GzDecoder::new(Cursor::new(bytes)));
		archive
			.unpack(&staging)
			.with_context(|| format!("Error unpacking {} into {}", uri, staging.display()))?;

		// Archives usually wrap everything in one top-level directory.
		let entries = fs::read_dir(&staging)?.collect::<Result<Vec<_>, _>>()?;
		let root = match entries.as_slice() {
			[single] if single.file_type()?.is_dir() => single.path(),
			_ => staging.clone(),
		};
		fs::rename(&root, dest).with_context(|| format!("Error moving {} to {}", root.display(), dest.display()))?;
		if staging.exists() {
			fs::remove_dir_all(&staging)?;
		}
		Ok(())
	}
}

fn staging_dir(dest: &Path) -> PathBuf {
	let mut name = dest.file_name().unwrap_or_default().to_os_string();
	name.push(".partial");
	dest.with_file_name(name)
}

impl Fetcher for DefaultFetcher {
	fn fetch(&mut self, uri: &str, dest: &Path) -> Result<(), anyhow::Error> {
		let uri = normalize_uri(uri);
		if is_archive(&uri) {
			self.download_archive(&uri, dest)
		} else {
			self.clone_repo(&uri, dest)
		}
	}
}
