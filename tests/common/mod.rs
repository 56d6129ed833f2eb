#![allow(dead_code)]

use std::{
	collections::HashSet,
	fs, io,
	path::{Path, PathBuf},
};

use cbuild::{
	fetch::Fetcher,
	process::{Captured, CommandRunner, Invocation},
};

/// Stands in for gcc/ar/pkg-config: records every invocation and writes a
/// placeholder file wherever the real tool would have written its output.
#[derive(Default)]
pub struct RecordingRunner {
	pub invocations: Vec<Invocation>,
	/// Any invocation with this argument exits with the given code.
	pub fail_on: Option<(String, i32)>,
	/// Invocations of this program fail to spawn.
	pub missing_program: Option<String>,
	/// Packages pkg-config does not know.
	pub unknown_packages: HashSet<String>,
	/// Outputs that already existed on disk when the tool was run.
	pub preexisting_outputs: Vec<PathBuf>,
}

impl RecordingRunner {
	pub fn new() -> Self {
		RecordingRunner::default()
	}

	pub fn failing_on(arg: &str, code: i32) -> Self {
		RecordingRunner { fail_on: Some((arg.to_owned(), code)), ..Default::default() }
	}

	pub fn lines(&self) -> Vec<String> {
		self.invocations.iter().map(|x| x.to_string()).collect()
	}

	pub fn compiles(&self) -> Vec<&Invocation> {
		self.invocations.iter().filter(|x| x.arg_present("-c")).collect()
	}

	pub fn links(&self) -> Vec<&Invocation> {
		self.invocations
			.iter()
			.filter(|x| x.program == "ar" || ((x.program == "gcc" || x.program == "g++") && !x.arg_present("-c")))
			.collect()
	}

	pub fn pkg_config_queries(&self) -> Vec<&Invocation> {
		self.invocations.iter().filter(|x| x.program == "pkg-config").collect()
	}

	fn output_of<'a>(&self, inv: &'a Invocation) -> Option<&'a str> {
		if inv.program == "ar" {
			inv.args.get(1).map(String::as_str)
		} else {
			inv.value_of("-o")
		}
	}
}

impl CommandRunner for RecordingRunner {
	fn status(&mut self, inv: &Invocation) -> io::Result<i32> {
		self.invocations.push(inv.clone());
		if self.missing_program.as_deref() == Some(inv.program.as_str()) {
			return Err(io::Error::new(io::ErrorKind::NotFound, "program not found"));
		}
		if let Some((arg, code)) = &self.fail_on {
			if inv.arg_present(arg) {
				return Ok(*code);
			}
		}
		if let Some(out) = self.output_of(inv) {
			let path = inv.cwd.join(out);
			if path.exists() {
				self.preexisting_outputs.push(PathBuf::from(out));
			}
			fs::write(&path, inv.to_string()).expect("tool output directory should exist");
		}
		Ok(0)
	}

	fn capture(&mut self, inv: &Invocation) -> io::Result<Captured> {
		self.invocations.push(inv.clone());
		let (flag, packages) = inv.args.split_first().expect("pkg-config needs arguments");
		if let Some(unknown) = packages.iter().find(|x| self.unknown_packages.contains(*x)) {
			return Ok(Captured {
				code: 1,
				stdout: String::new(),
				stderr: format!("Package {} was not found in the pkg-config search path.", unknown),
			});
		}
		let stdout = packages
			.iter()
			.map(|x| match flag.as_str() {
				"--cflags" => format!("-I/usr/include/{}", x),
				_ => format!("-l{}", x),
			})
			.collect::<Vec<_>>()
			.join(" ");
		Ok(Captured { code: 0, stdout: stdout + "\n", stderr: String::new() })
	}
}

/// Creates the destination directory instead of cloning anything.
#[derive(Default)]
pub struct RecordingFetcher {
	pub fetched: Vec<(String, PathBuf)>,
	/// Also create an `include/` directory inside the fetched tree.
	pub with_include: bool,
	pub fail: bool,
}

impl Fetcher for RecordingFetcher {
	fn fetch(&mut self, uri: &str, dest: &Path) -> Result<(), anyhow::Error> {
		self.fetched.push((uri.to_owned(), dest.to_owned()));
		if self.fail {
			anyhow::bail!("repository not found");
		}
		if dest.exists() {
			anyhow::bail!("destination path '{}' already exists and is not an empty directory", dest.display());
		}
		fs::create_dir_all(dest)?;
		if self.with_include {
			fs::create_dir_all(dest.join("include"))?;
		}
		Ok(())
	}
}

pub fn is_empty_dir(dir: &Path) -> bool {
	fs::read_dir(dir).map(|mut x| x.next().is_none()).unwrap_or(false)
}
