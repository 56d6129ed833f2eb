use core::fmt;
use std::{
	ffi::OsStr,
	io,
	path::{Path, PathBuf},
	process,
};

/// One external program run: a program and its discrete arguments, executed in
/// `cwd`. Arguments are never joined into a shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
	pub program: String,
	pub args: Vec<String>,
	pub cwd: PathBuf,
}

impl Invocation {
	/// `cmd` is a command prefix such as `["ar", "rcs"]`: the first element is
	/// the program, the rest become leading arguments.
	pub fn new(cmd: &[String], cwd: &Path) -> Self {
		let (program, args) = match cmd.split_first() {
			Some((program, args)) => (program.clone(), args.to_vec()),
			None => (String::new(), Vec::new()),
		};
		Invocation { program, args, cwd: cwd.to_owned() }
	}

	pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
		self.args.push(arg.as_ref().to_string_lossy().into_owned());
		self
	}

	pub fn args<I, S>(&mut self, args: I) -> &mut Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<OsStr>,
	{
		for arg in args {
			self.arg(arg);
		}
		self
	}

	pub fn arg_present(&self, arg: &str) -> bool {
		self.args.iter().any(|x| x == arg)
	}

	/// The argument following `flag`, e.g. the path after `-o`.
	pub fn value_of(&self, flag: &str) -> Option<&str> {
		let idx = self.args.iter().position(|x| x == flag)?;
		self.args.get(idx + 1).map(String::as_str)
	}
}

impl fmt::Display for Invocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.program)?;
		for arg in &self.args {
			write!(f, " {}", arg)?;
		}
		Ok(())
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
	pub code: i32,
	pub stdout: String,
	pub stderr: String,
}

impl Captured {
	pub fn success(&self) -> bool {
		self.code == 0
	}
}

/// Runs external programs on behalf of the build. Every call blocks until the
/// program exits.
pub trait CommandRunner {
	/// Runs with inherited stdio and returns the exit code.
	fn status(&mut self, inv: &Invocation) -> io::Result<i32>;

	/// Runs with stdout/stderr captured.
	fn capture(&mut self, inv: &Invocation) -> io::Result<Captured>;
}

/// Terminated-by-signal processes report no code; treat them as a plain failure.
fn exit_code(status: process::ExitStatus) -> i32 {
	status.code().unwrap_or(1)
}

#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
	fn command(inv: &Invocation) -> process::Command {
		let mut cmd = process::Command::new(&inv.program);
		cmd.args(&inv.args).current_dir(&inv.cwd);
		cmd
	}
}

impl CommandRunner for SystemRunner {
	fn status(&mut self, inv: &Invocation) -> io::Result<i32> {
		log::debug!("run: {} (in {})", inv, inv.cwd.display());
		let status = Self::command(inv).status()?;
		Ok(exit_code(status))
	}

	fn capture(&mut self, inv: &Invocation) -> io::Result<Captured> {
		log::debug!("capture: {} (in {})", inv, inv.cwd.display());
		let output = Self::command(inv).output()?;
		Ok(Captured {
			code: exit_code(output.status),
			stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
			stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
		})
	}
}
