use core::fmt;
use std::path::PathBuf;

use crate::{
	compile::compile,
	error::Error,
	fetch::Fetcher,
	link::link,
	output::Output,
	process::CommandRunner,
	project::Project,
	resolve::resolve,
	toolchain::Toolchain,
	validate::validate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	Resolving,
	Compiling,
	Linking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
	Idle,
	Validating,
	Building { output: String, stage: Stage },
	Failed,
	Succeeded,
}

impl BuildState {
	pub fn is_terminal(&self) -> bool {
		matches!(self, BuildState::Failed | BuildState::Succeeded)
	}
}

impl fmt::Display for BuildState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			BuildState::Idle => write!(f, "idle"),
			BuildState::Validating => write!(f, "validating"),
			BuildState::Building { output, stage } => write!(f, "building {} ({:?})", output, stage),
			BuildState::Failed => write!(f, "failed"),
			BuildState::Succeeded => write!(f, "succeeded"),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
	/// Project-relative artifact paths, in output order.
	pub artifacts: Vec<PathBuf>,
}

/// Drives a whole project through validation and then, output by output in
/// declaration order, through resolve, compile and link.
///
/// Outputs are not reordered: a library must be declared before anything
/// that links it. The first error ends the build; artifacts produced until
/// then are left in place.
pub struct Executor<'a> {
	project: &'a Project,
	toolchain: &'a Toolchain,
	runner: &'a mut dyn CommandRunner,
	fetcher: &'a mut dyn Fetcher,
	state: BuildState,
}

impl<'a> Executor<'a> {
	pub fn new(
		project: &'a Project,
		toolchain: &'a Toolchain,
		runner: &'a mut dyn CommandRunner,
		fetcher: &'a mut dyn Fetcher,
	) -> Self {
		Executor { project, toolchain, runner, fetcher, state: BuildState::Idle }
	}

	pub fn state(&self) -> &BuildState {
		&self.state
	}

	fn transition(&mut self, next: BuildState) {
		log::debug!("{} -> {}", self.state, next);
		self.state = next;
	}

	fn enter(&mut self, output: &Output, stage: Stage) {
		self.transition(BuildState::Building { output: output.name.clone(), stage });
	}

	fn build_output(&mut self, output: &Output) -> Result<PathBuf, Error> {
		log::info!("Building {}", output.name);
		log::debug!("{}", output);

		self.enter(output, Stage::Resolving);
		let deps = resolve(output, self.project, self.toolchain, &mut *self.runner, &mut *self.fetcher)?;

		self.enter(output, Stage::Compiling);
		let objects = compile(output, &deps, self.project, self.toolchain, &mut *self.runner)?;

		self.enter(output, Stage::Linking);
		let artifact = link(output, &objects, &deps, self.project, self.toolchain, &mut *self.runner)?;
		Ok(artifact)
	}

	fn run_inner(&mut self) -> Result<BuildReport, Error> {
		self.transition(BuildState::Validating);
		validate(self.project)?;

		let project = self.project;
		log::info!("Building project {}", project.name);
		let mut report = BuildReport::default();
		for output in &project.outputs {
			report.artifacts.push(self.build_output(output)?);
		}
		Ok(report)
	}

	/// Runs the build to a terminal state. Calling it again starts over from
	/// validation.
	pub fn run(&mut self) -> Result<BuildReport, Error> {
		self.transition(BuildState::Idle);
		match self.run_inner() {
			Ok(report) => {
				self.transition(BuildState::Succeeded);
				log::info!("{} built successfully", self.project.name);
				Ok(report)
			}
			Err(e) => {
				self.transition(BuildState::Failed);
				Err(e)
			}
		}
	}
}

/// Validates and builds `project` in one call.
pub fn build(
	project: &Project,
	toolchain: &Toolchain,
	runner: &mut dyn CommandRunner,
	fetcher: &mut dyn Fetcher,
) -> Result<BuildReport, Error> {
	Executor::new(project, toolchain, runner, fetcher).run()
}
