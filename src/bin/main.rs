use std::{
	env, //
	path::PathBuf,
	process::ExitCode,
};

use clap::{Parser, Subcommand};

use cbuild::{fetch::DefaultFetcher, process::SystemRunner, Toolchain};

#[derive(Parser)]
#[command(name = "cbuild", version, about = "A C/C++ build system")]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Build every output declared in cbuild.toml
	#[command(visible_alias = "B")]
	Build {
		/// Directory containing cbuild.toml
		#[arg(short = 'S', long, default_value = ".")]
		source_dir: PathBuf,
	},
	/// Create a starter cbuild.toml and .gitignore
	#[command(visible_alias = "I")]
	Init {
		#[arg(short = 'S', long, default_value = ".")]
		source_dir: PathBuf,
		/// Project name, defaults to the directory name
		#[arg(long)]
		name: Option<String>,
	},
}

fn exit_code(code: i32) -> ExitCode {
	ExitCode::from(code.clamp(1, 255) as u8)
}

fn run_build(source_dir: PathBuf) -> ExitCode {
	// Absolute, so that rpaths baked into executables stay valid
	let source_dir = match source_dir.canonicalize() {
		Ok(x) => x,
		Err(e) => {
			println!("Error: could not open source dir {}: {}", source_dir.display(), e);
			return ExitCode::FAILURE;
		}
	};

	let project = match cbuild::parse_project(&source_dir) {
		Ok(x) => x,
		Err(e) => {
			println!("{}", e);
			return ExitCode::FAILURE;
		}
	};

	let toolchain = Toolchain::gnu();
	match cbuild::build(&project, &toolchain, &mut SystemRunner, &mut DefaultFetcher::default()) {
		Ok(report) => {
			for artifact in &report.artifacts {
				println!("  {}", artifact.display());
			}
			println!("{} built successfully", project.name);
			ExitCode::SUCCESS
		}
		Err(e) => {
			println!("Error: {}", e);
			exit_code(e.exit_code())
		}
	}
}

fn run_init(source_dir: PathBuf, name: Option<String>) -> ExitCode {
	let name = match name {
		Some(x) => x,
		None => {
			let dir = match source_dir.canonicalize() {
				Ok(x) => x,
				Err(_) => env::current_dir().unwrap_or_default().join(&source_dir),
			};
			dir.file_name().map(|x| x.to_string_lossy().into_owned()).unwrap_or("project".to_owned())
		}
	};
	match cbuild::init::init(&source_dir, &name) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			println!("Error: {:#}", e);
			ExitCode::FAILURE
		}
	}
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().filter_or("CBUILD_LOG", "info"))
		.format_timestamp(None)
		.init();

	let cli = Cli::parse();
	match cli.command {
		Command::Build { source_dir } => run_build(source_dir),
		Command::Init { source_dir, name } => run_init(source_dir, name),
	}
}
