use std::collections::HashSet;

use crate::{
	dependency::Mechanism,
	error::ValidationError,
	output::Output,
	project::Project,
};

fn is_valid_name(name: &str) -> bool {
	!name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Structural checks on a single output. `index` is the output's position in
/// the project and only used to build the field path of an error.
pub fn validate_output(output: &Output, index: usize) -> Result<(), ValidationError> {
	let path = format!("outputs[{index}]");
	if output.name.is_empty() {
		return Err(ValidationError::new(format!("{path}.name"), "must not be empty"));
	}
	if !is_valid_name(&output.name) {
		return Err(ValidationError::new(
			format!("{path}.name"),
			format!("\"{}\" may only contain letters, digits, '_' and '-'", output.name),
		));
	}
	if output.sources.is_empty() {
		return Err(ValidationError::new(format!("{path}.sources"), "must not be empty"));
	}
	if let Some(i) = output.sources.iter().position(|x| x.trim().is_empty()) {
		return Err(ValidationError::new(format!("{path}.sources[{i}]"), "must not be blank"));
	}
	Ok(())
}

/// Checks the whole project before anything is built. Pure and idempotent.
pub fn validate(project: &Project) -> Result<(), ValidationError> {
	if project.name.trim().is_empty() {
		return Err(ValidationError::new("name", "must not be empty"));
	}
	if project.outputs.is_empty() {
		return Err(ValidationError::new("outputs", "must not be empty"));
	}
	for (i, output) in project.outputs.iter().enumerate() {
		validate_output(output, i)?;
	}

	let mut seen = HashSet::new();
	for (i, output) in project.outputs.iter().enumerate() {
		if !seen.insert(output.name.as_str()) {
			return Err(ValidationError::new(
				format!("outputs[{i}].name"),
				format!("duplicate output name \"{}\"", output.name),
			));
		}
	}

	for (i, output) in project.outputs.iter().enumerate() {
		for (j, dep) in output.dependencies.iter().enumerate() {
			if dep.mechanism == Mechanism::SourceFetch && dep.source_uri.as_deref().map_or(true, str::is_empty) {
				return Err(ValidationError::new(
					format!("outputs[{i}].deps[{j}].uri"),
					format!("dependency \"{}\" is fetched but has no uri", dep.identifier),
				));
			}
			if dep.mechanism == Mechanism::PackageConfig && dep.source_uri.is_some() {
				return Err(ValidationError::new(
					format!("outputs[{i}].deps[{j}].uri"),
					format!("dependency \"{}\" comes from pkg-config and cannot have a uri", dep.identifier),
				));
			}
		}
	}

	Ok(())
}
