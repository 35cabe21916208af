use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::R4LiquidError;
use crate::R4LiquidResult;

/// Diff document read when neither `--input` nor `input` is given.
pub const DEFAULT_INPUT_FILE: &str = "fhir_r5_types_diff.json";

/// Extension of saved templates.
pub const DEFAULT_EXTENSION: &str = "liquid";

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["r4liquid.toml", ".r4liquid.toml", ".config/r4liquid.toml"];

/// Configuration loaded from an `r4liquid.toml` file.
///
/// ```toml
/// input = "fhir_r5_types_diff.json"
/// output_dir = "generated"
/// extension = "liquid"
/// resources = ["Condition", "ChargeItemDefinition"]
///
/// [[rules]]
/// resource = "Condition"
/// field = "participant.actor"
/// push = [
///   { name = "recorder", value = "{{msg.participant.actor}}" },
///   { name = "asserter", value = "{{msg.participant.actor}}" },
/// ]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct R4LiquidConfig {
	/// Path to the diff document, relative to the project root.
	#[serde(default = "default_input")]
	pub input: PathBuf,
	/// Directory for saved templates, relative to the project root.
	#[serde(default = "default_output_dir")]
	pub output_dir: PathBuf,
	/// Extension of saved template files, without the dot.
	#[serde(default = "default_extension")]
	pub extension: String,
	/// Resources generated when none are named on the command line.
	#[serde(default)]
	pub resources: Vec<String>,
	/// Hand-written restorations emitted ahead of the generated rules.
	#[serde(default)]
	pub rules: Vec<CustomRule>,
}

impl Default for R4LiquidConfig {
	fn default() -> Self {
		Self {
			input: default_input(),
			output_dir: default_output_dir(),
			extension: default_extension(),
			resources: Vec::new(),
			rules: Vec::new(),
		}
	}
}

fn default_input() -> PathBuf {
	PathBuf::from(DEFAULT_INPUT_FILE)
}

fn default_output_dir() -> PathBuf {
	PathBuf::from(".")
}

fn default_extension() -> String {
	DEFAULT_EXTENSION.to_string()
}

/// A restoration that cannot be derived from the diff descriptors alone,
/// such as one R5 element feeding two R4 elements.
///
/// The rule fires once per generated template when the resource's diff lists
/// `field` or any element nested below it.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomRule {
	/// Restrict the rule to one resource. Applies to every resource when
	/// absent.
	#[serde(default)]
	pub resource: Option<String>,
	/// Field path relative to the resource, e.g. `participant.actor`.
	pub field: String,
	/// Message path checked for truthiness. Defaults to `field`.
	#[serde(default)]
	pub guard: Option<String>,
	/// Entries appended to `fields` when the guard holds.
	pub push: Vec<RulePush>,
}

impl CustomRule {
	/// Whether this rule applies to `resource`.
	pub fn targets(&self, resource: &str) -> bool {
		self.resource.as_deref().is_none_or(|name| name == resource)
	}

	/// Whether the relative field path `path` is `field` or nested below it.
	pub fn matches_field(&self, path: &str) -> bool {
		path == self.field
			|| path
				.strip_prefix(self.field.as_str())
				.is_some_and(|rest| rest.starts_with('.'))
	}

	pub fn guard(&self) -> &str {
		self.guard.as_deref().unwrap_or(&self.field)
	}
}

/// One `"name" : value` entry pushed by a [`CustomRule`]. `value` is written
/// into the template as is, so it may contain Liquid output tags.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RulePush {
	pub name: String,
	pub value: String,
}

impl R4LiquidConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> R4LiquidResult<Option<R4LiquidConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> R4LiquidResult<R4LiquidConfig> {
		toml::from_str(content).map_err(|e| R4LiquidError::ConfigParse(e.to_string()))
	}

	/// The diff document path, resolved against `root`.
	pub fn input_path(&self, root: &Path) -> PathBuf {
		root.join(&self.input)
	}

	/// The output directory, resolved against `root`.
	pub fn output_path(&self, root: &Path) -> PathBuf {
		root.join(&self.output_dir)
	}
}

/// Sample config written by `r4liquid init`. Every line is a comment so the
/// file parses to the defaults until edited.
pub const SAMPLE_CONFIG: &str = r#"# r4liquid configuration

# Diff document describing R4 -> R5 element changes per resource.
# input = "fhir_r5_types_diff.json"

# Where generated templates are saved and the file extension they get.
# output_dir = "."
# extension = "liquid"

# Resources generated when `r4liquid generate` is run without arguments.
# resources = ["Condition"]

# Hand-written restorations, emitted before the generated rules.
# [[rules]]
# resource = "Condition"
# field = "participant.actor"
# push = [
#   { name = "recorder", value = "{{msg.participant.actor}}" },
#   { name = "asserter", value = "{{msg.participant.actor}}" },
# ]
#
# [[rules]]
# resource = "Condition"
# field = "evidence"
# push = [
#   { name = "evidence.code", value = "{{msg.evidence}}" },
#   { name = "evidence.detail", value = "{{msg.evidence}}" },
# ]
#
# [[rules]]
# resource = "Condition"
# field = "clinicalStatus"
# push = [{ name = "clinicalStatus", value = "{{msg.clinicalStatus | first}}" }]
#
# [[rules]]
# resource = "Condition"
# field = "category"
# push = [{ name = "category", value = "{{msg.category | first}}" }]
"#;
