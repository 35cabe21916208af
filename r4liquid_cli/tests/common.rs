#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const CONDITION_DIFF: &str = r#"{
  "Condition": {
    "Condition.clinicalStatus": ["Added Element"],
    "Condition.abatement": ["Deleted (-> Condition.abatementX)"]
  },
  "Encounter": {
    "Encounter.status": ["Remove codes planned, onleave"],
    "Encounter.classHistory": ["Deleted"]
  }
}"#;

pub const EXPECTED_CONDITION: &str = r#"{% mergeDiff msg -%}
{% if msg.resourceType == "Condition" -%}
  {% assign fields = "" | split: "" %}
    {% assign fields = fields | push: '"abatement" : {{ msg.abatementX }}' %}
  {{ fields | join: "," }}
{% endif %}
{% endmergeDiff %}
"#;

pub fn r4liquid_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("r4liquid"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("R4LIQUID_LOG");
	cmd
}

/// Write the default diff document into `root`.
pub fn write_diff(root: &Path) -> std::io::Result<()> {
	std::fs::write(root.join("fhir_r5_types_diff.json"), CONDITION_DIFF)
}

/// Saved templates in `dir` whose names start with `prefix`, sorted.
pub fn saved_templates(dir: &Path, prefix: &str) -> std::io::Result<Vec<String>> {
	let mut names = Vec::new();
	for entry in std::fs::read_dir(dir)? {
		let name = entry?.file_name().to_string_lossy().into_owned();
		if name.starts_with(prefix) {
			names.push(name);
		}
	}
	names.sort();
	Ok(names)
}
