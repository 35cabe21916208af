mod common;

use common::EXPECTED_CONDITION;
use predicates::prelude::PredicateBooleanExt;
use r4liquid_core::AnyEmptyResult;
use rstest::rstest;

#[test]
fn generate_prints_and_saves_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_diff(tmp.path())?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("Condition")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(EXPECTED_CONDITION)
		.stderr(predicates::str::contains(
			"Liquid template saved to Condition_Liquid_R4_",
		));

	let saved = common::saved_templates(tmp.path(), "Condition_Liquid_R4_")?;
	assert_eq!(saved.len(), 1);
	assert!(saved[0].ends_with(".liquid"));

	let content = std::fs::read_to_string(tmp.path().join(&saved[0]))?;
	assert_eq!(content, EXPECTED_CONDITION);

	Ok(())
}

#[test]
fn generate_no_save_only_prints() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_diff(tmp.path())?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("Condition")
		.arg("--no-save")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(EXPECTED_CONDITION))
		.stderr(predicates::str::contains("saved").not());

	assert!(common::saved_templates(tmp.path(), "Condition_")?.is_empty());

	Ok(())
}

#[test]
fn generate_quiet_only_saves() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_diff(tmp.path())?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("Encounter")
		.arg("--quiet")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::is_empty())
		.stderr(predicates::str::contains("Encounter_Liquid_R4_"));

	assert_eq!(
		common::saved_templates(tmp.path(), "Encounter_Liquid_R4_")?.len(),
		1
	);

	Ok(())
}

#[test]
fn generate_all_resources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_diff(tmp.path())?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("--all")
		.arg("--no-save")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"{% if msg.resourceType == \"Condition\" -%}",
		))
		.stdout(predicates::str::contains(
			"{% if msg.resourceType == \"Encounter\" -%}",
		))
		.stdout(predicates::str::contains(
			"    {% assign fields = fields | push: '\"status\" : \"onleave\"' %}",
		));

	Ok(())
}

#[test]
fn generate_unknown_resource_warns_and_emits_empty_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_diff(tmp.path())?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("Patient")
		.arg("--no-save")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"{% mergeDiff msg -%}\n{% endmergeDiff %}\n",
		))
		.stderr(predicates::str::contains("warning: resource `Patient`"))
		.stderr(predicates::str::contains("WARN"))
		.stderr(predicates::str::contains("resource not found in diff document"));

	Ok(())
}

#[test]
fn generate_without_resource_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_diff(tmp.path())?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no resource selected"));

	Ok(())
}

#[rstest]
#[case::missing(None, "diff document not found")]
#[case::invalid(Some("{ \"Condition\": "), "r4liquid::json")]
#[case::wrong_shape(Some("{ \"Condition\": [] }"), "r4liquid::json")]
fn generate_reports_bad_input(
	#[case] content: Option<&str>,
	#[case] message: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	if let Some(content) = content {
		std::fs::write(tmp.path().join("fhir_r5_types_diff.json"), content)?;
	}

	common::r4liquid_cmd()
		.arg("generate")
		.arg("Condition")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains(message));

	assert!(common::saved_templates(tmp.path(), "Condition_")?.is_empty());

	Ok(())
}

#[test]
fn generate_uses_input_override() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let input = tmp.path().join("diffs.json");
	std::fs::write(
		&input,
		r#"{"Foo": {"Foo.bar": ["Remove codes X, Y"]}}"#,
	)?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("Foo")
		.arg("--no-save")
		.arg("--input")
		.arg(&input)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"    {% assign fields = fields | push: '\"bar\" : \"X\"' %}",
		))
		.stdout(predicates::str::contains(
			"    {% assign fields = fields | push: '\"bar\" : \"Y\"' %}",
		));

	Ok(())
}

#[test]
fn generate_follows_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("data"))?;
	std::fs::write(tmp.path().join("data/r5.json"), common::CONDITION_DIFF)?;
	std::fs::write(
		tmp.path().join("r4liquid.toml"),
		r#"
input = "data/r5.json"
output_dir = "out"
extension = "txt"
resources = ["Condition"]

[[rules]]
resource = "Condition"
field = "clinicalStatus"
push = [{ name = "clinicalStatus", value = "{{msg.clinicalStatus | first}}" }]
"#,
	)?;

	common::r4liquid_cmd()
		.arg("generate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"    {% assign fields = fields | push: '\"clinicalStatus\" : {{msg.clinicalStatus | \
			 first}}' %}",
		));

	let saved = common::saved_templates(&tmp.path().join("out"), "Condition_Liquid_R4_")?;
	assert_eq!(saved.len(), 1);
	assert!(saved[0].ends_with(".txt"));

	Ok(())
}
