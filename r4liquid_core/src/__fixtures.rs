use crate::DiffDocument;
use crate::FieldChangeMap;

pub(crate) const CONDITION_DIFF: &str = r#"{
  "Condition": {
    "Condition.clinicalStatus": ["Added Element"],
    "Condition.abatement": ["Deleted (-> Condition.abatementX)"]
  }
}"#;

pub(crate) const MIXED_DIFF: &str = r#"{
  "Encounter": {
    "Encounter.status": ["Remove codes planned, onleave", "Add codes discharged"],
    "Encounter.classHistory": ["Deleted"],
    "Encounter.hospitalization": ["Deleted (-> Encounter.admission)"],
    "Encounter.priority": ["Type changed from CodeableConcept to CodeableReference"],
    "Encounter.virtualService": ["Added Mandatory Element"],
    "Encounter.reasonCode": ["Deleted (-> Encounter.reason.use)", "Deleted"]
  },
  "Condition": {
    "Condition.clinicalStatus": ["Added Element"]
  }
}"#;

pub(crate) const EXPECTED_CONDITION: &str = r#"{% mergeDiff msg -%}
{% if msg.resourceType == "Condition" -%}
  {% assign fields = "" | split: "" %}
    {% assign fields = fields | push: '"abatement" : {{ msg.abatementX }}' %}
  {{ fields | join: "," }}
{% endif %}
{% endmergeDiff %}
"#;

pub(crate) fn document(json: &str) -> DiffDocument {
	DiffDocument::from_json(json).unwrap_or_else(|e| panic!("invalid fixture: {e}"))
}

pub(crate) fn single_resource(resource: &str, fields: &[(&str, &[&str])]) -> DiffDocument {
	let map: FieldChangeMap = fields
		.iter()
		.map(|(path, texts)| {
			let texts: Vec<String> = texts.iter().map(ToString::to_string).collect();
			((*path).to_string(), texts)
		})
		.collect();

	[(resource.to_string(), map)].into_iter().collect()
}

/// Number of lines in `output` that mention `needle`.
pub(crate) fn count_lines(output: &str, needle: &str) -> usize {
	output.lines().filter(|line| line.contains(needle)).count()
}
