use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use crate::ChangeDescriptor;
use crate::CustomRule;
use crate::DiffDocument;
use crate::FieldChangeMap;
use crate::parse_descriptors;
use crate::relative_path;

/// Template returned for a resource that is not in the diff document.
pub const EMPTY_TEMPLATE: &str = "{% mergeDiff msg -%}\n{% endmergeDiff %}\n";

/// Keys already pushed onto `fields` during one generation pass.
///
/// A key is a relative field path, or `path.code` for a restored code, so
/// each key yields at most one template rule.
#[derive(Debug, Default, Clone)]
pub struct EmissionState {
	emitted: HashSet<String>,
}

impl EmissionState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.emitted.contains(key)
	}

	/// Record `key`. Returns `false` when it was already recorded.
	pub fn mark(&mut self, key: impl Into<String>) -> bool {
		self.emitted.insert(key.into())
	}

	pub fn len(&self) -> usize {
		self.emitted.len()
	}

	pub fn is_empty(&self) -> bool {
		self.emitted.is_empty()
	}
}

/// Generate the R4 restoration template for `resource`.
///
/// The output is a pure function of the inputs. A resource missing from the
/// document yields [`EMPTY_TEMPLATE`].
pub fn generate(document: &DiffDocument, resource: &str) -> String {
	generate_with_rules(document, resource, &[])
}

/// Like [`generate`], with hand-written [`CustomRule`]s emitted ahead of the
/// rules derived from the diff.
pub fn generate_with_rules(
	document: &DiffDocument,
	resource: &str,
	rules: &[CustomRule],
) -> String {
	let Some(fields) = document.resource(resource) else {
		tracing::warn!(resource, "resource not found in diff document");
		return EMPTY_TEMPLATE.to_string();
	};

	let mut writer = TemplateWriter::new();
	let mut state = EmissionState::new();

	writer.line("{% mergeDiff msg -%}");
	writer.line(&format!("{{% if msg.resourceType == \"{resource}\" -%}}"));
	writer.line("  {% assign fields = \"\" | split: \"\" %}");

	emit_custom_rules(&mut writer, &mut state, fields, resource, rules);

	for (path, texts) in fields.iter() {
		let field = relative_path(path, resource);
		let descriptors = parse_descriptors(texts);
		emit_field(&mut writer, &mut state, resource, field, &descriptors);
	}

	writer.line("  {{ fields | join: \",\" }}");
	writer.line("{% endif %}");
	writer.line("{% endmergeDiff %}");

	tracing::debug!(resource, rules = state.len(), "generated template");
	writer.finish()
}

fn emit_field(
	writer: &mut TemplateWriter,
	state: &mut EmissionState,
	resource: &str,
	field: &str,
	descriptors: &[ChangeDescriptor],
) {
	if descriptors.iter().any(ChangeDescriptor::is_added) {
		tracing::debug!(field, "skipping element added in R5");
		return;
	}

	if descriptors.iter().any(ChangeDescriptor::is_codes) {
		emit_removed_codes(writer, state, field, descriptors);
		return;
	}

	for descriptor in descriptors {
		if let ChangeDescriptor::DeletedRedirect { target } = descriptor {
			if state.contains(field) {
				continue;
			}

			let target = relative_path(target, resource);
			tracing::debug!(field, target, "restoring deleted element from redirect");
			writer.push(field, &format!("{{{{ msg.{target} }}}}"));
			state.mark(field);
		}
	}

	let deleted = descriptors
		.iter()
		.any(|d| matches!(d, ChangeDescriptor::DeletedPlain));
	if deleted && !state.contains(field) {
		tracing::debug!(field, "restoring deleted element as null");
		writer.open_if(&format!("msg.{field} == null"));
		writer.push(field, "null");
		writer.close_if();
		state.mark(field);
	}

	if !state.contains(field) {
		tracing::debug!(field, "copying element through");
		writer.open_if(&format!("msg.{field}"));
		writer.push(field, &format!("{{{{ msg.{field} }}}}"));
		writer.close_if();
		state.mark(field);
	}
}

/// Codes dropped from the R5 value set are forced back in. Added codes need
/// nothing.
fn emit_removed_codes(
	writer: &mut TemplateWriter,
	state: &mut EmissionState,
	field: &str,
	descriptors: &[ChangeDescriptor],
) {
	for descriptor in descriptors {
		let ChangeDescriptor::CodesRemoved { codes } = descriptor else {
			continue;
		};

		for code in codes {
			if !state.mark(format!("{field}.{code}")) {
				continue;
			}

			tracing::debug!(field, code = code.as_str(), "restoring removed code");
			writer.open_if(&format!("msg.{field}"));
			writer.push(field, &format!("\"{code}\""));
			writer.close_if();
		}
	}
}

fn emit_custom_rules(
	writer: &mut TemplateWriter,
	state: &mut EmissionState,
	fields: &FieldChangeMap,
	resource: &str,
	rules: &[CustomRule],
) {
	for rule in rules.iter().filter(|rule| rule.targets(resource)) {
		let fires = fields
			.keys()
			.any(|path| rule.matches_field(relative_path(path, resource)));
		if !fires {
			continue;
		}

		let pushes: Vec<_> = rule
			.push
			.iter()
			.filter(|push| state.mark(push.name.as_str()))
			.collect();
		if pushes.is_empty() {
			continue;
		}

		tracing::debug!(field = rule.field.as_str(), "applying custom rule");
		writer.open_if(&format!("msg.{}", rule.guard()));
		for push in pushes {
			writer.push(&push.name, &push.value);
		}
		writer.close_if();
	}
}

/// Line-oriented builder for the template directives.
struct TemplateWriter {
	buffer: String,
}

impl TemplateWriter {
	fn new() -> Self {
		Self {
			buffer: String::new(),
		}
	}

	fn line(&mut self, line: &str) {
		self.buffer.push_str(line);
		self.buffer.push('\n');
	}

	fn open_if(&mut self, condition: &str) {
		let _ = writeln!(self.buffer, "  {{% if {condition} -%}}");
	}

	fn close_if(&mut self) {
		self.line("  {% endif -%}");
	}

	fn push(&mut self, name: &str, value: &str) {
		let _ = writeln!(
			self.buffer,
			"    {{% assign fields = fields | push: '\"{name}\" : {value}' %}}"
		);
	}

	fn finish(self) -> String {
		self.buffer
	}
}

/// Descriptor counts for one resource, used by listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
	pub resource: String,
	pub fields: usize,
	pub added: usize,
	pub deleted: usize,
	pub redirected: usize,
	pub codes_removed: usize,
	pub codes_added: usize,
	pub other: usize,
}

impl ResourceSummary {
	pub fn new(resource: &str, fields: &FieldChangeMap) -> Self {
		let mut summary = Self {
			resource: resource.to_string(),
			fields: fields.len(),
			..Self::default()
		};

		for (_, texts) in fields.iter() {
			for descriptor in parse_descriptors(texts) {
				match descriptor {
					ChangeDescriptor::Added { .. } => summary.added += 1,
					ChangeDescriptor::DeletedPlain => summary.deleted += 1,
					ChangeDescriptor::DeletedRedirect { .. } => summary.redirected += 1,
					ChangeDescriptor::CodesRemoved { .. } => summary.codes_removed += 1,
					ChangeDescriptor::CodesAdded { .. } => summary.codes_added += 1,
					ChangeDescriptor::Other { .. } => summary.other += 1,
				}
			}
		}

		summary
	}
}

/// Summaries for every resource in document order.
pub fn summarize(document: &DiffDocument) -> Vec<ResourceSummary> {
	document
		.resources()
		.map(|(resource, fields)| ResourceSummary::new(resource, fields))
		.collect()
}
