use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::R4LiquidError;
use crate::R4LiquidResult;

/// Field path (e.g. `Condition.abatement`) to its change descriptor texts,
/// in the key order of the JSON source.
///
/// A key that appears twice keeps its first position and takes the last
/// value.
pub type FieldChangeMap = IndexMap<String, Vec<String>>;

/// Field-level differences between the R4 and R5 definitions of each
/// resource, keyed by resource name.
///
/// ```json
/// {
///   "Condition": {
///     "Condition.clinicalStatus": ["Added Element"],
///     "Condition.abatement": ["Deleted (-> Condition.abatementX)"]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct DiffDocument {
	resources: IndexMap<String, FieldChangeMap>,
}

impl DiffDocument {
	/// Parse a diff document from JSON text.
	pub fn from_json(content: &str) -> R4LiquidResult<Self> {
		Ok(serde_json::from_str(content)?)
	}

	/// The field change map for `resource`, if the document has one.
	pub fn resource(&self, resource: &str) -> Option<&FieldChangeMap> {
		self.resources.get(resource)
	}

	pub fn contains(&self, resource: &str) -> bool {
		self.resources.contains_key(resource)
	}

	/// Resource names in document order.
	pub fn resource_names(&self) -> impl Iterator<Item = &str> {
		self.resources.keys().map(String::as_str)
	}

	pub fn resources(&self) -> impl Iterator<Item = (&str, &FieldChangeMap)> {
		self.resources
			.iter()
			.map(|(name, fields)| (name.as_str(), fields))
	}

	pub fn len(&self) -> usize {
		self.resources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.resources.is_empty()
	}
}

impl FromIterator<(String, FieldChangeMap)> for DiffDocument {
	fn from_iter<I: IntoIterator<Item = (String, FieldChangeMap)>>(iter: I) -> Self {
		Self {
			resources: iter.into_iter().collect(),
		}
	}
}

/// Load a diff document from disk.
///
/// A missing file is reported as [`R4LiquidError::DiffNotFound`] before any
/// read is attempted. Invalid JSON surfaces as [`R4LiquidError::Json`].
pub fn load_diff_document(path: &Path) -> R4LiquidResult<DiffDocument> {
	if !path.exists() {
		return Err(R4LiquidError::DiffNotFound {
			path: path.to_path_buf(),
		});
	}

	let content = std::fs::read_to_string(path)?;
	let document = DiffDocument::from_json(&content)?;
	tracing::debug!(
		path = %path.display(),
		resources = document.len(),
		"loaded diff document"
	);

	Ok(document)
}
