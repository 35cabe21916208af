use serde::Serialize;

const ADDED_ELEMENT: &str = "Added Element";
const ADDED_MANDATORY_ELEMENT: &str = "Added Mandatory Element";
const CODES: &str = "codes";
const REMOVE_CODES: &str = "Remove codes";
const ADD_CODES: &str = "Add codes";
const DELETED: &str = "Deleted";
const DELETED_REDIRECT: &str = "Deleted (->";
const REDIRECT_OPEN: &str = "(->";
const REDIRECT_ARROW: &str = "->";

/// A single change descriptor from the diff, classified once up front.
///
/// Classification is by phrase, checked in declaration order; the first
/// matching variant wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChangeDescriptor {
	/// The element is new in R5 and has no place in the R4 shape.
	Added { mandatory: bool },
	/// Codes that exist in the R4 value set but were dropped in R5.
	CodesRemoved { codes: Vec<String> },
	/// Codes introduced in R5. These need no restoration.
	CodesAdded { codes: Vec<String> },
	/// The element was removed in R5; its value now lives at `target`.
	DeletedRedirect { target: String },
	/// The element was removed in R5 without a replacement.
	DeletedPlain,
	/// Anything else: renames, type or cardinality changes.
	Other { text: String },
}

impl ChangeDescriptor {
	pub fn parse(text: &str) -> Self {
		if text.contains(ADDED_MANDATORY_ELEMENT) {
			return Self::Added { mandatory: true };
		}

		if text.contains(ADDED_ELEMENT) {
			return Self::Added { mandatory: false };
		}

		if text.contains(CODES) {
			return if text.contains(REMOVE_CODES) {
				Self::CodesRemoved {
					codes: parse_codes(text, REMOVE_CODES),
				}
			} else {
				Self::CodesAdded {
					codes: parse_codes(text, ADD_CODES),
				}
			};
		}

		if text.contains(DELETED_REDIRECT) {
			return Self::DeletedRedirect {
				target: redirect_target(text),
			};
		}

		if text.contains(DELETED) && !text.contains(REDIRECT_OPEN) {
			return Self::DeletedPlain;
		}

		Self::Other {
			text: text.to_string(),
		}
	}

	pub fn is_added(&self) -> bool {
		matches!(self, Self::Added { .. })
	}

	pub fn is_codes(&self) -> bool {
		matches!(self, Self::CodesRemoved { .. } | Self::CodesAdded { .. })
	}

	/// Short label used in listings and logs.
	pub fn label(&self) -> &'static str {
		match self {
			Self::Added { mandatory: false } => "added",
			Self::Added { mandatory: true } => "addedMandatory",
			Self::CodesRemoved { .. } => "codesRemoved",
			Self::CodesAdded { .. } => "codesAdded",
			Self::DeletedRedirect { .. } => "deletedRedirect",
			Self::DeletedPlain => "deleted",
			Self::Other { .. } => "other",
		}
	}
}

/// Comma separated codes left over once `phrase` is removed from `text`.
fn parse_codes(text: &str, phrase: &str) -> Vec<String> {
	text.replace(phrase, "")
		.split(',')
		.map(str::trim)
		.filter(|code| !code.is_empty())
		.map(ToString::to_string)
		.collect()
}

/// The path between the first `->` and the next one (or the end), without
/// surrounding spaces and parentheses. May be empty.
fn redirect_target(text: &str) -> String {
	text.split(REDIRECT_ARROW)
		.nth(1)
		.unwrap_or_default()
		.trim_matches(|c: char| c == ' ' || c == ')')
		.to_string()
}

/// Parse every descriptor of a single field, keeping their order.
pub fn parse_descriptors<S: AsRef<str>>(texts: &[S]) -> Vec<ChangeDescriptor> {
	texts
		.iter()
		.map(|text| ChangeDescriptor::parse(text.as_ref()))
		.collect()
}

/// Strip the leading `<resource>.` from a dotted path. Paths without the
/// prefix are returned unchanged.
pub fn relative_path<'a>(path: &'a str, resource: &str) -> &'a str {
	path.strip_prefix(resource)
		.and_then(|rest| rest.strip_prefix('.'))
		.unwrap_or(path)
}
