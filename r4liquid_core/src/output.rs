use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Local;

use crate::R4LiquidError;
use crate::R4LiquidResult;

/// Second-granularity timestamp format embedded in saved file names. Sorting
/// names lexically sorts them chronologically.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const FILE_NAME_MARKER: &str = "_Liquid_R4_";

/// `<resource>_Liquid_R4_<YYYYMMDD_HHMMSS>.<extension>`
pub fn output_file_name(resource: &str, extension: &str, timestamp: &DateTime<Local>) -> String {
	format!(
		"{resource}{FILE_NAME_MARKER}{}.{extension}",
		timestamp.format(TIMESTAMP_FORMAT)
	)
}

/// Write `text` verbatim to a freshly named file in `dir` and return its path.
///
/// The directory is created when missing. A failed write is returned as
/// [`R4LiquidError::OutputWrite`]; a partially written file is left in place.
pub fn save_template(
	dir: &Path,
	resource: &str,
	text: &str,
	extension: &str,
) -> R4LiquidResult<PathBuf> {
	let path = dir.join(output_file_name(resource, extension, &Local::now()));
	write_template(&path, text)?;
	tracing::info!(path = %path.display(), resource, "saved template");

	Ok(path)
}

fn write_template(path: &Path, text: &str) -> R4LiquidResult<()> {
	let to_error = |source| {
		R4LiquidError::OutputWrite {
			path: path.to_path_buf(),
			source,
		}
	};

	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).map_err(to_error)?;
	}

	std::fs::write(path, text).map_err(to_error)
}

/// The most recently saved template for `resource` in `dir`, judged by the
/// timestamp in its file name.
pub fn find_latest_output(
	dir: &Path,
	resource: &str,
	extension: &str,
) -> R4LiquidResult<Option<PathBuf>> {
	if !dir.is_dir() {
		return Ok(None);
	}

	let prefix = format!("{resource}{FILE_NAME_MARKER}");
	let suffix = format!(".{extension}");
	let mut latest: Option<(String, PathBuf)> = None;

	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let name = entry.file_name().to_string_lossy().into_owned();
		let Some(stamp) = name
			.strip_prefix(prefix.as_str())
			.and_then(|rest| rest.strip_suffix(suffix.as_str()))
		else {
			continue;
		};

		if !is_timestamp(stamp) {
			continue;
		}

		if latest.as_ref().is_none_or(|(best, _)| stamp > best.as_str()) {
			latest = Some((stamp.to_string(), entry.path()));
		}
	}

	Ok(latest.map(|(_, path)| path))
}

fn is_timestamp(stamp: &str) -> bool {
	let bytes = stamp.as_bytes();
	bytes.len() == 15
		&& bytes[8] == b'_'
		&& bytes
			.iter()
			.enumerate()
			.all(|(index, byte)| index == 8 || byte.is_ascii_digit())
}
