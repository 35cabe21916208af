use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum R4LiquidError {
	#[error(transparent)]
	#[diagnostic(code(r4liquid::io_error))]
	Io(#[from] std::io::Error),

	#[error("diff document not found: `{}`", path.display())]
	#[diagnostic(
		code(r4liquid::diff_not_found),
		help("pass the diff with `--input <FILE>` or set `input` in r4liquid.toml")
	)]
	DiffNotFound { path: PathBuf },

	#[error(transparent)]
	#[diagnostic(code(r4liquid::json))]
	Json(#[from] serde_json::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(r4liquid::config_parse),
		help("check that r4liquid.toml is valid TOML with optional `input`, `resources` and [[rules]] entries")
	)]
	ConfigParse(String),

	#[error("failed to write template to `{}`", path.display())]
	#[diagnostic(code(r4liquid::output_write))]
	OutputWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("no resource selected")]
	#[diagnostic(
		code(r4liquid::no_resource_selected),
		help("name one or more resources, pass `--all`, or set `resources` in r4liquid.toml")
	)]
	NoResourceSelected,

	#[error("no saved template found for resource `{resource}` in `{}`", dir.display())]
	#[diagnostic(
		code(r4liquid::no_saved_template),
		help("run `r4liquid generate {resource}` first or pass the template file explicitly")
	)]
	NoSavedTemplate { resource: String, dir: PathBuf },
}

pub type R4LiquidResult<T> = Result<T, R4LiquidError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
