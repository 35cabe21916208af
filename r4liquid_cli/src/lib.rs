use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate Liquid templates that restore the R4 shape of FHIR R5 messages.",
	long_about = "r4liquid reads a diff of FHIR resource definitions between R4 and R5 and \
	              writes, per resource, a Liquid template that projects an R5 message back onto \
	              its R4 layout.\n\nQuick start:\n  r4liquid init               Create \
	              r4liquid.toml\n  r4liquid list               Show resources in the diff\n  \
	              r4liquid generate Condition  Write Condition_Liquid_R4_<timestamp>.liquid\n  \
	              r4liquid check Condition     Verify the latest template is current"
)]
pub struct R4LiquidCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Diff document to read. Overrides `input` from r4liquid.toml.
	#[arg(long, short, global = true)]
	pub input: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `r4liquid.toml` in the project root.
	///
	/// The sample is fully commented out, so the defaults apply until it is
	/// edited. An existing config is left untouched.
	Init,
	/// Generate R4 restoration templates.
	///
	/// Each template is printed to stdout and saved as
	/// `<Resource>_Liquid_R4_<YYYYMMDD_HHMMSS>.liquid` in the configured
	/// output directory. Resources missing from the diff produce an empty
	/// template and a warning.
	Generate {
		/// Resources to generate. Defaults to `resources` from r4liquid.toml.
		resources: Vec<String>,

		/// Generate every resource in the diff document.
		#[arg(long, default_value_t = false, conflicts_with = "resources")]
		all: bool,

		/// Print templates without saving them.
		#[arg(long, default_value_t = false)]
		no_save: bool,

		/// Do not print templates to stdout.
		#[arg(long, short, default_value_t = false)]
		quiet: bool,
	},
	/// List the resources in the diff document.
	///
	/// Shows each resource with its number of changed fields and a count of
	/// descriptors per kind of change.
	List {
		/// Output format. Use `text` for a table or `json` for programmatic
		/// consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that a saved template matches what would be generated now.
	///
	/// Compares against `FILE` or, when omitted, the most recent saved
	/// template for the resource. Exits with status 1 when they differ.
	Check {
		/// Resource to check.
		resource: String,

		/// Template file to compare against.
		file: Option<PathBuf>,

		/// Show a unified diff between the saved and the expected template.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
