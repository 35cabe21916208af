use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use r4liquid_cli::Commands;
use r4liquid_cli::OutputFormat;
use r4liquid_cli::R4LiquidCli;
use r4liquid_core::DiffDocument;
use r4liquid_core::R4LiquidConfig;
use r4liquid_core::R4LiquidError;
use r4liquid_core::SAMPLE_CONFIG;
use r4liquid_core::find_latest_output;
use r4liquid_core::generate_with_rules;
use r4liquid_core::load_diff_document;
use r4liquid_core::save_template;
use r4liquid_core::summarize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "R4LIQUID_LOG";

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = R4LiquidCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_logging(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Generate {
			resources,
			all,
			no_save,
			quiet,
		}) => run_generate(&args, resources, *all, *no_save, *quiet),
		Some(Commands::List { format }) => run_list(&args, *format),
		Some(Commands::Check {
			resource,
			file,
			diff,
		}) => run_check(&args, resource, file.as_deref(), *diff),
		None => {
			eprintln!("No subcommand specified. Run `r4liquid --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<R4LiquidError>() {
			Ok(err) => {
				let report: miette::Report = (*err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `R4LIQUID_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

/// Resolved locations and config for one invocation.
struct Settings {
	root: PathBuf,
	config: R4LiquidConfig,
	input: PathBuf,
}

impl Settings {
	fn output_dir(&self) -> PathBuf {
		self.config.output_path(&self.root)
	}
}

fn resolve_root(args: &R4LiquidCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_settings(args: &R4LiquidCli) -> Result<Settings, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = R4LiquidConfig::load(&root)?.unwrap_or_default();
	let input = args
		.input
		.clone()
		.unwrap_or_else(|| config.input_path(&root));
	tracing::debug!(
		root = %root.display(),
		input = %input.display(),
		rules = config.rules.len(),
		"resolved settings"
	);

	if args.verbose {
		match R4LiquidConfig::resolve_path(&root) {
			Some(path) => println!("Using config: {}", path.display()),
			None => println!("No config found in {}, using defaults", root.display()),
		}
	}

	Ok(Settings {
		root,
		config,
		input,
	})
}

fn load_document(
	args: &R4LiquidCli,
	settings: &Settings,
) -> Result<DiffDocument, Box<dyn std::error::Error>> {
	let document = load_diff_document(&settings.input)?;

	if args.verbose {
		println!(
			"Loaded {} resource(s) from {}",
			document.len(),
			make_relative(&settings.input, &settings.root)
		);
	}

	Ok(document)
}

fn run_init(args: &R4LiquidCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = R4LiquidConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("r4liquid.toml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created r4liquid.toml");
	println!();
	println!("Next steps:");
	println!(
		"  1. Point `input` in {} at your R4/R5 diff document",
		config_path.display()
	);
	println!("  2. Run `r4liquid list` to see the resources it covers");
	println!("  3. Run `r4liquid generate <Resource>` to write a template");

	Ok(())
}

fn run_generate(
	args: &R4LiquidCli,
	requested: &[String],
	all: bool,
	no_save: bool,
	quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_settings(args)?;
	let document = load_document(args, &settings)?;

	let resources: Vec<String> = if all {
		document.resource_names().map(ToString::to_string).collect()
	} else if requested.is_empty() {
		settings.config.resources.clone()
	} else {
		requested.to_vec()
	};

	if resources.is_empty() {
		return Err(R4LiquidError::NoResourceSelected.into());
	}

	let output_dir = settings.output_dir();
	for resource in &resources {
		if !document.contains(resource) {
			eprintln!(
				"{} resource `{resource}` is not in {}, generating an empty template",
				colored!("warning:", yellow),
				make_relative(&settings.input, &settings.root)
			);
		}

		let template = generate_with_rules(&document, resource, &settings.config.rules);
		if !quiet {
			print!("{template}");
		}

		if !no_save {
			let path = save_template(
				&output_dir,
				resource,
				&template,
				&settings.config.extension,
			)?;
			eprintln!(
				"Liquid template saved to {}",
				make_relative(&path, &settings.root)
			);
		}
	}

	Ok(())
}

fn run_list(args: &R4LiquidCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_settings(args)?;
	let document = load_document(args, &settings)?;
	let summaries = summarize(&document);

	if let OutputFormat::Json = format {
		println!("{}", serde_json::to_string_pretty(&summaries)?);
		return Ok(());
	}

	if summaries.is_empty() {
		println!("No resources found.");
		return Ok(());
	}

	let width = summaries
		.iter()
		.map(|summary| summary.resource.len())
		.max()
		.unwrap_or(0)
		.max("Resource".len());

	println!(
		"{}",
		colored!(
			format!(
				"{:<width$}  {:>6}  {:>5}  {:>7}  {:>10}  {:>6}  {:>6}  {:>5}",
				"Resource",
				"Fields",
				"Added",
				"Deleted",
				"Redirected",
				"Codes-",
				"Codes+",
				"Other"
			),
			bold
		)
	);

	for summary in &summaries {
		println!(
			"{:<width$}  {:>6}  {:>5}  {:>7}  {:>10}  {:>6}  {:>6}  {:>5}",
			summary.resource,
			summary.fields,
			summary.added,
			summary.deleted,
			summary.redirected,
			summary.codes_removed,
			summary.codes_added,
			summary.other
		);
	}

	println!();
	println!("{} resource(s)", summaries.len());

	Ok(())
}

fn run_check(
	args: &R4LiquidCli,
	resource: &str,
	file: Option<&Path>,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let settings = load_settings(args)?;
	let document = load_document(args, &settings)?;

	let saved_path = match file {
		Some(path) => path.to_path_buf(),
		None => {
			let output_dir = settings.output_dir();
			find_latest_output(&output_dir, resource, &settings.config.extension)?.ok_or_else(
				|| {
					R4LiquidError::NoSavedTemplate {
						resource: resource.to_string(),
						dir: output_dir.clone(),
					}
				},
			)?
		}
	};

	let saved = std::fs::read_to_string(&saved_path)?;
	let expected = generate_with_rules(&document, resource, &settings.config.rules);
	let display_path = make_relative(&saved_path, &settings.root);

	if saved == expected {
		println!("Check passed: {display_path} is up to date.");
		return Ok(());
	}

	eprintln!(
		"{} {display_path} is out of date for `{resource}`",
		colored!("stale:", red)
	);

	if show_diff {
		print_diff(&saved, &expected);
	} else {
		eprintln!("Run with `--diff` to see the changes, or `r4liquid generate {resource}`.");
	}

	process::exit(1);
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
