//! `r4liquid_core` turns a FHIR R4 → R5 element diff into a Liquid template
//! that projects an R5 message back onto its R4 shape.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Diff document (JSON)
//!   → Loader (ordered resource → field → descriptor maps)
//!   → Descriptor parser (free text → ChangeDescriptor)
//!   → Engine (descriptors → guarded `push` directives, deduplicated per key)
//!   → Output writer (timestamped `<Resource>_Liquid_R4_*.liquid` files)
//! ```
//!
//! ## Generated template
//!
//! ```text
//! {% mergeDiff msg -%}
//! {% if msg.resourceType == "Condition" -%}
//!   {% assign fields = "" | split: "" %}
//!     {% assign fields = fields | push: '"abatement" : {{ msg.abatementX }}' %}
//!   {{ fields | join: "," }}
//! {% endif %}
//! {% endmergeDiff %}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use r4liquid_core::{generate, load_diff_document, save_template};
//! use std::path::Path;
//!
//! let document = load_diff_document(Path::new("fhir_r5_types_diff.json")).unwrap();
//! let template = generate(&document, "Condition");
//! let path = save_template(Path::new("."), "Condition", &template, "liquid").unwrap();
//! println!("saved {}", path.display());
//! ```

pub use config::*;
pub use descriptor::*;
pub use document::*;
pub use engine::*;
pub use error::*;
pub use output::*;

pub mod config;
mod descriptor;
mod document;
mod engine;
#[allow(unused_assignments)]
mod error;
mod output;

#[cfg(test)]
mod __fixtures;
