use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "modelgate")]
#[command(about = "Publish prediction models as routable inference endpoints")]
#[command(version)]
pub struct Args {
    /// Path to the endpoint manifest (JSON). Serves the built-in endpoint
    /// set when omitted.
    pub manifest_file: Option<PathBuf>,

    /// Replace endpoints instead of creating them (tear down, then rebind)
    #[arg(short = 'u', long)]
    pub update: bool,

    /// Enable verbose logging output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Dry-run mode: validate the manifest and list endpoints without serving
    #[arg(long)]
    pub dry_run: bool,

    /// Override the default bind address
    #[arg(long, value_name = "ADDR")]
    pub bind_addr: Option<String>,

    /// Override the default port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

// ============================================================================
// SBIO: Pure display logic (no I/O - returns formatted strings)
// ============================================================================

use crate::cluster::{route, EndpointSpec};
use crate::model::ModelBinder;

/// Format a dry-run output showing the endpoints that would be published.
/// Pure function - returns a formatted string.
pub fn format_dry_run(specs: &[EndpointSpec], binder: &ModelBinder, args: &Args) -> String {
    let mut output = String::new();

    output.push_str("modelgate v0.1.0 - Dry Run Mode\n\n");
    match args.manifest_file {
        Some(ref path) => output.push_str(&format!("Manifest: {}\n\n", path.display())),
        None => output.push_str("Manifest: built-in defaults\n\n"),
    }

    output.push_str(&format!("Endpoints ({}):\n", specs.len()));

    let mut unknown = 0usize;
    for spec in specs {
        let methods = spec
            .methods
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        output.push_str(&format!("  {} {}\n", methods, route(&spec.identity())));

        if binder.contains(&spec.name) {
            output.push_str(&format!("      model: {}\n", spec.name));
        } else {
            unknown += 1;
            output.push_str(&format!("      model: {} (NOT REGISTERED)\n", spec.name));
        }

        if let Some(ref content_type) = spec.response_content_type {
            output.push_str(&format!("      responds: {}\n", content_type));
        }
        if let Some(ref options) = spec.options {
            for (key, value) in options {
                output.push_str(&format!("      {}: {}\n", key, value));
            }
        }
    }

    if unknown == 0 {
        output.push_str("\nValidation: PASSED\n");
        output.push_str("Ready to serve. Remove --dry-run to start the gateway.\n");
    } else {
        output.push_str(&format!(
            "\nValidation: FAILED ({} endpoint(s) name models with no registered implementation)\n",
            unknown
        ));
    }

    output
}
