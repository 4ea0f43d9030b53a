//! `pweave`: Prompt Weaver plugin command-line interface.
//!
//! Three subcommands for operators:
//!
//! - **`check`**: resolve the plugin root and report which routes a host
//!   would get, without starting a server.
//! - **`nodes`**: print the node descriptors the plugin exports.
//! - **`run`**: execute one node type with `name=value` inputs.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use prompt_weaver::{
    mount, MountError, MountOutcome, PluginConfig, RecordingRouteTable, RouteKind,
};
use prompt_weaver_nodes::NodeRegistry;
use serde_json::{Map, Value};

/// pweave, the Prompt Weaver plugin CLI
#[derive(Parser)]
#[command(name = "pweave", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that the built app can be mounted.
    ///
    /// Prints every route the plugin would register. Exits 0 when the app
    /// would be mounted, 1 when only the probe would be.
    Check {
        /// Plugin root. Defaults to searching upward from the install location.
        #[arg(long, env = "PROMPT_WEAVER_ROOT", value_name = "DIR")]
        root: Option<PathBuf>,

        /// URL prefix to mount the app under.
        #[arg(long, env = "PROMPT_WEAVER_PREFIX", default_value = "/prompt_weaver")]
        prefix: String,

        /// Built app directory, relative to the plugin root.
        #[arg(long, env = "PROMPT_WEAVER_DIST", default_value = "dist")]
        dist: String,
    },

    /// Print the descriptors of all exported node types as JSON.
    Nodes,

    /// Execute a node type and print its outputs as a JSON array.
    ///
    /// Examples:
    ///   pweave run PromptWeaverTextReceiver -i prompt_text="a red fox"
    ///   pweave run PromptWeaverReceiver -i positive_text=cat -i negative_text=blurry
    Run {
        /// Node type identifier.
        node: String,

        /// An input as NAME=VALUE. Repeat for each input.
        #[arg(short = 'i', long = "input", value_name = "NAME=VALUE")]
        inputs: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prompt_weaver=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check { root, prefix, dist } => {
            let plugin_root = root.map(|r| {
                // Operators pass paths relative to where they stand.
                std::path::absolute(&r)
                    .unwrap_or_else(|e| fatal(&format!("invalid root {}: {e}", r.display())))
            });
            let config = PluginConfig {
                mount_prefix: prefix,
                plugin_root,
                dist_dir: dist,
                ..PluginConfig::from_env()
            };

            let mut table = RecordingRouteTable::new();
            let report = mount::register(&mut table, &config);

            for route in table.routes() {
                println!("GET {:<40} {}", route.path, describe(&route.kind));
            }
            if let Err(e) = &report.probe {
                eprintln!("probe: {e}");
            }
            match report.outcome {
                MountOutcome::Mounted(descriptor) => {
                    println!("mounted {} at {}/", descriptor.base_dir.display(), descriptor.prefix);
                }
                MountOutcome::Skipped(e) => {
                    eprintln!("not mounted: {e}");
                    if let MountError::EntryDocumentMissing {
                        listing: Some(names),
                        ..
                    } = &e
                    {
                        eprintln!("directory contents: {}", names.join(", "));
                    }
                    process::exit(1);
                }
            }
        }

        Command::Nodes => {
            let registry = load_registry();
            let json = serde_json::to_string_pretty(&registry.descriptors())
                .unwrap_or_else(|e| fatal(&format!("failed to serialise descriptors: {e}")));
            println!("{json}");
        }

        Command::Run { node, inputs } => {
            let registry = load_registry();
            let kwargs = parse_inputs(&inputs);
            match registry.execute(&node, &kwargs) {
                Ok(outputs) => println!("{}", Value::from(outputs)),
                Err(e) => fatal(&e.to_string()),
            }
        }
    }
}

fn describe(kind: &RouteKind) -> String {
    match kind {
        RouteKind::Probe => "probe".into(),
        RouteKind::RedirectToSlash => "301 → trailing slash".into(),
        RouteKind::EntryDocument(path) => format!("file {}", path.display()),
        RouteKind::Assets { root } => format!("assets {}", root.display()),
    }
}

fn load_registry() -> NodeRegistry {
    NodeRegistry::builtin().unwrap_or_else(|e| fatal(&format!("failed to load nodes: {e}")))
}

/// Turn `NAME=VALUE` arguments into the keyword arguments a node expects.
///
/// Only the first `=` splits, so values may contain `=`.
fn parse_inputs(raw: &[String]) -> Map<String, Value> {
    raw.iter()
        .map(|arg| {
            let (name, value) = arg.split_once('=').unwrap_or_else(|| {
                fatal(&format!("invalid --input {arg:?}: expected NAME=VALUE"))
            });
            (name.to_string(), Value::String(value.to_string()))
        })
        .collect()
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("pweave: {}", msg);
    process::exit(2);
}
