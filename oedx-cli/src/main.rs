// Command-line interface for oedx
//
// This binary converts course material between a Markdown folder described by a course-index
// (index.json / index.yaml) and an OEDX course package.
//
// The conversion work is done by the oedx-babel library; this crate only wires arguments,
// configuration, logging and the network uploader together.
//
// Usage:
//  oedx md2oedx <source> [<destination>]   - Course folder or index file → <destination>/course.tar.gz
//  oedx oedx2md <source> [<destination>]   - OEDX directory or .tar.gz → index.json + Markdown files
//  oedx probe <path>                       - Check whether a directory or tarball is an OEDX tree
//
// Extra Parameters:
//
// Configuration values can be overridden with --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and applies the value on top of the loaded config.
// Example:
//  oedx md2oedx course/ dist/ --extra-org ACME --extra-url-prefix acme

mod storage;

use clap::{Arg, ArgAction, Command, ValueHint};
use oedx_babel::{md_to_oedx, oedx_to_md, probe, upload_sequentially, ConvertSpec, Settings};
use oedx_config::{Loader, OedxConfig};
use std::collections::HashMap;
use storage::HttpUploader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = if i + 1 < args.len() {
                !args[i + 1].starts_with('-')
            } else {
                false
            };

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                // No value, treat as boolean flag
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("oedx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown courses to and from OEDX course packages")
        .long_about(
            "oedx converts a folder of Markdown files described by a course-index\n\
            (index.json or index.yaml) into an OEDX course package, and back.\n\n\
            Commands:\n  \
            - md2oedx: Build course.tar.gz from a course folder or index file\n  \
            - oedx2md: Rebuild index.json and Markdown files from an OEDX package\n  \
            - probe:   Check whether a path holds a readable OEDX tree\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override configuration values.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            oedx md2oedx course/ dist/                  # Write dist/course.tar.gz\n  \
            oedx md2oedx course/index.yaml              # Write ./course.tar.gz\n  \
            oedx oedx2md course.tar.gz restored/        # Unpack and convert back\n  \
            oedx oedx2md export/ restored/ --no-upload  # Only list images to upload"
        )
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an oedx.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every file read and written")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-upload")
                .long("no-upload")
                .help("Do not upload CDN images; list them instead")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("md2oedx")
                .about("Convert a Markdown course into an OEDX package")
                .long_about(
                    "Build an OEDX package from a course-index and its Markdown files.\n\n\
                    The source is either an index file (.json, .yaml, .yml) or a directory\n\
                    containing index.json. Markdown files are looked up relative to the\n\
                    directory holding the index.\n\n\
                    The package is written as <destination>/course.tar.gz."
                )
                .arg(
                    Arg::new("source")
                        .help("Index file or course directory")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("destination")
                        .help("Output directory (defaults to the current directory)")
                        .default_value("./")
                        .index(2)
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("oedx2md")
                .about("Convert an OEDX package into a Markdown course")
                .long_about(
                    "Rebuild a course-index and Markdown files from an OEDX package.\n\n\
                    The source is an unpacked package directory (containing course.xml)\n\
                    or a .tar.gz archive. Markdown paths are derived from chapter,\n\
                    sequential and unit names. Images hosted on the configured CDN are\n\
                    pointed at durable storage and uploaded after the files are written."
                )
                .arg(
                    Arg::new("source")
                        .help("OEDX directory or .tar.gz package")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                )
                .arg(
                    Arg::new("destination")
                        .help("Output directory (defaults to the current directory)")
                        .default_value("./")
                        .index(2)
                        .value_hint(ValueHint::DirPath),
                ),
        )
        .subcommand(
            Command::new("probe")
                .about("Check whether a path holds a readable OEDX tree")
                .arg(
                    Arg::new("path")
                        .help("OEDX directory or .tar.gz package")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);
    let matches = build_cli().get_matches_from(&cleaned_args);

    init_tracing(matches.get_flag("verbose"));

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);
    if matches.get_flag("no-upload") {
        config.images.upload = false;
    }
    for key in extra_params.keys() {
        tracing::warn!("Ignoring unknown parameter --extra-{key}");
    }

    match matches.subcommand() {
        Some(("md2oedx", sub_matches)) => {
            let (source, destination) = source_and_destination(sub_matches);
            handle_md2oedx_command(source, destination, &config);
        }
        Some(("oedx2md", sub_matches)) => {
            let (source, destination) = source_and_destination(sub_matches);
            handle_oedx2md_command(source, destination, &config);
        }
        Some(("probe", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .map(|s| s.as_str())
                .unwrap_or_default();
            handle_probe_command(path);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn source_and_destination(sub_matches: &clap::ArgMatches) -> (&str, &str) {
    let source = sub_matches
        .get_one::<String>("source")
        .map(|s| s.as_str())
        .unwrap_or_default();
    let destination = sub_matches
        .get_one::<String>("destination")
        .map(|s| s.as_str())
        .unwrap_or("./");
    (source, destination)
}

/// Handle the md2oedx command
fn handle_md2oedx_command(source: &str, destination: &str, config: &OedxConfig) {
    let spec = ConvertSpec::new(source, destination).with_settings(Settings::from(config));
    let outcome = md_to_oedx(&spec).unwrap_or_else(|e| {
        eprintln!("Conversion error: {e}");
        std::process::exit(1);
    });

    println!(
        "Wrote {} ({} files)",
        outcome.archive_path.display(),
        outcome.file_count
    );
}

/// Handle the oedx2md command
fn handle_oedx2md_command(source: &str, destination: &str, config: &OedxConfig) {
    let spec = ConvertSpec::new(source, destination).with_settings(Settings::from(config));
    let outcome = oedx_to_md(&spec).unwrap_or_else(|e| {
        eprintln!("Conversion error: {e}");
        std::process::exit(1);
    });

    println!(
        "Wrote {} and {} Markdown files",
        outcome.index_path.display(),
        outcome.markdown_files.len()
    );

    if outcome.pending_uploads.is_empty() {
        return;
    }

    if !config.images.upload {
        println!("Skipped {} image uploads:", outcome.pending_uploads.len());
        for upload in &outcome.pending_uploads {
            println!("  {} -> {}", upload.source_url, upload.key);
        }
        return;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("Failed to start the upload runtime: {e}");
            std::process::exit(1);
        });
    let uploader = HttpUploader::from_env(config.images.storage_base_url.clone());
    let uploaded = runtime
        .block_on(upload_sequentially(&uploader, &outcome.pending_uploads))
        .unwrap_or_else(|e| {
            eprintln!("Upload error: {e}");
            std::process::exit(1);
        });

    println!("Uploaded {uploaded} images");
}

/// Handle the probe command
fn handle_probe_command(path: &str) {
    let report = probe(std::path::Path::new(path)).unwrap_or_else(|e| {
        eprintln!("Not a readable OEDX tree: {e}");
        std::process::exit(1);
    });

    println!(
        "OEDX course '{}' (number {}): {} chapters, {} html units, {} deliverables",
        report.course_name,
        report.course_number,
        report.chapters,
        report.html_leaves,
        report.deliverables
    );
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "oedx=debug,oedx_babel=debug"
    } else {
        "oedx=info,oedx_babel=info"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load_cli_config(explicit_path: Option<&str>) -> OedxConfig {
    let loader = Loader::new().with_optional_file("oedx.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

fn apply_config_overrides(config: &mut OedxConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = take_override(extra_params, &["org"]) {
        config.package.org = raw;
    }
    if let Some(raw) = take_override(extra_params, &["url-prefix", "prefix"]) {
        config.package.url_prefix = raw;
    }
    if let Some(raw) = take_override(extra_params, &["indent"]) {
        config.xml.indent = raw;
    }
    if let Some(raw) = take_override(extra_params, &["hard-breaks", "hardbreaks"]) {
        config.markdown.hard_breaks = parse_bool_arg("hard-breaks", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["cdn-domain"]) {
        config.images.cdn_domain = raw;
    }
    if let Some(raw) = take_override(extra_params, &["storage-base-url", "storage-url"]) {
        config.images.storage_base_url = raw;
    }
    if let Some(raw) = take_override(extra_params, &["key-prefix"]) {
        config.images.key_prefix = raw;
    }
    if let Some(raw) = take_override(extra_params, &["upload"]) {
        config.images.upload = parse_bool_arg("upload", &raw);
    }
    if let Some(raw) = take_override(extra_params, &["archive-name"]) {
        config.archive.file_name = raw;
    }
    if let Some(raw) = take_override(extra_params, &["archive-root"]) {
        config.archive.root_dir = raw;
    }
    if let Some(raw) = take_override(extra_params, &["index-name"]) {
        config.index.file_name = raw;
    }
}

fn take_override(map: &mut HashMap<String, String>, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = map.remove(*key) {
            return Some(value);
        }
    }
    None
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
