use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree from src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
fn conversion(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("source")
                .required(true)
                .index(1)
                .value_hint(ValueHint::AnyPath),
        )
        .arg(
            Arg::new("destination")
                .index(2)
                .value_hint(ValueHint::DirPath),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("oedx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown courses to and from OEDX course packages")
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-upload")
                .long("no-upload")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(conversion(
            "md2oedx",
            "Convert a Markdown course into an OEDX package",
        ))
        .subcommand(conversion(
            "oedx2md",
            "Convert an OEDX package into a Markdown course",
        ))
        .subcommand(
            Command::new("probe")
                .about("Check whether a path holds a readable OEDX tree")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::AnyPath),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "oedx", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "oedx", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "oedx", &outdir)?;

    Ok(())
}
