mod error;
mod loader;

use std::{fs, path::PathBuf, process::ExitCode};

use ariadne::Source;
use asn1_objects::{AsnCompiler, Diagnostic};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Parse an ASN.1 module into its object model, reporting every assignment
/// that can not be understood.
#[derive(Parser, Debug)]
#[command(name = "asn1-objects", version, about)]
struct Args {
    /// The module file to read
    file: PathBuf,

    /// Module name used in error paths, instead of the name in the module
    /// header
    #[arg(short, long)]
    module: Option<String>,

    /// Treat the module as declared with `EXTENSIBILITY IMPLIED`
    #[arg(long)]
    extensibility_implied: bool,

    /// Print every parsed entity as a tree
    #[arg(short, long)]
    print: bool,

    /// Increase logging output, can be repeated
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(flatten)]
    color: concolor_clap::Color,
}

/// Print a diagnostic for an assignment, falling back to plain text if it
/// can not be placed in the source
fn report(
    diag: Diagnostic,
    assignment: &loader::Assignment,
    file_name: &str,
    cache: &mut (String, Source<&str>),
) {
    let diag = error::locate(diag, assignment);
    match error::to_error(&diag, file_name) {
        Ok(report) => {
            if report.eprint(cache).is_err() {
                eprintln!("{diag}");
            }
        }
        Err(_) => eprintln!("{diag}"),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.color.apply();

    let default_level = match args.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            error!(file = %args.file.display(), "unable to read module: {err}");
            return ExitCode::FAILURE;
        }
    };

    let stripped = loader::strip_comments(&source);
    let module = loader::load(&stripped);

    let name = args
        .module
        .clone()
        .or_else(|| module.name.clone())
        .or_else(|| {
            args.file
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
    let file_name = args.file.display().to_string();

    info!(
        module = %name,
        assignments = module.assignments.len(),
        "loaded module"
    );

    let mut compiler = AsnCompiler::new().with_module(name);
    compiler.extensibility_implied = args.extensibility_implied || module.extensibility_implied;

    let mut cache = (file_name.clone(), Source::from(source.as_str()));
    let mut failed = 0;
    let mut parsed = vec![];

    for assignment in &module.assignments {
        match compiler.add_assignment(assignment.text) {
            Ok(id) => {
                parsed.push(id);
                for warning in compiler.take_warnings() {
                    report(warning, assignment, &file_name, &mut cache);
                }
            }
            Err(err) => {
                failed += 1;
                debug!("{err}");
                report(Diagnostic::from(&err), assignment, &file_name, &mut cache);
            }
        }
    }

    if args.print {
        for id in parsed {
            print!("{}", compiler.print_entity(id));
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "{failed} of {} assignments could not be parsed",
            module.assignments.len()
        );
        ExitCode::FAILURE
    }
}
