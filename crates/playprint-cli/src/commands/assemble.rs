use std::path::PathBuf;

use playprint_compiler::{ConfigOverrides, Manifest};

pub struct AssembleArgs {
    pub manifest: PathBuf,
    pub output: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

pub fn run(args: AssembleArgs) {
    let mut manifest = match Manifest::load(&args.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };
    manifest.config = manifest.config.merge(args.overrides);
    if let Some(output) = args.output {
        manifest.output = output;
    }

    let report = match manifest
        .into_assembler()
        .and_then(|(assembler, output)| assembler.finalize(&output))
    {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    for skipped in &report.skipped {
        eprintln!("warning: skipped {} '{}': {}", skipped.kind, skipped.name, skipped.reason);
    }
    println!(
        "{} ({} bytes, {} chunks)",
        report.output.display(),
        report.size,
        report.written.len()
    );
}
