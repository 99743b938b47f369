use std::path::PathBuf;

use playprint_compiler::{
    AttributeClassResolver, Config, ConfigOverrides, Workprint, compile_workprint,
};
use tracing::info;

pub struct CompileArgs {
    pub workprint: PathBuf,
    pub overrides: ConfigOverrides,
}

pub fn run(args: CompileArgs) {
    let tree = match Workprint::load(&args.workprint) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let config = Config::new().merge(args.overrides);
    let report = match compile_workprint(&tree, &AttributeClassResolver, &config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    for skipped in &report.skipped {
        eprintln!("warning: skipped {} '{}': {}", skipped.kind, skipped.name, skipped.reason);
    }
    info!(
        manifest = %report.manifest_path.display(),
        symbols = %report.symbols_path.display(),
        "done"
    );
    println!("{}", report.manifest_path.display());
}
