use clap::{crate_version, App, Arg};
use kerbside::build::build_site;
use kerbside::config::{Config, Overrides};
use log::{error, info};
use std::error::Error;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("kerbside")
        .version(crate_version!())
        .about("Builds a gallery page from a directory of dated, located photos")
        .arg(
            Arg::with_name("project")
                .long("project")
                .short("p")
                .takes_value(true)
                .value_name("DIR")
                .default_value(".")
                .help("The project directory (searched upwards for kerbside.yaml)"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .value_name("DIR")
                .help("The directory to write pages to"),
        )
        .arg(
            Arg::with_name("split")
                .long("split")
                .help("Write the gallery to its own page, previous.html"),
        )
        .get_matches();

    let project = Path::new(matches.value_of("project").unwrap_or("."));
    let overrides = Overrides {
        output_directory: matches.value_of("output").map(absolute),
        split_previous: matches.is_present("split"),
    };

    if let Err(e) = run(project, &overrides) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(project: &Path, overrides: &Overrides) -> Result<(), Box<dyn Error>> {
    let config = Config::from_directory(project, overrides)?;
    build_site(&config)?;
    info!("Done!");
    Ok(())
}

// Output paths given on the command line are relative to where we were
// invoked, not to the project file.
fn absolute(path: &str) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => PathBuf::from(path),
    }
}
