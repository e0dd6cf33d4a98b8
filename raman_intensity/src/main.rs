use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::{App, Arg};
use log::info;
use raman_solver::{compute_intensities, report::write_report, ModeTable, RunConfig, ScaledInputs};

type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() {
    _main().unwrap_or_else(|e| {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    });
}

fn create(path: &Path) -> BoxResult<BufWriter<File>> {
    let file = File::create(path)
        .map_err(|e| format!("while creating '{}': {e}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn _main() -> BoxResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("raman_intensity")
        .about("Computes resonant Raman intensities from Huang-Rhys factors.")
        .arg(
            Arg::with_name("config")
                .value_name("CONFIG")
                .help("Run configuration (YAML)")
                .required(true),
        )
        .arg(
            Arg::with_name("workers")
                .long("workers")
                .short("j")
                .value_name("N")
                .help("Number of workers (default: config, then available cores)"),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .value_name("PATH")
                .help("Write the intensity table here instead of stdout"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .value_name("PATH")
                .help("Also write the scaled complex sums as JSON"),
        )
        .get_matches();

    let config_path = PathBuf::from(matches.value_of("config").unwrap_or_default());
    let config = RunConfig::load(&config_path)?;
    let table = ModeTable::load(&config.mode_table)?;
    info!(
        "read {} modes from '{}'",
        table.modes.len(),
        config.mode_table.display()
    );

    let workers = match matches.value_of("workers") {
        Some(n) => n.parse()?,
        None => match config.workers {
            Some(n) => n,
            None => std::thread::available_parallelism()?.get(),
        },
    };

    let inputs = ScaledInputs::from_physical(&config, &table)?;
    let global = compute_intensities(&inputs, workers)?;

    match matches.value_of("output") {
        Some(path) => {
            let mut out = create(Path::new(path))?;
            write_report(&mut out, &config, &global)?;
            out.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            write_report(&mut stdout.lock(), &config, &global)?;
        }
    }

    if let Some(path) = matches.value_of("json") {
        let mut out = create(Path::new(path))?;
        serde_json::to_writer_pretty(&mut out, &global)?;
        out.flush()?;
    }
    Ok(())
}
