//! Entry point for the pseudon CLI tool.

mod logging;

use std::path::PathBuf;

use clap::Parser;

use pseudon::core::PseudonError;
use pseudon::pipeline::{Pipeline, PipelineConfig};
use pseudon::rules::ScreeningConfig;

#[derive(Parser)]
#[command(
  name = "pseudon",
  bin_name = "pseudon",
  version = env!("CARGO_PKG_VERSION"),
  about = "Pseudon de-identifies a directory of DICOM-style imaging records \
    by quarantining unsafe records, stripping attributes not on a whitelist, \
    and replacing accession numbers with serial numbers from a linkage list",
  max_term_width = 80
)]
struct Cli {
  #[arg(help = "The root directory containing identified input records")]
  ident_dir: PathBuf,

  #[arg(
    help = "The root directory to write released records into, under one \
      subdirectory per serial number"
  )]
  clean_dir: PathBuf,

  #[arg(
    help = "Path to the linkage list pairing external accession number \
      fragments with serial numbers"
  )]
  links_file: PathBuf,

  #[arg(help = "Path to the whitelist JSON file of allowed attribute values")]
  white_list_file: PathBuf,

  #[arg(
    long,
    short,
    default_value = ",",
    help = "Delimiter for values in the linkage list"
  )]
  delimiter: String,

  #[arg(
    long,
    short,
    default_value_t = false,
    help = "Skip the first line of the linkage list. Set this when the first \
      line is a header."
  )]
  skip_first_line: bool,

  #[arg(
    long,
    short,
    default_value = "quarantine",
    help = "The root directory to copy quarantined records into, mirroring \
      the input directory structure"
  )]
  quarantine: PathBuf,

  #[arg(
    long,
    short,
    default_value = "index.db",
    help = "Path of the SQLite database holding the accession number index"
  )]
  index_file: PathBuf,

  #[arg(
    long,
    short,
    num_args = 1..,
    default_values_t = [String::from("mr"), String::from("ct")],
    help = "The modalities allowed through the quarantine check"
  )]
  modalities: Vec<String>,

  #[arg(
    long,
    short,
    help = "Path of a file to log messages to. Defaults to stderr."
  )]
  log_file: Option<PathBuf>,
}

fn main() -> Result<(), ()> {
  let cli = Cli::parse();

  let delimiter = match cli.delimiter.as_bytes() {
    [delimiter] => *delimiter,
    _ => {
      eprintln!("Error: --delimiter must be a single byte");
      return Err(());
    }
  };

  // The guard is held until exit so that a configured log file is flushed
  // and closed even when a phase aborts
  let _log_guard = match logging::init(cli.log_file.as_deref()) {
    Ok(guard) => guard,
    Err(e) => {
      eprintln!("Error: failed to open log file: {}", e);
      return Err(());
    }
  };

  let config = PipelineConfig {
    input_root: cli.ident_dir,
    clean_root: cli.clean_dir,
    quarantine_root: cli.quarantine,
    index_path: cli.index_file,
    whitelist_path: cli.white_list_file,
    links_path: cli.links_file,
    links_delimiter: delimiter,
    links_skip_first_line: cli.skip_first_line,
    screening: ScreeningConfig::new(&cli.modalities),
  };

  let pipeline = Pipeline::new(config)
    .map_err(|e| e.print("starting the pseudonymization pipeline"))?;

  let build_summary = pipeline
    .build_index()
    .map_err(|e| e.print("building the accession number index"))?;

  println!(
    "Indexed {} records ({} skipped), matched {} of {} linkage rows",
    build_summary.records_indexed,
    build_summary.records_skipped,
    build_summary.reconcile.matched,
    build_summary.reconcile.matched
      + build_summary.reconcile.duplicates
      + build_summary.reconcile.unmatched
      + build_summary.reconcile.rejected
  );

  let run_summary = pipeline
    .run()
    .map_err(|e| e.print("pseudonymizing records"))?;

  println!(
    "Released {} records, quarantined {}",
    run_summary.released, run_summary.quarantined
  );

  Ok(())
}
