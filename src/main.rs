use clap::Parser;
use colored::*;
use std::io::Write;
use std::path::Path;

use primerpick::config::{DesignParams, MeltMethod, ShortAmpliconPolicy};
use primerpick::design::{self, BatchPolicy, Overhangs};
use primerpick::seq;
use primerpick::table::{self, OutputPaths};
use primerpick::{COLOR_FAIL, COLOR_NOTE, COLOR_SUCCESS};

/// Design PCR primers for a set of amplicons. For each amplicon, forward and reverse
/// primer candidates of several lengths are scored on melting temperature, GC content,
/// and GC clamp, and the best of each direction is reported.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Amplicon table, csv with the columns "amplicon name" and "sequence", or fasta
    /// (.fa, .fasta, .fna)
    #[arg()]
    input: String,

    /// Directory and filename prefix for output, for example out_dir/run1
    #[arg(short, long, default_value_t = String::from("primers") )]
    output: String,

    /// Parameter file in TOML format. Command line options override its values
    #[arg(short, long)]
    params: Option<String>,

    /// Target melting temperature, degrees C
    #[arg(long)]
    tm_target: Option<f64>,

    /// Target GC percentage
    #[arg(long)]
    gc_target: Option<f64>,

    /// Weight of the melting temperature score in the total score
    #[arg(long)]
    tm_weight: Option<f64>,

    /// Shortest primer to consider
    #[arg(long)]
    min_length: Option<usize>,

    /// Longest primer to consider
    #[arg(long)]
    max_length: Option<usize>,

    /// Melting temperature model
    #[arg(long, value_enum)]
    melt_method: Option<MeltMethod>,

    /// How to handle amplicons shorter than the longest primer
    #[arg(long, value_enum)]
    short_amplicon: Option<ShortAmpliconPolicy>,

    /// What to do when an amplicon cannot be processed
    #[arg(long, value_enum, default_value_t = BatchPolicy::Abort)]
    on_error: BatchPolicy,

    /// Sequence added to the 5' end of the optimal forward primers
    #[arg(long)]
    upstream_overhang: Option<String>,

    /// Sequence added to the 5' end of the optimal reverse primers
    #[arg(long)]
    downstream_overhang: Option<String>,

    /// Number of threads to use
    #[arg(short = 't', long, default_value_t = 1)]
    threads: usize,

    /// Verbosity
    #[arg(long, default_value_t = 0)]
    verbosity: usize,
}

fn build_params(args: &Args) -> Result<DesignParams, Box<dyn std::error::Error>> {
    let mut params = match &args.params {
        Some(path) => DesignParams::from_toml_file(Path::new(path))?,
        None => DesignParams::default(),
    };

    if let Some(v) = args.tm_target {
        params.melt_temperature_target = v;
    }
    if let Some(v) = args.gc_target {
        params.gc_percentage_target = v;
    }
    if let Some(v) = args.tm_weight {
        params.melt_temperature_weight = v;
    }
    if let Some(v) = args.min_length {
        params.min_primer_length = v;
    }
    if let Some(v) = args.max_length {
        params.max_primer_length = v;
    }
    if let Some(v) = args.melt_method {
        params.melt_method = v;
    }
    if let Some(v) = args.short_amplicon {
        params.short_amplicon = v;
    }

    params.validate()?;
    Ok(params)
}

fn parse_overhang(overhang: &Option<String>) -> Result<Option<String>, String> {
    match overhang {
        None => Ok(None),
        Some(raw) => {
            let normalized = seq::normalize_sequence(raw);
            if let Some((position, base)) = seq::find_invalid_base(&normalized) {
                return Err(format!(
                    "Invalid nucleotide '{}' at position {} of overhang {}",
                    base,
                    position + 1,
                    raw
                ));
            }
            if normalized.is_empty() {
                return Ok(None);
            }
            Ok(Some(normalized))
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let start_run = std::time::Instant::now();

    // Parse the output path and create directories if necessary
    let path = Path::new(&args.output);
    let out_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| format!("Output prefix {} does not end in a file name", args.output))?;
    let mut directory = path
        .parent()
        .and_then(|parent| parent.to_str())
        .unwrap_or("")
        .to_string();
    if !directory.is_empty() {
        directory = format!("{}/", directory);
        std::fs::create_dir_all(Path::new(directory.as_str()))?;
    }
    let output_paths = OutputPaths::new(&directory, out_name);

    let params = build_params(args)?;
    if args.verbosity > 0 {
        println!("{:?}", params);
    }

    let overhangs = Overhangs {
        upstream: parse_overhang(&args.upstream_overhang)?,
        downstream: parse_overhang(&args.downstream_overhang)?,
    };

    assert!(args.threads > 0, "threads must be greater than 0");

    // Set the number of threads for Rayon to use
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()?;

    // Ingest the amplicons
    let start = std::time::Instant::now();
    print!("Reading amplicons...");
    std::io::stdout().flush()?;
    let amplicons = table::read_amplicons(Path::new(&args.input))?;
    println!(" done");
    println!("  Read {} amplicons", amplicons.len());
    println!("  Time to read amplicons: {:?}", start.elapsed());

    let start = std::time::Instant::now();
    println!("Designing primers...");
    let results = design::design_batch(&amplicons, &params);
    let designs = design::collect_designs(results, args.on_error, args.verbosity)?;
    println!(
        "done, designed primers for {} of {} amplicons, time: {:?}",
        designs.len(),
        amplicons.len(),
        start.elapsed()
    );

    print!("Writing tables to file...");
    std::io::stdout().flush()?;
    table::write_amplicons_to_path(&output_paths.input, &amplicons)?;
    table::write_rows_to_path(&output_paths.all_options, &table::all_rows(&designs))?;
    let optimal = table::optimal_rows(&designs, &overhangs);
    table::write_rows_to_path(&output_paths.optimal, &optimal)?;
    println!(" done");
    if !overhangs.is_empty() {
        println!("  Overhangs added to the optimal primers");
    }

    println!("{}", "Optimal primers:".color(COLOR_NOTE));
    println!("primer_name\tdirection\tprimer_sequence\tlength\tmelt_temperature\tgc_percentage\tgc_clamp");
    for row in optimal.iter() {
        println!(
            "{}\t{}\t{}\t{}\t{:.2}\t{:.2}\t{}",
            row.primer_name,
            row.direction,
            row.primer_sequence,
            row.length,
            row.melt_temperature,
            row.gc_percentage,
            row.gc_clamp
        );
    }

    println!(
        "{}",
        format!(
            "Wrote {}, {}, and {}",
            output_paths.input.display(),
            output_paths.all_options.display(),
            output_paths.optimal.display()
        )
        .color(COLOR_SUCCESS)
    );
    println!("Total run time: {:?}", start_run.elapsed());
    Ok(())
}

fn main() {
    // Ingest command line arguments
    let args = Args::parse();

    // Print the program name and version
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    // Print the arguments
    println!("{:?}", args);

    if let Err(e) = run(&args) {
        println!();
        eprintln!("{}", format!("ERROR: {}", e).color(COLOR_FAIL));
        std::process::exit(1);
    }
}
