// Amplicon input tables and primer output tables

use bio::io::fasta;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::design::{AmpliconDesign, Overhangs};
use crate::error::TableError;
use crate::primer::{Amplicon, PrimerDirection};
use crate::score::ScoredPrimer;
use crate::seq::normalize_sequence;

/// Column names accepted in an amplicon table, matched case-insensitively
pub const AMPLICON_NAME_COLUMN: &str = "amplicon name";
pub const SEQUENCE_COLUMN: &str = "sequence";

const FASTA_EXTENSIONS: [&str; 5] = ["fa", "fasta", "fna", "fas", "ffn"];

/// One row of the all-candidates and optimal-primer tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimerRow {
    pub amplicon_name: String,
    pub primer_name: String,
    pub direction: PrimerDirection,
    pub option_group_index: usize,
    pub primer_sequence: String,
    pub gc_clamp: u8,
    pub length: usize,
    pub gc_percentage: f64,
    pub melt_temperature: f64,
    pub melt_temp_target_distance: f64,
    pub gc_percentage_target_distance: f64,
    pub melt_temperature_score: f64,
    pub gc_percentage_score: f64,
    pub total_score: f64,
    pub option_group_rank: usize,
}

impl From<&ScoredPrimer> for PrimerRow {
    fn from(p: &ScoredPrimer) -> Self {
        PrimerRow {
            amplicon_name: p.candidate.amplicon_name.clone(),
            primer_name: p.candidate.primer_name(),
            direction: p.candidate.direction,
            option_group_index: p.candidate.option_group_index,
            primer_sequence: p.candidate.sequence.clone(),
            gc_clamp: p.properties.gc_clamp,
            length: p.candidate.length,
            gc_percentage: p.properties.gc_percentage,
            melt_temperature: p.properties.melt_temperature,
            melt_temp_target_distance: p.melt_temp_target_distance,
            gc_percentage_target_distance: p.gc_percentage_target_distance,
            melt_temperature_score: p.melt_temperature_score,
            gc_percentage_score: p.gc_percentage_score,
            total_score: p.total_score,
            option_group_rank: p.rank,
        }
    }
}

/// Every scored candidate for every amplicon
pub fn all_rows(designs: &[AmpliconDesign]) -> Vec<PrimerRow> {
    designs
        .iter()
        .flat_map(|d| d.primers())
        .map(PrimerRow::from)
        .collect()
}

/// The rank 1 rows, with overhangs added to the primer sequences
pub fn optimal_rows(designs: &[AmpliconDesign], overhangs: &Overhangs) -> Vec<PrimerRow> {
    designs
        .iter()
        .flat_map(|d| d.optimal())
        .map(|p| PrimerRow {
            primer_sequence: overhangs.apply(p),
            ..PrimerRow::from(p)
        })
        .collect()
}

pub fn write_rows<W: Write>(writer: W, rows: &[PrimerRow]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_serialized<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), TableError> {
    let csv_error = |e: csv::Error| TableError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let mut wtr = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        wtr.serialize(row).map_err(csv_error)?;
    }
    wtr.flush().map_err(|e| TableError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn write_rows_to_path(path: &Path, rows: &[PrimerRow]) -> Result<(), TableError> {
    write_serialized(path, rows)
}

/// Write the normalized amplicons with the same columns as the input table
pub fn write_amplicons_to_path(path: &Path, amplicons: &[Amplicon]) -> Result<(), TableError> {
    write_serialized(path, amplicons)
}

/// Parse an amplicon table with the columns `amplicon name` and `sequence`. `path` is
/// only used to label errors. Sequences are normalized on the way in.
pub fn read_amplicons_csv<R: Read>(reader: R, path: &Path) -> Result<Vec<Amplicon>, TableError> {
    let csv_error = |e: csv::Error| TableError::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let expected = [AMPLICON_NAME_COLUMN, SEQUENCE_COLUMN];
    if headers.iter().any(|h| !expected.contains(&h.as_str())) {
        return Err(TableError::UnexpectedColumns {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            found: headers,
        });
    }

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    };
    let name_idx = column(AMPLICON_NAME_COLUMN)?;
    let seq_idx = column(SEQUENCE_COLUMN)?;

    let mut amplicons = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error)?;
        let name = record.get(name_idx).unwrap_or("").trim();
        let sequence = normalize_sequence(record.get(seq_idx).unwrap_or(""));
        amplicons.push(Amplicon::new(name, &sequence));
    }

    if amplicons.is_empty() {
        return Err(TableError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(amplicons)
}

/// Read amplicons from a fasta file, using the record id and description as the name
pub fn read_amplicons_fasta<R: Read>(reader: R, path: &Path) -> Result<Vec<Amplicon>, TableError> {
    let mut amplicons = Vec::new();
    for result in fasta::Reader::new(reader).records() {
        let record = result.map_err(|e| TableError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let name = match record.desc() {
            Some(desc) => format!("{} {}", record.id(), desc),
            None => record.id().to_string(),
        };
        let sequence = normalize_sequence(&String::from_utf8_lossy(record.seq()));
        amplicons.push(Amplicon::new(&name, &sequence));
    }

    if amplicons.is_empty() {
        return Err(TableError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    Ok(amplicons)
}

fn is_fasta(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FASTA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read amplicons from a csv table, or from fasta if the extension says so
pub fn read_amplicons(path: &Path) -> Result<Vec<Amplicon>, TableError> {
    let file = File::open(path).map_err(|e| TableError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if is_fasta(path) {
        read_amplicons_fasta(file, path)
    } else {
        read_amplicons_csv(file, path)
    }
}

/// Paths of the tables written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub input: PathBuf,
    pub all_options: PathBuf,
    pub optimal: PathBuf,
}

impl OutputPaths {
    pub fn new(directory: &str, out_name: &str) -> OutputPaths {
        OutputPaths {
            input: PathBuf::from(format!("{}{}_input.csv", directory, out_name)),
            all_options: PathBuf::from(format!("{}{}_all_options_ranked.csv", directory, out_name)),
            optimal: PathBuf::from(format!(
                "{}{}_optimal_primer_results.csv",
                directory, out_name
            )),
        }
    }
}
