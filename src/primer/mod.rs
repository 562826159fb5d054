// primer/mod.rs

use serde::Serialize;
use std::fmt;

use crate::config::{DesignParams, ShortAmpliconPolicy};
use crate::error::DesignError;
use crate::seq;

pub mod thermo;

/// A DNA sequence to design primers for. The sequence is expected to be normalized
/// (uppercase, no whitespace) by whoever builds it, see `seq::normalize_sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Amplicon {
    #[serde(rename = "amplicon name")]
    pub name: String,
    pub sequence: String,
}

impl Amplicon {
    pub fn new(name: &str, sequence: &str) -> Amplicon {
        Amplicon {
            name: name.to_string(),
            sequence: sequence.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimerDirection {
    Forward,
    Reverse,
}

impl fmt::Display for PrimerDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimerDirection::Forward => write!(f, "forward"),
            PrimerDirection::Reverse => write!(f, "reverse"),
        }
    }
}

// An unscored primer option. option_group_index 1 is the shortest primer length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimerCandidate {
    pub amplicon_name: String,
    pub direction: PrimerDirection,
    pub option_group_index: usize,
    pub sequence: String,
    pub length: usize,
}

impl PrimerCandidate {
    pub fn primer_name(&self) -> String {
        format!("{} {}", self.amplicon_name, self.direction)
    }
}

/// Forward and reverse candidates for one amplicon, each in option group order
#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub forward: Vec<PrimerCandidate>,
    pub reverse: Vec<PrimerCandidate>,
}

/// Check that `params` are usable and that an amplicon is made of ACGT and is long
/// enough for the candidate lengths in `params`. Returns the longest primer length
/// that will be enumerated, never less than `min_primer_length`.
fn check_amplicon(amplicon: &Amplicon, params: &DesignParams) -> Result<usize, DesignError> {
    // Callers may build DesignParams by hand
    params
        .validate()
        .map_err(|e| DesignError::InvalidParams {
            amplicon: amplicon.name.clone(),
            reason: e.to_string(),
        })?;

    let invalid = |reason: String| DesignError::InvalidSequence {
        amplicon: amplicon.name.clone(),
        reason,
    };

    if amplicon.sequence.is_empty() {
        return Err(invalid("sequence is empty".to_string()));
    }

    if let Some((position, base)) = seq::find_invalid_base(&amplicon.sequence) {
        return Err(invalid(format!(
            "invalid nucleotide '{}' at position {}",
            base,
            position + 1
        )));
    }

    let n = amplicon.sequence.len();
    if n >= params.max_primer_length {
        return Ok(params.max_primer_length);
    }

    match params.short_amplicon {
        ShortAmpliconPolicy::Reject => Err(invalid(format!(
            "sequence is {} bp, at least {} bp are needed for the longest primer",
            n, params.max_primer_length
        ))),
        ShortAmpliconPolicy::Truncate if n >= params.min_primer_length => Ok(n),
        ShortAmpliconPolicy::Truncate => Err(invalid(format!(
            "sequence is {} bp, at least {} bp are needed for the shortest primer",
            n, params.min_primer_length
        ))),
    }
}

/// Enumerate primer candidates of each length in `min_primer_length..=max_primer_length`.
/// Forward primers are prefixes of the amplicon; reverse primers are reverse
/// complements of suffixes of the amplicon.
pub fn enumerate_candidates(
    amplicon: &Amplicon,
    params: &DesignParams,
) -> Result<CandidateSet, DesignError> {
    let longest = check_amplicon(amplicon, params)?;
    let sequence = amplicon.sequence.as_str();
    let n = sequence.len();

    let n_groups = longest + 1 - params.min_primer_length;
    let mut forward = Vec::with_capacity(n_groups);
    let mut reverse = Vec::with_capacity(n_groups);

    for (i, length) in (params.min_primer_length..=longest).enumerate() {
        forward.push(PrimerCandidate {
            amplicon_name: amplicon.name.clone(),
            direction: PrimerDirection::Forward,
            option_group_index: i + 1,
            sequence: sequence[..length].to_string(),
            length,
        });

        reverse.push(PrimerCandidate {
            amplicon_name: amplicon.name.clone(),
            direction: PrimerDirection::Reverse,
            option_group_index: i + 1,
            sequence: seq::reverse_complement(&sequence[n - length..]),
            length,
        });
    }

    Ok(CandidateSet { forward, reverse })
}
