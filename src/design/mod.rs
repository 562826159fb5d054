// design/mod.rs

use colored::*;
use rayon::prelude::*;

use crate::config::DesignParams;
use crate::error::DesignError;
use crate::primer::thermo::{self, PrimerProperties};
use crate::primer::{self, Amplicon, PrimerCandidate, PrimerDirection};
use crate::score::{self, ScoredPrimer, ScoringGroup};
use crate::COLOR_NOTE;
use crate::COLOR_WARNING;

/// Scored forward and reverse primer candidates for one amplicon
#[derive(Debug, Clone)]
pub struct AmpliconDesign {
    pub amplicon_name: String,
    pub forward: ScoringGroup,
    pub reverse: ScoringGroup,
}

impl AmpliconDesign {
    pub fn groups(&self) -> [&ScoringGroup; 2] {
        [&self.forward, &self.reverse]
    }

    /// Every scored candidate, forward group first
    pub fn primers(&self) -> impl Iterator<Item = &ScoredPrimer> {
        self.forward.primers.iter().chain(self.reverse.primers.iter())
    }

    /// The rank 1 primers, forward then reverse
    pub fn optimal(&self) -> impl Iterator<Item = &ScoredPrimer> {
        self.primers().filter(|p| p.rank == 1)
    }
}

/// What a batch does when one of its amplicons fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BatchPolicy {
    /// Stop at the first failed amplicon
    #[default]
    Abort,
    /// Report failed amplicons and keep the rest
    Skip,
}

/// Sequences prepended to the optimal primers, for example to add restriction sites.
/// Only the primer sequence that is reported changes, scores are computed on the
/// template binding part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overhangs {
    pub upstream: Option<String>,
    pub downstream: Option<String>,
}

impl Overhangs {
    pub fn is_empty(&self) -> bool {
        self.upstream.is_none() && self.downstream.is_none()
    }

    /// Primer sequence as it should be ordered: upstream overhang on the forward
    /// primer, downstream overhang on the reverse primer.
    pub fn apply(&self, primer: &ScoredPrimer) -> String {
        let overhang = match primer.candidate.direction {
            PrimerDirection::Forward => self.upstream.as_deref(),
            PrimerDirection::Reverse => self.downstream.as_deref(),
        };
        match overhang {
            Some(overhang) => format!("{}{}", overhang, primer.candidate.sequence),
            None => primer.candidate.sequence.clone(),
        }
    }
}

fn score_direction(
    amplicon: &Amplicon,
    direction: PrimerDirection,
    candidates: Vec<PrimerCandidate>,
    params: &DesignParams,
) -> Result<ScoringGroup, DesignError> {
    if candidates.is_empty() {
        return Err(DesignError::NoCandidates {
            amplicon: amplicon.name.clone(),
        });
    }

    let with_properties = candidates
        .into_iter()
        .map(
            |candidate| -> Result<(PrimerCandidate, PrimerProperties), DesignError> {
                let properties = thermo::calculate_properties(
                    &amplicon.name,
                    &candidate.sequence,
                    params.melt_method,
                )?;
                Ok((candidate, properties))
            },
        )
        .collect::<Result<Vec<_>, DesignError>>()?;

    Ok(score::score_group(
        &amplicon.name,
        direction,
        with_properties,
        params,
    ))
}

/// Enumerate, characterize, and rank the primer candidates for one amplicon
pub fn design_amplicon(
    amplicon: &Amplicon,
    params: &DesignParams,
) -> Result<AmpliconDesign, DesignError> {
    let candidates = primer::enumerate_candidates(amplicon, params)?;

    let forward = score_direction(amplicon, PrimerDirection::Forward, candidates.forward, params)?;
    let reverse = score_direction(amplicon, PrimerDirection::Reverse, candidates.reverse, params)?;

    Ok(AmpliconDesign {
        amplicon_name: amplicon.name.clone(),
        forward,
        reverse,
    })
}

/// Design primers for each amplicon in parallel. Results are in input order, and a
/// failure for one amplicon does not affect the others.
pub fn design_batch(
    amplicons: &[Amplicon],
    params: &DesignParams,
) -> Vec<Result<AmpliconDesign, DesignError>> {
    amplicons
        .par_iter()
        .map(|amplicon| design_amplicon(amplicon, params))
        .collect()
}

/// Apply the batch policy to the per-amplicon results
pub fn collect_designs(
    results: Vec<Result<AmpliconDesign, DesignError>>,
    policy: BatchPolicy,
    verbosity: usize,
) -> Result<Vec<AmpliconDesign>, DesignError> {
    let mut designs: Vec<AmpliconDesign> = Vec::with_capacity(results.len());
    let mut n_failed = 0;

    for result in results {
        match result {
            Ok(design) => {
                if verbosity > 0 {
                    print_design(&design, verbosity);
                }
                designs.push(design);
            }
            Err(e) => match policy {
                BatchPolicy::Abort => return Err(e),
                BatchPolicy::Skip => {
                    println!(
                        "{}",
                        format!("WARNING: skipping amplicon: {}", e).color(COLOR_WARNING)
                    );
                    n_failed += 1;
                }
            },
        }
    }

    if n_failed > 0 {
        println!(
            "{}",
            format!(
                "WARNING: {} of {} amplicons failed and were skipped",
                n_failed,
                n_failed + designs.len()
            )
            .color(COLOR_WARNING)
        );
    }

    Ok(designs)
}

fn print_design(design: &AmpliconDesign, verbosity: usize) {
    println!(
        "{}",
        format!("Amplicon {}", design.amplicon_name).color(COLOR_NOTE)
    );
    for group in design.groups() {
        if let Some(best) = group.optimal() {
            println!(
                "  {} primer {} ({} bp), Tm {:.2}, GC {:.2}%, clamp {}, score {:.3}",
                group.direction,
                best.candidate.sequence,
                best.candidate.length,
                best.properties.melt_temperature,
                best.properties.gc_percentage,
                best.properties.gc_clamp,
                best.total_score
            );
        }
        if verbosity > 1 {
            for primer in group.ranked() {
                println!(
                    "    rank {} option {}: {} Tm {:.2} GC {:.2}% total {:.3}",
                    primer.rank,
                    primer.candidate.option_group_index,
                    primer.candidate.sequence,
                    primer.properties.melt_temperature,
                    primer.properties.gc_percentage,
                    primer.total_score
                );
            }
        }
    }
}
