// score/mod.rs

use crate::config::DesignParams;
use crate::primer::thermo::PrimerProperties;
use crate::primer::{PrimerCandidate, PrimerDirection};

/// A primer candidate with its properties and its score relative to the other
/// candidates in its scoring group.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPrimer {
    pub candidate: PrimerCandidate,
    pub properties: PrimerProperties,
    pub melt_temp_target_distance: f64,
    pub gc_percentage_target_distance: f64,
    pub melt_temperature_score: f64,
    pub gc_percentage_score: f64,
    pub total_score: f64,
    pub rank: usize,
}

/// All candidates for one amplicon in one direction. Primers are kept in option group
/// order; ranks run 1..=n without gaps.
#[derive(Debug, Clone)]
pub struct ScoringGroup {
    pub amplicon_name: String,
    pub direction: PrimerDirection,
    pub primers: Vec<ScoredPrimer>,
}

impl ScoringGroup {
    /// The rank 1 primer, None only for an empty group
    pub fn optimal(&self) -> Option<&ScoredPrimer> {
        self.primers.iter().find(|p| p.rank == 1)
    }

    /// Primers ordered from best to worst
    pub fn ranked(&self) -> Vec<&ScoredPrimer> {
        let mut ranked: Vec<&ScoredPrimer> = self.primers.iter().collect();
        ranked.sort_by_key(|p| p.rank);
        ranked
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        })
}

/// Map a distance from target onto [0, 1], where 1 is the closest in the group and 0
/// the farthest. If every candidate is equally far from the target, all score 1.
pub fn closeness_score(distance: f64, min_distance: f64, max_distance: f64) -> f64 {
    let range = max_distance - min_distance;
    if range <= 0.0 {
        return 1.0;
    }
    (max_distance - distance) / range
}

/// Score and rank one group of candidates that share amplicon and direction.
/// Ties in total score keep option group order.
pub fn score_group(
    amplicon_name: &str,
    direction: PrimerDirection,
    mut candidates: Vec<(PrimerCandidate, PrimerProperties)>,
    params: &DesignParams,
) -> ScoringGroup {
    candidates.sort_by_key(|(candidate, _)| candidate.option_group_index);

    let melt_distances: Vec<f64> = candidates
        .iter()
        .map(|(_, p)| (p.melt_temperature - params.melt_temperature_target).abs())
        .collect();
    let gc_distances: Vec<f64> = candidates
        .iter()
        .map(|(_, p)| (p.gc_percentage - params.gc_percentage_target).abs())
        .collect();

    let (melt_min, melt_max) = min_max(&melt_distances);
    let (gc_min, gc_max) = min_max(&gc_distances);

    let mut primers: Vec<ScoredPrimer> = candidates
        .into_iter()
        .zip(melt_distances.iter().zip(gc_distances.iter()))
        .map(|((candidate, properties), (&melt_distance, &gc_distance))| {
            let melt_temperature_score = closeness_score(melt_distance, melt_min, melt_max);
            let gc_percentage_score = closeness_score(gc_distance, gc_min, gc_max);
            let total_score = params.gc_clamp_weight * properties.gc_clamp as f64
                + params.gc_percentage_weight * gc_percentage_score
                + params.melt_temperature_weight * melt_temperature_score;

            ScoredPrimer {
                candidate,
                properties,
                melt_temp_target_distance: melt_distance,
                gc_percentage_target_distance: gc_distance,
                melt_temperature_score,
                gc_percentage_score,
                total_score,
                rank: 0,
            }
        })
        .collect();

    // Stable sort so that tied scores stay in option group order
    let mut order: Vec<usize> = (0..primers.len()).collect();
    order.sort_by(|&a, &b| primers[b].total_score.total_cmp(&primers[a].total_score));
    for (i, &idx) in order.iter().enumerate() {
        primers[idx].rank = i + 1;
    }

    ScoringGroup {
        amplicon_name: amplicon_name.to_string(),
        direction,
        primers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_group(properties: &[(u8, f64, f64)]) -> Vec<(PrimerCandidate, PrimerProperties)> {
        properties
            .iter()
            .enumerate()
            .map(|(i, &(gc_clamp, gc_percentage, melt_temperature))| {
                let length = 19 + i;
                (
                    PrimerCandidate {
                        amplicon_name: "gene".to_string(),
                        direction: PrimerDirection::Forward,
                        option_group_index: i + 1,
                        sequence: "A".repeat(length),
                        length,
                    },
                    PrimerProperties {
                        gc_clamp,
                        gc_percentage,
                        melt_temperature,
                    },
                )
            })
            .collect()
    }

    fn ranks(group: &ScoringGroup) -> Vec<usize> {
        group.primers.iter().map(|p| p.rank).collect()
    }

    #[test]
    fn test_closeness_score() {
        assert_eq!(closeness_score(0.0, 0.0, 10.0), 1.0);
        assert_eq!(closeness_score(10.0, 0.0, 10.0), 0.0);
        assert_eq!(closeness_score(4.0, 2.0, 6.0), 0.5);
        // Degenerate range
        assert_eq!(closeness_score(3.0, 3.0, 3.0), 1.0);
    }

    #[test]
    fn test_score_group_values() {
        let params = DesignParams::default();
        // Tm distances 0, 4, 8; GC distances 10, 0, 5
        let candidates = make_group(&[(0, 40.0, 62.0), (1, 50.0, 58.0), (1, 55.0, 70.0)]);
        let group = score_group("gene", PrimerDirection::Forward, candidates, &params);

        let p = &group.primers;
        assert_eq!(p[0].melt_temp_target_distance, 0.0);
        assert_eq!(p[1].melt_temp_target_distance, 4.0);
        assert_eq!(p[2].melt_temp_target_distance, 8.0);
        assert_eq!(p[0].gc_percentage_target_distance, 10.0);

        assert_eq!(p[0].melt_temperature_score, 1.0);
        assert_eq!(p[1].melt_temperature_score, 0.5);
        assert_eq!(p[2].melt_temperature_score, 0.0);
        assert_eq!(p[0].gc_percentage_score, 0.0);
        assert_eq!(p[1].gc_percentage_score, 1.0);
        assert_eq!(p[2].gc_percentage_score, 0.5);

        // 0 + 0 + 2*1, 1 + 1 + 2*0.5, 1 + 0.5 + 0
        assert_eq!(p[0].total_score, 2.0);
        assert_eq!(p[1].total_score, 3.0);
        assert_eq!(p[2].total_score, 1.5);

        assert_eq!(ranks(&group), vec![2, 1, 3]);
        assert_eq!(group.optimal().unwrap().candidate.option_group_index, 2);
    }

    #[test]
    fn test_ranks_are_a_permutation() {
        let params = DesignParams::default();
        let candidates = make_group(&[
            (0, 42.1, 55.0),
            (1, 47.4, 57.3),
            (0, 50.0, 59.9),
            (1, 52.1, 61.2),
            (1, 54.3, 63.0),
            (0, 48.0, 64.4),
            (1, 46.2, 66.0),
            (0, 45.0, 67.9),
        ]);
        let group = score_group("gene", PrimerDirection::Forward, candidates, &params);

        let mut sorted = ranks(&group);
        sorted.sort();
        assert_eq!(sorted, (1..=8).collect::<Vec<usize>>());

        let best = group
            .primers
            .iter()
            .max_by(|a, b| a.total_score.total_cmp(&b.total_score))
            .unwrap();
        assert_eq!(best.rank, 1);

        // Ranked view is ordered by non-increasing score
        let ranked = group.ranked();
        for pair in ranked.windows(2) {
            assert!(pair[0].total_score >= pair[1].total_score);
        }
    }

    #[test]
    fn test_degenerate_group() {
        let params = DesignParams::default();
        let candidates = make_group(&[(1, 45.0, 60.0); 8]);
        let group = score_group("gene", PrimerDirection::Reverse, candidates, &params);

        for primer in group.primers.iter() {
            assert_eq!(primer.melt_temperature_score, 1.0);
            assert_eq!(primer.gc_percentage_score, 1.0);
            assert_eq!(primer.total_score, 4.0);
        }

        // All tied, so ranks follow option group order
        assert_eq!(ranks(&group), (1..=8).collect::<Vec<usize>>());
        assert_eq!(group.optimal().unwrap().candidate.option_group_index, 1);
    }

    #[test]
    fn test_ties_keep_option_group_order() {
        let params = DesignParams::default();
        // Tm 60 and 64 are equally far from 62, GC 45 and 55 equally far from 50
        let candidates = make_group(&[(0, 30.0, 50.0), (1, 45.0, 60.0), (1, 55.0, 64.0)]);

        // Feed the candidates in scrambled order, ranking must not depend on it
        let mut scrambled = candidates.clone();
        scrambled.reverse();
        let group = score_group("gene", PrimerDirection::Forward, scrambled, &params);

        assert_eq!(ranks(&group), vec![3, 1, 2]);
        let indices: Vec<usize> = group
            .primers
            .iter()
            .map(|p| p.candidate.option_group_index)
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_custom_weights() {
        let params = DesignParams {
            melt_temperature_weight: 0.0,
            gc_percentage_weight: 0.0,
            gc_clamp_weight: 1.0,
            ..DesignParams::default()
        };
        let candidates = make_group(&[(0, 50.0, 62.0), (1, 20.0, 40.0)]);
        let group = score_group("gene", PrimerDirection::Forward, candidates, &params);
        assert_eq!(ranks(&group), vec![2, 1]);
    }
}
