//! Matching utilities for associating player detections with tracks.
//!
//! Cost matrices are laid out with one row per existing track and one column
//! per detection of the current frame.

use ndarray::Array2;

use crate::tracker::Centroid;

/// Cost given to pairs outside the gate and to padding cells.
const GATED_COST: f64 = 1e6;

/// Compute the pixel distance matrix between track positions and detections.
pub fn euclidean_distance(track_points: &[Centroid], det_points: &[Centroid]) -> Array2<f64> {
    let mut dists = Array2::zeros((track_points.len(), det_points.len()));
    for (i, t) in track_points.iter().enumerate() {
        for (j, d) in det_points.iter().enumerate() {
            dists[[i, j]] = nalgebra::distance(t, d);
        }
    }
    dists
}

/// For every detection, the nearest track strictly inside `gate`.
///
/// Detections are matched independently of each other, so several detections
/// can resolve to the same track. Ties go to the lower row.
pub fn greedy_nearest(dists: &Array2<f64>, gate: f64) -> Vec<Option<usize>> {
    let (num_rows, num_cols) = dists.dim();
    (0..num_cols)
        .map(|j| {
            let mut best: Option<(usize, f64)> = None;
            for i in 0..num_rows {
                let d = dists[[i, j]];
                if d < gate && best.is_none_or(|(_, min)| d < min) {
                    best = Some((i, d));
                }
            }
            best.map(|(i, _)| i)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct AssignmentResult {
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

impl AssignmentResult {
    /// Matched track row per detection column.
    pub fn track_for_detections(&self, num_detections: usize) -> Vec<Option<usize>> {
        let mut out = vec![None; num_detections];
        for &(row, col) in &self.matches {
            out[col] = Some(row);
        }
        out
    }
}

/// One-to-one assignment minimising total distance; pairs at or beyond
/// `gate` are never matched.
pub fn linear_assignment(cost_matrix: &Array2<f64>, gate: f64) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_tracks: vec![],
            unmatched_detections: (0..num_cols).collect(),
        };
    }

    if num_cols == 0 {
        return AssignmentResult {
            matches: vec![],
            unmatched_tracks: (0..num_rows).collect(),
            unmatched_detections: vec![],
        };
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), GATED_COST);

    for i in 0..num_rows {
        for j in 0..num_cols {
            let cost = cost_matrix[[i, j]];
            if cost < gate {
                padded[[i, j]] = cost;
            }
        }
    }

    let result = lapjv::lapjv(&padded);
    let mut matches = vec![];
    let mut unmatched_tracks = vec![];
    let mut unmatched_detections_mask: Vec<bool> = vec![true; num_cols];

    match result {
        Ok((row_to_col, _)) => {
            for (row_idx, &col_idx) in row_to_col.iter().enumerate() {
                if row_idx >= num_rows {
                    continue;
                }
                if col_idx < num_cols && cost_matrix[[row_idx, col_idx]] < gate {
                    matches.push((row_idx, col_idx));
                    unmatched_detections_mask[col_idx] = false;
                } else {
                    unmatched_tracks.push(row_idx);
                }
            }
        }
        Err(_) => {
            tracing::warn!("linear assignment failed, treating all detections as new");
            unmatched_tracks = (0..num_rows).collect();
        }
    }

    let unmatched_detections: Vec<usize> = unmatched_detections_mask
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| if u { Some(i) } else { None })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}
