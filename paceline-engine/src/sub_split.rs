//! Distance chunking strategies used to break a split into sub-splits.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{CHUNK_REMAINDER_EPSILON, CUSTOM_SUM_TOLERANCE, DEFAULT_SUB_SPLIT_COUNT};
use crate::numbers::{usize_to_f64, whole_chunks};

/// Ordered chunk distances for one split.
pub type ChunkDistances = SmallVec<[f64; 8]>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SubSplitMode {
    /// Divide the split into `count` equal parts.
    Even { count: u32 },
    /// Chunks of `distance`; a trailing remainder strictly shorter than
    /// `last_threshold` is folded into the last full chunk.
    FixedDistance {
        distance: f64,
        #[serde(default)]
        last_threshold: Option<f64>,
    },
    /// Caller-supplied chunk distances.
    Custom { distances: Vec<f64> },
}

impl Default for SubSplitMode {
    fn default() -> Self {
        Self::Even {
            count: DEFAULT_SUB_SPLIT_COUNT,
        }
    }
}

/// Why a mode cannot chunk a given split distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeViolation {
    Invalid(&'static str),
    SumMismatch { expected: f64, actual: f64 },
}

impl SubSplitMode {
    /// Check that the mode yields positive chunks covering `distance`.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, distance: f64) -> Result<(), ModeViolation> {
        match self {
            Self::Even { count } => {
                if *count == 0 {
                    return Err(ModeViolation::Invalid("even count must be at least 1"));
                }
            }
            Self::FixedDistance {
                distance: chunk,
                last_threshold,
            } => {
                if !chunk.is_finite() || *chunk <= 0.0 {
                    return Err(ModeViolation::Invalid("chunk distance must be positive"));
                }
                if last_threshold.is_some_and(|t| !t.is_finite() || t < 0.0) {
                    return Err(ModeViolation::Invalid(
                        "last threshold must be non-negative",
                    ));
                }
            }
            Self::Custom { distances } => {
                if distances.is_empty() {
                    return Err(ModeViolation::Invalid("custom distances are empty"));
                }
                if distances.iter().any(|d| !d.is_finite() || *d <= 0.0) {
                    return Err(ModeViolation::Invalid(
                        "custom distances must be positive",
                    ));
                }
                let actual: f64 = distances.iter().sum();
                let tolerance = CUSTOM_SUM_TOLERANCE * distance.abs().max(1.0);
                if (actual - distance).abs() > tolerance {
                    return Err(ModeViolation::SumMismatch {
                        expected: distance,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Chunk `distance` according to `mode`.
#[must_use]
pub fn sub_splits_for(mode: &SubSplitMode, distance: f64) -> ChunkDistances {
    match mode {
        SubSplitMode::Even { count } => even_chunks(distance, *count),
        SubSplitMode::FixedDistance {
            distance: chunk,
            last_threshold,
        } => fixed_chunks(distance, *chunk, *last_threshold),
        SubSplitMode::Custom { distances } => distances.iter().copied().collect(),
    }
}

fn even_chunks(distance: f64, count: u32) -> ChunkDistances {
    if count == 0 {
        return ChunkDistances::new();
    }
    let parts = usize::try_from(count).unwrap_or(usize::MAX);
    let each = distance / f64::from(count);
    std::iter::repeat_n(each, parts).collect()
}

fn fixed_chunks(distance: f64, chunk: f64, last_threshold: Option<f64>) -> ChunkDistances {
    let full = whole_chunks(distance, chunk);
    let mut chunks: ChunkDistances = std::iter::repeat_n(chunk, full).collect();

    let remainder = usize_to_f64(full).mul_add(-chunk, distance);
    if remainder <= CHUNK_REMAINDER_EPSILON {
        return chunks;
    }

    let folds = last_threshold.is_some_and(|threshold| remainder < threshold);
    match chunks.last_mut() {
        Some(last) if folds => *last += remainder,
        _ => chunks.push(remainder),
    }
    chunks
}
