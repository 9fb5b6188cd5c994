use perceptual::PerceptualError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Gap model and execution knobs for global alignment.
///
/// Gaps are affine: the first column of a run costs `gap_open`, every further
/// consecutive column in the same run costs `gap_extend`. The defaults
/// (`-2`, `0`) make any gap run cost a flat `-2` regardless of its length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlignConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Score added for the first column of a gap run. Must be `<= 0`.
    pub gap_open: i32,
    /// Score added for each further column of a gap run. Must be `<= 0`.
    pub gap_extend: i32,
    /// Precompute the substitution matrix row-parallel with rayon.
    ///
    /// Only pays off for long fingerprints; the alignment produced is
    /// identical either way.
    pub use_parallel: bool,
}

impl AlignConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gap_open(mut self, gap_open: i32) -> Self {
        self.gap_open = gap_open;
        self
    }

    pub fn with_gap_extend(mut self, gap_extend: i32) -> Self {
        self.gap_extend = gap_extend;
        self
    }

    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version < 1 {
            return Err(MatchError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.gap_open > 0 || self.gap_extend > 0 {
            return Err(MatchError::InvalidGapPenalties {
                open: self.gap_open,
                extend: self.gap_extend,
            });
        }
        Ok(())
    }
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gap_open: -2,
            gap_extend: 0,
            use_parallel: false,
        }
    }
}

/// One column of a global alignment, expressed as input positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// `first[first]` aligned against `second[second]`.
    Pair { first: usize, second: usize },
    /// `first[first]` aligned against a gap.
    FirstOnly { first: usize },
    /// A gap aligned against `second[second]`.
    SecondOnly { second: usize },
}

/// Either a real element or a gap. Stands in for a sentinel gap value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot<T = u32> {
    Frame(T),
    Gap,
}

impl<T> Slot<T> {
    pub fn is_gap(&self) -> bool {
        matches!(self, Slot::Gap)
    }
}

/// A materialized alignment column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedColumn<T = u32> {
    pub first: Slot<T>,
    pub second: Slot<T>,
}

/// Optimal global alignment of two sequences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub(crate) steps: Vec<Step>,
    pub(crate) score: i64,
}

impl Alignment {
    /// Total score: substitution scores plus gap penalties.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Number of columns, gaps included.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Columns in order, from the start of both sequences to their end.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of columns pairing two real elements.
    pub fn pairs(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, Step::Pair { .. }))
            .count()
    }

    /// Number of columns holding a gap on either side.
    pub fn gaps(&self) -> usize {
        self.len() - self.pairs()
    }

    /// Resolve the columns against the sequences that were aligned.
    ///
    /// `first` and `second` must be the same slices passed to the aligner.
    pub fn columns<'a, T: Copy>(
        &'a self,
        first: &'a [T],
        second: &'a [T],
    ) -> impl Iterator<Item = AlignedColumn<T>> + 'a {
        self.steps.iter().map(move |step| match *step {
            Step::Pair {
                first: i,
                second: j,
            } => AlignedColumn {
                first: Slot::Frame(first[i]),
                second: Slot::Frame(second[j]),
            },
            Step::FirstOnly { first: i } => AlignedColumn {
                first: Slot::Frame(first[i]),
                second: Slot::Gap,
            },
            Step::SecondOnly { second: j } => AlignedColumn {
                first: Slot::Gap,
                second: Slot::Frame(second[j]),
            },
        })
    }
}

/// Outcome of comparing two fingerprints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityReport {
    /// Raw alignment score.
    pub score: i64,
    /// Alignment columns, gaps included.
    pub alignment_length: usize,
    /// Columns pairing two frames.
    pub paired: usize,
    /// Columns holding a gap.
    pub gaps: usize,
    /// `score / alignment_length`.
    pub similarity: f64,
}

/// Errors surfaced by alignment and similarity scoring.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error(
        "cannot align empty fingerprint (first has {first_len} frames, second has {second_len})"
    )]
    EmptySequence { first_len: usize, second_len: usize },

    #[error("alignment has zero length; similarity is undefined")]
    ZeroLengthAlignment,

    #[error("invalid gap penalties open={open} extend={extend}; both must be <= 0")]
    InvalidGapPenalties { open: i32, extend: i32 },

    #[error("invalid align config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },

    #[error("scoring config rejected: {0}")]
    Scoring(#[from] PerceptualError),
}
