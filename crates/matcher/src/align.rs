//! Global (Needleman-Wunsch) alignment with affine gaps.
//!
//! Three score lattices are kept, one per state a column can end in:
//! a pair (diagonal move), a gap in the second sequence (up move, consumes an
//! element of the first) or a gap in the first sequence (left move). Only two
//! rows of scores are live at a time; predecessors are packed into one byte
//! per cell for the traceback, so memory is `O(n * m)` bytes.
//!
//! Ties are broken in a fixed order everywhere: diagonal, then up, then left.
//! The score never depends on this rule, but the exact alignment does.

use rayon::prelude::*;

use crate::types::{AlignConfig, Alignment, MatchError, Step};

/// Lower bound used for unreachable states. Far enough from `i64::MIN` that
/// adding penalties never wraps.
const UNREACHABLE: i64 = i64::MIN / 4;

const DIAG: u8 = 0;
const UP: u8 = 1;
const LEFT: u8 = 2;

// Trace byte layout: bits 0-1 predecessor of the diagonal state,
// bits 2-3 of the up state, bits 4-5 of the left state.
const DIAG_SHIFT: u8 = 0;
const UP_SHIFT: u8 = 2;
const LEFT_SHIFT: u8 = 4;

/// Pick the best of three candidates, preferring diagonal, then up, then left.
#[inline]
fn best3(diag: i64, up: i64, left: i64) -> (i64, u8) {
    let mut best = (diag, DIAG);
    if up > best.0 {
        best = (up, UP);
    }
    if left > best.0 {
        best = (left, LEFT);
    }
    best
}

/// Globally align `first` against `second`.
///
/// `score_fn` gives the substitution score for pairing two elements. Gap runs
/// are charged `cfg.gap_open` for their first column and `cfg.gap_extend` for
/// each further one, including leading and trailing runs.
///
/// Both sequences must be non-empty.
pub fn align<T, F>(
    first: &[T],
    second: &[T],
    score_fn: F,
    cfg: &AlignConfig,
) -> Result<Alignment, MatchError>
where
    T: Sync,
    F: Fn(&T, &T) -> i32 + Sync,
{
    cfg.validate()?;
    if first.is_empty() || second.is_empty() {
        return Err(MatchError::EmptySequence {
            first_len: first.len(),
            second_len: second.len(),
        });
    }

    let m = second.len();
    if cfg.use_parallel {
        let mut subs = vec![0i32; first.len() * m];
        subs.par_chunks_mut(m).enumerate().for_each(|(i, row)| {
            for (cell, b) in row.iter_mut().zip(second) {
                *cell = score_fn(&first[i], b);
            }
        });
        Ok(fill_and_trace(first.len(), m, cfg, |i, j| {
            i64::from(subs[i * m + j])
        }))
    } else {
        Ok(fill_and_trace(first.len(), m, cfg, |i, j| {
            i64::from(score_fn(&first[i], &second[j]))
        }))
    }
}

/// Run the DP over an `n x m` problem and trace back the optimal path.
///
/// `sub(i, j)` is the substitution score for `first[i]` against `second[j]`.
fn fill_and_trace<S>(n: usize, m: usize, cfg: &AlignConfig, sub: S) -> Alignment
where
    S: Fn(usize, usize) -> i64,
{
    let open = i64::from(cfg.gap_open);
    let extend = i64::from(cfg.gap_extend);
    let width = m + 1;
    let mut trace = vec![0u8; (n + 1) * width];

    let mut prev_diag = vec![UNREACHABLE; width];
    let mut prev_up = vec![UNREACHABLE; width];
    let mut prev_left = vec![UNREACHABLE; width];
    let mut cur_diag = vec![UNREACHABLE; width];
    let mut cur_up = vec![UNREACHABLE; width];
    let mut cur_left = vec![UNREACHABLE; width];

    // Row 0: the origin, then a leading gap run in the first sequence.
    prev_diag[0] = 0;
    for j in 1..width {
        let (score, from) = if j == 1 {
            (open, DIAG)
        } else {
            (prev_left[j - 1] + extend, LEFT)
        };
        prev_left[j] = score;
        trace[j] = from << LEFT_SHIFT;
    }

    for i in 1..=n {
        let row = i * width;

        // Column 0: a leading gap run in the second sequence.
        cur_diag[0] = UNREACHABLE;
        cur_left[0] = UNREACHABLE;
        let (score, from) = if i == 1 {
            (open, DIAG)
        } else {
            (prev_up[0] + extend, UP)
        };
        cur_up[0] = score;
        trace[row] = from << UP_SHIFT;

        for j in 1..width {
            let (d, d_from) = best3(prev_diag[j - 1], prev_up[j - 1], prev_left[j - 1]);
            cur_diag[j] = d + sub(i - 1, j - 1);

            let (u, u_from) = best3(
                prev_diag[j] + open,
                prev_up[j] + extend,
                prev_left[j] + open,
            );
            cur_up[j] = u;

            let (l, l_from) = best3(
                cur_diag[j - 1] + open,
                cur_up[j - 1] + open,
                cur_left[j - 1] + extend,
            );
            cur_left[j] = l;

            trace[row + j] = (d_from << DIAG_SHIFT) | (u_from << UP_SHIFT) | (l_from << LEFT_SHIFT);
        }

        std::mem::swap(&mut prev_diag, &mut cur_diag);
        std::mem::swap(&mut prev_up, &mut cur_up);
        std::mem::swap(&mut prev_left, &mut cur_left);
    }

    let (score, mut state) = best3(prev_diag[m], prev_up[m], prev_left[m]);

    let mut steps = Vec::with_capacity(n + m);
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let cell = trace[i * width + j];
        match state {
            DIAG => {
                steps.push(Step::Pair {
                    first: i - 1,
                    second: j - 1,
                });
                state = (cell >> DIAG_SHIFT) & 0b11;
                i -= 1;
                j -= 1;
            }
            UP => {
                steps.push(Step::FirstOnly { first: i - 1 });
                state = (cell >> UP_SHIFT) & 0b11;
                i -= 1;
            }
            _ => {
                steps.push(Step::SecondOnly { second: j - 1 });
                state = (cell >> LEFT_SHIFT) & 0b11;
                j -= 1;
            }
        }
    }
    steps.reverse();

    Alignment { steps, score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(a: &u32, b: &u32) -> i32 {
        if a == b {
            1
        } else {
            -1
        }
    }

    fn check_path(alignment: &Alignment, n: usize, m: usize) {
        let (mut i, mut j) = (0usize, 0usize);
        for step in alignment.steps() {
            match *step {
                Step::Pair { first, second } => {
                    assert_eq!((first, second), (i, j));
                    i += 1;
                    j += 1;
                }
                Step::FirstOnly { first } => {
                    assert_eq!(first, i);
                    i += 1;
                }
                Step::SecondOnly { second } => {
                    assert_eq!(second, j);
                    j += 1;
                }
            }
        }
        assert_eq!((i, j), (n, m), "alignment must cover both sequences");
    }

    fn rescore(alignment: &Alignment, a: &[u32], b: &[u32], cfg: &AlignConfig) -> i64 {
        let mut total = 0i64;
        let mut prev: Option<u8> = None;
        for step in alignment.steps() {
            let (kind, value) = match *step {
                Step::Pair { first, second } => (DIAG, i64::from(identity(&a[first], &b[second]))),
                Step::FirstOnly { .. } => (UP, 0),
                Step::SecondOnly { .. } => (LEFT, 0),
            };
            total += match kind {
                DIAG => value,
                k if prev == Some(k) => i64::from(cfg.gap_extend),
                _ => i64::from(cfg.gap_open),
            };
            prev = Some(kind);
        }
        total
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let cfg = AlignConfig::default();
        let empty: [u32; 0] = [];
        let err = align(&empty, &[1u32], identity, &cfg).unwrap_err();
        assert_eq!(
            err,
            MatchError::EmptySequence {
                first_len: 0,
                second_len: 1
            }
        );
        assert!(align(&[1u32], &empty, identity, &cfg).is_err());
    }

    #[test]
    fn invalid_config_is_rejected_before_alignment() {
        let cfg = AlignConfig::new().with_gap_open(2);
        assert!(matches!(
            align(&[1u32], &[1u32], identity, &cfg),
            Err(MatchError::InvalidGapPenalties { .. })
        ));
    }

    #[test]
    fn self_alignment_is_the_diagonal() {
        let seq: Vec<u32> = (0..25).collect();
        let alignment = align(&seq, &seq, identity, &AlignConfig::default()).unwrap();
        assert_eq!(alignment.score(), 25);
        assert_eq!(alignment.len(), 25);
        assert_eq!(alignment.gaps(), 0);
        check_path(&alignment, 25, 25);
    }

    #[test]
    fn extra_element_costs_one_gap_open() {
        let alignment =
            align(&[1u32, 2, 3], &[1u32, 3], identity, &AlignConfig::default()).unwrap();
        assert_eq!(alignment.score(), 2 - 2);
        assert_eq!(alignment.len(), 3);
        assert_eq!(
            alignment.steps(),
            &[
                Step::Pair {
                    first: 0,
                    second: 0
                },
                Step::FirstOnly { first: 1 },
                Step::Pair {
                    first: 2,
                    second: 1
                },
            ]
        );
    }

    #[test]
    fn long_gap_run_costs_open_only() {
        let a = [1u32, 2, 3, 4, 5, 6];
        let b = [1u32, 6];
        let alignment = align(&a, &b, identity, &AlignConfig::default()).unwrap();
        // Two pairs, one run of four gap columns charged a single open.
        assert_eq!(alignment.score(), 2 - 2);
        assert_eq!(alignment.len(), 6);
        assert_eq!(alignment.pairs(), 2);
    }

    #[test]
    fn extend_penalty_is_charged_per_extra_column() {
        let cfg = AlignConfig::new().with_gap_open(-3).with_gap_extend(-1);
        let a = [1u32, 2, 3, 4, 5];
        let b = [1u32, 5];
        let alignment = align(&a, &b, identity, &cfg).unwrap();
        assert_eq!(alignment.score(), 2 - 3 - 1 - 1);
        assert_eq!(rescore(&alignment, &a, &b, &cfg), alignment.score());
    }

    #[test]
    fn leading_and_trailing_gaps_are_penalized() {
        let alignment = align(
            &[9u32, 1, 2],
            &[1u32, 2, 9],
            identity,
            &AlignConfig::default(),
        )
        .unwrap();
        // Best: gap, 1-1, 2-2, gap => 2 - 2 - 2.
        assert_eq!(alignment.score(), -2);
        assert_eq!(alignment.len(), 4);
        check_path(&alignment, 3, 3);
    }

    #[test]
    fn diagonal_wins_ties_against_gaps() {
        let cfg = AlignConfig::new().with_gap_open(0);
        let neutral = |_: &u32, _: &u32| 0;
        let alignment = align(&[1u32], &[2u32], neutral, &cfg).unwrap();
        assert_eq!(
            alignment.steps(),
            &[Step::Pair {
                first: 0,
                second: 0
            }]
        );
    }

    #[test]
    fn up_wins_ties_against_left() {
        // Free gaps beat a mismatch; the final column is taken from the up state.
        let cfg = AlignConfig::new().with_gap_open(0);
        let alignment = align(&[1u32], &[2u32], identity, &cfg).unwrap();
        assert_eq!(alignment.score(), 0);
        assert_eq!(
            alignment.steps(),
            &[Step::SecondOnly { second: 0 }, Step::FirstOnly { first: 0 }]
        );
    }

    #[test]
    fn all_gaps_beat_long_mismatch_runs() {
        let a = [1u32; 5];
        let b = [2u32; 5];
        let alignment = align(&a, &b, identity, &AlignConfig::default()).unwrap();
        assert_eq!(alignment.score(), -4);
        assert_eq!(alignment.len(), 10);
        assert_eq!(alignment.pairs(), 0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let a: Vec<u32> = (0..60).map(|x| x % 7).collect();
        let b: Vec<u32> = (0..45).map(|x| (x * 3) % 7).collect();
        let seq = align(&a, &b, identity, &AlignConfig::default()).unwrap();
        let par = align(
            &a,
            &b,
            identity,
            &AlignConfig::default().with_parallel(true),
        )
        .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn traced_path_rescores_to_reported_score() {
        let a: Vec<u32> = vec![1, 2, 3, 4, 2, 2, 7, 8, 9];
        let b: Vec<u32> = vec![2, 3, 5, 4, 7, 9, 9, 1];
        for cfg in [
            AlignConfig::default(),
            AlignConfig::new().with_gap_open(-1).with_gap_extend(-1),
            AlignConfig::new().with_gap_open(-4).with_gap_extend(-1),
        ] {
            let alignment = align(&a, &b, identity, &cfg).unwrap();
            check_path(&alignment, a.len(), b.len());
            assert_eq!(rescore(&alignment, &a, &b, &cfg), alignment.score());
            assert!(alignment.len() >= a.len().max(b.len()));
            assert!(alignment.len() <= a.len() + b.len());
        }
    }
}
