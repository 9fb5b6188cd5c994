//! Frame decomposition into Gray-ranked 2-bit chunks.
//!
//! A Chromaprint frame packs 16 independent 2-bit fields into a `u32`. Chunk
//! `i` lives at bits `2i..2i+2`. Decomposition is a pure function of the frame;
//! [`ChunkDecomposer`] only adds a bounded LRU memo in front of it because the
//! same frame values recur heavily within and across fingerprints.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use lru::LruCache;

use crate::gray::{rank, unrank, CHUNK_BITS};

/// Number of 2-bit chunks in one frame.
pub const CHUNK_COUNT: usize = 16;

/// Gray ranks (each in `0..=3`) for the 16 chunks of a frame, lowest bits first.
pub type Chunks = [u8; CHUNK_COUNT];

/// Split `frame` into its 16 chunks and map each through the Gray rank table.
#[inline]
pub fn decompose(frame: u32) -> Chunks {
    let mut out = [0u8; CHUNK_COUNT];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = CHUNK_BITS * i as u32;
        *slot = rank(((frame >> shift) & 0b11) as u8);
    }
    out
}

/// Rebuild the frame a set of chunks was decomposed from.
#[inline]
pub fn compose(chunks: &Chunks) -> u32 {
    chunks.iter().enumerate().fold(0u32, |acc, (i, &r)| {
        acc | (u32::from(unrank(r)) << (CHUNK_BITS * i as u32))
    })
}

/// Memoizing front-end for [`decompose`].
///
/// The cache is owned by the decomposer rather than living in process-global
/// state, so its capacity is an explicit parameter and two decomposers never
/// share entries. A capacity of zero disables memoization entirely.
///
/// The cache sits behind a `Mutex`, making the decomposer `Sync`. The lock is
/// held across lookup, compute and insert so concurrent callers never
/// decompose the same frame twice.
pub struct ChunkDecomposer {
    cache: Option<Mutex<LruCache<u32, Chunks>>>,
}

impl ChunkDecomposer {
    /// Create a decomposer holding at most `capacity` memoized frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: NonZeroUsize::new(capacity)
                .map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    /// Create a decomposer that never memoizes.
    pub fn uncached() -> Self {
        Self { cache: None }
    }

    /// Decompose a single frame, consulting the cache first.
    pub fn decompose(&self, frame: u32) -> Chunks {
        let Some(cache) = &self.cache else {
            return decompose(frame);
        };
        let mut guard = cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(chunks) = guard.get(&frame) {
            return *chunks;
        }
        let chunks = decompose(frame);
        guard.put(frame, chunks);
        chunks
    }

    /// Decompose a whole fingerprint under a single lock acquisition.
    pub fn decompose_all(&self, frames: &[u32]) -> Vec<Chunks> {
        let Some(cache) = &self.cache else {
            return frames.iter().map(|&f| decompose(f)).collect();
        };
        let mut guard = cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        frames
            .iter()
            .map(|&frame| *guard.get_or_insert(frame, || decompose(frame)))
            .collect()
    }

    /// Maximum number of memoized frames (zero when uncached).
    pub fn capacity(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| {
            cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .cap()
                .get()
        })
    }

    /// Number of frames currently memoized.
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| {
            cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .len()
        })
    }

    /// Drop every memoized entry.
    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clear();
        }
    }
}

impl Default for ChunkDecomposer {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

impl fmt::Debug for ChunkDecomposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkDecomposer")
            .field("capacity", &self.capacity())
            .field("cached", &self.cached_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FRAMES: [u32; 8] = [
        0,
        u32::MAX,
        0xAAAA_AAAA,
        0x5555_5555,
        0xDEAD_BEEF,
        0x1234_5678,
        0x8000_0001,
        627_964_279,
    ];

    #[test]
    fn decompose_zero_is_all_zero() {
        assert_eq!(decompose(0), [0u8; CHUNK_COUNT]);
    }

    #[test]
    fn decompose_uses_gray_ranks() {
        // 0b11 ranks 2 and 0b10 ranks 3.
        assert_eq!(decompose(u32::MAX), [2u8; CHUNK_COUNT]);
        assert_eq!(decompose(0xAAAA_AAAA), [3u8; CHUNK_COUNT]);
        assert_eq!(decompose(0x5555_5555), [1u8; CHUNK_COUNT]);
    }

    #[test]
    fn decompose_orders_chunks_from_low_bits() {
        let chunks = decompose(0b10_11_01);
        assert_eq!(&chunks[..4], &[1, 2, 3, 0]);
        assert!(chunks[4..].iter().all(|&c| c == 0));
    }

    #[test]
    fn every_chunk_is_a_valid_rank() {
        for &frame in &SAMPLE_FRAMES {
            let chunks = decompose(frame);
            assert_eq!(chunks.len(), CHUNK_COUNT);
            assert!(chunks.iter().all(|&c| c <= 3));
        }
    }

    #[test]
    fn compose_recovers_original_frame() {
        for &frame in &SAMPLE_FRAMES {
            assert_eq!(compose(&decompose(frame)), frame);
        }
    }

    #[test]
    fn cached_and_uncached_agree() {
        let cached = ChunkDecomposer::new(4);
        let uncached = ChunkDecomposer::uncached();
        // Run twice so the second pass is served from the cache (or evicted).
        for _ in 0..2 {
            for &frame in &SAMPLE_FRAMES {
                assert_eq!(cached.decompose(frame), uncached.decompose(frame));
                assert_eq!(cached.decompose(frame), decompose(frame));
            }
        }
    }

    #[test]
    fn cache_is_bounded_by_capacity() {
        let decomposer = ChunkDecomposer::new(3);
        for &frame in &SAMPLE_FRAMES {
            decomposer.decompose(frame);
        }
        assert_eq!(decomposer.capacity(), 3);
        assert_eq!(decomposer.cached_len(), 3);
    }

    #[test]
    fn repeated_frames_share_one_entry() {
        let decomposer = ChunkDecomposer::new(16);
        let frames = [7u32, 7, 7, 9, 9, 7];
        let all = decomposer.decompose_all(&frames);
        assert_eq!(all.len(), frames.len());
        assert_eq!(decomposer.cached_len(), 2);
        assert_eq!(all[0], all[5]);
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let decomposer = ChunkDecomposer::new(0);
        decomposer.decompose(42);
        assert_eq!(decomposer.capacity(), 0);
        assert_eq!(decomposer.cached_len(), 0);
    }

    #[test]
    fn clear_empties_cache_without_changing_results() {
        let decomposer = ChunkDecomposer::default();
        let before = decomposer.decompose(0xDEAD_BEEF);
        assert_eq!(decomposer.cached_len(), 1);
        decomposer.clear();
        assert_eq!(decomposer.cached_len(), 0);
        assert_eq!(decomposer.decompose(0xDEAD_BEEF), before);
    }

    #[test]
    fn decomposer_is_shareable_across_threads() {
        let decomposer = std::sync::Arc::new(ChunkDecomposer::new(64));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let decomposer = decomposer.clone();
                std::thread::spawn(move || {
                    for frame in 0..32u32 {
                        assert_eq!(
                            decomposer.decompose(frame * 31 + t),
                            decompose(frame * 31 + t)
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(decomposer.cached_len() <= 64);
    }
}
