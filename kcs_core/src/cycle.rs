//! Locates and classifies individual carrier cycles in a sample window.

use crate::params::Parameters;

/// What a detected cycle's length classifies it as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Mark,
    Space,
}

/// A single detected wave cycle: its classification and the distance,
/// in samples, between the two zero crossings that bounded it. The
/// span doubles as the sample-offset increment needed to reconstruct
/// the absolute sample index of any position in a `CycleSequence`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedCycle {
    pub classification: Classification,
    pub span: usize,
}

/// Locates wave cycles in `data` by zero-crossing pairs, filters them
/// by amplitude against the squelch threshold, and classifies each
/// surviving cycle by its length in samples against the nominal mark
/// and space cycle lengths.
///
/// Cycles with no squelch-passing sample are noise and are dropped
/// without being emitted; cycles whose length falls outside the
/// tolerance window around the nominal lengths, or whose distance to
/// mark and space is exactly tied, are likewise dropped.
pub fn detect_cycles(params: &Parameters, data: &[i16]) -> Vec<DetectedCycle> {
    let len = data.len();
    let l1 = round_div(params.framerate, params.mark_freq);
    let l0 = round_div(params.framerate, params.space_freq);
    let lo = l0.min(l1);
    let hi = l0.max(l1);
    let tau = (hi - lo) / 4;
    let sq = params.squelch_threshold();

    let mut cycles = Vec::new();
    let mut p = 0usize;

    // Skip until the first suprathreshold sample (carrier present).
    while p < len && data[p] <= sq {
        p += 1;
    }
    // Advance past any remaining non-negative samples to land at the
    // start of a downward-going zero crossing.
    while p < len && data[p] >= 0 {
        p += 1;
    }

    while p < len {
        // Find the next cycle boundary: through the negative excursion,
        // one step into the positive one, then through the positive
        // excursion back to the next negative-going crossing.
        let mut q = p + 1;
        while q < len && data[q] < 0 {
            q += 1;
        }
        q += 1;
        while q < len && data[q] >= 0 {
            q += 1;
        }

        if q >= len {
            // Incomplete trailing cycle (the scan ran off the window
            // edge without a genuine zero crossing); nothing more can
            // be recovered from this window.
            break;
        }

        let d = q - p;

        if !data[p..q].iter().any(|&s| s >= sq) {
            // No sample in this span reached squelch: noise.
            p = q;
            continue;
        }

        let delta1 = abs_diff(d, l1);
        let delta0 = abs_diff(d, l0);
        let in_tolerance = d + tau >= lo && d <= hi + tau;

        if in_tolerance {
            if delta1 < delta0 {
                cycles.push(DetectedCycle {
                    classification: Classification::Mark,
                    span: d,
                });
            } else if delta0 < delta1 {
                cycles.push(DetectedCycle {
                    classification: Classification::Space,
                    span: d,
                });
            }
            // delta1 == delta0: tie, dropped.
        }

        p = q;
    }

    cycles
}

fn round_div(num: u32, den: u32) -> usize {
    (((num as f64) / (den as f64)).round()) as usize
}

fn abs_diff(a: usize, b: usize) -> usize {
    a.max(b) - a.min(b)
}
