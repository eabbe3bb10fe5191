//! Recognises byte frames in a classified cycle sequence.

use crate::cycle::{Classification, DetectedCycle};
use crate::params::Parameters;

/// Consumes a `CycleSequence` of length `K`, recognising byte frames
/// (start bit, 8 data bits LSB-first, two stop bits), and returns the
/// decoded bytes plus a sample-space resume offset: samples at and
/// beyond the returned offset have not been safely consumed and must be
/// carried into the next window.
///
/// `window_len` is the sample count of the window `cycles` was detected
/// from (`M` in the component design); it seeds the resume offset so
/// that a window producing no decodable frames at all still reports
/// "consume the whole window" rather than "consume nothing".
///
/// Never fails: an unrecognised frame is dropped and resync advances
/// past at most `space_cycles` contiguous space cycles before retrying,
/// so lossy input yields a shorter decoded prefix rather than a
/// poisoned stream.
pub fn decode_cycles(
    params: &Parameters,
    cycles: &[DetectedCycle],
    window_len: usize,
) -> (Vec<u8>, usize) {
    let c0 = params.space_cycles as usize;
    let c1 = params.mark_cycles as usize;
    let k = cycles.len();

    let mut pos = 0usize;
    let mut sample_pos = 0usize;
    let mut last_good_sample = window_len;
    let mut out = Vec::new();

    while pos < k {
        // Step 1: skip inter-frame marks, tracking the candidate frame
        // start for resync purposes.
        while pos < k && cycles[pos].classification == Classification::Mark {
            sample_pos += cycles[pos].span;
            pos += 1;
        }
        if pos >= k {
            break;
        }
        let frame_pos = pos;
        let frame_sample = sample_pos;

        // Step 2: start bit.
        let (mut cur_pos, mut cur_sample) =
            match consume_run(cycles, pos, sample_pos, Classification::Space, c0) {
                Some(v) => v,
                None => {
                    let (np, ns) = resync(cycles, frame_pos, frame_sample, c0);
                    pos = np;
                    sample_pos = ns;
                    continue;
                }
            };

        // Step 3: data bits, LSB first. If neither a mark run nor a
        // space run of the required length matches, the bit is left 0
        // and the position does not advance for this bit (faithful to
        // the reference's best-effort recovery, see SPEC_FULL.md §9).
        let mut byte = 0u8;
        for i in 0..8u8 {
            if let Some((np, ns)) = consume_run(cycles, cur_pos, cur_sample, Classification::Mark, c1)
            {
                byte |= 1 << i;
                cur_pos = np;
                cur_sample = ns;
            } else if let Some((np, ns)) =
                consume_run(cycles, cur_pos, cur_sample, Classification::Space, c0)
            {
                cur_pos = np;
                cur_sample = ns;
            }
        }

        // Step 4: stop bits.
        match consume_run(cycles, cur_pos, cur_sample, Classification::Mark, c1 * 2) {
            Some((np, ns)) => {
                out.push(byte);
                pos = np;
                sample_pos = ns;
                last_good_sample = sample_pos;
            }
            None => {
                let (np, ns) = resync(cycles, frame_pos, frame_sample, c0);
                pos = np;
                sample_pos = ns;
            }
        }
    }

    (out, last_good_sample)
}

/// Attempts to consume `count` contiguous cycles of `class` starting at
/// `pos`, returning the advanced `(cycle_index, sample_offset)` on a
/// full match, or `None` if the run is too short or wrongly classified.
fn consume_run(
    cycles: &[DetectedCycle],
    pos: usize,
    sample_pos: usize,
    class: Classification,
    count: usize,
) -> Option<(usize, usize)> {
    if count == 0 {
        return Some((pos, sample_pos));
    }
    if pos + count > cycles.len() {
        return None;
    }
    let mut sp = sample_pos;
    for cycle in &cycles[pos..pos + count] {
        if cycle.classification != class {
            return None;
        }
        sp += cycle.span;
    }
    Some((pos + count, sp))
}

/// Advances past at most `max` contiguous space cycles starting at
/// `pos`, guaranteeing at least one cycle of forward progress so the
/// caller's retry loop always terminates.
fn resync(
    cycles: &[DetectedCycle],
    pos: usize,
    sample_pos: usize,
    max: usize,
) -> (usize, usize) {
    let mut p = pos;
    let mut sp = sample_pos;
    let mut skipped = 0usize;
    while skipped < max && p < cycles.len() && cycles[p].classification == Classification::Space {
        sp += cycles[p].span;
        p += 1;
        skipped += 1;
    }
    if p == pos && p < cycles.len() {
        sp += cycles[p].span;
        p += 1;
    }
    (p, sp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle::detect_cycles;
    use crate::encode::Encoder;
    use crate::waveform::synthesise;

    fn cycles_for(params: &Parameters, bytes: &[u8]) -> (Vec<DetectedCycle>, usize) {
        let samples = Encoder::new(*params).encode_bytes(bytes);
        let cycles = detect_cycles(params, &samples);
        (cycles, samples.len())
    }

    #[test]
    fn decodes_single_byte() {
        let p = Parameters::standard();
        let (cycles, len) = cycles_for(&p, &[0x41]);
        let (bytes, _offset) = decode_cycles(&p, &cycles, len);
        assert_eq!(bytes, vec![0x41]);
    }

    #[test]
    fn decodes_bit_order_edge_cases() {
        let p = Parameters::standard();
        for &b in &[0x01u8, 0x80, 0xAA] {
            let (cycles, len) = cycles_for(&p, &[b]);
            let (bytes, _) = decode_cycles(&p, &cycles, len);
            assert_eq!(bytes, vec![b], "byte {:#04x} round-trip failed", b);
        }
    }

    #[test]
    fn decodes_multi_byte_sequence_with_newline_and_null_pulse() {
        let p = Parameters::standard();
        let (cycles, len) = cycles_for(&p, b"A\nB");
        let (bytes, _) = decode_cycles(&p, &cycles, len);
        assert_eq!(bytes, b"A\nB");
    }

    #[test]
    fn silence_reports_full_window_consumed_and_no_bytes() {
        let p = Parameters::standard();
        let data = vec![0i16; 44_100];
        let cycles = detect_cycles(&p, &data);
        let (bytes, offset) = decode_cycles(&p, &cycles, data.len());
        assert!(bytes.is_empty());
        assert_eq!(offset, data.len());
    }

    #[test]
    fn truncated_trailing_frame_is_dropped_not_corrupted() {
        let p = Parameters::standard();
        let samples = Encoder::new(p).encode_bytes(b"hi");
        // Cut off partway through the second byte's frame.
        let cut = samples.len() - 5;
        let truncated = &samples[..cut];
        let cycles = detect_cycles(&p, truncated);
        let (bytes, _) = decode_cycles(&p, &cycles, truncated.len());
        assert_eq!(bytes, vec![b'h']);
    }

    #[test]
    fn leading_leader_carrier_is_skipped_as_inter_frame_marks() {
        let p = Parameters::standard();
        let leader = synthesise(&p, p.mark_freq, p.mark_freq);
        let mut samples = leader;
        samples.extend(Encoder::new(p).encode_bytes(b"Z"));
        let cycles = detect_cycles(&p, &samples);
        let (bytes, _) = decode_cycles(&p, &cycles, samples.len());
        assert_eq!(bytes, vec![b'Z']);
    }
}
