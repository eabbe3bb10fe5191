//! The streaming decode driver: owns a fixed-size sample buffer and
//! pumps blocks through the cycle detector and frame decoder so an
//! arbitrarily long recording can be decoded without being buffered in
//! full.

use crate::cycle::detect_cycles;
use crate::frame::decode_cycles;
use crate::params::Parameters;
use crate::sink::SampleSource;
use std::io::{self, Write};

/// Nominal buffer length for "raw" mode (a bare PCM stream with no
/// backend-specific framing overhead to account for).
pub const RAW_BUFFER_LEN: usize = 19_408;

/// Backend-agnostic default: roughly a quarter second of carrier,
/// `264 * max(mark symbol length, space symbol length)` in samples.
pub fn default_buffer_len(params: &Parameters) -> usize {
    let mark_len = params.framerate as u64 * params.mark_cycles as u64 / params.mark_freq as u64;
    let space_len =
        params.framerate as u64 * params.space_cycles as u64 / params.space_freq as u64;
    264 * mark_len.max(space_len) as usize
}

/// Decodes an entire sample buffer in one call, with no windowing. This
/// is the one-shot counterpart the streaming `Decoder` is required to
/// agree with (§8 "streaming equivalence").
pub fn decode_all(params: &Parameters, data: &[i16]) -> Vec<u8> {
    let cycles = detect_cycles(params, data);
    let (bytes, _resume_offset) = decode_cycles(params, &cycles, data.len());
    bytes
}

/// Drives a fixed-size sliding window across a `SampleSource`, feeding
/// each window to the cycle detector and frame decoder and writing
/// decoded bytes to a byte sink as they're recovered.
pub struct Decoder {
    params: Parameters,
    buffer: Vec<i16>,
    /// How many samples at the tail of `buffer` need to be freshly
    /// filled from the source before the next decode pass. Starts at
    /// the full buffer length, since the first window has no carry-over.
    offset: usize,
}

impl Decoder {
    /// A decoder sized for the backend-agnostic default buffer length.
    pub fn new(params: Parameters) -> Self {
        let buffer_len = default_buffer_len(&params);
        Decoder::with_buffer_len(params, buffer_len)
    }

    /// A decoder sized for raw-mode's nominal buffer length.
    pub fn raw(params: Parameters) -> Self {
        Decoder::with_buffer_len(params, RAW_BUFFER_LEN)
    }

    pub fn with_buffer_len(params: Parameters, buffer_len: usize) -> Self {
        Decoder {
            params,
            buffer: vec![0i16; buffer_len],
            offset: buffer_len,
        }
    }

    /// Runs the driver to completion: reads from `source` until
    /// exhausted, writing every decoded byte to `byte_sink` in order.
    pub fn decode_stream(
        &mut self,
        source: &mut dyn SampleSource,
        byte_sink: &mut dyn Write,
    ) -> io::Result<()> {
        let buf_len = self.buffer.len();

        loop {
            let fill_start = buf_len - self.offset;
            let mut filled = 0usize;
            while filled < self.offset {
                let n = source.read_samples(&mut self.buffer[fill_start + filled..buf_len])?;
                if n == 0 {
                    break;
                }
                filled += n;
            }
            let window_len = fill_start + filled;
            if window_len == 0 {
                break;
            }

            let window = &self.buffer[..window_len];
            let cycles = detect_cycles(&self.params, window);
            let (bytes, resume) = decode_cycles(&self.params, &cycles, window_len);

            let exhausted = filled < self.offset;
            if bytes.is_empty() && resume == window_len && !exhausted {
                log::debug!(
                    "kcs decoder: resync consumed a full {window_len}-sample window with no frames recovered"
                );
            }

            if !bytes.is_empty() {
                byte_sink.write_all(&bytes)?;
            }

            if exhausted {
                break;
            }

            let carry = window_len - resume;
            self.buffer.copy_within(resume..window_len, 0);
            self.offset = buf_len - carry;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::Encoder;
    use crate::sink::SliceSource;

    #[test]
    fn streaming_decode_matches_one_shot_decode() {
        let p = Parameters::standard()
            .with_leader_seconds(0)
            .with_trailer_seconds(0);
        let samples = Encoder::new(p).encode_bytes(b"hello, streaming world");

        let one_shot = decode_all(&p, &samples);

        let mut decoder = Decoder::with_buffer_len(p, 4096);
        let mut source = SliceSource::new(&samples);
        let mut streamed = Vec::new();
        decoder.decode_stream(&mut source, &mut streamed).unwrap();

        assert_eq!(one_shot, streamed);
        assert_eq!(streamed, b"hello, streaming world");
    }

    #[test]
    fn silence_produces_no_output() {
        let p = Parameters::standard();
        let silence = vec![0i16; p.framerate as usize];
        let mut decoder = Decoder::with_buffer_len(p, 8192);
        let mut source = SliceSource::new(&silence);
        let mut out = Vec::new();
        decoder.decode_stream(&mut source, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn full_round_trip_through_leader_and_trailer() {
        let p = Parameters::standard().with_leader_seconds(1).with_trailer_seconds(1);
        let enc = Encoder::new(p);
        let mut samples = Vec::new();
        let leader_cycles = p.leader_seconds * p.mark_freq;
        samples.extend(crate::waveform::synthesise(&p, p.mark_freq, leader_cycles));
        samples.extend(enc.encode_bytes(b"round trip"));
        let trailer_cycles = p.trailer_seconds * p.mark_freq;
        samples.extend(crate::waveform::synthesise(&p, p.mark_freq, trailer_cycles));

        let mut decoder = Decoder::new(p);
        let mut source = SliceSource::new(&samples);
        let mut out = Vec::new();
        decoder.decode_stream(&mut source, &mut out).unwrap();
        assert_eq!(out, b"round trip");
    }

    #[test]
    fn all_256_byte_values_round_trip() {
        let p = Parameters::standard().with_leader_seconds(1).with_trailer_seconds(1);
        let bytes: Vec<u8> = (0u8..=255).collect();
        let enc = Encoder::new(p);
        let mut samples = Vec::new();
        samples.extend(crate::waveform::synthesise(&p, p.mark_freq, p.leader_seconds * p.mark_freq));
        samples.extend(enc.encode_bytes(&bytes));
        samples.extend(crate::waveform::synthesise(&p, p.mark_freq, p.trailer_seconds * p.mark_freq));

        let mut decoder = Decoder::new(p);
        let mut source = SliceSource::new(&samples);
        let mut out = Vec::new();
        decoder.decode_stream(&mut source, &mut out).unwrap();
        assert_eq!(out, bytes);
    }
}
