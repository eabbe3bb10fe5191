//! Converts byte streams into KCS-framed sample streams.

use crate::params::Parameters;
use crate::sink::SampleSink;
use crate::waveform::synthesise;
use std::io::{self, Read};

/// Number of bytes read from the byte source per encode iteration.
/// Matches the reference implementation's `ENC_BLOCKSIZE`.
const BLOCK_SIZE: usize = 128;

/// Frames byte buffers as KCS sample streams.
pub struct Encoder {
    params: Parameters,
}

impl Encoder {
    pub fn new(params: Parameters) -> Self {
        Encoder { params }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Emits one byte's frame: start bit, 8 data bits LSB-first, an
    /// optional null pulse after a newline, then two stop bits.
    pub fn encode_byte(&self, out: &mut Vec<i16>, byte: u8) {
        let p = &self.params;

        // Start bit: one space symbol group.
        out.extend(synthesise(p, p.space_freq, p.space_cycles));

        // Data bits, LSB first.
        for i in 0..8u8 {
            if (byte >> i) & 1 == 1 {
                out.extend(synthesise(p, p.mark_freq, p.mark_cycles));
            } else {
                out.extend(synthesise(p, p.space_freq, p.space_cycles));
            }
        }

        // Null pulse after a newline, if enabled.
        if byte == b'\n' && p.null_cycles > 0 {
            out.extend(synthesise(p, p.mark_freq, p.null_cycles));
        }

        // Two stop bits.
        out.extend(synthesise(p, p.mark_freq, p.mark_cycles * 2));
    }

    /// Encodes a whole byte buffer into a single concatenated sample
    /// stream; no leader or trailer is included.
    pub fn encode_bytes(&self, bytes: &[u8]) -> Vec<i16> {
        let mut out = Vec::new();
        for &b in bytes {
            self.encode_byte(&mut out, b);
        }
        out
    }

    /// Emits a leader, reads `byte_source` to exhaustion encoding as it
    /// goes, then emits a trailer. Leader/trailer give receivers time to
    /// acquire and release the carrier.
    pub fn encode_stream(
        &self,
        byte_source: &mut dyn Read,
        sample_sink: &mut dyn SampleSink,
    ) -> io::Result<()> {
        let p = &self.params;

        let leader_cycles = p.leader_seconds * p.mark_freq;
        sample_sink.write_samples(&synthesise(p, p.mark_freq, leader_cycles))?;

        let mut block = [0u8; BLOCK_SIZE];
        loop {
            let n = byte_source.read(&mut block)?;
            if n == 0 {
                break;
            }
            sample_sink.write_samples(&self.encode_bytes(&block[..n]))?;
        }

        let trailer_cycles = p.trailer_seconds * p.mark_freq;
        sample_sink.write_samples(&synthesise(p, p.mark_freq, trailer_cycles))?;
        Ok(())
    }
}
