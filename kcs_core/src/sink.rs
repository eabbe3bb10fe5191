//! Capability interfaces consumed by the encoder and decoder cores.
//!
//! Reference held file handles directly. Here the core never touches a
//! file, a sound device, or a container format — it only knows about
//! `SampleSink`/`SampleSource` for the audio side. The byte side reuses
//! `std::io::{Read, Write}` directly, since a byte stream of bytes is
//! exactly what those traits already model; backends (a container
//! codec, a system audio device) implement `SampleSink`/`SampleSource`
//! behind this same contract.

use std::io;

/// Accepts chunks of signed 16-bit samples, in strict time order.
pub trait SampleSink {
    fn write_samples(&mut self, samples: &[i16]) -> io::Result<()>;
}

/// Yields signed 16-bit samples on demand.
///
/// `read_samples` fills as much of `buf` as the source currently has
/// available and returns the count written, following the same
/// "short reads are normal, zero means end of stream" contract as
/// `std::io::Read::read`.
pub trait SampleSource {
    fn read_samples(&mut self, buf: &mut [i16]) -> io::Result<usize>;
}

/// A `SampleSink` over an in-memory buffer, handy for tests and for
/// one-shot (non-streaming) encodes.
impl SampleSink for Vec<i16> {
    fn write_samples(&mut self, samples: &[i16]) -> io::Result<()> {
        self.extend_from_slice(samples);
        Ok(())
    }
}

/// A `SampleSource` that yields samples from a fixed in-memory slice,
/// once, then reports end of stream.
pub struct SliceSource<'a> {
    data: &'a [i16],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [i16]) -> Self {
        SliceSource { data, pos: 0 }
    }
}

impl SampleSource for SliceSource<'_> {
    fn read_samples(&mut self, buf: &mut [i16]) -> io::Result<usize> {
        let remaining = self.data.len() - self.pos;
        let n = remaining.min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
