//! A lossless-audio-container backend for the sample sink/source the
//! core consumes. The original KiloCycleS used FLAC; this crate pack
//! carries no FLAC-encoding crate, so WAV (via `hound`) is the grounded
//! substitute container codec — noted in DESIGN.md.

use kcs_core::sink::{SampleSink, SampleSource};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

/// Writes encoded KCS samples out to a mono, 16-bit PCM WAV file.
pub struct WavSink {
    writer: hound::WavWriter<BufWriter<File>>,
}

impl WavSink {
    pub fn create(path: &Path, framerate: u32) -> io::Result<Self> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: framerate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let writer = hound::WavWriter::create(path, spec).map_err(hound_to_io)?;
        Ok(WavSink { writer })
    }

    /// Flushes and closes the WAV file, writing its final header.
    pub fn finish(self) -> io::Result<()> {
        self.writer.finalize().map_err(hound_to_io)
    }
}

impl SampleSink for WavSink {
    fn write_samples(&mut self, samples: &[i16]) -> io::Result<()> {
        for &s in samples {
            self.writer.write_sample(s).map_err(hound_to_io)?;
        }
        Ok(())
    }
}

/// Reads KCS samples back from a WAV file, resampling is not
/// performed: the file's sample rate is trusted to match the
/// configured framerate.
pub struct WavSource {
    reader: hound::WavReader<BufReader<File>>,
}

impl WavSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let reader = hound::WavReader::open(path).map_err(hound_to_io)?;
        Ok(WavSource { reader })
    }

    pub fn sample_rate(&self) -> u32 {
        self.reader.spec().sample_rate
    }
}

impl SampleSource for WavSource {
    fn read_samples(&mut self, buf: &mut [i16]) -> io::Result<usize> {
        let mut samples = self.reader.samples::<i16>();
        let mut n = 0;
        for slot in buf.iter_mut() {
            match samples.next() {
                Some(Ok(sample)) => {
                    *slot = sample;
                    n += 1;
                }
                Some(Err(e)) => return Err(hound_to_io(e)),
                None => break,
            }
        }
        Ok(n)
    }
}

fn hound_to_io(e: hound::Error) -> io::Error {
    match e {
        hound::Error::IoError(e) => e,
        other => io::Error::new(io::ErrorKind::Other, other.to_string()),
    }
}
