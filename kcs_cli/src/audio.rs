//! A system-audio backend for the sample sink/source the core consumes,
//! modeled on the ring-buffer + cpal stream shape used for game audio
//! playback elsewhere in this pack, generalized from stereo `f32` frames
//! down to the mono `i16` samples KCS trades in, and extended with a
//! capture-side counterpart (recording, not just playback) since decode
//! needs to listen rather than only speak.

use kcs_core::sink::{SampleSink, SampleSource};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

fn cpal_io_error(msg: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, msg.to_string())
}

/// Plays KCS samples out through the default output device as they're
/// written, buffering whatever the device hasn't yet consumed.
pub struct AudioPlaybackSink {
    buffer: Arc<Mutex<VecDeque<i16>>>,
    _stream: cpal::Stream,
}

impl AudioPlaybackSink {
    pub fn new(framerate: u32) -> io::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| cpal_io_error("no audio output device available"))?;

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(framerate),
            buffer_size: cpal::BufferSize::Default,
        };

        log::info!("kcs audio: playback device {:?}", device.name().unwrap_or_default());

        let buffer = Arc::new(Mutex::new(VecDeque::new()));
        let read_buffer = buffer.clone();
        let err_fn = |err| log::error!("kcs audio: output stream error: {err}");

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [i16], _: &cpal::OutputCallbackInfo| {
                    let mut buf = read_buffer.lock().unwrap();
                    for sample in data.iter_mut() {
                        *sample = buf.pop_front().unwrap_or(0);
                    }
                },
                err_fn,
                None,
            )
            .map_err(cpal_io_error)?;
        stream.play().map_err(cpal_io_error)?;

        Ok(AudioPlaybackSink {
            buffer,
            _stream: stream,
        })
    }
}

impl SampleSink for AudioPlaybackSink {
    fn write_samples(&mut self, samples: &[i16]) -> io::Result<()> {
        let mut buf = self.buffer.lock().unwrap();
        buf.extend(samples.iter().copied());
        Ok(())
    }
}

/// Records samples from the default input device (e.g. a cassette
/// player or a microphone listening to a speaker) for decode to consume.
pub struct AudioCaptureSource {
    buffer: Arc<Mutex<VecDeque<i16>>>,
    _stream: cpal::Stream,
}

impl AudioCaptureSource {
    pub fn new(framerate: u32) -> io::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| cpal_io_error("no audio input device available"))?;

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(framerate),
            buffer_size: cpal::BufferSize::Default,
        };

        log::info!("kcs audio: capture device {:?}", device.name().unwrap_or_default());

        let buffer = Arc::new(Mutex::new(VecDeque::new()));
        let write_buffer = buffer.clone();
        let err_fn = |err| log::error!("kcs audio: input stream error: {err}");

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let mut buf = write_buffer.lock().unwrap();
                    buf.extend(data.iter().copied());
                },
                err_fn,
                None,
            )
            .map_err(cpal_io_error)?;
        stream.play().map_err(cpal_io_error)?;

        Ok(AudioCaptureSource {
            buffer,
            _stream: stream,
        })
    }
}

impl SampleSource for AudioCaptureSource {
    /// Blocks until at least one sample is available, the way a
    /// blocking device read (e.g. `pa_simple_read`) would, so an empty
    /// capture buffer is never mistaken by the streaming driver for
    /// end-of-stream.
    fn read_samples(&mut self, buf: &mut [i16]) -> io::Result<usize> {
        loop {
            let mut src = self.buffer.lock().unwrap();
            if !src.is_empty() {
                let n = src.len().min(buf.len());
                for slot in buf.iter_mut().take(n) {
                    *slot = src.pop_front().unwrap();
                }
                return Ok(n);
            }
            drop(src);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }
}
