mod audio;
mod error;
mod wav;

use error::CliError;

use clap::{Parser, ValueEnum};
use kcs_core::encode::Encoder;
use kcs_core::params::{Parameters, Waveform};
use kcs_core::Decoder;

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum CliWaveform {
    Sine,
    Square,
}

impl From<CliWaveform> for Waveform {
    fn from(w: CliWaveform) -> Self {
        match w {
            CliWaveform::Sine => Waveform::Sine,
            CliWaveform::Square => Waveform::Square,
        }
    }
}

/// Encodes and decodes binary data to/from Kansas City Standard audio.
/// For more info, see: http://en.wikipedia.org/wiki/Kansas_City_standard
#[derive(Parser, Debug)]
#[command(name = "kcs", version, about)]
struct Args {
    /// Encode (text/binary -> audio).
    #[arg(short = 'e', long)]
    encode: bool,

    /// Decode (audio -> text/binary).
    #[arg(short = 'd', long)]
    decode: bool,

    /// Text or binary file to use in place of stdin/stdout. If not
    /// given, stdin is read from (encode) or stdout is written to
    /// (decode).
    file: Option<PathBuf>,

    /// WAV file to use in place of the sound card.
    #[arg(short = 'f', long = "container")]
    container: Option<PathBuf>,

    /// Amplitude, for encoding.
    #[arg(short = 'a', long, default_value_t = 0.8)]
    amplitude: f64,

    /// Squelch, for decoding.
    #[arg(short = 's', long, default_value_t = 0.25)]
    squelch: f64,

    /// Length of leader in seconds.
    #[arg(short = 'l', long, default_value_t = 5)]
    leader: u32,

    /// Length of trailer in seconds.
    #[arg(short = 't', long, default_value_t = 5)]
    trailer: u32,

    /// Null pulse cycles appended after each newline. Passing the flag
    /// with no value uses the standard 800-cycle pulse; omitting it
    /// disables the null pulse entirely.
    #[arg(short = 'n', long, num_args = 0..=1, default_missing_value = "800")]
    null: Option<u32>,

    /// Wave shape.
    #[arg(short = 'w', long, value_enum, default_value_t = CliWaveform::Sine)]
    wave: CliWaveform,

    /// Sample rate of the audio stream, in Hz.
    #[arg(long, default_value_t = 44_100)]
    framerate: u32,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("kcs: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    if args.encode && args.decode {
        return Err(CliError::ModeConflict);
    }

    let params = Parameters::standard()
        .with_framerate(args.framerate)
        .with_amplitude(args.amplitude)
        .with_squelch(args.squelch)
        .with_leader_seconds(args.leader)
        .with_trailer_seconds(args.trailer)
        .with_null_cycles(args.null.unwrap_or(0))
        .with_waveform(args.wave.into());

    if args.encode {
        run_encode(params, args)
    } else if args.decode {
        run_decode(params, args)
    } else {
        eprintln!("No arguments given. Pass -e to encode or -d to decode.");
        Ok(())
    }
}

fn run_encode(params: Parameters, args: &Args) -> Result<(), CliError> {
    let mut byte_source: Box<dyn Read> = match &args.file {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    let encoder = Encoder::new(params);

    match &args.container {
        Some(path) => {
            let mut sink = wav::WavSink::create(path, params.framerate)?;
            encoder.encode_stream(&mut byte_source, &mut sink)?;
            sink.finish()?;
        }
        None => {
            let mut sink = audio::AudioPlaybackSink::new(params.framerate)?;
            encoder.encode_stream(&mut byte_source, &mut sink)?;
        }
    }

    Ok(())
}

fn run_decode(params: Parameters, args: &Args) -> Result<(), CliError> {
    let mut byte_sink: Box<dyn Write> = match &args.file {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };

    match &args.container {
        Some(path) => {
            let mut source = wav::WavSource::open(path)?;
            let file_rate = source.sample_rate();
            if file_rate != params.framerate {
                log::info!(
                    "kcs: container framerate {file_rate} overrides requested {}",
                    params.framerate
                );
            }
            let mut decoder = Decoder::new(params.with_framerate(file_rate));
            decoder.decode_stream(&mut source, &mut byte_sink)?;
        }
        None => {
            let mut source = audio::AudioCaptureSource::new(params.framerate)?;
            let mut decoder = Decoder::new(params);
            decoder.decode_stream(&mut source, &mut byte_sink)?;
        }
    }

    Ok(())
}
