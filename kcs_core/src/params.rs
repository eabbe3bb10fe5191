/// The waveform shape used to carry mark and space tones.
///
/// Reference held a function pointer (`wave_function`) selected at
/// startup; here it is a tagged variant dispatched inside the
/// generator, so adding a shape is a new match arm rather than a new
/// function signature threaded through every caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Sine
    }
}

/// Immutable configuration for a single encode or decode run.
///
/// There is no global, mutable parameter state here (the C ancestor of
/// this modem kept `KCS_FRAMERATE` et al. as module-level statics that
/// the whole program could mutate at any time); a `Parameters` value is
/// built once and handed by value (or shared reference) to whichever
/// component needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    /// Sample rate of the audio stream, in Hz.
    pub framerate: u32,
    /// Frequency of the "mark" (binary 1) tone, in Hz.
    pub mark_freq: u32,
    /// Frequency of the "space" (binary 0) tone, in Hz.
    pub space_freq: u32,
    /// Cycles of `mark_freq` per mark symbol.
    pub mark_cycles: u32,
    /// Cycles of `space_freq` per space symbol.
    pub space_cycles: u32,
    /// Peak amplitude, normalised to `[0, 1]`. Values outside the range
    /// are clipped by the waveform generator and cycle detector, never
    /// rejected here.
    pub amplitude: f64,
    /// Squelch threshold, normalised to `[0, 1]`, below which the
    /// cycle detector treats a candidate cycle as noise.
    pub squelch: f64,
    /// Seconds of pure mark carrier emitted before the data.
    pub leader_seconds: u32,
    /// Seconds of pure mark carrier emitted after the data.
    pub trailer_seconds: u32,
    /// Mark cycles spliced in after a newline byte (0x0A). Zero disables
    /// the null pulse entirely.
    pub null_cycles: u32,
    /// Wave shape used for both mark and space tones.
    pub waveform: Waveform,
}

impl Parameters {
    /// The standard KCS profile: 2400 Hz mark, 1200 Hz space, 8 cycles
    /// per mark symbol, 4 per space symbol — a "1" and a "0" occupy the
    /// same 3.33 ms. Both the encoder and decoder use this profile; the
    /// reference C implementation's encoder used `mark_cycles=2,
    /// space_cycles=1` while its decoder used 8 and 4, an asymmetry that
    /// would make the reference non-interoperable with itself. That
    /// asymmetry is a reference defect, not part of the standard, and is
    /// not reproduced here.
    pub fn standard() -> Self {
        Parameters {
            framerate: 44_100,
            mark_freq: 2_400,
            space_freq: 1_200,
            mark_cycles: 8,
            space_cycles: 4,
            amplitude: 0.8,
            squelch: 0.25,
            leader_seconds: 5,
            trailer_seconds: 5,
            null_cycles: 800,
            waveform: Waveform::Sine,
        }
    }

    pub fn with_framerate(mut self, framerate: u32) -> Self {
        self.framerate = framerate;
        self
    }

    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn with_squelch(mut self, squelch: f64) -> Self {
        self.squelch = squelch;
        self
    }

    pub fn with_leader_seconds(mut self, seconds: u32) -> Self {
        self.leader_seconds = seconds;
        self
    }

    pub fn with_trailer_seconds(mut self, seconds: u32) -> Self {
        self.trailer_seconds = seconds;
        self
    }

    pub fn with_null_cycles(mut self, cycles: u32) -> Self {
        self.null_cycles = cycles;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    /// Number of samples in one cycle of the mark tone.
    pub(crate) fn mark_cycle_len(&self) -> u32 {
        self.framerate / self.mark_freq
    }

    /// Number of samples in one cycle of the space tone.
    pub(crate) fn space_cycle_len(&self) -> u32 {
        self.framerate / self.space_freq
    }

    /// Amplitude clipped into `[0, 1]`.
    pub(crate) fn clipped_amplitude(&self) -> f64 {
        self.amplitude.clamp(0.0, 1.0)
    }

    /// Squelch threshold in raw i16 sample units, clipped into `[0, 1]`
    /// before scaling.
    pub(crate) fn squelch_threshold(&self) -> i16 {
        (self.squelch.clamp(0.0, 1.0) * i16::MAX as f64) as i16
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::standard()
    }
}
