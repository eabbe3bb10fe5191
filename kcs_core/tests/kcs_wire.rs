//! End-to-end scenarios exercising the public encode/decode API,
//! mirroring the concrete scenarios a faithful KCS implementation must
//! satisfy.

use kcs_core::driver::{decode_all, Decoder};
use kcs_core::encode::Encoder;
use kcs_core::params::Parameters;
use kcs_core::sink::SliceSource;

fn standard() -> Parameters {
    Parameters::standard()
        .with_leader_seconds(0)
        .with_trailer_seconds(0)
}

#[test]
fn scenario_a_single_byte_length_and_round_trip() {
    let p = standard().with_null_cycles(0);
    let enc = Encoder::new(p);
    let samples = enc.encode_bytes(&[0x41]);

    let space_samples = (p.framerate / p.space_freq) as usize * p.space_cycles as usize;
    let mark_samples = (p.framerate / p.mark_freq) as usize * p.mark_cycles as usize;
    // 'A' = 0x41 = 0b0100_0001: two 1-bits, six 0-bits.
    let ones = 0x41u8.count_ones() as usize;
    let zeros = 8 - ones;
    let expected = space_samples + ones * mark_samples + zeros * space_samples + 2 * mark_samples;
    assert_eq!(samples.len(), expected);

    let decoded = decode_all(&p, &samples);
    assert_eq!(decoded, vec![0x41]);
}

#[test]
fn scenario_b_null_pulse_after_newline_does_not_disturb_decoding() {
    let p = standard().with_null_cycles(800);
    let enc = Encoder::new(p);
    let samples = enc.encode_bytes(b"A\nB");
    let decoded = decode_all(&p, &samples);
    assert_eq!(decoded, b"A\nB");
}

#[test]
fn scenario_c_all_byte_values_round_trip_with_leader_and_trailer() {
    let p = Parameters::standard()
        .with_leader_seconds(1)
        .with_trailer_seconds(1);
    let bytes: Vec<u8> = (0u8..=255).collect();

    let mut source_bytes: &[u8] = &bytes;
    let enc = Encoder::new(p);
    let mut samples = Vec::new();
    enc.encode_stream(&mut source_bytes, &mut samples).unwrap();

    let mut decoder = Decoder::new(p);
    let mut source = SliceSource::new(&samples);
    let mut out = Vec::new();
    decoder.decode_stream(&mut source, &mut out).unwrap();

    assert_eq!(out, bytes);
}

#[test]
fn scenario_d_silence_decodes_to_nothing() {
    let p = Parameters::standard();
    let silence = vec![0i16; p.framerate as usize];
    let decoded = decode_all(&p, &silence);
    assert!(decoded.is_empty());
}

#[test]
fn scenario_e_streamed_decode_at_small_window_recovers_hello() {
    let p = standard();
    let enc = Encoder::new(p);
    let samples = enc.encode_bytes(b"hello");

    let mut decoder = Decoder::with_buffer_len(p, 4096);
    let mut source = SliceSource::new(&samples);
    let mut out = Vec::new();
    decoder.decode_stream(&mut source, &mut out).unwrap();

    assert_eq!(out, b"hello");
}

#[test]
fn scenario_f_truncated_stream_keeps_only_fully_present_bytes() {
    let p = standard();
    let enc = Encoder::new(p);
    let samples = enc.encode_bytes(b"truncated");
    let cut_point = samples.len() - 5; // inside the final byte's stop-bit field
    let truncated = &samples[..cut_point];

    let decoded = decode_all(&p, truncated);
    assert_eq!(decoded, b"truncate");
}

#[test]
fn encode_stream_then_streaming_decode_agree_with_one_shot_decode() {
    let p = Parameters::standard();
    let mut text: &[u8] = b"Round trip through leader, trailer, and a small window.\n";
    let enc = Encoder::new(p);
    let mut samples = Vec::new();
    enc.encode_stream(&mut text, &mut samples).unwrap();

    let one_shot = decode_all(&p, &samples);

    let mut decoder = Decoder::with_buffer_len(p, 8192);
    let mut source = SliceSource::new(&samples);
    let mut streamed = Vec::new();
    decoder.decode_stream(&mut source, &mut streamed).unwrap();

    assert_eq!(one_shot, streamed);
    assert_eq!(streamed, b"Round trip through leader, trailer, and a small window.\n");
}
