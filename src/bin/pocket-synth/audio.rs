//! Output device binding: a 44.1 kHz stereo cpal stream fed by the shared
//! synthesizer.

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, Stream, StreamConfig};
use rtrb::Consumer;

use pocket_synth::synth::SynthMessage;
use pocket_synth::{SharedSynth, SAMPLE_RATE};

const CHANNELS: u16 = 2;

/// Open the default output device and start playing. The stream stops when
/// the returned handle is dropped.
///
/// Queued control messages are applied at the top of every callback.
pub fn start(synth: SharedSynth, mut rx: Consumer<SynthMessage>) -> Result<Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let format = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?
        .sample_format();

    let config = StreamConfig {
        channels: CHANNELS,
        sample_rate: SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Default,
    };

    let on_error = |err| log::error!("audio stream error: {err}");

    let stream = match format {
        SampleFormat::I16 => device.build_output_stream(
            &config,
            move |data: &mut [i16], _| {
                let mut synth = synth.lock();
                synth.process_messages(&mut rx);
                synth.render_i16_into(data);
            },
            on_error,
            None,
        ),
        _ => device.build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                let mut synth = synth.lock();
                synth.process_messages(&mut rx);
                synth.render_interleaved(data, CHANNELS as usize);
            },
            on_error,
            None,
        ),
    }
    .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;
    log::info!(
        "audio: {} Hz, {CHANNELS} channels, {format:?} device",
        SAMPLE_RATE
    );
    Ok(stream)
}
