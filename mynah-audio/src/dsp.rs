use anyhow::Context;
use rubato::Resampler;

/// Resample mono f32 audio to a target sample rate.
///
/// Input is expected to be PCM samples in [-1, 1] with a known sample rate.
pub fn resample_mono_f32(
    input_samples: &[f32],
    input_sample_rate_hz: u32,
    target_sample_rate_hz: u32,
) -> anyhow::Result<Vec<f32>> {
    if input_sample_rate_hz == target_sample_rate_hz {
        return Ok(input_samples.to_vec());
    }
    if input_samples.is_empty() {
        return Ok(Vec::new());
    }

    let input_sample_rate_hz: usize = input_sample_rate_hz
        .try_into()
        .context("invalid input sample rate")?;
    let target_sample_rate_hz: usize = target_sample_rate_hz
        .try_into()
        .context("invalid target sample rate")?;

    let params = rubato::SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: rubato::SincInterpolationType::Cubic,
        oversampling_factor: 256,
        window: rubato::WindowFunction::BlackmanHarris2,
    };

    let mut resampler = rubato::SincFixedIn::<f32>::new(
        target_sample_rate_hz as f64 / input_sample_rate_hz as f64,
        2.0,
        params,
        input_samples.len(),
        1,
    )
    .context("create resampler")?;

    let input = vec![input_samples.to_vec()];
    let out = resampler.process(&input, None).context("resample")?;
    Ok(out.into_iter().next().unwrap_or_default())
}

/// Simple WAV (RIFF) writer: 32-bit float PCM, mono. Enough for the
/// transcription upload.
pub fn encode_wav_mono_f32le(samples: &[f32], sample_rate_hz: u32) -> Vec<u8> {
    let num_channels: u16 = 1;
    let bits_per_sample: u16 = 32;
    let audio_format: u16 = 3; // IEEE float

    let byte_rate = sample_rate_hz * num_channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = num_channels * (bits_per_sample / 8);

    let data_bytes_len = samples.len() as u32 * 4;

    let mut out = Vec::with_capacity((44 + data_bytes_len) as usize);

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_bytes_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&audio_format.to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&sample_rate_hz.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_bytes_len.to_le_bytes());

    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }

    out
}
