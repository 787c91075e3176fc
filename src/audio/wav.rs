use crate::{CareVoiceError, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;
use tracing::info;

/// Write mono f32 samples (-1.0 to 1.0) to a 16-bit PCM WAV file.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)
        .map_err(|e| CareVoiceError::Io(format!("Failed to create WAV writer: {e}")))?;

    for &sample in samples {
        let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| CareVoiceError::Io(format!("Failed to write sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| CareVoiceError::Io(format!("Failed to finalize WAV file: {e}")))?;

    info!(
        "Wrote {} samples to WAV file: {:?}",
        samples.len(),
        path.as_ref()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_write_wav() {
        let path = std::env::temp_dir().join("carevoice_wav_test.wav");

        // Half a second of a 440 Hz tone
        let sample_rate = 16000;
        let samples: Vec<f32> = (0..sample_rate / 2)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
            .collect();

        assert!(write_wav(&path, &samples, sample_rate as u32).is_ok());

        let reader = hound::WavReader::open(&path).expect("readable WAV");
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, sample_rate as u32);
        assert_eq!(reader.len() as usize, samples.len());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_write_empty_wav() {
        let path = std::env::temp_dir().join("carevoice_wav_empty.wav");
        assert!(write_wav(&path, &[], 16000).is_ok());
        let _ = std::fs::remove_file(&path);
    }
}
