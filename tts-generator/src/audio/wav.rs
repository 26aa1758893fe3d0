//! WAV header inspection using hound.

use hound::WavReader;
use std::io::Cursor;
use std::time::Duration;

/// Playback length of a WAV payload, or None if the bytes aren't a readable WAV.
pub fn wav_duration(bytes: &[u8]) -> Option<Duration> {
    let reader = WavReader::new(Cursor::new(bytes)).ok()?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return None;
    }
    Some(Duration::from_secs_f64(
        reader.duration() as f64 / sample_rate as f64,
    ))
}

/// Format a duration as "m:ss" (or "h:mm:ss" past an hour).
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Build a silent mono 16-bit WAV of `samples` samples at `sample_rate`.
#[cfg(test)]
pub fn test_wav(samples: u32, sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for _ in 0..samples {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    buffer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_duration() {
        let wav = test_wav(48_000, 24_000);
        assert_eq!(wav_duration(&wav), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_wav_duration_rejects_garbage() {
        assert_eq!(wav_duration(b"not a wav file"), None);
        assert_eq!(wav_duration(&[]), None);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0:00");
        assert_eq!(format_duration(Duration::from_millis(65_400)), "1:05");
        assert_eq!(format_duration(Duration::from_secs(3_725)), "1:02:05");
    }
}
