// Integration tests for reading recordings from disk
//
// These tests verify that a recording opened from a path keeps its bytes,
// name and detected MIME type, and that missing files are reported.

use anyhow::Result;
use classroom_feedback::audio::{AudioFile, PreviewHandle};
use std::fs;
use tempfile::TempDir;

/// Minimal 16-bit mono PCM WAV with `samples` zeroed samples
fn wav_bytes(samples: usize) -> Vec<u8> {
    let data_len = (samples * 2) as u32;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes()); // fmt chunk size
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&16000u32.to_le_bytes()); // sample rate
    bytes.extend_from_slice(&32000u32.to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(bytes.len() + samples * 2, 0);
    bytes
}

#[test]
fn test_audio_file_open() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("period-3-fractions.wav");
    fs::write(&path, wav_bytes(1600))?;

    let audio = AudioFile::open(&path)?;

    assert_eq!(audio.name, "period-3-fractions.wav");
    assert_eq!(audio.size(), 44 + 3200);
    assert_eq!(audio.mime_type, "audio/x-wav");
    assert_eq!(audio.bytes(), &fs::read(&path)?[..]);

    Ok(())
}

#[test]
fn test_audio_file_open_missing() {
    let result = AudioFile::open("tests/fixtures/does-not-exist.wav");
    let err = result.unwrap_err();
    assert!(
        format!("{:#}", err).contains("does-not-exist.wav"),
        "error should name the file: {err:#}"
    );
}

#[test]
fn test_reopening_gives_new_identity() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("lesson.wav");
    fs::write(&path, wav_bytes(10))?;

    let first = AudioFile::open(&path)?;
    let second = AudioFile::open(&path)?;
    assert_ne!(first.id, second.id);

    Ok(())
}

#[test]
fn test_preview_matches_opened_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("lesson.wav");
    fs::write(&path, wav_bytes(100))?;

    let audio = AudioFile::open(&path)?;
    let preview = PreviewHandle::create(&audio)?;

    assert_ne!(preview.path(), path.as_path());
    assert_eq!(fs::read(preview.path())?, fs::read(&path)?);

    Ok(())
}
