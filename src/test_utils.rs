//! Test fixtures shared across module tests.
//!
//! Provides a minimal PCM WAV generator (so metadata and duration tests
//! run against real, parseable media without shipping binary fixtures)
//! plus mock implementations of the host-owned collaborator traits.

use async_trait::async_trait;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::model::Track;
use crate::store::{DirectoryPicker, SpecialView, ViewKind};

/// Sample rate used by generated WAV fixtures.
pub const TEST_WAV_RATE: u32 = 8000;

/// Write a valid untagged PCM WAV file of `secs` seconds of silence.
///
/// 8 kHz, mono, 16-bit: small, and every parser in the stack handles it.
pub fn write_test_wav(path: &Path, secs: u32) {
    let num_samples = TEST_WAV_RATE * secs;
    let data_len = num_samples * 2; // 16-bit mono
    let byte_rate = TEST_WAV_RATE * 2;

    let mut file = File::create(path).expect("create test wav");
    file.write_all(b"RIFF").unwrap();
    file.write_all(&(36 + data_len).to_le_bytes()).unwrap();
    file.write_all(b"WAVE").unwrap();

    // fmt chunk: PCM, mono, 16-bit
    file.write_all(b"fmt ").unwrap();
    file.write_all(&16u32.to_le_bytes()).unwrap();
    file.write_all(&1u16.to_le_bytes()).unwrap(); // PCM
    file.write_all(&1u16.to_le_bytes()).unwrap(); // channels
    file.write_all(&TEST_WAV_RATE.to_le_bytes()).unwrap();
    file.write_all(&byte_rate.to_le_bytes()).unwrap();
    file.write_all(&2u16.to_le_bytes()).unwrap(); // block align
    file.write_all(&16u16.to_le_bytes()).unwrap(); // bits per sample

    file.write_all(b"data").unwrap();
    file.write_all(&data_len.to_le_bytes()).unwrap();
    file.write_all(&vec![0u8; data_len as usize]).unwrap();
}

/// Picker that always answers with a fixed choice.
pub struct StaticPicker(pub Option<PathBuf>);

#[async_trait]
impl DirectoryPicker for StaticPicker {
    async fn pick_folder(&self) -> Option<PathBuf> {
        self.0.clone()
    }
}

/// One recorded special-view invocation.
#[derive(Clone)]
pub struct ViewCall {
    pub service: String,
    pub tracks: Vec<Track>,
    pub kind: ViewKind,
    pub label: String,
    pub artwork: String,
}

/// View renderer that records every call for assertions.
#[derive(Default)]
pub struct RecordingView {
    calls: Mutex<Vec<ViewCall>>,
}

impl RecordingView {
    /// Snapshot of the recorded calls.
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl SpecialView for RecordingView {
    fn render(
        &self,
        service: &str,
        tracks: Vec<Track>,
        kind: ViewKind,
        label: &str,
        artwork: &str,
    ) {
        self.calls.lock().unwrap().push(ViewCall {
            service: service.to_string(),
            tracks,
            kind,
            label: label.to_string(),
            artwork: artwork.to_string(),
        });
    }
}
