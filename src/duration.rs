//! Fallback duration probing.
//!
//! Some files carry no duration in their tag properties (common for
//! streams dumped to disk and for sloppy encoders). This module opens
//! the file with symphonia purely to read its format metadata - no
//! packet is ever decoded - and derives the duration from the track's
//! frame count and time base.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Upper bound on a single probe. The source media is local, so anything
/// slower than this is a file we will not get an answer from anyway.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve an authoritative duration for a file, in milliseconds.
///
/// Single attempt, bounded by [`PROBE_TIMEOUT`]. Returns 0 when the file
/// cannot be probed; the caller keeps the track with a zero duration.
pub async fn resolve(path: &Path) -> u64 {
    let owned: PathBuf = path.to_path_buf();
    let probe = tokio::task::spawn_blocking(move || probe_millis(&owned));

    match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
        Ok(Ok(Ok(millis))) => millis,
        Ok(Ok(Err(e))) => {
            tracing::warn!("Could not get duration from {}: {}", path.display(), e);
            0
        }
        Ok(Err(join)) => {
            tracing::warn!("Duration probe panicked for {}: {}", path.display(), join);
            0
        }
        Err(_) => {
            tracing::warn!(
                "Duration probe timed out after {:?} for {}",
                PROBE_TIMEOUT,
                path.display()
            );
            0
        }
    }
}

/// Blocking probe: open the container, find the first audio track, and
/// compute duration from its frame count.
fn probe_millis(path: &Path) -> anyhow::Result<u64> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension() {
        hint.with_extension(&ext.to_string_lossy());
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| anyhow::anyhow!("unsupported format: {e}"))?;

    let track = probed
        .format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| anyhow::anyhow!("no audio track found"))?;

    let params = &track.codec_params;
    let n_frames = params
        .n_frames
        .ok_or_else(|| anyhow::anyhow!("frame count unknown"))?;

    let seconds = if let Some(tb) = params.time_base {
        let time = tb.calc_time(n_frames);
        time.seconds as f64 + time.frac
    } else if let Some(rate) = params.sample_rate {
        n_frames as f64 / rate as f64
    } else {
        anyhow::bail!("no time base or sample rate");
    };

    Ok((seconds * 1000.0).round() as u64)
}
