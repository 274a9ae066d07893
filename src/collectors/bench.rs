use crate::error::BenchError;
use anyhow::{bail, Context, Result};
use nix::sys::statvfs::statvfs;
use nix::unistd::{access, AccessFlags};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

const CHUNK: usize = 1 << 20;

/// Bytes written and wall time including the final flush to disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    pub bytes: u64,
    pub secs:  f64,
}

impl Throughput {
    /// Decimal megabytes per second, as drive vendors quote it.
    pub fn mb_per_sec(&self) -> f64 {
        if self.secs <= 0.0 {
            return 0.0;
        }
        self.bytes as f64 / 1_000_000.0 / self.secs
    }
}

/// First writable mountpoint with room for twice the scratch size.
pub fn find_target<'a>(
    mounts: impl IntoIterator<Item = &'a str>,
    size_mib: u64,
) -> Result<PathBuf, BenchError> {
    let needed = size_mib.saturating_mul(2 << 20);
    let mut short: Option<BenchError> = None;

    for mount in mounts {
        if access(mount, AccessFlags::W_OK).is_err() {
            debug!(mount, "not writable");
            continue;
        }
        let free = match statvfs(mount) {
            Ok(st) => st.blocks_available() as u64 * st.fragment_size() as u64,
            Err(e) => {
                debug!(mount, error = %e, "statvfs failed");
                continue;
            }
        };
        if free >= needed {
            return Ok(PathBuf::from(mount));
        }
        short.get_or_insert(BenchError::InsufficientSpace { mount: PathBuf::from(mount), free, needed });
    }
    Err(short.unwrap_or(BenchError::NoWritableMount))
}

/// Write `size_mib` MiB into a scratch file under `dir` and time it up to
/// and including `sync_all`. The file is removed when this returns, also
/// on interruption.
pub fn write_throughput(dir: &Path, size_mib: u64, interrupted: &AtomicBool) -> Result<Throughput> {
    let mut scratch = tempfile::Builder::new()
        .prefix(".hwcheck-bench-")
        .tempfile_in(dir)
        .with_context(|| format!("cannot create scratch file in {}", dir.display()))?;

    // Non-zero pattern so compressing filesystems still hit the disk.
    let chunk: Vec<u8> = (0..CHUNK).map(|i| (i.wrapping_mul(31) % 251) as u8).collect();

    let start = Instant::now();
    for _ in 0..size_mib {
        if interrupted.load(Ordering::SeqCst) {
            bail!("interrupted");
        }
        scratch.as_file_mut().write_all(&chunk).context("scratch write failed")?;
    }
    scratch.as_file().sync_all().context("scratch sync failed")?;
    let secs = start.elapsed().as_secs_f64();

    let result = Throughput { bytes: size_mib * CHUNK as u64, secs };
    info!(dir = %dir.display(), mb_s = result.mb_per_sec(), "benchmark finished");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_uses_decimal_megabytes() {
        let t = Throughput { bytes: 500_000_000, secs: 2.0 };
        assert_eq!(t.mb_per_sec(), 250.0);
        assert_eq!(Throughput { bytes: 1, secs: 0.0 }.mb_per_sec(), 0.0);
    }

    #[test]
    fn writes_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let flag = AtomicBool::new(false);
        let t = write_throughput(dir.path(), 2, &flag).unwrap();
        assert_eq!(t.bytes, 2 * 1024 * 1024);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn interruption_removes_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let flag = AtomicBool::new(true);
        assert!(write_throughput(dir.path(), 4, &flag).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn target_needs_room() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        assert_eq!(find_target([path], 1).unwrap(), dir.path());
        let err = find_target([path], u64::MAX / 4).unwrap_err();
        assert!(matches!(err, BenchError::InsufficientSpace { .. }));
    }

    #[test]
    fn no_mounts_at_all() {
        let err = find_target(std::iter::empty(), 1).unwrap_err();
        assert!(matches!(err, BenchError::NoWritableMount));
    }
}
