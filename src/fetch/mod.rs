//! Archive retrieval: cached HTTP download plus gzip tar extraction.
//!
//! Downloads are keyed by URL basename under the cache directory; a file
//! already on disk is never re-fetched (re-runs are idempotent, content
//! freshness is not verified). Failures here are per-dataset: callers warn
//! and continue with the remaining datasets.

use crate::Result;
use crate::config::Config;
use anyhow::{Context, bail};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tar::Archive;

/// One log file lifted out of an archive.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub name: String,
    pub content: String,
}

/// Download `url` into the cache directory unless already present.
///
/// The body is streamed in fixed-size chunks to a `.part` file and renamed
/// into place once complete, so a failed download leaves no partial state.
pub fn download(url: &str, config: &Config) -> Result<PathBuf> {
    let name = url
        .rsplit('/')
        .next()
        .filter(|n| !n.is_empty())
        .with_context(|| format!("cannot derive a file name from {url}"))?;
    let path = config.cache_dir.join(name);

    if path.exists() {
        tracing::debug!("using cached {}", path.display());
        return Ok(path);
    }

    let mut resp = reqwest::blocking::get(url).with_context(|| format!("GET {url}"))?;
    if !resp.status().is_success() {
        bail!("download err code: {} for {url}", resp.status());
    }

    let part = config.cache_dir.join(format!("{name}.part"));
    let written = (|| -> Result<()> {
        let mut file =
            File::create(&part).with_context(|| format!("create {}", part.display()))?;
        let mut buf = vec![0u8; config.chunk_size];
        loop {
            let n = resp.read(&mut buf)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
        }
        file.flush()?;
        Ok(())
    })();
    if let Err(err) = written {
        let _ = fs::remove_file(&part);
        return Err(err.context(format!("download {url}")));
    }

    fs::rename(&part, &path)
        .with_context(|| format!("move {} into place", part.display()))?;
    tracing::info!("download {url} OK");
    Ok(path)
}

/// Collect the `.log` members of a gzip tar archive.
///
/// Only regular files count. An error before anything was read means the
/// file is not a valid archive; a later member error is reported and the
/// members read so far are returned. A member whose content cannot be read
/// is reported and skipped.
pub fn read_log_entries(path: &Path) -> Result<Vec<LogEntry>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let mut out = Vec::new();
    let entries = archive
        .entries()
        .with_context(|| format!("read {} as a tar archive", path.display()))?;
    for entry in entries {
        let mut entry = match entry {
            Ok(e) => e,
            Err(err) if out.is_empty() => {
                return Err(anyhow::Error::from(err)
                    .context(format!("{} is not a gzipped tar archive", path.display())));
            }
            Err(err) => {
                tracing::warn!("tar file error in {}: {err}", path.display());
                return Ok(out);
            }
        };

        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = match entry.path() {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(err) => {
                tracing::warn!("tar member with unreadable path in {}: {err}", path.display());
                continue;
            }
        };
        if !name.ends_with(".log") {
            continue;
        }

        let mut content = String::new();
        if let Err(err) = entry.read_to_string(&mut content) {
            tracing::warn!("tar file error reading {name}: {err}");
            continue;
        }
        out.push(LogEntry { name, content });
    }

    Ok(out)
}

/// Download one archive and return its log entries.
pub fn fetch_dataset(url: &str, config: &Config) -> Result<Vec<LogEntry>> {
    let path = download(url, config)?;
    read_log_entries(&path)
}
