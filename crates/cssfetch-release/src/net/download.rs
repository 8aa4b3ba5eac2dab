use crate::errors::{FetchError, Result};
use crate::net::http::{HttpTransport, OCTET_STREAM};
use crate::progress::ProgressSink;
use crate::types::Asset;
use anyhow::Context;
use log::{debug, info, warn};
use std::fs;
use std::io::{ErrorKind, Read, Write};
use std::path::{Component, Path, PathBuf};

/// Bytes copied per read.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Stream `asset` into `dir/<asset name>`, creating `dir` if needed.
///
/// The partial file is removed on any error after it was created, including
/// a body shorter than the declared content length.
pub fn download_asset<T, P>(
    transport: &T,
    asset: &Asset,
    dir: &Path,
    progress: &mut P,
) -> Result<PathBuf>
where
    T: HttpTransport + ?Sized,
    P: ProgressSink + ?Sized,
{
    let file_name = plain_file_name(&asset.name)?;
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let dest = dir.join(file_name);

    let url = asset.browser_download_url.as_str();
    let resp = transport.get(url, OCTET_STREAM, None)?;
    if !resp.status.is_success() {
        return Err(FetchError::Status {
            status: resp.status,
            url: url.to_string(),
        });
    }

    let total = resp.content_length;
    debug!("{} declares {:?} bytes", asset.name, total);

    let mut body = resp.body;
    match write_body(&mut body, &dest, total, progress) {
        Ok(written) => {
            progress.finish();
            info!("wrote {written} bytes to {}", dest.display());
            Ok(dest)
        }
        Err(e) => {
            remove_partial(&dest);
            Err(e)
        }
    }
}

fn write_body<R, P>(body: &mut R, dest: &Path, total: Option<u64>, progress: &mut P) -> Result<u64>
where
    R: Read + ?Sized,
    P: ProgressSink + ?Sized,
{
    let mut out = fs::File::create(dest)?;
    let mut buf = [0u8; CHUNK_SIZE];
    let mut written: u64 = 0;

    progress.begin(total);
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        out.write_all(&buf[..n])?;
        written += n as u64;
        progress.advance(written);
    }
    out.flush()?;

    if let Some(expected) = total {
        if written != expected {
            return Err(FetchError::Truncated { written, expected });
        }
    }
    Ok(written)
}

fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("removed partial {}", path.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("could not remove partial {}: {e}", path.display()),
    }
}

/// The asset name must be exactly one normal path component.
fn plain_file_name(name: &str) -> Result<&str> {
    let mut parts = Path::new(name).components();
    match (parts.next(), parts.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(FetchError::InvalidAssetName(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_names() {
        assert!(plain_file_name("counterstrikesharp-with-runtime-linux-300.zip").is_ok());
        assert!(plain_file_name("a.b.c").is_ok());
    }

    #[test]
    fn rejects_paths_and_specials() {
        for bad in ["", ".", "..", "../x.zip", "dir/x.zip", "/etc/passwd", "a\\b.zip"] {
            assert!(
                matches!(plain_file_name(bad), Err(FetchError::InvalidAssetName(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
