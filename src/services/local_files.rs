use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

const READ_BUF_SIZE: usize = 64 * 1024;

/// Suffix appended to the source path for the downloaded copy
pub const RETRIEVED_SUFFIX: &str = ".retrieved";

/// `<source>.retrieved`, next to the source file
pub fn retrieved_path_for(source: &Path) -> PathBuf {
    let mut path = OsString::from(source.as_os_str());
    path.push(RETRIEVED_SUFFIX);
    PathBuf::from(path)
}

/// Byte-for-byte comparison of two files, reading both in step
pub async fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    let (meta_a, meta_b) = tokio::try_join!(tokio::fs::metadata(a), tokio::fs::metadata(b))?;
    if meta_a.len() != meta_b.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::with_capacity(READ_BUF_SIZE, tokio::fs::File::open(a).await?);
    let mut reader_b = BufReader::with_capacity(READ_BUF_SIZE, tokio::fs::File::open(b).await?);

    loop {
        let buf_a = reader_a.fill_buf().await?;
        let buf_b = reader_b.fill_buf().await?;
        if buf_a.is_empty() || buf_b.is_empty() {
            return Ok(buf_a.is_empty() && buf_b.is_empty());
        }

        let n = buf_a.len().min(buf_b.len());
        if buf_a[..n] != buf_b[..n] {
            return Ok(false);
        }
        reader_a.consume(n);
        reader_b.consume(n);
    }
}

/// Hex MD5 digest of a file's contents
pub async fn file_md5(path: &Path) -> io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut context = md5::Context::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        context.consume(&buf[..n]);
    }

    Ok(format!("{:x}", context.compute()))
}
