/*!
Byte source handling: opens a local MRT dump file and wraps it in the
right decompressor based on its filename suffix. The framer downstream
only ever sees a plain [Read]; it never knows whether the bytes came
from a plain file, gzip, or bzip2.
*/
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use log::info;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Opens `path` and returns a buffered reader that transparently
/// decompresses gzip (`.gz`) or bzip2 (`.bz2`) content, matched
/// case-insensitively on the file extension. Any other extension (or
/// none) is treated as a plain, uncompressed MRT stream.
pub fn open_source(path: impl AsRef<Path>) -> std::io::Result<Box<dyn Read>> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let suffix = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());

    let reader: Box<dyn Read> = match suffix.as_deref() {
        Some("gz") => Box::new(BufReader::new(GzDecoder::new(file))),
        Some("bz2") => Box::new(BufReader::new(BzDecoder::new(file))),
        _ => {
            info!(
                "no .gz/.bz2 suffix on {}, reading as plain MRT",
                path.display()
            );
            Box::new(BufReader::new(file))
        }
    };
    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_plain_source() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"hello mrt").unwrap();
        let mut reader = open_source(tmp.path()).unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"hello mrt");
    }

    #[test]
    fn test_open_gz_source() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"compressed mrt payload").unwrap();
        encoder.finish().unwrap();

        let mut reader = open_source(&path).unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"compressed mrt payload");
    }
}
