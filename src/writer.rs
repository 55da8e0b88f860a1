//! In-place file rewriting
//!
//! Files are rewritten through the handle they were read from: truncate,
//! rewind, write. There is no temp file, so an interrupted write leaves the
//! file truncated.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};

const CRLF: &[u8] = b"\r\n";
const LF: &[u8] = b"\n";
const NO_ENDING: &[u8] = b"";

/// Raw file bytes split into lines, each remembering its own terminator.
///
/// Content is never decoded, so files in any encoding round-trip byte for
/// byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Line bodies without their terminator
    pub lines: Vec<Vec<u8>>,
    /// `\r\n`, `\n`, or empty for an unterminated last line
    endings: Vec<&'static [u8]>,
}

impl FileContent {
    pub fn parse(content: &[u8]) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();
        let mut rest = content;

        while !rest.is_empty() {
            match rest.iter().position(|&b| b == b'\n') {
                Some(idx) if idx > 0 && rest[idx - 1] == b'\r' => {
                    lines.push(rest[..idx - 1].to_vec());
                    endings.push(CRLF);
                    rest = &rest[idx + 1..];
                }
                Some(idx) => {
                    lines.push(rest[..idx].to_vec());
                    endings.push(LF);
                    rest = &rest[idx + 1..];
                }
                None => {
                    lines.push(rest.to_vec());
                    endings.push(NO_ENDING);
                    rest = &[];
                }
            }
        }

        Self { lines, endings }
    }

    /// Join the lines back, each followed by its original terminator.
    pub fn join(&self) -> Vec<u8> {
        let mut content = Vec::new();
        for (line, ending) in self.lines.iter().zip(&self.endings) {
            content.extend_from_slice(line);
            content.extend_from_slice(ending);
        }
        content
    }
}

/// Replace the whole content of `file` with `content`.
pub fn overwrite(file: &mut File, content: &[u8]) -> Result<()> {
    file.set_len(0).context("failed to truncate file")?;
    file.seek(SeekFrom::Start(0)).context("failed to seek file")?;
    file.write_all(content).context("failed to write file")?;
    file.flush().context("failed to write file")?;
    Ok(())
}
