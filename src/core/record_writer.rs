//! Bounded formatter that writes a record straight into an arena buffer

use std::fmt;

/// Writes into a fixed slice, dropping whatever does not fit.
///
/// Once the slice is full further writes fail with [`fmt::Error`], which stops
/// `write_fmt` early instead of formatting text that would be discarded.
pub(crate) struct RecordWriter<'a> {
    buf: &'a mut [u8],
    written: usize,
    truncated: bool,
    sanitize: bool,
}

impl<'a> RecordWriter<'a> {
    pub(crate) fn new(buf: &'a mut [u8]) -> Self {
        buf.fill(0);
        Self {
            buf,
            written: 0,
            truncated: false,
            sanitize: false,
        }
    }

    /// Escape line breaks and tabs in everything written from now on
    pub(crate) fn set_sanitize(&mut self, sanitize: bool) {
        self.sanitize = sanitize;
    }

    pub(crate) fn written(&self) -> usize {
        self.written
    }

    pub(crate) fn truncated(&self) -> bool {
        self.truncated
    }

    fn push_bytes(&mut self, bytes: &[u8]) -> fmt::Result {
        let room = self.buf.len() - self.written;
        let n = bytes.len().min(room);
        self.buf[self.written..self.written + n].copy_from_slice(&bytes[..n]);
        self.written += n;

        if n < bytes.len() {
            self.truncated = true;
            return Err(fmt::Error);
        }
        Ok(())
    }
}

impl fmt::Write for RecordWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if !self.sanitize {
            return self.push_bytes(s.as_bytes());
        }

        let mut rest = s;
        while let Some(pos) = rest.find(|c| matches!(c, '\n' | '\r' | '\t')) {
            self.push_bytes(rest[..pos].as_bytes())?;
            let escaped: &[u8] = match rest.as_bytes()[pos] {
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                _ => b"\\t",
            };
            self.push_bytes(escaped)?;
            rest = &rest[pos + 1..];
        }
        self.push_bytes(rest.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_fits() {
        let mut buf = [0xFFu8; 16];
        let mut writer = RecordWriter::new(&mut buf);
        write!(writer, "[{}] {}", "INFO", 42).unwrap();
        assert_eq!(writer.written(), 9);
        assert!(!writer.truncated());
        assert_eq!(&buf[..9], b"[INFO] 42");
        assert!(buf[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_truncates_at_capacity() {
        let mut buf = [0u8; 8];
        let mut writer = RecordWriter::new(&mut buf);
        assert!(write!(writer, "{}", "0123456789").is_err());
        assert_eq!(writer.written(), 8);
        assert!(writer.truncated());
        assert_eq!(&buf, b"01234567");
    }

    #[test]
    fn test_exact_fit_is_not_truncation() {
        let mut buf = [0u8; 4];
        let mut writer = RecordWriter::new(&mut buf);
        writer.write_str("abcd").unwrap();
        assert!(!writer.truncated());
    }

    #[test]
    fn test_sanitize_escapes_control_characters() {
        let mut buf = [0u8; 32];
        let mut writer = RecordWriter::new(&mut buf);
        writer.write_str("hdr\n").unwrap();
        writer.set_sanitize(true);
        writer.write_str("a\nb\rc\td").unwrap();
        let len = writer.written();
        assert_eq!(&buf[..len], b"hdr\na\\nb\\rc\\td");
    }
}
