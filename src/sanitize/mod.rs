use std::path::{Path, PathBuf};

use log::debug;

use crate::error::Result;

pub const SEPARATOR: char = '\t';
const FIXED_SUFFIX: &str = "_fixed.csv";
const BOM: char = '\u{feff}';

/// Drops every whitespace character except the separator from a header
/// name or line. The export pads its headers with non-breaking spaces.
pub fn strip_whitespace(s: &str) -> String {
    s.chars()
        .filter(|&c| c == SEPARATOR || !c.is_whitespace())
        .collect()
}

/// Cleans the first line of `content`, keeping its line terminator and
/// leaving every following line untouched.
pub fn sanitize_header(content: &str) -> String {
    let content = content.strip_prefix(BOM).unwrap_or(content);
    let (header, rest) = match content.find('\n') {
        Some(end) => content.split_at(end),
        None => (content, ""),
    };

    let (header, cr) = match header.strip_suffix('\r') {
        Some(header) => (header, "\r"),
        None => (header, ""),
    };

    let mut out = strip_whitespace(header);
    out.push_str(cr);
    out.push_str(rest);
    out
}

pub fn fixed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(FIXED_SUFFIX);
    PathBuf::from(name)
}

/// Writes a copy of the export with a usable header next to the original
/// and returns its path.
pub fn sanitize_file(path: &Path) -> Result<PathBuf> {
    let content = std::fs::read_to_string(path)?;
    let fixed = fixed_path(path);

    std::fs::write(&fixed, sanitize_header(&content))?;
    debug!("sanitized header written to {}", fixed.display());

    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_nbsp_and_spaces_but_keeps_tabs() {
        let content = "könyvelés\u{a0}dátuma\t összeg \tösszeg devizaneme\n2014.08.01\t 1 000\tHUF\n";

        assert_eq!(
            sanitize_header(content),
            "könyvelésdátuma\tösszeg\tösszegdevizaneme\n2014.08.01\t 1 000\tHUF\n"
        );
    }

    #[test]
    fn keeps_crlf_terminator() {
        assert_eq!(sanitize_header("a b\tc\r\nx y\r\n"), "ab\tc\r\nx y\r\n");
    }

    #[test]
    fn header_only_file() {
        assert_eq!(sanitize_header("\u{feff}a\u{2003}b\tc"), "ab\tc");
        assert_eq!(sanitize_header(""), "");
    }

    #[test]
    fn writes_suffixed_copy() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("export.csv");
        std::fs::write(&export, "a b\tc\n1 2\t3\n").unwrap();

        let fixed = sanitize_file(&export).unwrap();

        assert_eq!(fixed, dir.path().join("export.csv_fixed.csv"));
        assert_eq!(std::fs::read_to_string(fixed).unwrap(), "ab\tc\n1 2\t3\n");
        assert_eq!(
            std::fs::read_to_string(export).unwrap(),
            "a b\tc\n1 2\t3\n"
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = sanitize_file(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, crate::error::Error::FileError(_)));
    }
}
