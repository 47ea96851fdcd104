// loganon/src/utils/input.rs
//! Line reading for the anonymizer.
//!
//! Lines are read as raw bytes so that input which is not valid UTF-8 still
//! reaches the processor (which passes such lines through unchanged).

use std::io::{self, BufRead};

/// Splits `reader` into lines without their terminators. Both `\n` and
/// `\r\n` endings are accepted; a final line without a terminator is still
/// yielded.
pub fn read_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<Vec<u8>>> {
    reader.split(b'\n').map(|line| {
        line.map(|mut bytes| {
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            bytes
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> Vec<Vec<u8>> {
        read_lines(Cursor::new(input.to_vec()))
            .collect::<io::Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_mixed_line_endings() {
        let lines = collect(b"one\r\ntwo\nthree");
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec(), b"three".to_vec()]);
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let lines = collect(b"a\n\nb\n");
        assert_eq!(lines, vec![b"a".to_vec(), Vec::new(), b"b".to_vec()]);
    }

    #[test]
    fn test_invalid_utf8_is_preserved() {
        let lines = collect(b"ok\n\xff\xfe\n");
        assert_eq!(lines[1], vec![0xff, 0xfe]);
    }

    #[test]
    fn test_empty_input_has_no_lines() {
        assert!(collect(b"").is_empty());
    }
}
