//! `Range` header parsing (RFC 7233, single `bytes` range only).

/// A parsed byte range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position.
    pub start: usize,
    /// Last byte position, `None` for an open-ended range.
    pub end: Option<usize>,
}

impl ByteRange {
    /// Resolve the inclusive end position against the file size.
    #[inline]
    #[must_use]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }
}

/// Outcome of parsing a `Range` header.
#[derive(Debug)]
pub enum RangeOutcome {
    /// Satisfiable range, serve 206.
    Valid(ByteRange),
    /// Range lies outside the file, serve 416.
    NotSatisfiable,
    /// No header, non-bytes unit, or malformed: serve the full file.
    None,
}

/// Parse a `Range` header value against a known file size.
///
/// Accepted forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
/// Multi-range requests are not supported and fall back to a full response.
///
/// # Examples
/// ```
/// use staticd::http::range::{parse_range_header, RangeOutcome};
///
/// assert!(matches!(parse_range_header(Some("bytes=0-99"), 1000), RangeOutcome::Valid(_)));
/// assert!(matches!(parse_range_header(None, 1000), RangeOutcome::None));
/// ```
pub fn parse_range_header(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(header) = range_header else {
        return RangeOutcome::None;
    };

    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeOutcome::None;
    };

    if spec.contains(',') {
        return RangeOutcome::None;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::None;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    // Suffix form: "-500" means the last 500 bytes.
    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<usize>() else {
            return RangeOutcome::None;
        };
        if suffix == 0 || file_size == 0 {
            return RangeOutcome::NotSatisfiable;
        }
        let start = file_size.saturating_sub(suffix);
        return RangeOutcome::Valid(ByteRange {
            start,
            end: Some(file_size.saturating_sub(1)),
        });
    }

    let Ok(start) = start_str.parse::<usize>() else {
        return RangeOutcome::None;
    };
    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let end = if end_str.is_empty() {
        None
    } else {
        let Ok(e) = end_str.parse::<usize>() else {
            return RangeOutcome::None;
        };
        if start > e {
            return RangeOutcome::NotSatisfiable;
        }
        // Clamp to the last byte of the file.
        Some(e.min(file_size - 1))
    };

    RangeOutcome::Valid(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_header() {
        assert!(matches!(parse_range_header(None, 100), RangeOutcome::None));
    }

    #[test]
    fn test_fixed_range() {
        match parse_range_header(Some("bytes=0-9"), 100) {
            RangeOutcome::Valid(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(9));
            }
            _ => panic!("expected Valid"),
        }
    }

    #[test]
    fn test_open_range() {
        match parse_range_header(Some("bytes=50-"), 100) {
            RangeOutcome::Valid(r) => {
                assert_eq!(r.start, 50);
                assert_eq!(r.end, None);
                assert_eq!(r.end_position(100), 99);
            }
            _ => panic!("expected Valid"),
        }
    }

    #[test]
    fn test_suffix_range() {
        match parse_range_header(Some("bytes=-20"), 100) {
            RangeOutcome::Valid(r) => {
                assert_eq!(r.start, 80);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("expected Valid"),
        }
    }

    #[test]
    fn test_end_clamped_to_file_size() {
        match parse_range_header(Some("bytes=10-9999"), 100) {
            RangeOutcome::Valid(r) => {
                assert_eq!(r.start, 10);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("expected Valid"),
        }
    }

    #[test]
    fn test_not_satisfiable() {
        assert!(matches!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeOutcome::NotSatisfiable
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=50-10"), 100),
            RangeOutcome::NotSatisfiable
        ));
    }

    #[test]
    fn test_malformed_falls_back_to_full() {
        assert!(matches!(
            parse_range_header(Some("bytes=a-b"), 100),
            RangeOutcome::None
        ));
        assert!(matches!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::None
        ));
        assert!(matches!(
            parse_range_header(Some("items=0-9"), 100),
            RangeOutcome::None
        ));
    }
}
