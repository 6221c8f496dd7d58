//! Size-bounded reply body reader.

use tracing::trace;

/// A reply body read through the size ceiling.
#[derive(Debug, Default)]
pub(crate) struct LimitedBody {
    /// At most `limit` bytes of the body.
    pub bytes: Vec<u8>,
    /// Whether the body had more bytes than the ceiling allowed.
    pub truncated: bool,
}

/// Read a reply body, keeping at most `limit` bytes.
///
/// Chunks are pulled until the ceiling is reached; the remainder of the
/// stream is never read. A declared `Content-Length` above the ceiling
/// short-circuits without reading anything.
pub(crate) async fn read_limited(
    response: &mut reqwest::Response,
    limit: usize,
) -> Result<LimitedBody, reqwest::Error> {
    let declared = response.content_length();
    if let Some(len) = declared.filter(|&len| len > limit as u64) {
        trace!(declared = len, limit, "reply body larger than ceiling");
        return Ok(LimitedBody {
            bytes: Vec::new(),
            truncated: true,
        });
    }

    let capacity = declared.map_or(0, |len| len as usize).min(limit);
    let mut bytes = Vec::with_capacity(capacity);

    while let Some(chunk) = response.chunk().await? {
        if push_bounded(&mut bytes, &chunk, limit) {
            trace!(limit, "reply body truncated at ceiling");
            return Ok(LimitedBody {
                bytes,
                truncated: true,
            });
        }
    }

    Ok(LimitedBody {
        bytes,
        truncated: false,
    })
}

/// Append `chunk` to `buf` without letting `buf` grow past `limit`.
///
/// Returns true when part of the chunk had to be dropped.
fn push_bounded(buf: &mut Vec<u8>, chunk: &[u8], limit: usize) -> bool {
    let room = limit.saturating_sub(buf.len());
    if chunk.len() > room {
        buf.extend_from_slice(&chunk[..room]);
        true
    } else {
        buf.extend_from_slice(chunk);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_within_limit() {
        let mut buf = Vec::new();
        assert!(!push_bounded(&mut buf, b"abc", 5));
        assert!(!push_bounded(&mut buf, b"de", 5));
        assert_eq!(buf, b"abcde");
    }

    #[test]
    fn push_over_limit_truncates() {
        let mut buf = b"abc".to_vec();
        assert!(push_bounded(&mut buf, b"defg", 5));
        assert_eq!(buf, b"abcde");
    }

    #[test]
    fn push_when_full() {
        let mut buf = b"abcde".to_vec();
        assert!(push_bounded(&mut buf, b"f", 5));
        assert_eq!(buf, b"abcde");
        // An empty chunk never overflows
        assert!(!push_bounded(&mut buf, b"", 5));
    }
}
