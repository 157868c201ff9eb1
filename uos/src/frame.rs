//! QR byte-mode framing as emitted by the signing device.
//!
//! A scanned code is a hex string of the form
//! `'4' <length prefix> <payload> '0' <filler>`:
//! - `'4'` is the binary-mode indicator,
//! - the length prefix is one or two bytes (big-endian) and counts payload bytes,
//! - `'0'` is the terminator,
//! - the filler is `ec11` repeated, optionally closed by a single `ec`.

use crate::error::FrameError;

pub const BINARY_INDICATOR: char = '4';
pub const TERMINATOR: char = '0';

const FILLER_TAIL: &str = "ec";
const FILLER_REPEAT: &str = "ec11";

/// Recovers the payload bytes from a raw scan.
///
/// Returns `None` when the scan is not a recognised encoding: wrong indicator or
/// terminator, a length prefix that does not match the body, or non-hex digits.
/// Callers treat this as an unreadable scan and ask for a rescan.
pub fn strip(raw: &str) -> Option<Vec<u8>> {
    if raw.is_empty() {
        return None;
    }

    let lowered = raw.to_ascii_lowercase();
    let mut body = lowered.as_str();
    if let Some(rest) = body.strip_suffix(FILLER_TAIL) {
        body = rest;
    }
    while let Some(rest) = body.strip_suffix(FILLER_REPEAT) {
        body = rest;
    }

    let Some(body) = body
        .strip_prefix(BINARY_INDICATOR)
        .and_then(|rest| rest.strip_suffix(TERMINATOR))
    else {
        tracing::debug!(len = raw.len(), "scan lacks binary indicator or terminator");
        return None;
    };

    let data = if read_length(body, 1).is_some_and(|len| len * 2 + 2 == body.len()) {
        &body[2..]
    } else if read_length(body, 2).is_some_and(|len| len * 2 + 4 == body.len()) {
        &body[4..]
    } else {
        tracing::debug!(len = body.len(), "scan length prefix does not match body");
        return None;
    };

    match hex::decode(data) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            tracing::debug!(%err, "scan body is not hex");
            None
        }
    }
}

/// Encodes `payload` the way the device does, padding with filler up to
/// `padded_len` hex characters when given.
pub fn encode(payload: &[u8], padded_len: Option<usize>) -> Result<String, FrameError> {
    let len =
        u16::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge(payload.len()))?;

    let mut out = String::with_capacity(payload.len() * 2 + 6);
    out.push(BINARY_INDICATOR);
    match u8::try_from(len) {
        Ok(short) => out.push_str(&hex::encode([short])),
        Err(_) => out.push_str(&hex::encode(len.to_be_bytes())),
    }
    out.push_str(&hex::encode(payload));
    out.push(TERMINATOR);

    if let Some(target) = padded_len {
        while out.len() + FILLER_REPEAT.len() <= target {
            out.push_str(FILLER_REPEAT);
        }
        if out.len() + FILLER_TAIL.len() <= target {
            out.push_str(FILLER_TAIL);
        }
    }
    Ok(out)
}

/// Reads a big-endian length of `width` bytes from the front of `body`.
fn read_length(body: &str, width: usize) -> Option<usize> {
    let prefix = hex::decode(body.get(..width * 2)?).ok()?;
    Some(
        prefix
            .iter()
            .fold(0usize, |acc, byte| (acc << 8) | usize::from(*byte)),
    )
}
