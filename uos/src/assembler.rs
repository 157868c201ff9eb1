//! Multi-frame classification and caller-side reassembly.
//!
//! Every stripped payload begins with a 5 byte frame header:
//! `[reserved: u8][frame_count: u16 BE][current_frame: u16 BE]`.
//! [`assemble`] is stateless; the bookkeeping across scans lives in
//! [`MultipartCollector`], which the scanning session owns.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::convert::encode_u16_be;
use crate::error::FrameError;

pub const FRAME_HEADER_LEN: usize = 5;

/// Highest frame count the format supports.
pub const MAX_FRAME_COUNT: u16 = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FrameHeader {
    pub frame_count: u16,
    pub current_frame: u16,
}

impl FrameHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < FRAME_HEADER_LEN {
            return Err(FrameError::TruncatedHeader(bytes.len()));
        }
        let frame_count = u16::from_be_bytes([bytes[1], bytes[2]]);
        let current_frame = u16::from_be_bytes([bytes[3], bytes[4]]);
        if frame_count > MAX_FRAME_COUNT {
            return Err(FrameError::TooManyFrames(frame_count));
        }
        Ok(Self {
            frame_count,
            current_frame,
        })
    }

    pub fn is_multipart(&self) -> bool {
        self.frame_count > 1
    }

    pub fn to_bytes(&self) -> [u8; FRAME_HEADER_LEN] {
        let count = encode_u16_be(self.frame_count);
        let index = encode_u16_be(self.current_frame);
        [0, count[0], count[1], index[0], index[1]]
    }
}

/// One frame of a multi-frame payload that still needs its siblings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PartialFrame {
    pub frame_count: u16,
    pub current_frame: u16,
    #[serde(serialize_with = "crate::payload::serialize_hex")]
    pub data: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assembly {
    Partial(PartialFrame),
    Complete(Vec<u8>),
}

/// Classifies a stripped payload as a pending frame or a complete body.
///
/// With `multipart_complete` set the caller asserts that `bytes` already holds
/// the reassembled payload, so the header is dropped even when it announces
/// several frames.
pub fn assemble(bytes: &[u8], multipart_complete: bool) -> Result<Assembly, FrameError> {
    let header = FrameHeader::parse(bytes)?;
    let body = bytes[FRAME_HEADER_LEN..].to_vec();

    if header.is_multipart() && !multipart_complete {
        tracing::debug!(
            frame = header.current_frame,
            frame_count = header.frame_count,
            len = body.len(),
            "partial frame"
        );
        return Ok(Assembly::Partial(PartialFrame {
            frame_count: header.frame_count,
            current_frame: header.current_frame,
            data: body,
        }));
    }

    Ok(Assembly::Complete(body))
}

/// Splits `payload` into `frame_count` frames, each behind its own header.
///
/// This mirrors what the device does for payloads that do not fit one QR code.
pub fn split(payload: &[u8], frame_count: u16) -> Result<Vec<Vec<u8>>, FrameError> {
    if frame_count > MAX_FRAME_COUNT {
        return Err(FrameError::TooManyFrames(frame_count));
    }
    let frame_count = frame_count.max(1);
    let chunk_len = payload.len().div_ceil(usize::from(frame_count));
    let frames = (0..frame_count)
        .map(|index| {
            let start = (usize::from(index) * chunk_len).min(payload.len());
            let end = (start + chunk_len).min(payload.len());
            let header = FrameHeader {
                frame_count,
                current_frame: index,
            };
            let mut frame = Vec::with_capacity(FRAME_HEADER_LEN + end - start);
            frame.extend_from_slice(&header.to_bytes());
            frame.extend_from_slice(&payload[start..end]);
            frame
        })
        .collect();
    Ok(frames)
}

/// Frame accumulator for one multi-frame scanning session.
#[derive(Clone, Debug, Default)]
pub struct MultipartCollector {
    expected_count: Option<u16>,
    frames: BTreeMap<u16, Vec<u8>>,
}

impl MultipartCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame. Returns `false` when the index was already seen.
    ///
    /// A rejected frame leaves the collector unchanged.
    pub fn insert(&mut self, frame: PartialFrame) -> Result<bool, FrameError> {
        let expected = self.expected_count.unwrap_or(frame.frame_count);
        if expected <= 1 {
            return Err(FrameError::NotMultipart(expected));
        }
        if expected > MAX_FRAME_COUNT {
            return Err(FrameError::TooManyFrames(expected));
        }
        if frame.frame_count != expected {
            return Err(FrameError::FrameCountMismatch {
                expected,
                actual: frame.frame_count,
            });
        }
        if frame.current_frame >= expected {
            return Err(FrameError::FrameIndexOutOfRange {
                index: frame.current_frame,
                frame_count: expected,
            });
        }
        self.expected_count = Some(expected);
        if self.frames.contains_key(&frame.current_frame) {
            tracing::debug!(frame = frame.current_frame, "duplicate frame ignored");
            return Ok(false);
        }
        self.frames.insert(frame.current_frame, frame.data);
        Ok(true)
    }

    pub fn expected_count(&self) -> Option<u16> {
        self.expected_count
    }

    pub fn received(&self) -> usize {
        self.frames.len()
    }

    pub fn missing(&self) -> Vec<u16> {
        let Some(expected) = self.expected_count else {
            return Vec::new();
        };
        (0..expected)
            .filter(|index| !self.frames.contains_key(index))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.expected_count
            .is_some_and(|expected| self.frames.len() == usize::from(expected))
    }

    /// Concatenates the frames in index order behind a fresh frame header.
    ///
    /// The output is meant for [`crate::Decoder::decode_bytes`] with
    /// `multipart_complete = true`.
    pub fn reassemble(&self) -> Result<Vec<u8>, FrameError> {
        let Some(frame_count) = self.expected_count.filter(|_| self.is_complete()) else {
            return Err(FrameError::Incomplete {
                missing: self.missing().len().max(1),
            });
        };
        let header = FrameHeader {
            frame_count,
            current_frame: 0,
        };
        let body_len: usize = self.frames.values().map(Vec::len).sum();
        let mut out = Vec::with_capacity(FRAME_HEADER_LEN + body_len);
        out.extend_from_slice(&header.to_bytes());
        for data in self.frames.values() {
            out.extend_from_slice(data);
        }
        Ok(out)
    }

    pub fn reset(&mut self) {
        self.expected_count = None;
        self.frames.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(count: u16, index: u16, body: &[u8]) -> Vec<u8> {
        let mut out = FrameHeader {
            frame_count: count,
            current_frame: index,
        }
        .to_bytes()
        .to_vec();
        out.extend_from_slice(body);
        out
    }

    fn partial(count: u16, index: u16, body: &[u8]) -> PartialFrame {
        match assemble(&frame(count, index, body), false).unwrap() {
            Assembly::Partial(partial) => partial,
            Assembly::Complete(_) => panic!("expected a partial frame"),
        }
    }

    #[test]
    fn single_frame_is_complete() {
        let result = assemble(&frame(1, 0, &[0x53, 0x01]), false).unwrap();
        assert_eq!(result, Assembly::Complete(vec![0x53, 0x01]));
    }

    #[test]
    fn zero_frame_count_is_single_frame() {
        let result = assemble(&frame(0, 0, &[0x45]), false).unwrap();
        assert_eq!(result, Assembly::Complete(vec![0x45]));
    }

    #[test]
    fn multipart_frame_is_partial_until_completed() {
        let bytes = frame(3, 1, &[0xaa, 0xbb]);
        assert_eq!(
            assemble(&bytes, false).unwrap(),
            Assembly::Partial(PartialFrame {
                frame_count: 3,
                current_frame: 1,
                data: vec![0xaa, 0xbb],
            })
        );
        assert_eq!(
            assemble(&bytes, true).unwrap(),
            Assembly::Complete(vec![0xaa, 0xbb])
        );
    }

    #[test]
    fn frame_count_ceiling() {
        assert!(assemble(&frame(50, 0, &[]), true).is_ok());
        assert_eq!(
            assemble(&frame(51, 0, &[]), false).unwrap_err(),
            FrameError::TooManyFrames(51)
        );
        assert_eq!(
            assemble(&frame(51, 0, &[]), true).unwrap_err(),
            FrameError::TooManyFrames(51)
        );
    }

    #[test]
    fn truncated_header() {
        assert_eq!(
            assemble(&[0, 0, 1], false).unwrap_err(),
            FrameError::TruncatedHeader(3)
        );
    }

    #[test]
    fn collector_reassembles_in_index_order() {
        let mut collector = MultipartCollector::new();
        assert!(collector.insert(partial(3, 2, &[5, 6])).unwrap());
        assert!(collector.insert(partial(3, 0, &[1, 2])).unwrap());
        assert!(!collector.is_complete());
        assert_eq!(collector.missing(), vec![1]);
        assert!(collector.insert(partial(3, 1, &[3, 4])).unwrap());
        assert!(collector.is_complete());

        let bytes = collector.reassemble().unwrap();
        assert_eq!(bytes, vec![0, 0, 3, 0, 0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(
            assemble(&bytes, true).unwrap(),
            Assembly::Complete(vec![1, 2, 3, 4, 5, 6])
        );
    }

    #[test]
    fn collector_ignores_duplicates() {
        let mut collector = MultipartCollector::new();
        assert!(collector.insert(partial(2, 0, &[1])).unwrap());
        assert!(!collector.insert(partial(2, 0, &[9])).unwrap());
        assert_eq!(collector.received(), 1);
    }

    #[test]
    fn collector_rejects_inconsistent_frames() {
        let mut collector = MultipartCollector::new();
        collector.insert(partial(2, 0, &[1])).unwrap();
        assert_eq!(
            collector.insert(partial(3, 1, &[2])).unwrap_err(),
            FrameError::FrameCountMismatch {
                expected: 2,
                actual: 3
            }
        );
        assert_eq!(
            collector.insert(partial(2, 2, &[2])).unwrap_err(),
            FrameError::FrameIndexOutOfRange {
                index: 2,
                frame_count: 2
            }
        );
    }

    #[test]
    fn split_then_collect_restores_payload() {
        let payload: Vec<u8> = (0..=200).collect();
        let frames = split(&payload, 4).unwrap();
        assert_eq!(frames.len(), 4);

        let mut collector = MultipartCollector::new();
        for frame in frames.into_iter().rev() {
            match assemble(&frame, false).unwrap() {
                Assembly::Partial(partial) => {
                    collector.insert(partial).unwrap();
                }
                Assembly::Complete(_) => panic!("expected a partial frame"),
            }
        }
        let bytes = collector.reassemble().unwrap();
        assert_eq!(assemble(&bytes, true).unwrap(), Assembly::Complete(payload));
    }

    #[test]
    fn split_single_frame_and_ceiling() {
        let frames = split(&[1, 2, 3], 1).unwrap();
        assert_eq!(frames, vec![vec![0, 0, 1, 0, 0, 1, 2, 3]]);
        assert_eq!(split(&[1], 51).unwrap_err(), FrameError::TooManyFrames(51));
    }

    #[test]
    fn rejected_first_frame_leaves_collector_empty() {
        let mut collector = MultipartCollector::new();
        let single = PartialFrame {
            frame_count: 0,
            current_frame: 0,
            data: vec![1],
        };
        assert_eq!(
            collector.insert(single).unwrap_err(),
            FrameError::NotMultipart(0)
        );
        let oversized = PartialFrame {
            frame_count: 99,
            current_frame: 0,
            data: vec![1],
        };
        assert_eq!(
            collector.insert(oversized).unwrap_err(),
            FrameError::TooManyFrames(99)
        );
        let out_of_range = PartialFrame {
            frame_count: 3,
            current_frame: 3,
            data: vec![1],
        };
        assert!(collector.insert(out_of_range).is_err());

        assert_eq!(collector.expected_count(), None);
        assert!(!collector.is_complete());
        assert!(collector.missing().is_empty());
        assert!(collector.reassemble().is_err());

        assert!(collector.insert(partial(2, 1, &[7])).unwrap());
        assert_eq!(collector.expected_count(), Some(2));
        assert_eq!(collector.missing(), vec![0]);
    }

    #[test]
    fn incomplete_collector_cannot_reassemble() {
        let mut collector = MultipartCollector::new();
        assert!(collector.reassemble().is_err());
        collector.insert(partial(4, 0, &[1])).unwrap();
        assert_eq!(
            collector.reassemble().unwrap_err(),
            FrameError::Incomplete { missing: 3 }
        );
        collector.reset();
        assert_eq!(collector.expected_count(), None);
    }
}
