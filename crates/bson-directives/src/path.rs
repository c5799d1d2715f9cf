//! Structural paths — the comma-joined integer keys protoc assigns to every
//! element of a descriptor (`SourceCodeInfo.Location.path`).
//!
//! - `4,0`       first top-level message (`FileDescriptorProto.message_type`)
//! - `4,0,2,1`   its second field (`DescriptorProto.field`)
//! - `4,0,3,2`   its third nested message (`DescriptorProto.nested_type`)

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// `FileDescriptorProto.message_type` field number.
pub const MESSAGE_TYPE_PATH: i32 = 4;
/// `DescriptorProto.nested_type` field number.
pub const NESTED_TYPE_PATH: i32 = 3;
/// `DescriptorProto.field` field number.
pub const MESSAGE_FIELD_PATH: i32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("structural path is empty")]
    Empty,
    #[error("empty segment at position {0}")]
    EmptySegment(usize),
    #[error("invalid segment {segment:?} at position {position}")]
    InvalidSegment { position: usize, segment: String },
    #[error("index {0} does not fit in a path segment")]
    IndexOverflow(usize),
}

/// Owned structural path. Displays as the comment index key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructuralPath {
    segments: Vec<i32>,
}

impl StructuralPath {
    pub fn from_segments(segments: &[i32]) -> Self {
        Self {
            segments: segments.to_vec(),
        }
    }

    /// Path of the `index`-th top-level message of a file.
    pub fn message(index: usize) -> Result<Self, PathError> {
        Ok(Self {
            segments: vec![MESSAGE_TYPE_PATH, index_segment(index)?],
        })
    }

    /// Path of the `index`-th message nested inside this one.
    pub fn nested(&self, index: usize) -> Result<Self, PathError> {
        self.child(NESTED_TYPE_PATH, index)
    }

    /// Path of the field at position `index` in this message's field list.
    pub fn field(&self, index: usize) -> Result<Self, PathError> {
        self.child(MESSAGE_FIELD_PATH, index)
    }

    fn child(&self, kind: i32, index: usize) -> Result<Self, PathError> {
        let mut segments = Vec::with_capacity(self.segments.len() + 2);
        segments.extend_from_slice(&self.segments);
        segments.push(kind);
        segments.push(index_segment(index)?);
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[i32] {
        &self.segments
    }

    /// Segment-wise prefix test (`4,1` is not a prefix of `4,10`).
    pub fn starts_with(&self, prefix: &StructuralPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for StructuralPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_path(&self.segments))
    }
}

impl FromStr for StructuralPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let segments = s
            .split(',')
            .enumerate()
            .map(|(position, raw)| {
                let raw = raw.trim();
                if raw.is_empty() {
                    return Err(PathError::EmptySegment(position));
                }
                raw.parse::<i32>().map_err(|_| PathError::InvalidSegment {
                    position,
                    segment: raw.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }
}

// Location paths are int32 on the wire
fn index_segment(index: usize) -> Result<i32, PathError> {
    i32::try_from(index).map_err(|_| PathError::IndexOverflow(index))
}

/// Join raw location path segments into an index key.
pub fn join_path(segments: &[i32]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Field path for the field at position `field` of the message at
/// `message_path`. Must stay byte-identical to the compiler's keys.
pub fn field_path(message_path: &str, field: usize) -> String {
    format!("{},{},{}", message_path, MESSAGE_FIELD_PATH, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_and_children() {
        let msg = StructuralPath::message(0).unwrap();
        assert_eq!(msg.to_string(), "4,0");
        assert_eq!(msg.field(1).unwrap().to_string(), "4,0,2,1");
        assert_eq!(msg.nested(2).unwrap().to_string(), "4,0,3,2");
        assert_eq!(
            msg.nested(2).unwrap().field(0).unwrap().to_string(),
            "4,0,3,2,2,0"
        );
    }

    #[test]
    fn field_path_matches_field_child() {
        let msg = StructuralPath::message(3).unwrap();
        assert_eq!(
            field_path(&msg.to_string(), 5),
            msg.field(5).unwrap().to_string()
        );
    }

    #[test]
    fn parse_round_trips_display() {
        let path: StructuralPath = "4, 1,3,0".parse().unwrap();
        assert_eq!(path.segments(), &[4, 1, 3, 0]);
        assert_eq!(path.to_string(), "4,1,3,0");
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<StructuralPath>(), Err(PathError::Empty));
        assert_eq!(
            "4,,1".parse::<StructuralPath>(),
            Err(PathError::EmptySegment(1))
        );
        assert_eq!(
            "4,x".parse::<StructuralPath>(),
            Err(PathError::InvalidSegment {
                position: 1,
                segment: "x".to_string()
            })
        );
    }

    #[test]
    fn prefix_is_segment_wise() {
        let parent = StructuralPath::message(1).unwrap();
        assert!(parent.nested(0).unwrap().starts_with(&parent));
        assert!(parent.starts_with(&parent));
        assert!(!StructuralPath::message(10).unwrap().starts_with(&parent));
    }

    #[test]
    fn oversized_index_is_rejected() {
        let too_big = i32::MAX as usize + 1;
        assert_eq!(
            StructuralPath::message(too_big),
            Err(PathError::IndexOverflow(too_big))
        );
        let msg = StructuralPath::message(i32::MAX as usize).unwrap();
        assert_eq!(msg.to_string(), format!("4,{}", i32::MAX));
        assert_eq!(msg.field(too_big), Err(PathError::IndexOverflow(too_big)));
        assert_eq!(msg.nested(too_big), Err(PathError::IndexOverflow(too_big)));
    }
}
