use tracing::debug;

use crate::segment::{Segment, SegmentError};

/// Query-string key carrying a shared custom route.
pub const MULTI_ROUTE_PARAM: &str = "multiRoute";

#[derive(Debug, Clone, PartialEq)]
pub enum RouteParseError {
    MissingColon { chunk: String },
    MissingRange { chunk: String },
    Segment { chunk: String, source: SegmentError },
}

impl std::fmt::Display for RouteParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteParseError::MissingColon { chunk } => {
                write!(f, "{chunk:?}: expected ROUTE:min-max")
            }
            RouteParseError::MissingRange { chunk } => {
                write!(f, "{chunk:?}: expected a min-max milepost range")
            }
            RouteParseError::Segment { chunk, source } => write!(f, "{chunk:?}: {source}"),
        }
    }
}

impl std::error::Error for RouteParseError {}

/// Parses a decoded `multiRoute` value (`84P:10-20,15P:5-1`).
///
/// Malformed chunks are skipped; use [`parse_multi_route_report`] to see why.
pub fn parse_multi_route(param: &str) -> Vec<Segment> {
    parse_multi_route_report(param).0
}

/// Parses a `multiRoute` value, returning the valid segments in order and a
/// diagnostic for every skipped chunk.
pub fn parse_multi_route_report(param: &str) -> (Vec<Segment>, Vec<RouteParseError>) {
    let mut segments = Vec::new();
    let mut errors = Vec::new();

    for chunk in param.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        match parse_chunk(chunk) {
            Ok(seg) => segments.push(seg),
            Err(err) => {
                debug!(%err, "skipping multiRoute chunk");
                errors.push(err);
            }
        }
    }

    (segments, errors)
}

fn parse_chunk(chunk: &str) -> Result<Segment, RouteParseError> {
    let (name, range) = chunk
        .split_once(':')
        .ok_or_else(|| RouteParseError::MissingColon {
            chunk: chunk.to_string(),
        })?;
    let (min, max) = split_range(range).ok_or_else(|| RouteParseError::MissingRange {
        chunk: chunk.to_string(),
    })?;
    Segment::parse(name, min, max).map_err(|source| RouteParseError::Segment {
        chunk: chunk.to_string(),
        source,
    })
}

/// Splits `min-max` at the first `-` that is not a leading sign, so negative
/// bounds (`-2-5`, `5--2`) survive.
fn split_range(range: &str) -> Option<(&str, &str)> {
    let range = range.trim();
    let (idx, _) = range.char_indices().skip(1).find(|&(_, c)| c == '-')?;
    Some((&range[..idx], &range[idx + 1..]))
}

/// Inverse of [`parse_multi_route`].
pub fn serialize_multi_route(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| format!("{}:{}-{}", s.route, s.mp_min, s.mp_max))
        .collect::<Vec<_>>()
        .join(",")
}
