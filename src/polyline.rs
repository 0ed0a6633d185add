//! Encoded polyline codec for route geometries.
//!
//! OSRM returns geometries in the Google polyline format: each vertex is a
//! pair of zig-zag varints (latitude first, then longitude) holding the delta
//! from the previous vertex, scaled by `10^precision`. Decoding happens once,
//! at the provider boundary; everything downstream works with [`Polyline`].

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::model::Point;

/// Precision used by OSRM `geometries=polyline`.
pub const DEFAULT_PRECISION: u32 = 5;

const CHAR_OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
const PAYLOAD: u64 = 0x1f;
const MAX_SHIFT: u32 = 60;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Encodes the points at the given precision.
    pub fn encode(&self, precision: u32) -> String {
        let factor = 10f64.powi(precision as i32);
        let mut out = String::with_capacity(self.points.len() * 8);
        let mut prev_lat = 0i64;
        let mut prev_lng = 0i64;

        for point in &self.points {
            let lat = (point.lat * factor).round() as i64;
            let lng = (point.lng * factor).round() as i64;
            encode_value(lat - prev_lat, &mut out);
            encode_value(lng - prev_lng, &mut out);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }
}

impl From<Vec<Point>> for Polyline {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Decodes an OSRM polyline at precision 5.
pub fn decode(encoded: &str) -> Result<Polyline, DecodeError> {
    decode_with_precision(encoded, DEFAULT_PRECISION)
}

/// Decodes a polyline whose values are scaled by `10^precision`.
pub fn decode_with_precision(encoded: &str, precision: u32) -> Result<Polyline, DecodeError> {
    let bytes = encoded.as_bytes();
    let factor = 10f64.powi(precision as i32);
    let mut points = Vec::new();
    let mut index = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;

    while index < bytes.len() {
        lat = accumulate(lat, bytes, &mut index)?;
        lng = accumulate(lng, bytes, &mut index)?;

        let point = Point::new(lat as f64 / factor, lng as f64 / factor);
        if !point.is_valid() {
            return Err(DecodeError::OutOfRange {
                vertex: points.len(),
            });
        }
        points.push(point);
    }

    Ok(Polyline::new(points))
}

/// Adds the next delta to a running coordinate.
fn accumulate(total: i64, bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let start = *index;
    let delta = read_value(bytes, index)?;
    total
        .checked_add(delta)
        .ok_or(DecodeError::Overflow { position: start })
}

fn read_value(bytes: &[u8], index: &mut usize) -> Result<i64, DecodeError> {
    let start = *index;
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(*index) else {
            return Err(DecodeError::Truncated { position: *index });
        };
        if !(CHAR_OFFSET..=CHAR_OFFSET + 63).contains(&byte) {
            return Err(DecodeError::InvalidByte {
                position: *index,
                byte,
            });
        }
        if shift > MAX_SHIFT {
            return Err(DecodeError::Overflow { position: start });
        }
        let group = u64::from(byte - CHAR_OFFSET);
        // The last group may only fill the top four bits.
        if shift == MAX_SHIFT && group & PAYLOAD > 0xf {
            return Err(DecodeError::Overflow { position: start });
        }
        *index += 1;

        result |= (group & PAYLOAD) << shift;
        shift += 5;

        if group & CONTINUATION == 0 {
            break;
        }
    }

    // zig-zag
    let magnitude = (result >> 1) as i64;
    Ok(if result & 1 != 0 { !magnitude } else { magnitude })
}

fn encode_value(value: i64, out: &mut String) {
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;
    while zigzag >= CONTINUATION {
        out.push(char::from((CONTINUATION | (zigzag & PAYLOAD)) as u8 + CHAR_OFFSET));
        zigzag >>= 5;
    }
    out.push(char::from(zigzag as u8 + CHAR_OFFSET));
}
