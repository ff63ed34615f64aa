//! The 64-gate wheel and the longitude → (gate, line) resolver.

use crate::{normalize_degrees, BodygraphError, GateNumber, LineNumber, Result, FULL_CIRCLE};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const GATE_COUNT: usize = 64;
pub const LINES_PER_GATE: u8 = 6;
pub const GATE_SPAN: f64 = FULL_CIRCLE / GATE_COUNT as f64;
pub const LINE_SPAN: f64 = GATE_SPAN / LINES_PER_GATE as f64;

/// Rotation aligning the start of the gate wheel with the tropical zodiac.
pub const MANDALA_OFFSET: f64 = 1.875;

/// Absorbs float jitter so a value nominally on a boundary lands on the
/// upper side no matter how the caller's arithmetic rounded.
pub const BOUNDARY_EPSILON: f64 = 1e-9;

/// Shifted values at or past this point belong to the first gate.
pub const WRAP_THRESHOLD: f64 = 359.99;

/// Gate order around the wheel, starting at shifted 0°.
pub const GATE_ORDER: [GateNumber; GATE_COUNT] = [
    25, 17, 21, 51, 42, 3, 27, 24, 2, 23, 8, 20, 16, 35, 45, 12, 15, 52, 39, 53, 62, 56, 31, 33,
    7, 4, 29, 59, 40, 64, 47, 6, 46, 18, 48, 57, 32, 50, 28, 44, 1, 43, 14, 34, 9, 5, 26, 11, 10,
    58, 38, 54, 61, 60, 41, 19, 13, 49, 30, 55, 37, 63, 22, 36,
];

/// One gate's half-open arc `[start, end)` in shifted degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateSpan {
    pub gate: GateNumber,
    pub start: f64,
    pub end: f64,
}

impl GateSpan {
    pub fn width(&self) -> f64 {
        let w = self.end - self.start;
        if w < 0.0 {
            w + FULL_CIRCLE
        } else {
            w
        }
    }

    pub fn contains(&self, shifted: f64) -> bool {
        if self.start <= self.end {
            shifted >= self.start && shifted < self.end
        } else {
            shifted >= self.start || shifted < self.end
        }
    }

    /// Offset of `shifted` past the gate start, unwrapping the 360°/0° seam.
    fn offset_of(&self, shifted: f64) -> f64 {
        let offset = shifted - self.start;
        if offset < -GATE_SPAN {
            offset + FULL_CIRCLE
        } else {
            offset
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GateLine {
    pub gate: GateNumber,
    pub line: LineNumber,
}

impl std::fmt::Display for GateLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.gate, self.line)
    }
}

/// Validated, immutable partition of the ecliptic into 64 gates.
#[derive(Debug, Clone)]
pub struct DegreeTable {
    spans: Vec<GateSpan>,
    by_gate: [usize; GATE_COUNT + 1],
}

static STANDARD: OnceCell<DegreeTable> = OnceCell::new();

impl DegreeTable {
    /// The standard wheel, built and validated once per process.
    pub fn standard() -> Result<&'static DegreeTable> {
        STANDARD.get_or_try_init(|| {
            let table = DegreeTable::from_order(&GATE_ORDER);
            match &table {
                Ok(t) => info!(spans = t.spans.len(), "degree table validated"),
                Err(e) => error!(error = %e, "degree table failed validation"),
            }
            table
        })
    }

    /// Lay `order` out as equal-width consecutive spans starting at 0°.
    pub fn from_order(order: &[GateNumber]) -> Result<Self> {
        let spans = order
            .iter()
            .enumerate()
            .map(|(i, &gate)| GateSpan {
                gate,
                start: i as f64 * GATE_SPAN,
                end: (i + 1) as f64 * GATE_SPAN,
            })
            .collect();
        Self::from_spans(spans)
    }

    /// Validate an explicit span list: 64 distinct gates 1..=64, sorted,
    /// contiguous, each `GATE_SPAN` wide, jointly covering 360°.
    pub fn from_spans(spans: Vec<GateSpan>) -> Result<Self> {
        let integrity = |msg: String| Err(BodygraphError::TableIntegrity(msg));

        if spans.len() != GATE_COUNT {
            return integrity(format!(
                "expected {} gate spans, found {}",
                GATE_COUNT,
                spans.len()
            ));
        }

        let mut by_gate = [usize::MAX; GATE_COUNT + 1];
        let mut total = 0.0;
        for (i, span) in spans.iter().enumerate() {
            if !span.start.is_finite() || !span.end.is_finite() {
                return integrity(format!(
                    "gate {} has non-finite bounds [{}, {})",
                    span.gate, span.start, span.end
                ));
            }
            if span.gate == 0 || span.gate as usize > GATE_COUNT {
                return integrity(format!("gate number {} out of range", span.gate));
            }
            if by_gate[span.gate as usize] != usize::MAX {
                return integrity(format!("gate {} appears more than once", span.gate));
            }
            by_gate[span.gate as usize] = i;

            if (span.width() - GATE_SPAN).abs() > BOUNDARY_EPSILON {
                return integrity(format!(
                    "gate {} spans {}°, expected {}°",
                    span.gate,
                    span.width(),
                    GATE_SPAN
                ));
            }
            let next = &spans[(i + 1) % GATE_COUNT];
            if (normalize_degrees(span.end) - normalize_degrees(next.start)).abs()
                > BOUNDARY_EPSILON
            {
                return integrity(format!(
                    "gap or overlap between gate {} (ends {}°) and gate {} (starts {}°)",
                    span.gate, span.end, next.gate, next.start
                ));
            }
            if i > 0 && span.start <= spans[i - 1].start {
                return integrity(format!("gate {} is out of order", span.gate));
            }
            total += span.width();
        }

        if (total - FULL_CIRCLE).abs() > BOUNDARY_EPSILON * GATE_COUNT as f64 {
            return integrity(format!("gate spans cover {}°, expected 360°", total));
        }

        Ok(Self { spans, by_gate })
    }

    pub fn spans(&self) -> &[GateSpan] {
        &self.spans
    }

    pub fn span(&self, gate: GateNumber) -> Option<&GateSpan> {
        let idx = *self.by_gate.get(gate as usize)?;
        self.spans.get(idx)
    }

    /// Resolve a raw ecliptic longitude to its gate and line.
    pub fn resolve(&self, longitude: f64) -> Result<GateLine> {
        if !longitude.is_finite() {
            return Err(BodygraphError::EphemerisUnavailable(format!(
                "cannot resolve non-finite longitude {}",
                longitude
            )));
        }

        let mut shifted = normalize_degrees(longitude + MANDALA_OFFSET);
        if shifted >= WRAP_THRESHOLD {
            shifted = 0.0;
        }

        let span = self.locate(shifted);
        let offset = span.offset_of(shifted);
        let raw_line = ((offset + BOUNDARY_EPSILON) / LINE_SPAN).floor() + 1.0;
        let line = raw_line.clamp(1.0, LINES_PER_GATE as f64) as LineNumber;

        Ok(GateLine {
            gate: span.gate,
            line,
        })
    }

    /// Binary search for the span containing `shifted` (nudged by epsilon).
    fn locate(&self, shifted: f64) -> &GateSpan {
        let key = shifted + BOUNDARY_EPSILON;
        let key = if key >= FULL_CIRCLE { key - FULL_CIRCLE } else { key };
        match self.spans.partition_point(|s| s.start <= key) {
            // before the first start: the last span straddles the seam
            0 => &self.spans[self.spans.len() - 1],
            idx => &self.spans[idx - 1],
        }
    }

    /// Raw longitude at the middle of `gate`.`line`.
    pub fn longitude_for(&self, gate: GateNumber, line: LineNumber) -> Option<f64> {
        if !(1..=LINES_PER_GATE).contains(&line) {
            return None;
        }
        let span = self.span(gate)?;
        let shifted = span.start + (line as f64 - 0.5) * LINE_SPAN;
        Some(normalize_degrees(shifted - MANDALA_OFFSET))
    }
}
