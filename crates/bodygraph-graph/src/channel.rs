use crate::Center;
use crate::Center::*;
use bodygraph_core::GateNumber;
use serde::{Deserialize, Serialize};

pub const CHANNEL_COUNT: usize = 36;

/// Static source row for one channel.
#[derive(Debug, Clone, Copy)]
pub struct ChannelRecord {
    pub gates: (GateNumber, GateNumber),
    pub centers: (Center, Center),
    pub label: &'static str,
}

const fn rec(
    a: GateNumber,
    b: GateNumber,
    ca: Center,
    cb: Center,
    label: &'static str,
) -> ChannelRecord {
    ChannelRecord {
        gates: (a, b),
        centers: (ca, cb),
        label,
    }
}

pub const CHANNEL_RECORDS: [ChannelRecord; CHANNEL_COUNT] = [
    rec(1, 8, G, Throat, "Inspiration"),
    rec(2, 14, G, Sacral, "The Beat"),
    rec(3, 60, Sacral, Root, "Mutation"),
    rec(4, 63, Ajna, Head, "Logic"),
    rec(5, 15, Sacral, G, "Rhythm"),
    rec(6, 59, SolarPlexus, Sacral, "Mating"),
    rec(7, 31, G, Throat, "The Alpha"),
    rec(9, 52, Sacral, Root, "Concentration"),
    rec(10, 20, G, Throat, "Awakening"),
    rec(10, 34, G, Sacral, "Exploration"),
    rec(10, 57, G, Spleen, "Perfected Form"),
    rec(11, 56, Ajna, Throat, "Curiosity"),
    rec(12, 22, Throat, SolarPlexus, "Openness"),
    rec(13, 33, G, Throat, "The Prodigal"),
    rec(16, 48, Throat, Spleen, "The Wavelength"),
    rec(17, 62, Ajna, Throat, "Acceptance"),
    rec(18, 58, Spleen, Root, "Judgment"),
    rec(19, 49, Root, SolarPlexus, "Synthesis"),
    rec(20, 34, Throat, Sacral, "Charisma"),
    rec(20, 57, Throat, Spleen, "The Brainwave"),
    rec(21, 45, Heart, Throat, "Money"),
    rec(23, 43, Throat, Ajna, "Structuring"),
    rec(24, 61, Ajna, Head, "Awareness"),
    rec(25, 51, G, Heart, "Initiation"),
    rec(26, 44, Heart, Spleen, "Surrender"),
    rec(27, 50, Sacral, Spleen, "Preservation"),
    rec(28, 38, Spleen, Root, "Struggle"),
    rec(29, 46, Sacral, G, "Discovery"),
    rec(30, 41, SolarPlexus, Root, "Recognition"),
    rec(32, 54, Spleen, Root, "Transformation"),
    rec(34, 57, Sacral, Spleen, "Power"),
    rec(35, 36, Throat, SolarPlexus, "Transitoriness"),
    rec(37, 40, SolarPlexus, Heart, "Community"),
    rec(39, 55, Root, SolarPlexus, "Emoting"),
    rec(42, 53, Sacral, Root, "Maturation"),
    rec(47, 64, Ajna, Head, "Abstraction"),
];

/// Gate membership per center.
pub const CENTER_GATES: [(Center, &[GateNumber]); 9] = [
    (Head, &[64, 61, 63]),
    (Ajna, &[47, 24, 4, 17, 43, 11]),
    (Throat, &[62, 23, 56, 35, 12, 45, 33, 8, 31, 20, 16]),
    (G, &[1, 13, 25, 46, 2, 15, 10, 7]),
    (Heart, &[21, 40, 26, 51]),
    (Sacral, &[5, 14, 29, 59, 9, 3, 42, 27, 34]),
    (SolarPlexus, &[6, 37, 22, 36, 30, 55, 49]),
    (Spleen, &[48, 57, 44, 50, 32, 28, 18]),
    (Root, &[53, 60, 52, 19, 39, 41, 58, 38, 54]),
];

/// A two-gate link between two centers. Gates are stored low-first and the
/// centers follow the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub gates: [GateNumber; 2],
    pub centers: [Center; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Channel {
    pub fn new(a: GateNumber, b: GateNumber, ca: Center, cb: Center) -> Self {
        let (gates, centers) = if a <= b {
            ([a, b], [ca, cb])
        } else {
            ([b, a], [cb, ca])
        };
        Self {
            name: format!("{}-{}", gates[0], gates[1]),
            gates,
            centers,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn has_gate(&self, gate: GateNumber) -> bool {
        self.gates.contains(&gate)
    }

    pub fn touches(&self, center: Center) -> bool {
        self.centers.contains(&center)
    }

    /// The center on the other end, if `center` is one of the endpoints.
    pub fn other_end(&self, center: Center) -> Option<Center> {
        match self.centers {
            [a, b] if a == center => Some(b),
            [a, b] if b == center => Some(a),
            _ => None,
        }
    }
}

impl From<&ChannelRecord> for Channel {
    fn from(r: &ChannelRecord) -> Self {
        Channel::new(r.gates.0, r.gates.1, r.centers.0, r.centers.1).with_label(r.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_normalizes_gate_order() {
        let c = Channel::new(31, 7, Throat, G);
        assert_eq!(c.name, "7-31");
        assert_eq!(c.gates, [7, 31]);
        assert_eq!(c.centers, [G, Throat]);
    }

    #[test]
    fn other_end_walks_the_channel() {
        let c = Channel::from(&CHANNEL_RECORDS[20]);
        assert_eq!(c.name, "21-45");
        assert_eq!(c.other_end(Heart), Some(Throat));
        assert_eq!(c.other_end(Throat), Some(Heart));
        assert_eq!(c.other_end(Root), None);
        assert_eq!(c.label.as_deref(), Some("Money"));
    }
}
