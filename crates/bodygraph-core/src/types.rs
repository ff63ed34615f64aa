use crate::{normalize_degrees, BodygraphError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type GateNumber = u8;
pub type LineNumber = u8;

pub const CELESTIAL_COUNT: usize = 13;

/// The thirteen tracked points, in bodygraph display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Celestial {
    Sun,
    Earth,
    Moon,
    NorthNode,
    SouthNode,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Celestial {
    pub const ALL: [Celestial; CELESTIAL_COUNT] = [
        Celestial::Sun,
        Celestial::Earth,
        Celestial::Moon,
        Celestial::NorthNode,
        Celestial::SouthNode,
        Celestial::Mercury,
        Celestial::Venus,
        Celestial::Mars,
        Celestial::Jupiter,
        Celestial::Saturn,
        Celestial::Uranus,
        Celestial::Neptune,
        Celestial::Pluto,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Celestial::Sun => "sun",
            Celestial::Earth => "earth",
            Celestial::Moon => "moon",
            Celestial::NorthNode => "north_node",
            Celestial::SouthNode => "south_node",
            Celestial::Mercury => "mercury",
            Celestial::Venus => "venus",
            Celestial::Mars => "mars",
            Celestial::Jupiter => "jupiter",
            Celestial::Saturn => "saturn",
            Celestial::Uranus => "uranus",
            Celestial::Neptune => "neptune",
            Celestial::Pluto => "pluto",
        }
    }
}

impl fmt::Display for Celestial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Celestial {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Celestial::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown celestial key: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Ecliptic longitudes as reported by an ephemeris provider for one instant.
///
/// Earth is not part of this set; it is derived from the Sun by
/// [`CelestialLongitudes::from_bodies`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyLongitudes {
    pub sun: f64,
    pub moon: f64,
    pub mercury: f64,
    pub venus: f64,
    pub mars: f64,
    pub jupiter: f64,
    pub saturn: f64,
    pub uranus: f64,
    pub neptune: f64,
    pub pluto: f64,
    pub north_node: f64,
    pub south_node: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chiron: Option<f64>,
}

impl BodyLongitudes {
    fn named(&self) -> [(&'static str, f64); 12] {
        [
            ("sun", self.sun),
            ("moon", self.moon),
            ("mercury", self.mercury),
            ("venus", self.venus),
            ("mars", self.mars),
            ("jupiter", self.jupiter),
            ("saturn", self.saturn),
            ("uranus", self.uranus),
            ("neptune", self.neptune),
            ("pluto", self.pluto),
            ("north_node", self.north_node),
            ("south_node", self.south_node),
        ]
    }
}

/// One longitude per tracked celestial key, Earth included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CelestialLongitudes {
    values: [f64; CELESTIAL_COUNT],
}

impl CelestialLongitudes {
    pub fn from_fn(mut f: impl FnMut(Celestial) -> f64) -> Self {
        let mut values = [0.0; CELESTIAL_COUNT];
        for key in Celestial::ALL {
            values[key.index()] = f(key);
        }
        Self { values }
    }

    /// Lift provider output into the 13-key set, placing Earth opposite the Sun.
    pub fn from_bodies(bodies: &BodyLongitudes) -> Result<Self> {
        if let Some((name, value)) = bodies.named().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(BodygraphError::EphemerisUnavailable(format!(
                "non-finite longitude for {}: {}",
                name, value
            )));
        }

        Ok(Self::from_fn(|key| match key {
            Celestial::Sun => bodies.sun,
            Celestial::Earth => normalize_degrees(bodies.sun + 180.0),
            Celestial::Moon => bodies.moon,
            Celestial::NorthNode => bodies.north_node,
            Celestial::SouthNode => bodies.south_node,
            Celestial::Mercury => bodies.mercury,
            Celestial::Venus => bodies.venus,
            Celestial::Mars => bodies.mars,
            Celestial::Jupiter => bodies.jupiter,
            Celestial::Saturn => bodies.saturn,
            Celestial::Uranus => bodies.uranus,
            Celestial::Neptune => bodies.neptune,
            Celestial::Pluto => bodies.pluto,
        }))
    }

    pub fn get(&self, key: Celestial) -> f64 {
        self.values[key.index()]
    }

    pub fn with(mut self, key: Celestial, longitude: f64) -> Self {
        self.values[key.index()] = longitude;
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Celestial, f64)> + '_ {
        Celestial::ALL.into_iter().map(move |k| (k, self.values[k.index()]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub celestial: Celestial,
    pub gate: GateNumber,
    pub line: LineNumber,
    pub raw_degree: f64,
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}.{}", self.celestial, self.gate, self.line)
    }
}

/// Exactly one activation per celestial key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivationSet {
    activations: [Activation; CELESTIAL_COUNT],
}

impl ActivationSet {
    pub(crate) fn from_array(activations: [Activation; CELESTIAL_COUNT]) -> Self {
        Self { activations }
    }

    pub fn get(&self, key: Celestial) -> &Activation {
        &self.activations[key.index()]
    }

    pub fn sun(&self) -> &Activation {
        self.get(Celestial::Sun)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Activation> {
        self.activations.iter()
    }

    pub fn gates(&self) -> impl Iterator<Item = GateNumber> + '_ {
        self.activations.iter().map(|a| a.gate)
    }

    pub fn len(&self) -> usize {
        self.activations.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
