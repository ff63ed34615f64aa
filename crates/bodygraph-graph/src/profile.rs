use bodygraph_core::{ActivationSet, LineNumber};
use serde::{Serialize, Serializer};
use std::fmt;

/// Personality Sun line over Design Sun line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Profile {
    pub personality_line: LineNumber,
    pub design_line: LineNumber,
}

pub fn line_name(line: LineNumber) -> Option<&'static str> {
    match line {
        1 => Some("Investigator"),
        2 => Some("Hermit"),
        3 => Some("Martyr"),
        4 => Some("Opportunist"),
        5 => Some("Heretic"),
        6 => Some("Role Model"),
        _ => None,
    }
}

impl Profile {
    pub fn new(personality_line: LineNumber, design_line: LineNumber) -> Self {
        Self {
            personality_line,
            design_line,
        }
    }

    pub fn from_activations(personality: &ActivationSet, design: &ActivationSet) -> Self {
        Self::new(personality.sun().line, design.sun().line)
    }

    /// e.g. "Martyr / Heretic"
    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            line_name(self.personality_line).unwrap_or("?"),
            line_name(self.design_line).unwrap_or("?")
        )
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.personality_line, self.design_line)
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
