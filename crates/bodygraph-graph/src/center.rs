use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CENTER_COUNT: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    Sacral,
    SolarPlexus,
    Spleen,
    Root,
}

impl Center {
    pub const ALL: [Center; CENTER_COUNT] = [
        Center::Head,
        Center::Ajna,
        Center::Throat,
        Center::G,
        Center::Heart,
        Center::Sacral,
        Center::SolarPlexus,
        Center::Spleen,
        Center::Root,
    ];

    /// Pressure and energy sources: Heart, Solar Plexus, Root, Sacral.
    pub fn is_motor(self) -> bool {
        matches!(
            self,
            Center::Heart | Center::SolarPlexus | Center::Root | Center::Sacral
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Center::Head => "head",
            Center::Ajna => "ajna",
            Center::Throat => "throat",
            Center::G => "g",
            Center::Heart => "heart",
            Center::Sacral => "sacral",
            Center::SolarPlexus => "solar_plexus",
            Center::Spleen => "spleen",
            Center::Root => "root",
        }
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Center::Head => "Head",
            Center::Ajna => "Ajna",
            Center::Throat => "Throat",
            Center::G => "G",
            Center::Heart => "Heart",
            Center::Sacral => "Sacral",
            Center::SolarPlexus => "Solar Plexus",
            Center::Spleen => "Spleen",
            Center::Root => "Root",
        };
        f.write_str(s)
    }
}

impl FromStr for Center {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "head" => Ok(Center::Head),
            "ajna" => Ok(Center::Ajna),
            "throat" => Ok(Center::Throat),
            "g" | "g_center" | "self" => Ok(Center::G),
            "heart" | "ego" => Ok(Center::Heart),
            "sacral" => Ok(Center::Sacral),
            "solar_plexus" | "emotional" => Ok(Center::SolarPlexus),
            "spleen" | "splenic" => Ok(Center::Spleen),
            "root" => Ok(Center::Root),
            other => Err(format!("unknown center: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motors_are_the_four_energy_centers() {
        let motors: Vec<_> = Center::ALL.into_iter().filter(|c| c.is_motor()).collect();
        assert_eq!(
            motors,
            vec![Center::Heart, Center::Sacral, Center::SolarPlexus, Center::Root]
        );
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("Solar Plexus".parse::<Center>().unwrap(), Center::SolarPlexus);
        assert_eq!("ego".parse::<Center>().unwrap(), Center::Heart);
        assert!("liver".parse::<Center>().is_err());
    }
}
