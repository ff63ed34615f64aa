use crate::{Bodygraph, Center, Channel};
use bodygraph_core::{ActivationSet, GateNumber};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tracing::debug;

/// Connectivity pattern of the defined part of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefinitionType {
    None,
    Single,
    Split,
    TripleSplit,
    QuadrupleSplit,
}

impl DefinitionType {
    pub fn from_component_count(components: usize) -> Self {
        match components {
            0 => DefinitionType::None,
            1 => DefinitionType::Single,
            2 => DefinitionType::Split,
            3 => DefinitionType::TripleSplit,
            _ => DefinitionType::QuadrupleSplit,
        }
    }
}

impl std::fmt::Display for DefinitionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DefinitionType::None => "none",
            DefinitionType::Single => "single",
            DefinitionType::Split => "split",
            DefinitionType::TripleSplit => "triple-split",
            DefinitionType::QuadrupleSplit => "quadruple-split",
        };
        f.write_str(s)
    }
}

/// Which activation set(s) a defined gate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateSide {
    Personality,
    Design,
    Both,
}

/// Distinct gates activated by either set.
pub fn defined_gates(
    personality: &ActivationSet,
    design: &ActivationSet,
) -> BTreeSet<GateNumber> {
    personality.gates().chain(design.gates()).collect()
}

pub fn gate_sides(
    personality: &ActivationSet,
    design: &ActivationSet,
) -> BTreeMap<GateNumber, GateSide> {
    let p: BTreeSet<_> = personality.gates().collect();
    let d: BTreeSet<_> = design.gates().collect();
    p.union(&d)
        .map(|&gate| {
            let side = match (p.contains(&gate), d.contains(&gate)) {
                (true, true) => GateSide::Both,
                (true, false) => GateSide::Personality,
                _ => GateSide::Design,
            };
            (gate, side)
        })
        .collect()
}

/// Centers that terminate at least one of `channels`.
pub fn defined_centers<'a, I>(channels: I) -> BTreeSet<Center>
where
    I: IntoIterator<Item = &'a Channel>,
{
    channels.into_iter().flat_map(|c| c.centers).collect()
}

/// Connected components of the subgraph induced on `centers` by `channels`.
pub fn connected_components<'a, I>(
    channels: I,
    centers: &BTreeSet<Center>,
) -> Vec<BTreeSet<Center>>
where
    I: IntoIterator<Item = &'a Channel>,
{
    let mut adjacency: BTreeMap<Center, Vec<Center>> = BTreeMap::new();
    for channel in channels {
        let [a, b] = channel.centers;
        if centers.contains(&a) && centers.contains(&b) {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }
    }

    let mut visited = HashSet::new();
    let mut components = Vec::new();
    for &start in centers {
        if !visited.insert(start) {
            continue;
        }
        let mut component = BTreeSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            component.insert(current);
            for &neighbor in adjacency.get(&current).into_iter().flatten() {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }

    components
}

pub fn definition_type<'a, I>(channels: I, centers: &BTreeSet<Center>) -> DefinitionType
where
    I: IntoIterator<Item = &'a Channel>,
{
    if centers.is_empty() {
        return DefinitionType::None;
    }
    DefinitionType::from_component_count(connected_components(channels, centers).len())
}

/// Everything the classification rules need to know about a chart's wiring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub gates: BTreeSet<GateNumber>,
    pub channels: Vec<Channel>,
    pub centers: BTreeSet<Center>,
    pub components: Vec<BTreeSet<Center>>,
    pub definition_type: DefinitionType,
}

impl Definition {
    pub fn is_defined(&self, center: Center) -> bool {
        self.centers.contains(&center)
    }

    /// Whether `a` and `b` are joined by a path of defined channels.
    pub fn connected(&self, a: Center, b: Center) -> bool {
        self.components
            .iter()
            .any(|component| component.contains(&a) && component.contains(&b))
    }

    pub fn motor_connected_to_throat(&self) -> bool {
        Center::ALL
            .into_iter()
            .filter(|c| c.is_motor())
            .any(|motor| self.connected(motor, Center::Throat))
    }

    pub fn undefined_centers(&self) -> Vec<Center> {
        Center::ALL
            .into_iter()
            .filter(|c| !self.centers.contains(c))
            .collect()
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }
}

impl Bodygraph {
    /// Channels whose two gates are both in `gates`, regardless of which
    /// activation set supplied each gate.
    pub fn defined_channels(&self, gates: &BTreeSet<GateNumber>) -> Vec<&Channel> {
        self.channels()
            .iter()
            .filter(|c| c.gates.iter().all(|g| gates.contains(g)))
            .collect()
    }

    pub fn define_gates(&self, gates: BTreeSet<GateNumber>) -> Definition {
        let channels: Vec<Channel> =
            self.defined_channels(&gates).into_iter().cloned().collect();
        let centers = defined_centers(&channels);
        let components = connected_components(&channels, &centers);
        let definition_type = if centers.is_empty() {
            DefinitionType::None
        } else {
            DefinitionType::from_component_count(components.len())
        };
        debug!(
            gates = gates.len(),
            channels = channels.len(),
            centers = centers.len(),
            %definition_type,
            "definition computed"
        );

        Definition {
            gates,
            channels,
            centers,
            components,
            definition_type,
        }
    }

    pub fn define(&self, personality: &ActivationSet, design: &ActivationSet) -> Definition {
        self.define_gates(defined_gates(personality, design))
    }
}
