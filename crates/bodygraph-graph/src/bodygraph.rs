use crate::{
    Center, Channel, ChannelRecord, CENTER_COUNT, CENTER_GATES, CHANNEL_COUNT, CHANNEL_RECORDS,
};
use bodygraph_core::{BodygraphError, GateNumber, Result, GATE_COUNT};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use tracing::{error, info};

/// The fixed center/channel graph plus gate → center and gate → channel
/// indexes. Only constructible through validation.
#[derive(Debug, Clone)]
pub struct Bodygraph {
    channels: Vec<Channel>,
    gate_centers: [Option<Center>; GATE_COUNT + 1],
    gate_channels: Vec<Vec<usize>>,
}

static STANDARD: OnceCell<Bodygraph> = OnceCell::new();

impl Bodygraph {
    /// The classical bodygraph, validated once per process.
    pub fn standard() -> Result<&'static Bodygraph> {
        STANDARD.get_or_try_init(|| {
            let graph = Bodygraph::from_records(&CHANNEL_RECORDS, &CENTER_GATES);
            match &graph {
                Ok(g) => info!(channels = g.channels.len(), "bodygraph validated"),
                Err(e) => error!(error = %e, "bodygraph failed validation"),
            }
            graph
        })
    }

    pub fn from_records(
        records: &[ChannelRecord],
        center_gates: &[(Center, &[GateNumber])],
    ) -> Result<Self> {
        let integrity = |msg: String| Err(BodygraphError::TableIntegrity(msg));

        if records.len() != CHANNEL_COUNT {
            return integrity(format!(
                "expected {} channel records, found {}",
                CHANNEL_COUNT,
                records.len()
            ));
        }

        let mut gate_centers = [None; GATE_COUNT + 1];
        for (center, gates) in center_gates {
            for &gate in gates.iter() {
                if gate == 0 || gate as usize > GATE_COUNT {
                    return integrity(format!("gate {} on {} out of range", gate, center));
                }
                if let Some(previous) = gate_centers[gate as usize] {
                    return integrity(format!(
                        "gate {} assigned to both {} and {}",
                        gate, previous, center
                    ));
                }
                gate_centers[gate as usize] = Some(*center);
            }
        }

        let mut channels = Vec::with_capacity(records.len());
        let mut gate_channels = vec![Vec::new(); GATE_COUNT + 1];
        let mut seen_pairs = HashSet::new();
        let mut seen_centers = HashSet::new();

        for record in records {
            let channel = Channel::from(record);
            let [a, b] = channel.gates;
            if a == b {
                return integrity(format!("channel {} joins a gate to itself", channel.name));
            }
            if channel.centers[0] == channel.centers[1] {
                return integrity(format!(
                    "channel {} joins {} to itself",
                    channel.name, channel.centers[0]
                ));
            }
            if !seen_pairs.insert(channel.gates) {
                return integrity(format!("channel {} listed twice", channel.name));
            }
            for (gate, center) in channel.gates.iter().zip(channel.centers.iter()) {
                match gate_centers.get(*gate as usize).copied().flatten() {
                    Some(owner) if owner == *center => {}
                    Some(owner) => {
                        return integrity(format!(
                            "channel {} places gate {} on {}, but it belongs to {}",
                            channel.name, gate, center, owner
                        ));
                    }
                    None => {
                        return integrity(format!(
                            "channel {} uses gate {} which has no center",
                            channel.name, gate
                        ));
                    }
                }
            }

            let idx = channels.len();
            gate_channels[a as usize].push(idx);
            gate_channels[b as usize].push(idx);
            seen_centers.extend(channel.centers);
            channels.push(channel);
        }

        if seen_centers.len() != CENTER_COUNT {
            return integrity(format!(
                "channels reach {} distinct centers, expected {}",
                seen_centers.len(),
                CENTER_COUNT
            ));
        }
        if let Some(orphan) = (1..=GATE_COUNT).find(|&g| gate_channels[g].is_empty()) {
            return integrity(format!("gate {} belongs to no channel", orphan));
        }

        Ok(Self {
            channels,
            gate_centers,
            gate_channels,
        })
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn center_of(&self, gate: GateNumber) -> Option<Center> {
        self.gate_centers.get(gate as usize).copied().flatten()
    }

    pub fn channels_for_gate(&self, gate: GateNumber) -> impl Iterator<Item = &Channel> + '_ {
        self.gate_channels
            .get(gate as usize)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.channels[idx])
    }

    pub fn gates_of(&self, center: Center) -> Vec<GateNumber> {
        (1..=GATE_COUNT as GateNumber)
            .filter(|&g| self.center_of(g) == Some(center))
            .collect()
    }
}
