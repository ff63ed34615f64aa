use bodygraph_core::{ActivationSet, BirthData, GateNumber, Result};
use bodygraph_graph::{
    classify, gate_sides, Authority, Bodygraph, Center, Channel, ChartType, DefinitionType,
    GateSide, Profile,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Bumped whenever tables or classification rules change meaning.
pub const CHART_SCHEMA_VERSION: &str = "bodygraph-chart/1";

/// A fully computed chart. Only built from two complete activation sets and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    schema_version: &'static str,
    birth: BirthData,
    design_instant: DateTime<Utc>,
    personality: ActivationSet,
    design: ActivationSet,
    defined_gates: BTreeSet<GateNumber>,
    gate_sides: BTreeMap<GateNumber, GateSide>,
    channels: Vec<Channel>,
    defined_centers: BTreeSet<Center>,
    undefined_centers: Vec<Center>,
    definition_type: DefinitionType,
    #[serde(rename = "type")]
    chart_type: ChartType,
    strategy: &'static str,
    authority: Authority,
    profile: Profile,
}

impl Chart {
    pub fn from_activations(
        graph: &Bodygraph,
        birth: BirthData,
        design_instant: DateTime<Utc>,
        personality: ActivationSet,
        design: ActivationSet,
    ) -> Self {
        let definition = graph.define(&personality, &design);
        let classification = classify(&definition);
        let profile = Profile::from_activations(&personality, &design);
        let sides = gate_sides(&personality, &design);
        let undefined_centers = definition.undefined_centers();

        Self {
            schema_version: CHART_SCHEMA_VERSION,
            birth,
            design_instant,
            personality,
            design,
            defined_gates: definition.gates,
            gate_sides: sides,
            channels: definition.channels,
            defined_centers: definition.centers,
            undefined_centers,
            definition_type: definition.definition_type,
            chart_type: classification.chart_type,
            strategy: classification.strategy,
            authority: classification.authority,
            profile,
        }
    }

    pub fn schema_version(&self) -> &'static str {
        self.schema_version
    }

    pub fn birth(&self) -> &BirthData {
        &self.birth
    }

    pub fn design_instant(&self) -> DateTime<Utc> {
        self.design_instant
    }

    pub fn personality(&self) -> &ActivationSet {
        &self.personality
    }

    pub fn design(&self) -> &ActivationSet {
        &self.design
    }

    pub fn defined_gates(&self) -> &BTreeSet<GateNumber> {
        &self.defined_gates
    }

    pub fn gate_side(&self, gate: GateNumber) -> Option<GateSide> {
        self.gate_sides.get(&gate).copied()
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn has_channel(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }

    pub fn defined_centers(&self) -> &BTreeSet<Center> {
        &self.defined_centers
    }

    pub fn undefined_centers(&self) -> &[Center] {
        &self.undefined_centers
    }

    pub fn definition_type(&self) -> DefinitionType {
        self.definition_type
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
