use crate::{
    Activation, ActivationSet, Celestial, CelestialLongitudes, DegreeTable, Result,
    CELESTIAL_COUNT,
};

/// Applies the resolver to every tracked key. Earth must already be placed
/// opposite the Sun in the input; no astronomy happens here.
#[derive(Debug, Clone, Copy)]
pub struct ActivationBuilder<'t> {
    table: &'t DegreeTable,
}

impl<'t> ActivationBuilder<'t> {
    pub fn new(table: &'t DegreeTable) -> Self {
        Self { table }
    }

    pub fn build(&self, longitudes: &CelestialLongitudes) -> Result<ActivationSet> {
        let mut activations = [Activation {
            celestial: Celestial::Sun,
            gate: 0,
            line: 0,
            raw_degree: 0.0,
        }; CELESTIAL_COUNT];

        for (celestial, raw_degree) in longitudes.iter() {
            let gl = self.table.resolve(raw_degree)?;
            activations[celestial.index()] = Activation {
                celestial,
                gate: gl.gate,
                line: gl.line,
                raw_degree,
            };
        }

        Ok(ActivationSet::from_array(activations))
    }
}
