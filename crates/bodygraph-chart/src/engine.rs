use crate::{Chart, DesignInstantSolver};
use bodygraph_core::{
    ActivationBuilder, BirthData, BodygraphError, CelestialLongitudes, DegreeTable, EngineConfig,
    Ephemeris, Result, Validate,
};
use bodygraph_graph::Bodygraph;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Orchestrates one chart request over the ephemeris collaborator.
///
/// Construction validates the reference tables; an engine that exists is
/// safe to share across concurrent requests.
pub struct ChartEngine {
    ephemeris: Arc<dyn Ephemeris>,
    config: EngineConfig,
    table: &'static DegreeTable,
    graph: &'static Bodygraph,
}

impl ChartEngine {
    pub fn new(ephemeris: Arc<dyn Ephemeris>, config: EngineConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| BodygraphError::Config(e.to_string()))?;
        let table = DegreeTable::standard()?;
        let graph = Bodygraph::standard()?;
        Ok(Self {
            ephemeris,
            config,
            table,
            graph,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn compute(&self, birth: &BirthData, cancel: &CancellationToken) -> Result<Chart> {
        birth.validate()?;
        if cancel.is_cancelled() {
            return Err(BodygraphError::Cancelled);
        }

        let location = Some(birth.location());
        let ephemeris = self.ephemeris.as_ref();
        let solver =
            DesignInstantSolver::new(ephemeris, &self.config.solver).with_location(location);

        let personality = ephemeris.longitudes(birth.utc, location);
        let design = async {
            // Natal Sun for the same location as the personality fetch
            let natal_sun = ephemeris.sun_longitude(birth.utc, location).await?;
            let solution = solver.solve(birth.utc, natal_sun, cancel).await?;
            let bodies = ephemeris.longitudes(solution.instant, location).await?;
            Ok::<_, BodygraphError>((solution, bodies))
        };

        let (personality, (solution, design)) = match tokio::try_join!(personality, design) {
            Ok(both) => both,
            Err(e) => {
                warn!(error = %e, "chart computation aborted");
                return Err(e);
            }
        };

        let personality = CelestialLongitudes::from_bodies(&personality)?;
        let design = CelestialLongitudes::from_bodies(&design)?;
        self.assemble(birth, solution.instant, &personality, &design)
    }

    /// Build a chart from longitudes already in hand; no collaborator calls.
    pub fn assemble(
        &self,
        birth: &BirthData,
        design_instant: DateTime<Utc>,
        personality: &CelestialLongitudes,
        design: &CelestialLongitudes,
    ) -> Result<Chart> {
        let builder = ActivationBuilder::new(self.table);
        let personality = builder.build(personality)?;
        let design = builder.build(design)?;

        let chart = Chart::from_activations(
            self.graph,
            birth.clone(),
            design_instant,
            personality,
            design,
        );
        info!(
            chart_type = %chart.chart_type(),
            authority = %chart.authority(),
            profile = %chart.profile(),
            definition = %chart.definition_type(),
            "chart computed"
        );
        Ok(chart)
    }
}
