//! Type, strategy and authority as ordered (predicate, outcome) tables.
//!
//! Rules are evaluated top to bottom and the first match wins. Each predicate
//! is a plain function so it can be exercised on its own; the order lives in
//! [`TYPE_RULES`] and [`AUTHORITY_RULES`].

use crate::{Center, Definition};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Manifestor,
    Generator,
    /// Generator whose Throat is reached from a motor through defined channels.
    ManifestingGenerator,
    Projector,
    Reflector,
}

impl ChartType {
    pub fn strategy(self) -> &'static str {
        match self {
            ChartType::Manifestor => "Inform before acting",
            ChartType::Generator => "Wait to respond",
            ChartType::ManifestingGenerator => "Wait to respond, then inform",
            ChartType::Projector => "Wait for the invitation",
            ChartType::Reflector => "Wait a lunar cycle",
        }
    }

    /// Collapse refinements to their top-level type.
    pub fn base(self) -> ChartType {
        match self {
            ChartType::ManifestingGenerator => ChartType::Generator,
            other => other,
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChartType::Manifestor => "Manifestor",
            ChartType::Generator => "Generator",
            ChartType::ManifestingGenerator => "Manifesting Generator",
            ChartType::Projector => "Projector",
            ChartType::Reflector => "Reflector",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    /// Solar Plexus
    Emotional,
    Sacral,
    Splenic,
    /// Heart connected to the Throat
    Ego,
    /// G connected to the Throat, Projectors only
    SelfProjected,
    /// No inner authority: environment and sounding board
    Mental,
    /// Reflectors
    Lunar,
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Authority::Emotional => "Emotional",
            Authority::Sacral => "Sacral",
            Authority::Splenic => "Splenic",
            Authority::Ego => "Ego",
            Authority::SelfProjected => "Self-Projected",
            Authority::Mental => "Environment / Mental",
            Authority::Lunar => "Lunar",
        };
        f.write_str(s)
    }
}

pub struct TypeRule {
    pub name: &'static str,
    pub applies: fn(&Definition) -> bool,
    pub outcome: ChartType,
}

pub fn no_defined_centers(d: &Definition) -> bool {
    d.centers.is_empty()
}

pub fn sacral_defined(d: &Definition) -> bool {
    d.is_defined(Center::Sacral)
}

/// Sacral open, but a motor still reaches the Throat.
pub fn motor_to_throat_without_sacral(d: &Definition) -> bool {
    !d.is_defined(Center::Sacral) && d.motor_connected_to_throat()
}

fn always(_: &Definition) -> bool {
    true
}

pub const TYPE_RULES: &[TypeRule] = &[
    TypeRule {
        name: "no-defined-centers",
        applies: no_defined_centers,
        outcome: ChartType::Reflector,
    },
    TypeRule {
        name: "sacral-defined",
        applies: sacral_defined,
        outcome: ChartType::Generator,
    },
    TypeRule {
        name: "motor-to-throat",
        applies: motor_to_throat_without_sacral,
        outcome: ChartType::Manifestor,
    },
    TypeRule {
        name: "otherwise",
        applies: always,
        outcome: ChartType::Projector,
    },
];

/// Inputs visible to authority predicates.
#[derive(Debug, Clone, Copy)]
pub struct AuthorityContext<'a> {
    pub definition: &'a Definition,
    pub chart_type: ChartType,
}

pub struct AuthorityRule {
    pub name: &'static str,
    pub applies: fn(&AuthorityContext<'_>) -> bool,
    pub outcome: Authority,
}

pub fn solar_plexus_defined(ctx: &AuthorityContext<'_>) -> bool {
    ctx.definition.is_defined(Center::SolarPlexus)
}

pub fn sacral_authority(ctx: &AuthorityContext<'_>) -> bool {
    ctx.definition.is_defined(Center::Sacral)
}

pub fn spleen_defined(ctx: &AuthorityContext<'_>) -> bool {
    ctx.definition.is_defined(Center::Spleen)
}

pub fn heart_to_throat(ctx: &AuthorityContext<'_>) -> bool {
    ctx.definition.connected(Center::Heart, Center::Throat)
}

pub fn g_to_throat_projector(ctx: &AuthorityContext<'_>) -> bool {
    ctx.chart_type == ChartType::Projector && ctx.definition.connected(Center::G, Center::Throat)
}

pub fn nothing_defined(ctx: &AuthorityContext<'_>) -> bool {
    ctx.definition.centers.is_empty()
}

fn no_inner_authority(_: &AuthorityContext<'_>) -> bool {
    true
}

pub const AUTHORITY_RULES: &[AuthorityRule] = &[
    AuthorityRule {
        name: "solar-plexus",
        applies: solar_plexus_defined,
        outcome: Authority::Emotional,
    },
    AuthorityRule {
        name: "sacral",
        applies: sacral_authority,
        outcome: Authority::Sacral,
    },
    AuthorityRule {
        name: "spleen",
        applies: spleen_defined,
        outcome: Authority::Splenic,
    },
    AuthorityRule {
        name: "heart-to-throat",
        applies: heart_to_throat,
        outcome: Authority::Ego,
    },
    AuthorityRule {
        name: "g-to-throat",
        applies: g_to_throat_projector,
        outcome: Authority::SelfProjected,
    },
    AuthorityRule {
        name: "lunar",
        applies: nothing_defined,
        outcome: Authority::Lunar,
    },
    AuthorityRule {
        name: "environment",
        applies: no_inner_authority,
        outcome: Authority::Mental,
    },
];

/// Outcome of both rule chains, with the names of the rules that fired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub chart_type: ChartType,
    pub strategy: &'static str,
    pub authority: Authority,
    pub type_rule: &'static str,
    pub authority_rule: &'static str,
}

pub fn classify_type(definition: &Definition) -> (ChartType, &'static str) {
    let rule = TYPE_RULES
        .iter()
        .find(|r| (r.applies)(definition))
        .unwrap_or(&TYPE_RULES[TYPE_RULES.len() - 1]);

    // Refinement of the Generator outcome, not a separate rule
    let chart_type = match rule.outcome {
        ChartType::Generator if definition.motor_connected_to_throat() => {
            ChartType::ManifestingGenerator
        }
        outcome => outcome,
    };
    (chart_type, rule.name)
}

pub fn classify_authority(
    definition: &Definition,
    chart_type: ChartType,
) -> (Authority, &'static str) {
    let ctx = AuthorityContext {
        definition,
        chart_type,
    };
    let rule = AUTHORITY_RULES
        .iter()
        .find(|r| (r.applies)(&ctx))
        .unwrap_or(&AUTHORITY_RULES[AUTHORITY_RULES.len() - 1]);
    (rule.outcome, rule.name)
}

pub fn classify(definition: &Definition) -> Classification {
    let (chart_type, type_rule) = classify_type(definition);
    let (authority, authority_rule) = classify_authority(definition, chart_type);
    debug!(%chart_type, %authority, type_rule, authority_rule, "chart classified");

    Classification {
        chart_type,
        strategy: chart_type.strategy(),
        authority,
        type_rule,
        authority_rule,
    }
}
