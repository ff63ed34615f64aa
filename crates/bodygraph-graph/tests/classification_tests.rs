use bodygraph_core::{
    ActivationBuilder, Celestial, CelestialLongitudes, DegreeTable, GateNumber,
};
use bodygraph_graph::{
    classify, Authority, Bodygraph, Center, ChartType, DefinitionType, GateSide, Profile,
};
use std::collections::BTreeSet;

fn define(gates: &[GateNumber]) -> bodygraph_graph::Definition {
    let set: BTreeSet<GateNumber> = gates.iter().copied().collect();
    Bodygraph::standard().unwrap().define_gates(set)
}

struct Case {
    name: &'static str,
    gates: &'static [GateNumber],
    chart_type: ChartType,
    authority: Authority,
}

const CASES: &[Case] = &[
    Case {
        name: "loose gates only",
        gates: &[1, 2, 3],
        chart_type: ChartType::Reflector,
        authority: Authority::Lunar,
    },
    Case {
        name: "sacral to root",
        gates: &[3, 60],
        chart_type: ChartType::Generator,
        authority: Authority::Sacral,
    },
    Case {
        name: "sacral to throat",
        gates: &[20, 34],
        chart_type: ChartType::ManifestingGenerator,
        authority: Authority::Sacral,
    },
    Case {
        name: "emotions outrank sacral",
        gates: &[6, 59],
        chart_type: ChartType::Generator,
        authority: Authority::Emotional,
    },
    Case {
        name: "heart to throat",
        gates: &[21, 45],
        chart_type: ChartType::Manifestor,
        authority: Authority::Ego,
    },
    Case {
        name: "heart reaches throat through g",
        gates: &[25, 51, 7, 31],
        chart_type: ChartType::Manifestor,
        authority: Authority::Ego,
    },
    Case {
        name: "root reaches throat through solar plexus",
        gates: &[19, 49, 35, 36],
        chart_type: ChartType::Manifestor,
        authority: Authority::Emotional,
    },
    Case {
        name: "solar plexus to throat",
        gates: &[12, 22],
        chart_type: ChartType::Manifestor,
        authority: Authority::Emotional,
    },
    Case {
        name: "g to throat",
        gates: &[1, 8],
        chart_type: ChartType::Projector,
        authority: Authority::SelfProjected,
    },
    Case {
        name: "spleen outranks self",
        gates: &[1, 8, 18, 58],
        chart_type: ChartType::Projector,
        authority: Authority::Splenic,
    },
    Case {
        name: "head ajna throat",
        gates: &[64, 47, 11, 56],
        chart_type: ChartType::Projector,
        authority: Authority::Mental,
    },
    Case {
        name: "heart to g without throat",
        gates: &[25, 51],
        chart_type: ChartType::Projector,
        authority: Authority::Mental,
    },
    Case {
        name: "motor stranded from throat",
        gates: &[18, 58, 64, 47],
        chart_type: ChartType::Projector,
        authority: Authority::Splenic,
    },
];

#[test]
fn classification_fixtures() {
    for case in CASES {
        let c = classify(&define(case.gates));
        assert_eq!(c.chart_type, case.chart_type, "type for {}", case.name);
        assert_eq!(c.authority, case.authority, "authority for {}", case.name);
        assert_eq!(c.strategy, case.chart_type.strategy(), "strategy for {}", case.name);
    }
}

#[test]
fn manifestor_requires_open_sacral() {
    // Heart-Throat plus Sacral-Root: sacral rule fires first
    let c = classify(&define(&[21, 45, 3, 60]));
    assert_eq!(c.chart_type, ChartType::ManifestingGenerator);
    assert_eq!(c.type_rule, "sacral-defined");
    assert_eq!(c.authority, Authority::Sacral);
}

#[test]
fn self_projected_only_for_projectors() {
    // G-Throat and Heart-Throat: Heart rule fires before G
    let c = classify(&define(&[1, 8, 21, 45]));
    assert_eq!(c.chart_type, ChartType::Manifestor);
    assert_eq!(c.authority, Authority::Ego);
}

#[test]
fn split_definition_with_islands() {
    let d = define(&[7, 31, 28, 38]);
    assert_eq!(d.definition_type, DefinitionType::Split);
    assert_eq!(d.components.len(), 2);
    assert!(d
        .undefined_centers()
        .iter()
        .all(|c| !matches!(c, Center::G | Center::Throat | Center::Spleen | Center::Root)));
    assert_eq!(d.undefined_centers().len(), 5);
}

fn activation_set(sun: f64, rest: f64) -> bodygraph_core::ActivationSet {
    let table = DegreeTable::standard().unwrap();
    let longitudes = CelestialLongitudes::from_fn(|k| match k {
        Celestial::Sun => sun,
        Celestial::Earth => (sun + 180.0) % 360.0,
        _ => rest,
    });
    ActivationBuilder::new(table).build(&longitudes).unwrap()
}

#[test]
fn profile_and_sides_from_activation_sets() {
    // 304.0 resolves to 41.3, 216.0 to 28.5
    let personality = activation_set(304.0, 304.0);
    let design = activation_set(216.0, 216.0);

    let profile = Profile::from_activations(&personality, &design);
    assert_eq!(profile.to_string(), "3/5");

    let sides = bodygraph_graph::gate_sides(&personality, &design);
    assert_eq!(sides.get(&41), Some(&GateSide::Personality));
    assert_eq!(sides.get(&28), Some(&GateSide::Design));
    assert_eq!(sides.get(&7), None);
}

#[test]
fn channel_across_sets_is_defined() {
    // personality Earth 31, design gate 7 from auxiliary bodies
    let table = DegreeTable::standard().unwrap();
    let seven = table.longitude_for(7, 3).unwrap();
    let personality = activation_set(304.0, 304.0);
    let design = activation_set(216.0, seven);

    let d = Bodygraph::standard().unwrap().define(&personality, &design);
    assert!(d.has_channel("7-31"));
    let sides = bodygraph_graph::gate_sides(&personality, &design);
    assert_eq!(sides.get(&31), Some(&GateSide::Personality));
    assert_eq!(sides.get(&7), Some(&GateSide::Design));
}
