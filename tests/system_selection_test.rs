// Selection behavior across the whole compiled family of block systems.

use std::sync::Arc;

use mpcoupled::mesh::Mesh;
use mpcoupled::system::selector::block_width;
use mpcoupled::system::{
    canonical_name, select, select_named, PhaseRoster, SystemConfig, SystemError, MAX_PHASES,
};

fn roster(n: usize) -> PhaseRoster {
    PhaseRoster::new((0..n).map(|i| format!("phase{}", i)).collect())
}

#[test]
fn every_compiled_phase_count_is_selectable() {
    let mesh = Arc::new(Mesh::line(4));
    for k in 0..=MAX_PHASES {
        let system = select(mesh.clone(), roster(k), SystemConfig::default())
            .unwrap_or_else(|err| panic!("selection failed for {} phases: {}", k, err));
        assert_eq!(system.name(), canonical_name(k));
        assert_eq!(system.n_eqns(), block_width(k));
        assert_eq!(system.phase_count(), k);
        assert_eq!(system.slots().n_eqns(), block_width(k));
    }
}

#[test]
fn phase_count_above_the_ceiling_is_a_configuration_error() {
    let mesh = Arc::new(Mesh::line(4));
    let err = select(mesh, roster(MAX_PHASES + 1), SystemConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        SystemError::UnsupportedPhaseCount {
            requested,
            max_phases,
        } if requested == MAX_PHASES + 1 && max_phases == MAX_PHASES
    ));
}

#[test]
fn bound_name_must_match_the_canonical_name() {
    let mesh = Arc::new(Mesh::line(4));
    let err = select_named(
        mesh.clone(),
        PhaseRoster::from_names(&["air", "water"]),
        SystemConfig::default(),
        "BlockSystem<7>",
    )
    .unwrap_err();
    match err {
        SystemError::NameMismatch {
            requested,
            canonical,
        } => {
            assert_eq!(requested, "BlockSystem<7>");
            assert_eq!(canonical, "BlockSystem<2>");
        }
        other => panic!("expected a name mismatch, got {}", other),
    }

    // the exact canonical form is part of the wire contract
    let system = select_named(
        mesh,
        PhaseRoster::from_names(&["air", "water"]),
        SystemConfig::default(),
        "BlockSystem<2>",
    )
    .unwrap();
    assert_eq!(system.name(), "BlockSystem<2>");
}

#[test]
fn selected_system_lays_out_slots_velocity_first() {
    let mesh = Arc::new(Mesh::line(4));
    let system = select(
        mesh,
        PhaseRoster::from_names(&["air", "water"]),
        SystemConfig::default(),
    )
    .unwrap();

    let slots = system.slots();
    assert_eq!(slots.offset_for("U"), Some(0));
    assert_eq!(slots.slot("U").unwrap().components(), 3);
    assert_eq!(slots.offset_for("p"), Some(3));
    assert_eq!(slots.offset_for("alpha.air"), Some(4));
    assert_eq!(slots.offset_for("alpha.water"), Some(5));

    let names: Vec<&str> = slots.names().collect();
    assert_eq!(names, ["U", "p", "alpha.air", "alpha.water"]);
}

#[test]
fn custom_field_names_bind_the_fixed_slots() {
    let mesh = Arc::new(Mesh::line(4));
    let config = SystemConfig {
        pressure_name: "p_rgh".to_string(),
        velocity_name: "U.mixture".to_string(),
        ..SystemConfig::default()
    };
    let system = select(mesh, PhaseRoster::from_names(&["oil"]), config).unwrap();
    assert_eq!(system.slots().offset_for("U.mixture"), Some(0));
    assert_eq!(system.slots().offset_for("p_rgh"), Some(3));
    assert_eq!(system.slots().offset_for("alpha.oil"), Some(4));
    assert_eq!(system.fields().scalar("p_rgh").unwrap().len(), 4);
}

#[test]
fn colliding_field_names_fail_selection() {
    let mesh = Arc::new(Mesh::line(4));
    let config = SystemConfig {
        pressure_name: "alpha.air".to_string(),
        ..SystemConfig::default()
    };
    let err = select(mesh, PhaseRoster::from_names(&["air"]), config).unwrap_err();
    assert!(matches!(
        err,
        SystemError::DuplicateField { field } if field == "alpha.air"
    ));
}
