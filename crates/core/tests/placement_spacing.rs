//! Spacing behavior of the placement pass at realistic densities
//!
//! Placement is best-effort rejection sampling, so spacing is a statistical
//! property rather than a hard guarantee. These tests pin down the quality
//! level the default tuning actually delivers.

use aeroflow_core::{FlowConfig, FlowSimulation, VehicleEnvelope, Zone};

fn f1_envelope() -> VehicleEnvelope {
    VehicleEnvelope::new(5.7, 2.0, 1.0)
}

/// Fraction of same-zone entity pairs at or above the zone's effective
/// minimum spacing at seed time.
fn spaced_pair_fraction(sim: &FlowSimulation) -> f32 {
    let config = sim.config();
    let general: Vec<_> = sim.entities().iter().filter(|e| !e.is_vortex).collect();

    let mut pairs = 0usize;
    let mut spaced = 0usize;
    for (i, a) in general.iter().enumerate() {
        for b in &general[i + 1..] {
            if a.zone != b.zone {
                continue;
            }
            let min_distance = if config.adaptive_density {
                config.min_distance * a.zone.spacing_scale()
            } else {
                config.min_distance
            };
            pairs += 1;
            if (a.trail[0] - b.trail[0]).norm() >= min_distance {
                spaced += 1;
            }
        }
    }
    assert!(pairs > 0, "no same-zone pairs to measure");
    spaced as f32 / pairs as f32
}

#[test]
fn test_default_density_spacing_mostly_holds() {
    let config = FlowConfig {
        num_lines: 200,
        ..FlowConfig::default()
    };
    let sim = FlowSimulation::with_seed(config, f1_envelope(), 31);

    let fraction = spaced_pair_fraction(&sim);
    assert!(
        fraction >= 0.9,
        "too many same-zone pairs below minimum spacing: {fraction:.3}"
    );
}

#[test]
fn test_low_density_places_cleanly() {
    let config = FlowConfig {
        num_lines: 50,
        ..FlowConfig::default()
    };
    let sim = FlowSimulation::with_seed(config, f1_envelope(), 8);

    assert_eq!(sim.placement_stats().spacing_misses, 0, "low density should not miss");
    let fraction = spaced_pair_fraction(&sim);
    assert!((fraction - 1.0).abs() < f32::EPSILON);
}

#[test]
fn test_impossible_spacing_degrades_but_still_places() {
    let config = FlowConfig {
        num_lines: 100,
        min_distance: 50.0,
        ..FlowConfig::default()
    };
    let sim = FlowSimulation::with_seed(config, f1_envelope(), 13);

    let stats = sim.placement_stats();
    let general = sim.entities().iter().filter(|e| !e.is_vortex).count();
    assert_eq!(stats.placed, general, "every budgeted entity must exist");
    assert!(
        stats.spacing_misses >= general - 5,
        "misses under-reported at impossible spacing: {}",
        stats.spacing_misses
    );
}

#[test]
fn test_adaptive_density_tightens_dense_zones() {
    // With adaptive density the naturally dense zones accept closer
    // neighbors, so their effective spacing threshold sits below the
    // configured base value.
    let config = FlowConfig {
        num_lines: 200,
        adaptive_density: true,
        ..FlowConfig::default()
    };
    let sim = FlowSimulation::with_seed(config, f1_envelope(), 77);
    let base = sim.config().min_distance;

    for zone in [Zone::FrontWing, Zone::Floor] {
        assert!(base * zone.spacing_scale() < base);
    }
    // The other zones keep the base spacing.
    for zone in [Zone::Top, Zone::Side, Zone::RearWing] {
        assert!((zone.spacing_scale() - 1.0).abs() < f32::EPSILON);
    }
}
