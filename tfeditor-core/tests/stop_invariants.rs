use proptest::prelude::*;
use std::fmt::Debug;
use tfeditor_core::{
    AlphaStop, Color, ColorStop, EndpointPolicy, Stop, StopCollection, StopRules,
};

#[derive(Clone, Debug)]
enum Edit<V> {
    Add(f64, V),
    Remove(usize),
    Move(usize, f64, V),
}

fn unit() -> impl Strategy<Value = f64> + Clone {
    0.0_f64..=1.0
}

fn color() -> impl Strategy<Value = Color> + Clone {
    (unit(), unit(), unit()).prop_map(|(r, g, b)| Color::rgb(r, g, b))
}

/// Indices are reduced modulo the current stop count when applied.
fn edit<V: Clone + Debug + 'static>(
    value: impl Strategy<Value = V> + Clone + 'static,
) -> impl Strategy<Value = Edit<V>> {
    prop_oneof![
        (unit(), value.clone()).prop_map(|(p, v)| Edit::Add(p, v)),
        any::<usize>().prop_map(Edit::Remove),
        (any::<usize>(), unit(), value).prop_map(|(i, p, v)| Edit::Move(i, p, v)),
    ]
}

fn free_rules() -> StopRules {
    StopRules {
        endpoints: EndpointPolicy::Free,
        ..StopRules::default()
    }
}

fn apply<S: Stop>(stops: &mut StopCollection<S>, edit: Edit<S::Value>) {
    match edit {
        Edit::Add(p, v) => {
            stops.add(p, v).unwrap();
        }
        Edit::Remove(i) => {
            stops.remove(i % stops.len());
        }
        Edit::Move(i, p, v) => {
            stops.move_to(i % stops.len(), p, v).unwrap();
        }
    }
}

fn check_order<S: Stop>(stops: &StopCollection<S>, pinned: bool) -> Result<(), TestCaseError> {
    let p: Vec<f64> = stops.iter().map(|s| s.position()).collect();
    prop_assert!(p.len() >= 2, "{:?}", p);
    prop_assert!(p.windows(2).all(|w| w[0] < w[1]), "not strictly sorted: {:?}", p);
    prop_assert!(p.iter().all(|x| (0.0..=1.0).contains(x)), "{:?}", p);
    if pinned {
        prop_assert_eq!(p[0], 0.0);
        prop_assert_eq!(p[p.len() - 1], 1.0);
    }
    Ok(())
}

// ============================================================================
// Ordering and pinning survive arbitrary edit sequences
// ============================================================================

proptest! {
    #[test]
    fn alpha_stops_stay_sorted_and_pinned(edits in prop::collection::vec(edit(unit()), 1..200)) {
        let mut stops: StopCollection<AlphaStop> =
            StopCollection::from_pairs(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();
        for e in edits {
            apply(&mut stops, e);
            check_order(&stops, true)?;
        }
    }

    #[test]
    fn color_stops_stay_sorted_and_pinned(edits in prop::collection::vec(edit(color()), 1..200)) {
        let mut stops: StopCollection<ColorStop> =
            StopCollection::from_pairs(&[(0.0, Color::BLACK), (1.0, Color::WHITE)]).unwrap();
        for e in edits {
            apply(&mut stops, e);
            check_order(&stops, true)?;
        }
    }

    #[test]
    fn free_endpoints_stay_sorted(edits in prop::collection::vec(edit(unit()), 1..200)) {
        let mut stops = StopCollection::with_rules(
            vec![AlphaStop::new(0.2, 0.0), AlphaStop::new(0.8, 1.0)],
            free_rules(),
        )
        .unwrap();
        for e in edits {
            apply(&mut stops, e);
            check_order(&stops, false)?;
        }
    }

    #[test]
    fn move_never_disturbs_other_stops(
        edits in prop::collection::vec(edit(unit()), 0..50),
        index in any::<usize>(),
        target in unit(),
    ) {
        let mut stops: StopCollection<AlphaStop> =
            StopCollection::from_pairs(&[(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)]).unwrap();
        for e in edits {
            apply(&mut stops, e);
        }
        let index = index % stops.len();
        let before: Vec<AlphaStop> = stops.iter().copied().collect();

        stops.move_to(index, target, 0.5).unwrap();

        prop_assert_eq!(stops.len(), before.len());
        for (i, (now, was)) in stops.iter().zip(&before).enumerate() {
            if i != index {
                prop_assert_eq!(now, was);
            }
        }
    }

    #[test]
    fn alpha_sample_stays_within_stop_values(
        edits in prop::collection::vec(edit(unit()), 0..50),
        position in unit(),
    ) {
        let mut stops: StopCollection<AlphaStop> =
            StopCollection::from_pairs(&[(0.0, 0.2), (1.0, 0.6)]).unwrap();
        for e in edits {
            apply(&mut stops, e);
        }
        let lo = stops.iter().map(|s| s.alpha).fold(f64::INFINITY, f64::min);
        let hi = stops.iter().map(|s| s.alpha).fold(f64::NEG_INFINITY, f64::max);

        let a = stops.sample(position).unwrap();

        prop_assert!(a >= lo - 1e-12 && a <= hi + 1e-12, "alpha {} outside [{}, {}]", a, lo, hi);
    }
}

// ============================================================================
// Sampling at known positions
// ============================================================================

#[test]
fn alpha_sample_hits_stop_values_exactly() {
    let stops: StopCollection<AlphaStop> =
        StopCollection::from_pairs(&[(0.0, 0.2), (0.3, 0.9), (1.0, 0.6)]).unwrap();
    assert_eq!(stops.sample(0.0).unwrap(), 0.2);
    assert_eq!(stops.sample(0.3).unwrap(), 0.9);
    assert_eq!(stops.sample(1.0).unwrap(), 0.6);
}

#[test]
fn sample_outside_free_span_clamps_to_boundary_stop() {
    let stops = StopCollection::with_rules(
        vec![AlphaStop::new(0.25, 0.4), AlphaStop::new(0.75, 0.8)],
        free_rules(),
    )
    .unwrap();
    assert_eq!(stops.sample(0.0).unwrap(), 0.4);
    assert_eq!(stops.sample(1.0).unwrap(), 0.8);
    assert!(stops.sample(1.5).is_err());
}
