use std::cell::RefCell;
use std::rc::Rc;
use tfeditor_core::{
    AlphaStop, Color, ColorMap, ColorStop, EditorConfig, InterpolationMethod, Stop,
    StopCollection, TransferFunction, TransferFunctionEditor,
};

fn editor() -> TransferFunctionEditor {
    TransferFunctionEditor::new(EditorConfig::default()).unwrap()
}

fn positions(stops: &[AlphaStop]) -> Vec<f64> {
    stops.iter().map(|s| s.position).collect()
}

// ============================================================================
// Stop editing
// ============================================================================

#[test]
fn drag_middle_stop_far_right() {
    let mut editor = editor();
    editor
        .replace_alpha_stops(vec![
            AlphaStop::new(0.0, 1.0),
            AlphaStop::new(0.5, 0.5),
            AlphaStop::new(1.0, 0.0),
        ])
        .unwrap();

    let applied = editor.move_alpha_stop_to(1, 0.9, 0.2).unwrap();

    assert_eq!(applied, 0.9);
    assert_eq!(positions(editor.alpha_stops()), vec![0.0, 0.9, 1.0]);
    assert_eq!(editor.alpha_stops()[1].alpha, 0.2);
}

#[test]
fn drag_past_neighbour_stops_at_neighbour() {
    let mut editor = editor();
    editor.add_alpha_stop(0.75, 0.8).unwrap();

    let applied = editor.move_alpha_stop_to(1, 0.9, 0.5).unwrap();

    assert!(applied < 0.75);
    assert!(applied > 0.7);
    let p = positions(editor.alpha_stops());
    assert!(p.windows(2).all(|w| w[0] < w[1]), "{p:?}");
}

#[test]
fn remove_on_two_stops_is_noop() {
    let mut editor = editor();
    editor
        .replace_alpha_stops(vec![AlphaStop::new(0.0, 0.0), AlphaStop::new(1.0, 1.0)])
        .unwrap();

    assert!(!editor.remove_alpha_stop_at(0));
    assert!(!editor.remove_alpha_stop_at(1));
    assert_eq!(editor.alpha_stops().len(), 2);
}

#[test]
fn remove_interior_color_stop() {
    let mut editor = editor();
    assert!(editor.remove_color_stop_at(1));
    assert_eq!(editor.color_stops().len(), 2);
    let c = editor.sample_color(0.5).unwrap();
    assert!(c.approx_eq(&Color::rgb(0.5, 0.0, 0.5), 1e-12), "{c:?}");
}

#[test]
#[should_panic(expected = "out of bounds")]
fn remove_out_of_bounds_panics() {
    let mut editor = editor();
    editor.remove_alpha_stop_at(10);
}

#[test]
fn rejected_replacement_keeps_stops() {
    let mut editor = editor();
    let before = editor.snapshot();

    let result = editor.replace_alpha_stops(vec![
        AlphaStop::new(0.2, 0.0),
        AlphaStop::new(1.0, 1.0),
    ]);

    assert!(result.is_err());
    assert_eq!(editor.snapshot(), before);
}

// ============================================================================
// Sampling
// ============================================================================

#[test]
fn rgb_sample_blends_blue_and_white() {
    let editor = editor();
    let c = editor.sample_color(0.25).unwrap();
    assert!(c.approx_eq(&Color::rgb(0.5, 0.5, 1.0), 1e-12), "{c:?}");
}

#[test]
fn sampling_outside_domain_is_an_error() {
    let editor = editor();
    assert!(editor.sample_alpha(-0.1).is_err());
    assert!(editor.sample_color(1.1).is_err());
    assert!(editor.sample_color_with_alpha(f64::NAN).is_err());
}

#[test]
fn four_bins_split_domain_in_quarters() {
    let mut editor = editor();
    editor.set_bins(4).unwrap();
    editor.set_discrete(true).unwrap();

    let bins = editor.bins();

    assert_eq!(bins.len(), 4);
    let lower: Vec<f64> = bins.iter().map(|b| b.lower_bound).collect();
    let upper: Vec<f64> = bins.iter().map(|b| b.upper_bound).collect();
    assert_eq!(lower, vec![0.0, 0.25, 0.5, 0.75]);
    assert_eq!(upper, vec![0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn discrete_sample_is_flat_within_bin() {
    let mut editor = editor();
    editor.set_bins(4).unwrap();
    editor.set_discrete(true).unwrap();

    assert_eq!(
        editor.sample_color(0.01).unwrap(),
        editor.sample_color(0.24).unwrap()
    );
    assert_eq!(editor.sample_color(0.0).unwrap(), Color::rgb(0.0, 0.0, 1.0));
    assert_eq!(editor.sample_color(1.0).unwrap(), Color::rgb(1.0, 0.0, 0.0));
}

#[test]
fn bins_are_stable_between_mutations() {
    let mut editor = editor();
    editor.set_interpolation_method(InterpolationMethod::HclLong);
    editor.set_bins(7).unwrap();
    editor.set_discrete(true).unwrap();

    let first = editor.bins();
    let second = editor.bins();

    assert_eq!(first.len(), 7);
    assert_eq!(first, second);
    assert_eq!(first[0].lower_bound, 0.0);
    assert_eq!(first[6].upper_bound, 1.0);
}

#[test]
fn continuous_map_has_no_bins() {
    assert!(editor().bins().is_empty());
}

// ============================================================================
// Listeners
// ============================================================================

#[test]
fn listener_sees_current_state_then_each_change() {
    let mut editor = editor();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    editor.add_listener(move |tf: &TransferFunction| sink.borrow_mut().push(tf.alpha_stops.len()));

    editor.add_alpha_stop(0.25, 0.1).unwrap();
    editor.add_alpha_stop(0.75, 0.9).unwrap();
    editor.remove_alpha_stop_at(1);

    assert_eq!(*seen.borrow(), vec![3, 4, 5, 4]);
}

#[test]
fn removed_listener_stops_receiving() {
    let mut editor = editor();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let id = editor.add_listener(move |_| *sink.borrow_mut() += 1);

    assert!(editor.remove_listener(id));
    editor.set_interpolation_method(InterpolationMethod::Hcl);

    assert_eq!(*count.borrow(), 1);
    assert!(!editor.remove_listener(id));
}

#[test]
fn listeners_notified_in_registration_order() {
    let mut editor = editor();
    let order = Rc::new(RefCell::new(Vec::new()));
    for tag in ["first", "second"] {
        let sink = Rc::clone(&order);
        editor.add_listener(move |_| sink.borrow_mut().push(tag));
    }
    order.borrow_mut().clear();

    editor.set_discrete(true).unwrap();

    assert_eq!(*order.borrow(), vec!["first", "second"]);
}

#[test]
fn replace_color_map_notifies_once() {
    let mut editor = editor();
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    editor.add_listener(move |_| *sink.borrow_mut() += 1);

    let map = ColorMap::new(
        StopCollection::new(vec![
            ColorStop::new(0.0, Color::BLACK),
            ColorStop::new(1.0, Color::WHITE),
        ])
        .unwrap(),
        InterpolationMethod::Lab,
    );
    editor.replace_color_map(map.clone()).unwrap();
    editor.replace_color_map(map).unwrap();

    assert_eq!(*count.borrow(), 2);
    assert_eq!(editor.color_stops().len(), 2);
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn edits_mark_dirty_until_reverted() {
    let mut editor = editor();
    editor.add_color_stop(0.25, Color::rgb(0.0, 1.0, 0.0)).unwrap();
    editor.set_bins(3).unwrap();
    assert!(editor.is_dirty());

    editor.revert();

    assert!(!editor.is_dirty());
    assert_eq!(editor.snapshot(), TransferFunction::default());
}
