use std::sync::Arc;

use crate::{
    AnnDataError, Annotation, BoundMode, CtrlVocab, Direction, Disjoint, ExportConfig, Interval,
    Label, Location, MetaObject, Point, SilenceConfig, Tag, Tier,
};

fn interval(b: f64, e: f64) -> Interval {
    Interval::from_secs(b, e).unwrap()
}

fn labelled(b: f64, e: f64, text: &str) -> Annotation {
    Annotation::with_labels(interval(b, e), vec![Label::from(text)])
}

fn interval_tier(name: &str, bounds: &[(f64, f64, &str)]) -> Tier {
    let mut tier = Tier::new(name);
    for &(b, e, text) in bounds {
        tier.append(labelled(b, e, text)).unwrap();
    }
    tier
}

/// A tier built with `add`, so annotations may overlap.
fn overlapping_tier(name: &str, bounds: &[(f64, f64, &str)]) -> Tier {
    let mut tier = Tier::new(name);
    for &(b, e, text) in bounds {
        tier.add(labelled(b, e, text)).unwrap();
    }
    tier
}

fn point_tier(name: &str, points: &[f64]) -> Tier {
    let mut tier = Tier::new(name);
    for &p in points {
        tier.append(Annotation::new(Point::new(p))).unwrap();
    }
    tier
}

fn is_sorted(tier: &Tier) -> bool {
    tier.annotations().windows(2).all(|w| {
        let (a, b) = (&w[0], &w[1]);
        a.lowest().midpoint() < b.lowest().midpoint()
            || (a.lowest() == b.lowest() && a.highest().midpoint() <= b.highest().midpoint())
    })
}

#[test]
fn append_refuses_overlaps_and_duplicate_points() {
    let mut tier = interval_tier("words", &[(0., 1., "a"), (1., 2., "b")]);
    let err = tier.append(labelled(1.5, 3., "c")).unwrap_err();
    assert!(matches!(err, AnnDataError::TierAppend { .. }));
    assert_eq!(tier.len(), 2);

    let mut points = point_tier("pitch", &[0.5, 1.0]);
    assert!(matches!(
        points.append(Annotation::new(Point::new(1.0))),
        Err(AnnDataError::TierAppend { .. })
    ));
    assert!(matches!(
        points.append(labelled(2., 3., "x")),
        Err(AnnDataError::TypeMismatch { .. })
    ));
}

#[test]
fn append_sets_the_parent_tier() {
    let tier = interval_tier("words", &[(0., 1., "a")]);
    assert_eq!(tier[0].parent_tier(), Some(tier.id()));
    let mut tier = tier;
    let popped = tier.pop(0).unwrap();
    assert_eq!(popped.parent_tier(), None);
    assert!(matches!(tier.pop(0), Err(AnnDataError::IndexOutOfRange { index: 0, len: 0 })));
}

#[test]
fn add_keeps_overlapping_annotations_sorted() {
    let mut tier = Tier::new("overlaps");
    for (b, e) in [(1., 3.), (0., 4.), (1., 2.), (0.5, 1.)] {
        tier.add(Annotation::new(interval(b, e))).unwrap();
    }
    assert!(is_sorted(&tier));
    insta::assert_snapshot!(tier.to_string(), @"overlaps: [0, 4] | [0.5, 1] | [1, 2] | [1, 3]");
}

#[test]
fn find_on_ranges() {
    let tier = interval_tier("words", &[(1., 2., "a"), (2., 4., "b"), (5., 6., "c")]);

    assert!(tier.find(Point::new(10.), Point::new(12.), true).is_empty());
    assert!(tier.find(Point::new(2.), Point::new(2.), false).is_empty());
    assert_eq!(tier.find_indexes(Point::new(1.), Point::new(4.), false), vec![0, 1]);
    assert_eq!(tier.find_indexes(Point::new(1.5), Point::new(5.5), false), vec![1]);
    assert_eq!(tier.find_indexes(Point::new(1.5), Point::new(5.5), true), vec![0, 1, 2]);
    assert_eq!(tier.find_indexes(Point::new(4.), Point::new(5.), true), Vec::<usize>::new());

    let points = point_tier("pitch", &[0.5, 1.0, 1.5, 2.0]);
    assert_eq!(points.find_indexes(Point::new(1.0), Point::new(1.5), false), vec![1, 2]);
}

#[test]
fn find_reaches_back_to_long_annotations() {
    let tier = overlapping_tier("spans", &[(0., 10., "long"), (1., 2., "a"), (3., 4., "b")]);
    assert_eq!(tier.find_indexes(Point::new(5.), Point::new(6.), true), vec![0]);
    assert_eq!(tier.find_indexes(Point::new(1.5), Point::new(3.5), true), vec![0, 1, 2]);
    assert_eq!(tier.find_indexes(Point::new(0.), Point::new(5.), false), vec![1, 2]);
    assert_eq!(tier.find_indexes(Point::new(11.), Point::new(12.), true), Vec::<usize>::new());
}

#[test]
fn point_queries_with_overlaps() {
    let nested = overlapping_tier("nested", &[(0., 10., "x"), (1., 5., "y"), (2., 3., "z")]);
    assert_eq!(nested.rindex(Point::new(5.)), Some(1));
    assert_eq!(nested.rindex(Point::new(3.)), Some(2));
    assert_eq!(nested.rindex(Point::new(10.)), Some(0));
    assert_eq!(nested.rindex(Point::new(4.)), None);
    assert_eq!(nested.mindex(Point::new(7.), BoundMode::Exclusive), Some(0));
    assert_eq!(nested.mindex(Point::new(5.), BoundMode::IncludeEnd), Some(0));
    assert_eq!(nested.mindex(Point::new(12.), BoundMode::Inclusive), None);

    let tier = overlapping_tier("spans", &[(0., 10., "long"), (1., 2., "a"), (8., 9., "b")]);
    assert_eq!(tier.near(Point::new(5.), Direction::Nearest), Some(0));
    // the latest end before 11 belongs to the first annotation
    assert_eq!(tier.near(Point::new(11.), Direction::Nearest), Some(0));
    assert_eq!(tier.near(Point::new(1.5), Direction::Nearest), Some(0));
}

#[test]
fn removing_a_long_annotation_updates_queries() {
    let mut tier = overlapping_tier("spans", &[(0., 10., "long"), (1., 2., "a"), (8., 9., "b")]);
    let removed = tier.remove(Point::new(4.5), Point::new(5.5), true).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].serialize_labels(" ", "", false), "long");
    assert_eq!(removed[0].parent_tier(), None);

    assert!(tier.find(Point::new(5.), Point::new(6.), true).is_empty());
    // equally far from both neighbours
    assert_eq!(tier.near(Point::new(5.), Direction::Nearest), Some(0));
    assert_eq!(tier.mindex(Point::new(5.), BoundMode::Inclusive), None);

    tier.set_location(0, Location::new(interval(1., 12.))).unwrap();
    assert_eq!(tier.find_indexes(Point::new(10.), Point::new(11.), true), vec![0]);
    tier.shift(1.).unwrap();
    assert_eq!(tier.rindex(Point::new(13.)), Some(0));
    assert_eq!(tier.mindex(Point::new(12.5), BoundMode::Exclusive), Some(0));
}

#[test]
fn fit_keeps_long_annotations_covering_the_other_tier() {
    let x = overlapping_tier("X", &[(0., 10., "long"), (1., 2., "a"), (3., 4., "b")]);
    let mut y = Tier::new("Y");
    y.append(Annotation::new(interval(5., 6.))).unwrap();
    insta::assert_snapshot!(x.fit(&y).unwrap().to_string(), @"X-inter-Y: [5, 6] long");

    let mut y = Tier::new("Y");
    y.append(Annotation::new(interval(1.5, 3.5))).unwrap();
    insta::assert_snapshot!(x.fit(&y).unwrap().to_string(), @"X-inter-Y: [1.5, 2] a | [1.5, 3.5] long | [3, 3.5] b");
}

#[test]
fn index_queries() {
    let tier = interval_tier("words", &[(1., 2., "a"), (2., 3., "b"), (3., 5., "c")]);
    assert_eq!(tier.lindex(Point::new(2.)), Some(1));
    assert_eq!(tier.lindex(Point::new(2.5)), None);
    assert_eq!(tier.rindex(Point::new(3.)), Some(1));
    assert_eq!(tier.rindex(Point::new(5.)), Some(2));
    assert_eq!(tier.index(Point::new(1.)), None);

    assert_eq!(tier.mindex(Point::new(2.), BoundMode::Exclusive), None);
    assert_eq!(tier.mindex(Point::new(2.), BoundMode::Inclusive), Some(0));
    assert_eq!(tier.mindex(Point::new(2.), BoundMode::IncludeBegin), Some(1));
    assert_eq!(tier.mindex(Point::new(2.), BoundMode::IncludeEnd), Some(0));
    assert_eq!(tier.mindex(Point::new(4.), BoundMode::from(0)), Some(2));
    assert_eq!(tier.mindex(Point::new(9.), BoundMode::from(2)), None);

    let points = point_tier("pitch", &[0.5, 1.0, 1.5]);
    assert_eq!(points.index(Point::new(1.0)), Some(1));
    assert_eq!(points.index(Point::new(1.2)), None);
}

#[test]
fn near_boundaries() {
    assert_eq!(Tier::new("empty").near(Point::new(1.), Direction::Nearest), None);

    let single = interval_tier("one", &[(4., 5., "a")]);
    assert_eq!(single.near(Point::new(0.), Direction::from(0)), Some(0));

    let tier = interval_tier("words", &[(1., 2., "a"), (4., 5., "b"), (8., 9., "c")]);
    assert_eq!(tier.near(Point::new(3.), Direction::Nearest), Some(0));
    assert_eq!(tier.near(Point::new(3.5), Direction::Nearest), Some(1));
    assert_eq!(tier.near(Point::new(4.5), Direction::Nearest), Some(1));
    assert_eq!(tier.near(Point::new(3.), Direction::Forward), Some(1));
    assert_eq!(tier.near(Point::new(7.), Direction::Backward), Some(1));
    assert_eq!(tier.near(Point::new(10.), Direction::Forward), None);
    assert_eq!(tier.near(Point::new(0.5), Direction::Backward), None);
}

#[test]
fn copy_keeps_identity() {
    let mut tier = interval_tier("words", &[(0., 1., "a"), (1., 2., "b")]);
    tier.set_meta("speaker", "spk1").unwrap();
    let copy = tier.copy();

    assert_eq!(copy.id(), tier.id());
    assert_eq!(copy.name(), tier.name());
    assert_eq!(copy.len(), tier.len());
    assert_eq!(copy.metadata(), tier.metadata());
    assert!(tier.is_superset(&tier));
    assert!(tier.is_superset(&copy));
}

#[test]
fn annotation_index_is_by_identifier() {
    let mut tier = Tier::new("overlaps");
    for (b, e) in [(0., 2.), (0., 1.), (1., 3.), (2., 3.)] {
        tier.add(Annotation::new(interval(b, e))).unwrap();
    }
    for (i, annotation) in tier.iter().enumerate() {
        assert_eq!(tier.get_annotation_index(annotation), Some(i));
    }
    let stranger = Annotation::new(interval(0., 2.));
    assert_eq!(tier.get_annotation_index(&stranger), None);
}

#[test]
fn superset_and_points() {
    let phones = interval_tier("phones", &[(0., 1., "a"), (1., 2., "b"), (2., 3., "c")]);
    let words = interval_tier("words", &[(0., 2., "ab"), (2., 3., "c")]);
    assert!(phones.is_superset(&words));
    assert!(!words.is_superset(&phones));
    assert_eq!(phones.get_midpoint_points(), vec![0., 1., 2., 3.]);
    assert_eq!(words.get_midpoint_intervals(), vec![(0., 2.), (2., 3.)]);
    assert_eq!(words.get_first_point(), Some(Point::new(0.)));
    assert_eq!(words.get_last_point(), Some(Point::new(3.)));
    assert!(words.has_point(Point::new(2.)));
    assert!(!words.has_point(Point::new(1.)));
    assert!(words.has_location(&Location::new(interval(0., 2.))));
}

#[test]
fn vague_points_are_equal() {
    let tier = interval_tier("words", &[(0., 1., "a"), (1., 2., "b")]);
    assert!(tier.has_point(Point::with_radius(1.004, 0.005)));
    assert_eq!(tier.lindex(Point::with_radius(0.998, 0.005)), Some(1));
}

#[test]
fn split_then_merge_restores_the_location() {
    let mut tier = interval_tier("words", &[(0., 1., "a"), (1., 3., "b"), (3., 4., "c")]);
    let original = tier[1].location().clone();

    let right = tier.split(1).unwrap();
    assert_eq!(right.location(), &Location::new(interval(2., 3.)));
    assert!(right.labels().is_empty());
    assert_eq!(tier.len(), 4);
    assert_eq!(tier[1].location(), &Location::new(interval(1., 2.)));

    assert!(tier.merge(1, Direction::Forward).unwrap());
    assert_eq!(tier.len(), 3);
    assert_eq!(tier[1].location(), &original);
    assert_eq!(tier[1].serialize_labels(" ", "", false), "b");
}

#[test]
fn merge_concatenates_labels_and_stops_at_ends() {
    let mut tier = interval_tier("words", &[(0., 1., "a"), (1., 2., "b"), (2., 3., "c")]);
    assert!(!tier.merge(0, Direction::Backward).unwrap());
    assert!(!tier.merge(2, Direction::Forward).unwrap());
    assert!(matches!(
        tier.merge(1, Direction::Nearest),
        Err(AnnDataError::TypeMismatch { .. })
    ));

    assert!(tier.merge(2, Direction::Backward).unwrap());
    insta::assert_snapshot!(tier.to_string(), @"words: [0, 1] a | [1, 3] b c");
}

#[test]
fn split_and_merge_disjoint() {
    let mut tier = Tier::new("disjoint");
    let disjoint = Disjoint::new(vec![interval(0., 1.), interval(2., 6.)]).unwrap();
    tier.append(Annotation::new(disjoint.clone())).unwrap();

    tier.split(0).unwrap();
    assert_eq!(tier.len(), 2);
    insta::assert_snapshot!(tier.to_string(), @"disjoint: {[0, 1] [2, 3]} | {[3, 6]}");
    assert!(tier.merge(0, Direction::Forward).unwrap());
    assert_eq!(tier[0].location(), &Location::new(disjoint));
}

#[test]
fn split_is_refused_on_point_tiers() {
    let mut points = point_tier("pitch", &[1.0, 2.0]);
    assert!(matches!(points.split(0), Err(AnnDataError::TypeMismatch { .. })));
    assert!(matches!(
        points.create_annotation_after(0, None),
        Err(AnnDataError::TypeMismatch { .. })
    ));
}

#[test]
fn fill_holes() {
    let mut tier = interval_tier("words", &[(1., 2., "a"), (3., 4., "b")]);
    assert_eq!(tier.create_annotation_before(0).unwrap(), 0);
    assert_eq!(tier.create_annotation_after(1, None).unwrap(), 2);
    assert_eq!(tier.create_annotation_after(3, Some(Point::new(5.))).unwrap(), 4);
    insta::assert_snapshot!(tier.to_string(), @"words: [0, 1] | [1, 2] a | [2, 3] | [3, 4] b | [4, 5]");

    assert!(matches!(
        tier.create_annotation_before(1),
        Err(AnnDataError::TierAdd { .. })
    ));
    assert!(matches!(
        tier.create_annotation_after(4, None),
        Err(AnnDataError::TierAdd { .. })
    ));
}

#[test]
fn export_runs_and_holes() {
    let tier = interval_tier(
        "phones",
        &[(0., 1., "a"), (1., 2., "#"), (2., 3., "b"), (3., 4., "c"), (5., 6., "d")],
    );
    let runs = tier
        .export_to_intervals(&ExportConfig::with_separators(["#"]))
        .unwrap();
    insta::assert_snapshot!(runs.to_string(), @"phones: [0, 1] | [2, 4] | [5, 6]");

    let runs = tier
        .export_to_intervals(&ExportConfig::with_silences(&SilenceConfig::default()))
        .unwrap();
    assert_eq!(runs.len(), 3);

    let holes = tier.export_unfilled().unwrap();
    insta::assert_snapshot!(holes.to_string(), @"phones: [4, 5]");

    let points = point_tier("pitch", &[1.0, 2.0]);
    assert!(points.export_to_intervals(&ExportConfig::default()).unwrap().is_empty());
}

#[test]
fn remove_inside_or_overlapping() {
    let mut tier = interval_tier("words", &[(0., 1., "a"), (1., 2., "b"), (2., 4., "c")]);
    let removed = tier.remove(Point::new(0.5), Point::new(3.), false).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].parent_tier(), None);
    assert_eq!(tier.len(), 2);
    let removed = tier.remove(Point::new(0.5), Point::new(3.), true).unwrap();
    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0].serialize_labels(" ", "", false), "a");
    assert!(tier.is_empty());
    assert!(matches!(
        tier.remove(Point::new(3.), Point::new(1.), true),
        Err(AnnDataError::IntervalBounds { .. })
    ));
}

#[test]
fn set_location_rolls_back_on_duplicate() {
    let mut tier = interval_tier("words", &[(0., 1., "a"), (1., 2., "b"), (2., 3., "c")]);
    let err = tier.set_location(2, Location::new(interval(0., 1.))).unwrap_err();
    assert!(matches!(err, AnnDataError::TierAdd { .. }));
    assert_eq!(tier[2].serialize_labels(" ", "", false), "c");
    assert_eq!(tier[2].lowest(), Point::new(2.));

    let index = tier.set_location(2, Location::new(interval(0.5, 0.8))).unwrap();
    assert_eq!(index, 1);
    assert!(is_sorted(&tier));
}

#[test]
fn labels_follow_the_vocabulary() {
    let vocab = Arc::new(CtrlVocab::from_strs("pos", ["noun", "verb"]).unwrap());
    let mut tier = interval_tier("pos", &[(0., 1., "noun")]);
    tier.set_ctrl_vocab(Some(vocab)).unwrap();

    assert!(matches!(
        tier.set_labels(0, vec![Label::from("adj")]),
        Err(AnnDataError::CtrlVocabViolation { .. })
    ));
    let old = tier.set_labels(0, vec![Label::from("verb")]).unwrap();
    assert_eq!(old, vec![Label::from("noun")]);
    tier.append(Annotation::new(interval(1., 2.))).unwrap();

    let rebuilt = tier.create_ctrl_vocab(Some("used")).unwrap();
    assert_eq!(rebuilt.len(), 1);
    assert!(rebuilt.contains(&Tag::from("verb")));
    assert!(tier.is_string());
    assert_eq!(tier.get_nb_filled_labels(), 1);
}

#[test]
fn silences_and_shift() {
    let mut tier = interval_tier("phones", &[(0., 1., "#"), (1., 2., "a")]);
    let silences = SilenceConfig::default();
    assert!(tier.is_silence(0, &silences));
    assert!(!tier.is_silence(1, &silences));

    tier.shift(0.5).unwrap();
    assert_eq!(tier.get_midpoint_intervals(), vec![(0.5, 1.5), (1.5, 2.5)]);
    assert!(matches!(tier.shift(-1.), Err(AnnDataError::IntervalBounds { .. })));
    assert_eq!(tier.get_first_point(), Some(Point::new(0.5)));
}
