use layered_anndata::{AnnDataError, Annotation, Interval, Label, Tag, Tier};

use crate::{
    AnnSet, LabelLogic, PredicateKind, PredicateSpec, RelationFilter, RelationOptions,
    SingleFilter,
};

fn interval(b: f64, e: f64) -> Interval {
    Interval::from_secs(b, e).unwrap()
}

fn labelled(name: &str, items: &[(f64, f64, &str)]) -> Tier {
    let mut tier = Tier::new(name);
    for &(b, e, text) in items {
        tier.append(Annotation::with_labels(interval(b, e), vec![Label::from(text)]))
            .unwrap();
    }
    tier
}

fn unlabelled(name: &str, items: &[(f64, f64)]) -> Tier {
    let mut tier = Tier::new(name);
    for &(b, e) in items {
        tier.append(Annotation::new(interval(b, e))).unwrap();
    }
    tier
}

fn phones() -> Tier {
    labelled(
        "phones",
        &[
            (0.0, 0.1, "#"),
            (0.1, 0.4, "a"),
            (0.4, 0.65, "#"),
            (0.65, 0.95, "b"),
            (0.95, 1.25, "#"),
            (1.25, 1.55, "c"),
            (1.55, 1.65, "#"),
        ],
    )
}

fn tag(function: &str, values: &[&str]) -> PredicateSpec {
    let values = values.iter().map(|v| (*v).into()).collect();
    PredicateSpec::parse(PredicateKind::Tag, function, values).unwrap()
}

#[test]
fn silence_filter() {
    let tier = phones();
    let silences = SingleFilter::new(&tier)
        .predicate(tag("exact", &["#"]))
        .to_tier("silences", false)
        .unwrap();

    insta::assert_snapshot!(silences.to_string(), @"silences: [0, 0.1] # | [0.4, 0.65] # | [0.95, 1.25] # | [1.55, 1.65] #");
    // the input is untouched
    assert_eq!(tier.len(), 7);
}

#[test]
fn long_silences() {
    let tier = phones();
    let filter = SingleFilter::new(&tier)
        .predicate(tag("exact", &["#"]))
        .predicate(PredicateSpec::parse(PredicateKind::Dur, "gt", vec![0.2.into()]).unwrap())
        .match_all(true);

    let long = filter.to_tier("long", false).unwrap();
    insta::assert_snapshot!(long.to_string(), @"long: [0.4, 0.65] # | [0.95, 1.25] #");

    let described = filter.to_tier("long", true).unwrap();
    let labels: Vec<String> = described[0].labels().iter().map(|l| l.to_string()).collect();
    assert_eq!(labels, vec!["exact = #", "gt = 0.2"]);

    // without match_all, the union of both predicates
    let either = filter.clone().match_all(false).run().unwrap();
    assert_eq!(either.len(), 7);
}

#[test]
fn overlap_relation() {
    let x = unlabelled("X", &[(1., 3.), (4., 6.), (7., 10.)]);
    let y = unlabelled("Y", &[(2., 5.), (8., 9.)]);
    let filter = RelationFilter::new(&x, &y).functions(["overlaps", "overlappedby"]);

    insta::assert_snapshot!(filter.run().unwrap().to_string(), @"[1, 3] (overlaps) | [4, 6] (overlappedby) | [7, 10] (overlaps)");

    let fitted = filter.to_tier("overlap", false, true).unwrap();
    insta::assert_snapshot!(fitted.to_string(), @"overlap: [2, 3] | [4, 5] | [8, 9]");

    let described = filter.to_tier("overlap", true, true).unwrap();
    insta::assert_snapshot!(described.to_string(), @"overlap: [2, 3] overlaps | [4, 5] overlappedby | [8, 9] overlaps");
}

#[test]
fn relation_options_and_negation() {
    let x = unlabelled("X", &[(0., 1.), (3., 4.)]);
    let y = unlabelled("Y", &[(1.2, 2.)]);

    let near = RelationFilter::new(&x, &y)
        .function("before")
        .options(RelationOptions {
            max_delay: Some(0.5),
            ..Default::default()
        })
        .run()
        .unwrap();
    insta::assert_snapshot!(near.to_string(), @"[0, 1] (before)");

    let not_before = RelationFilter::new(&x, &y).function("not_before").run().unwrap();
    insta::assert_snapshot!(not_before.to_string(), @"[3, 4] (not_before)");

    let err = RelationFilter::new(&x, &y).function("near").run().unwrap_err();
    assert!(matches!(err, AnnDataError::UnknownFunction { .. }));
}

#[test]
fn negation_and_case() {
    let tier = labelled("words", &[(0., 1., "Hello"), (1., 2., "#"), (2., 3., "world")]);

    let words = SingleFilter::new(&tier)
        .predicate(tag("not_exact", &["#"]))
        .run()
        .unwrap();
    insta::assert_snapshot!(words.to_string(), @"[0, 1] (not_exact = #) | [2, 3] (not_exact = #)");

    let hello = SingleFilter::new(&tier)
        .predicate(tag("istartswith", &["hel", "WOR"]))
        .run()
        .unwrap();
    assert_eq!(hello.len(), 2);
    assert_eq!(hello.provenance(&tier[0]).unwrap(), ["istartswith = hel"]);
}

#[test]
fn label_logic() {
    let mut tier = Tier::new("tokens");
    tier.append(Annotation::with_labels(
        interval(0., 1.),
        vec![Label::from("#"), Label::from("a")],
    ))
    .unwrap();
    tier.append(Annotation::with_labels(
        interval(1., 2.),
        vec![Label::from("#"), Label::from("#")],
    ))
    .unwrap();
    tier.append(Annotation::new(interval(2., 3.))).unwrap();

    let any = SingleFilter::new(&tier).predicate(tag("exact", &["#"])).run().unwrap();
    assert_eq!(any.len(), 2);

    let all = SingleFilter::new(&tier)
        .predicate(tag("exact", &["#"]).with_label_logic(LabelLogic::All))
        .run()
        .unwrap();
    insta::assert_snapshot!(all.to_string(), @"[1, 2] (exact = #)");

    let two = SingleFilter::new(&tier)
        .predicate(PredicateSpec::parse(PredicateKind::Nlab, "leq", vec![2_i64.into()]).unwrap())
        .run()
        .unwrap();
    assert_eq!(two.len(), 2);
}

#[test]
fn localization_predicates() {
    let tier = phones();
    let late = SingleFilter::new(&tier)
        .predicate(PredicateSpec::parse(PredicateKind::Loc, "rangefrom", vec![0.95.into()]).unwrap())
        .predicate(PredicateSpec::parse(PredicateKind::Loc, "rangeto", vec![1.55.into()]).unwrap())
        .match_all(true)
        .to_tier("late", false)
        .unwrap();
    insta::assert_snapshot!(late.to_string(), @"late: [0.95, 1.25] # | [1.25, 1.55] c");
}

#[test]
fn value_casts() {
    let tier = phones();
    let err = SingleFilter::new(&tier)
        .predicate(PredicateSpec::parse(PredicateKind::Dur, "gt", vec!["long".into()]).unwrap())
        .run()
        .unwrap_err();
    assert!(matches!(err, AnnDataError::ValueCast { .. }));

    let mut counts = Tier::new("counts");
    for (i, n) in [3_i64, 5, 3].into_iter().enumerate() {
        let b = i as f64;
        counts
            .append(Annotation::with_labels(interval(b, b + 1.), vec![Label::new(Tag::from(n))]))
            .unwrap();
    }
    let threes = SingleFilter::new(&counts).predicate(tag("exact", &["3"])).run().unwrap();
    assert_eq!(threes.len(), 2);
    let err = SingleFilter::new(&counts).predicate(tag("exact", &["three"])).run().unwrap_err();
    assert!(matches!(err, AnnDataError::ValueCast { .. }));

    let greater = SingleFilter::new(&counts)
        .predicate(PredicateSpec::parse(PredicateKind::Tag, "greater", vec![4_i64.into()]).unwrap())
        .run()
        .unwrap();
    assert_eq!(greater.len(), 1);
}

#[test]
fn typed_tags_compare_by_value() {
    let mut pitches = Tier::new("pitches");
    for (i, f) in [0.5, 0.25, 0.5].into_iter().enumerate() {
        let b = i as f64;
        pitches
            .append(Annotation::with_labels(interval(b, b + 1.), vec![Label::new(Tag::from(f))]))
            .unwrap();
    }
    let halves = SingleFilter::new(&pitches).predicate(tag("exact", &["0.50"])).run().unwrap();
    assert_eq!(halves.len(), 2);
    let others = SingleFilter::new(&pitches)
        .predicate(tag("not_iexact", &[".5"]))
        .run()
        .unwrap();
    assert_eq!(others.len(), 1);
}

#[test]
fn whole_tier_round_trip() {
    let tier = phones();
    let mut all = AnnSet::new();
    for annotation in &tier {
        all.append(annotation, "all");
    }
    let copy = all.to_tier("copy", false).unwrap();
    assert_eq!(copy.len(), tier.len());
    for (a, b) in copy.iter().zip(tier.iter()) {
        assert_eq!(a.location(), b.location());
        assert_eq!(a.labels(), b.labels());
    }
}

#[test]
fn no_predicates_selects_nothing() {
    let tier = phones();
    assert!(SingleFilter::new(&tier).run().unwrap().is_empty());
}
