use std::sync::Arc;

use crate::{AnnDataError, Annotation, CtrlVocab, Interval, Label, MetaObject, Tier};

fn interval(b: f64, e: f64) -> Interval {
    Interval::from_secs(b, e).unwrap()
}

#[test]
fn fit_clips_to_the_other_tier() {
    let mut x = Tier::new("X");
    x.append(Annotation::new(interval(1., 2.))).unwrap();
    for (b, e, text) in [(3., 4., "a"), (4., 5., "b"), (7., 8., "c")] {
        x.append(Annotation::with_labels(interval(b, e), vec![Label::from(text)]))
            .unwrap();
    }
    let mut y = Tier::new("Y");
    y.append(Annotation::new(interval(3.5, 4.5))).unwrap();
    y.append(Annotation::new(interval(6., 8.))).unwrap();

    let fitted = x.fit(&y).unwrap();
    insta::assert_snapshot!(fitted.to_string(), @"X-inter-Y: [3.5, 4] a | [4, 4.5] b | [7, 8] c");

    // copies, not moves
    assert_eq!(x.len(), 4);
    assert_ne!(fitted[0].id(), x[1].id());
    assert_eq!(fitted[0].parent_tier(), Some(fitted.id()));
}

#[test]
fn ctrl_vocab_rejects_unknown_tags() {
    let vocab = CtrlVocab::from_strs("lexical", ["def", "ex", "comp"]).unwrap();
    let mut tier = Tier::new("lexical");
    tier.set_ctrl_vocab(Some(Arc::new(vocab))).unwrap();

    let err = tier
        .append(Annotation::with_labels(interval(0., 1.), vec![Label::from("biz")]))
        .unwrap_err();
    assert!(matches!(err, AnnDataError::CtrlVocabViolation { .. }));
    insta::assert_snapshot!(err.to_string(), @r#"tag "biz" is not in controlled vocabulary "lexical""#);
    assert_eq!(tier.len(), 0);

    tier.append(Annotation::with_labels(interval(0., 1.), vec![Label::from("def")]))
        .unwrap();
    tier.append(Annotation::new(interval(1., 2.))).unwrap();
    assert_eq!(tier.len(), 2);
}

#[test]
fn insertion_sort_add() {
    let bounds = [
        (4., 5.),
        (1., 3.),
        (7., 8.),
        (0., 1.),
        (1., 2.),
        (5., 7.),
        (3., 4.),
        (8., 9.5),
        (0., 0.5),
    ];
    let mut tier = Tier::new("shuffled");
    for &(b, e) in &bounds {
        tier.add(Annotation::new(interval(b, e))).unwrap();
    }

    let mut sorted = bounds.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(tier.get_midpoint_intervals(), sorted);

    let err = tier.add(Annotation::new(interval(1., 3.))).unwrap_err();
    assert!(matches!(err, AnnDataError::TierAdd { .. }));
    assert_eq!(tier.len(), 9);
}
