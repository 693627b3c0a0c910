use super::*;
use crate::foundation::core::Point;
use serde_json::json;

fn ann(p1: &[(f64, f64)], p1n: &[(f64, f64)], p2: &[(f64, f64)], p2n: &[(f64, f64)]) -> FrameAnnotation {
    let to = |v: &[(f64, f64)]| v.iter().map(|&(x, y)| Point::new(x, y)).collect();
    FrameAnnotation {
        player1_positive: to(p1),
        player1_negative: to(p1n),
        player2_positive: to(p2),
        player2_negative: to(p2n),
    }
}

fn scenario_chunks() -> ChunkSet {
    ChunkSet::from_ranges(vec![
        vec![[105, 970], [1200, 1500]],
        vec![[3566, 4365], [4615, 4810]],
        vec![[5000, 5600]],
        vec![[6000, 6500]],
    ])
    .unwrap()
}

fn scenario_collection() -> AnnotationCollection {
    let mut c = AnnotationCollection::new();
    c.insert(
        FrameIndex(105),
        ann(
            &[(332.5, 347.45), (339.5, 387.45)],
            &[],
            &[(602.5, 385.45), (604.5, 422.45)],
            &[],
        ),
    );
    c.insert(
        FrameIndex(4615),
        ann(&[(378.5, 376.45)], &[], &[(629.5, 342.45)], &[]),
    );
    c
}

#[test]
fn scenario_places_frames_in_their_chunks() {
    let out = aggregate(&scenario_collection(), &scenario_chunks());
    let mi = &out.marker_input.marker_input;
    assert_eq!(mi.len(), 4);

    assert_eq!(mi[0].len(), 2);
    assert_eq!(mi[0][0].frame_idx, FrameIndex(105));
    assert_eq!(mi[0][0].player_id, PlayerId::One);
    assert_eq!(mi[0][0].points, vec![[332.5, 347.45], [339.5, 387.45]]);
    assert_eq!(mi[0][0].labels, vec![vec![1, 1]]);
    assert_eq!(mi[0][1].player_id, PlayerId::Two);

    assert_eq!(mi[1].len(), 2);
    assert_eq!(mi[1][0].frame_idx, FrameIndex(4615));
    assert_eq!(mi[1][1].points, vec![[629.5, 342.45]]);

    assert!(mi[2].is_empty());
    assert!(mi[3].is_empty());
    assert!(!out.is_valid);
    assert_eq!(
        out.missing(),
        vec![
            (2, PlayerId::One),
            (2, PlayerId::Two),
            (3, PlayerId::One),
            (3, PlayerId::Two)
        ]
    );
}

#[test]
fn scenario_becomes_valid_once_every_chunk_is_covered() {
    let mut c = scenario_collection();
    c.insert(FrameIndex(5100), ann(&[(1.0, 1.0)], &[], &[(2.0, 2.0)], &[]));
    // Players may be covered on different frames of the same chunk.
    c.insert(FrameIndex(6001), ann(&[(1.0, 1.0)], &[], &[], &[]));
    c.insert(FrameIndex(6400), ann(&[], &[], &[(2.0, 2.0)], &[]));
    let out = aggregate(&c, &scenario_chunks());
    assert!(out.is_valid);
    assert!(out.missing().is_empty());
}

#[test]
fn negatives_follow_positives_with_parallel_labels() {
    let mut c = AnnotationCollection::new();
    c.insert(
        FrameIndex(3),
        ann(&[(1.0, 2.0)], &[(3.0, 4.0), (5.0, 6.0)], &[], &[(7.0, 8.0)]),
    );
    let chunks = ChunkSet::from_ranges(vec![vec![[0, 10]]]).unwrap();
    let out = aggregate(&c, &chunks);
    let recs = &out.marker_input.marker_input[0];
    assert_eq!(recs[0].points, vec![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
    assert_eq!(recs[0].labels, vec![vec![1, 0, 0]]);
    assert_eq!(recs[1].points, vec![[7.0, 8.0]]);
    assert_eq!(recs[1].labels, vec![vec![0]]);
    assert!(recs[0].has_positive());
    assert!(!recs[1].has_positive());
    assert!(!out.is_valid);
}

#[test]
fn negative_only_chunk_is_invalid() {
    let mut c = AnnotationCollection::new();
    c.insert(FrameIndex(1), ann(&[], &[(1.0, 1.0)], &[], &[(1.0, 1.0)]));
    let chunks = ChunkSet::from_ranges(vec![vec![[0, 10]]]).unwrap();
    assert!(!aggregate(&c, &chunks).is_valid);
}

#[test]
fn out_of_range_frames_are_dropped() {
    let mut c = AnnotationCollection::new();
    c.insert(FrameIndex(99), ann(&[(1.0, 1.0)], &[], &[(1.0, 1.0)], &[]));
    c.insert(FrameIndex(5), ann(&[(1.0, 1.0)], &[], &[(1.0, 1.0)], &[]));
    let chunks = ChunkSet::from_ranges(vec![vec![[0, 10]]]).unwrap();
    let out = aggregate(&c, &chunks);
    assert_eq!(out.marker_input.marker_input[0].len(), 2);
    assert!(
        out.marker_input.marker_input[0]
            .iter()
            .all(|r| r.frame_idx == FrameIndex(5))
    );
    assert!(out.is_valid);
}

#[test]
fn empty_chunk_list_is_never_valid() {
    let out = aggregate(&scenario_collection(), &ChunkSet::default());
    assert!(out.marker_input.marker_input.is_empty());
    assert!(!out.is_valid);
}

#[test]
fn records_are_frame_ordered_within_a_chunk() {
    let mut c = AnnotationCollection::new();
    for f in [9u64, 2, 5] {
        c.insert(FrameIndex(f), ann(&[(f as f64, 0.0)], &[], &[], &[]));
    }
    let chunks = ChunkSet::from_ranges(vec![vec![[0, 10]]]).unwrap();
    let frames: Vec<u64> = aggregate(&c, &chunks).marker_input.marker_input[0]
        .iter()
        .map(|r| r.frame_idx.0)
        .collect();
    assert_eq!(frames, vec![2, 2, 5, 5, 9, 9]);
}

#[test]
fn aggregate_is_deterministic() {
    let a = aggregate(&scenario_collection(), &scenario_chunks());
    let b = aggregate(&scenario_collection(), &scenario_chunks());
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a.marker_input).unwrap(),
        serde_json::to_string(&b.marker_input).unwrap()
    );
}

#[test]
fn wire_shape_matches_service_schema() {
    let mut c = AnnotationCollection::new();
    c.insert(FrameIndex(4), ann(&[(0.5, 0.25)], &[], &[], &[(1.0, 2.0)]));
    let chunks = ChunkSet::from_ranges(vec![vec![[0, 10]]]).unwrap();
    let v = serde_json::to_value(aggregate(&c, &chunks).marker_input).unwrap();
    assert_eq!(
        v,
        json!({
            "marker_input": [[
                { "frame_idx": 4, "player_id": 1, "points": [[0.5, 0.25]], "labels": [[1]] },
                { "frame_idx": 4, "player_id": 2, "points": [[1.0, 2.0]], "labels": [[0]] }
            ]]
        })
    );
}
