use super::*;

#[test]
fn result_uses_camel_case_and_tolerates_missing_masks() {
    let json = serde_json::json!({
        "frameIndex": 105,
        "player1Mask": { "size": [2, 3], "counts": "1 2 3" },
        "player2Mask": null
    });
    let r: SegmentationResult = serde_json::from_value(json).unwrap();
    assert_eq!(r.frame_index, FrameIndex(105));
    assert_eq!(r.mask(PlayerId::One).unwrap().counts, "1 2 3");
    assert!(r.mask(PlayerId::Two).is_none());

    let bare: SegmentationResult =
        serde_json::from_value(serde_json::json!({ "frameIndex": 7 })).unwrap();
    assert!(bare.layers().player1.is_none());
    assert!(bare.layers().player2.is_none());

    let back = serde_json::to_value(&r).unwrap();
    assert_eq!(back["frameIndex"], 105);
    assert!(back.get("player1Mask").is_some());
}

#[test]
fn completed_status_yields_results() {
    let status: SegmentationStatus = serde_json::from_value(serde_json::json!({
        "status": "completed",
        "progress": 100.0,
        "message": "done",
        "results": [{ "frameIndex": 1 }]
    }))
    .unwrap();
    assert!(status.status.is_terminal());
    let results = status.into_results().unwrap();
    assert_eq!(results.len(), 1);
}

#[test]
fn failed_and_running_statuses_are_service_errors() {
    let failed = SegmentationStatus {
        status: JobState::Failed,
        progress: 40.0,
        message: "model crashed".to_string(),
        results: None,
    };
    let err = failed.into_results().unwrap_err();
    assert!(matches!(err, SegmarkError::Service(ref m) if m == "model crashed"));

    let running = SegmentationStatus {
        status: JobState::Processing,
        progress: 12.0,
        message: String::new(),
        results: None,
    };
    assert!(!running.status.is_terminal());
    assert!(running.into_results().is_err());
}

#[test]
fn in_memory_service_replays_and_records() {
    let mut svc = InMemoryService::new()
        .with_results(vec![SegmentationResult {
            frame_index: FrameIndex(3),
            ..Default::default()
        }])
        .with_failure("busy");

    let input = MarkerInput::default();
    let first = svc.segment("vid-a", &input).unwrap();
    assert_eq!(first[0].frame_index, FrameIndex(3));
    assert!(svc.segment("vid-a", &input).is_err());
    assert!(svc.segment("vid-b", &input).unwrap().is_empty());

    let ids: Vec<&str> = svc.requests().iter().map(|r| r.video_id.as_str()).collect();
    assert_eq!(ids, ["vid-a", "vid-a", "vid-b"]);
}
