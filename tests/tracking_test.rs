use rallytrack_rs::{
    Association, Centroid, Detection, FrameOutcome, RallySession, ReplaySource, SessionConfig,
    SessionPipeline, UnitConverter, VideoInfo,
};

fn player(cx: f32, cy: f32) -> Detection {
    Detection::new(0, 0.9, cx - 25.0, cy - 50.0, cx + 25.0, cy + 50.0)
}

fn ball(cx: f32, cy: f32) -> Detection {
    Detection::new(32, 0.2, cx - 5.0, cy - 5.0, cx + 5.0, cy + 5.0)
}

fn session() -> RallySession {
    RallySession::new(SessionConfig::default(), VideoInfo::new(1280, 720, 30.0)).unwrap()
}

#[test]
fn test_basic_tracking() {
    let mut s = session();
    let converter = *s.converter();

    // Frame 2: one player, no prior tracks
    let a = s.analyze(2, &[player(100.0, 100.0)]).unwrap();
    assert_eq!(a.players.len(), 1);
    assert_eq!(a.players[0].track_id, 1);
    assert_eq!(s.tracker().get(1).unwrap().cumulative_distance_m, 0.0);

    // Frame 4: same player moved by (3, 4)
    let a = s.analyze(4, &[player(103.0, 104.0)]).unwrap();
    assert_eq!(a.players[0].track_id, 1);
    assert_eq!(s.tracker().unique_players(), 1);
    let expected = converter.distance_m(3.0, 4.0);
    assert!((s.tracker().get(1).unwrap().cumulative_distance_m - expected).abs() < 1e-12);

    // Frame 6: player missing
    let a = s.analyze(6, &[]).unwrap();
    assert!(a.players.is_empty());

    // Frame 8: player reappears near the last known position
    let a = s.analyze(8, &[player(150.0, 104.0)]).unwrap();
    assert_eq!(a.players[0].track_id, 1);

    let stats = s.finish();
    assert_eq!(stats.total_frames, 4);
    assert_eq!(stats.players_detected, 3);
    assert_eq!(stats.unique_players, 1);
    assert!((stats.average_players_per_frame - 0.75).abs() < 1e-12);
    let expected_total = converter.distance_m(3.0, 4.0) + converter.distance_m(47.0, 0.0);
    assert!((stats.player_distances_m[&1] - expected_total).abs() < 1e-12);
}

#[test]
fn test_ball_hit_sequence() {
    let mut s = session();
    assert!(!s.analyze(2, &[ball(200.0, 200.0)]).unwrap().ball_hit);
    assert!(s.analyze(4, &[ball(260.0, 200.0)]).unwrap().ball_hit);
    assert!(s.analyze(6, &[ball(205.0, 200.0)]).unwrap().ball_hit);
    assert!(!s.analyze(8, &[ball(230.0, 200.0)]).unwrap().ball_hit);
    assert!(!s.analyze(10, &[]).unwrap().ball_hit);
    assert_eq!(s.ball().last_position(), Some(Centroid::new(230.0, 200.0)));

    let stats = s.finish();
    assert_eq!(stats.ball_hit_count, 2);
    assert_eq!(stats.ball_detections, 4);
    // 4 ball frames at 30 fps
    assert_eq!(stats.rally_duration_seconds, 0.13);
}

#[test]
fn test_no_frames_analyzed() {
    let stats = session().finish();
    assert_eq!(stats.total_frames, 0);
    assert_eq!(stats.average_players_per_frame, 0.0);
    assert_eq!(stats.rally_duration_seconds, 0.0);
    assert_eq!(stats.unique_players, 0);
    assert!(stats.player_distances_m.is_empty());
}

#[test]
fn test_no_ball_means_no_rally() {
    let mut s = session();
    for i in 1..=5 {
        s.analyze(i * 2, &[player(100.0, 100.0)]).unwrap();
    }
    let stats = s.finish();
    assert_eq!(stats.rally_duration_seconds, 0.0);
    assert_eq!(stats.ball_hit_count, 0);
}

#[test]
fn test_two_players_keep_identities() {
    let mut s = session();
    let first = [player(200.0, 500.0), player(1000.0, 200.0)];
    s.analyze(2, &first).unwrap();
    for step in 1..=10 {
        let dx = step as f32 * 10.0;
        let frame = [player(1000.0 - dx, 200.0), player(200.0 + dx, 500.0)];
        let a = s.analyze(2 + step * 2, &frame).unwrap();
        let ids: Vec<u32> = a.players.iter().map(|p| p.track_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
    let stats = s.finish();
    assert_eq!(stats.unique_players, 2);
    let converter = UnitConverter::new(Default::default(), 1280.0, 720.0).unwrap();
    let expected = converter.distance_m(100.0, 0.0);
    assert!((stats.player_distances_m[&1] - expected).abs() < 1e-9);
    assert!((stats.player_distances_m[&2] - expected).abs() < 1e-9);
}

#[test]
fn test_optimal_association_splits_crowded_frame() {
    let config = SessionConfig {
        association: Association::Optimal,
        ..SessionConfig::default()
    };
    let mut s = RallySession::new(config, VideoInfo::new(1280, 720, 30.0)).unwrap();
    let crowded = [player(140.0, 100.0), player(110.0, 100.0)];
    s.analyze(2, &[player(100.0, 100.0)]).unwrap();
    let a = s.analyze(4, &crowded).unwrap();
    assert_eq!(a.players[0].track_id, 2);
    assert_eq!(a.players[1].track_id, 1);

    // Greedy would hand both detections to track 1.
    let mut greedy = session();
    greedy.analyze(2, &[player(100.0, 100.0)]).unwrap();
    let a = greedy.analyze(4, &crowded).unwrap();
    assert_eq!(a.players[0].track_id, 1);
    assert_eq!(a.players[1].track_id, 1);
}

#[test]
fn test_replay_pipeline_end_to_end() {
    let recording = r#"{
        "video": { "width": 1280, "height": 720, "fps": 30.0 },
        "frames": [
            {},
            { "detections": [
                { "class_id": 0, "score": 0.9, "bbox": [75, 50, 125, 150] },
                { "class_id": 32, "score": 0.3, "bbox": [195, 195, 205, 205] }
            ] },
            {},
            { "error": "model timeout" },
            {},
            { "detections": [
                { "class_id": 0, "score": 0.9, "bbox": [78, 54, 128, 154] },
                { "class_id": 32, "score": 0.3, "bbox": [295, 195, 305, 205] }
            ] },
            {},
            { "detections": [] }
        ]
    }"#;

    let source = ReplaySource::from_json_str(recording).unwrap();
    let video = source.video();
    let mut pipeline = SessionPipeline::with_default_config(source, video).unwrap();

    let mut analyzed = Vec::new();
    let mut failed = Vec::new();
    for _ in 0..8 {
        match pipeline.process_frame(&[]) {
            FrameOutcome::Analyzed(a) => analyzed.push(a),
            FrameOutcome::Failed { frame_index, .. } => failed.push(frame_index),
            FrameOutcome::Passthrough { .. } => {}
            FrameOutcome::StreamEnded => break,
        }
    }

    assert_eq!(failed, vec![4]);
    let indices: Vec<u64> = analyzed.iter().map(|a| a.frame_index).collect();
    assert_eq!(indices, vec![2, 6, 8]);
    assert!(analyzed[1].ball_hit);
    assert_eq!(analyzed[1].players[0].label(), "P1");

    let stats = pipeline.finish();
    assert_eq!(stats.total_frames, 3);
    assert_eq!(stats.frames_read, 8);
    assert_eq!(stats.failed_frames, 1);
    assert_eq!(stats.players_detected, 2);
    assert_eq!(stats.unique_players, 1);
    assert_eq!(stats.ball_detections, 2);
    assert_eq!(stats.ball_hit_count, 1);
    assert_eq!(stats.rally_duration_seconds, 0.07);

    let json: serde_json::Value = serde_json::from_str(&stats.to_json_pretty().unwrap()).unwrap();
    assert_eq!(json["unique_players"], 1);
    assert!(json["player_distances_m"]["1"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_sessions_are_isolated() {
    let mut a = session();
    let mut b = session();
    let pair = [player(100.0, 100.0), player(600.0, 100.0)];
    a.analyze(2, &pair).unwrap();
    let out = b.analyze(2, &[player(900.0, 300.0)]).unwrap();
    assert_eq!(out.players[0].track_id, 1);
    assert_eq!(a.tracker().unique_players(), 2);
    assert_eq!(b.tracker().unique_players(), 1);
}
