use subsync_core::{
    SrtOptions, SyncSettings, Synchronizer, TimelineStage,
    fixtures::{demo_scene_map, vending_manifest},
    load_scene_map,
    sync::rehearse,
    timeline_to_srt, write_srt, write_timeline_json,
};
use tempfile::tempdir;

#[test]
fn rehearsal_reports_matches_per_scene() {
    let temp = tempdir().expect("tempdir should be creatable");
    let audio_dir = temp.path().join("audio");
    std::fs::create_dir_all(&audio_dir).expect("audio dir should be creatable");
    std::fs::write(audio_dir.join("scene_03_01.wav"), b"RIFF").expect("clip should be writable");

    let manifest = vending_manifest();
    let settings = SyncSettings {
        audio_root: temp.path().to_path_buf(),
        ..SyncSettings::default()
    };
    let synchronizer = Synchronizer::new(&manifest, &settings);
    let mut stage = TimelineStage::new();
    let reports = rehearse(&synchronizer, &demo_scene_map(), &mut stage);
    let timeline = stage.finish();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].group, "Scene01");
    assert_eq!(reports[0].matched, 0);
    assert_eq!(reports[0].clips, 0);

    let vending = &reports[1];
    assert_eq!(vending.group, "Scene03");
    assert_eq!(vending.matched, 2);
    assert_eq!(vending.with_audio, 1);
    assert_eq!(vending.cursor, 2);

    // three intro lines and one unrendered clip at 3.0s each, then the 3.5s clip
    let expected = 4.0 * (0.3 + 3.0 + 0.1) + (0.3 + 3.5 + 0.1);
    assert!((timeline.duration - expected).abs() < 1e-9);
    assert_eq!(timeline.subtitles.len(), 5);
    assert!(timeline.subtitles.iter().all(|cue| cue.end.is_some()));
    assert_eq!(timeline.audio.len(), 1);
    assert!((timeline.audio[0].start - 4.0 * 3.4).abs() < 1e-9);

    let intro_end = timeline.subtitles[2].end.expect("intro closes");
    assert!((intro_end - timeline.subtitles[3].start).abs() < 1e-9);
}

#[test]
fn timeline_exports_to_srt_and_json() {
    let temp = tempdir().expect("tempdir should be creatable");
    let scene_map_path = temp.path().join("scene_map.json");
    std::fs::write(
        &scene_map_path,
        serde_json::to_vec_pretty(&demo_scene_map()).expect("scene map should encode"),
    )
    .expect("scene map should be writable");

    let scene_map = load_scene_map(&scene_map_path).expect("scene map should load");
    let manifest = vending_manifest();
    let settings = SyncSettings::default();
    let synchronizer = Synchronizer::new(&manifest, &settings);
    let mut stage = TimelineStage::new();
    rehearse(&synchronizer, &scene_map, &mut stage);
    let timeline = stage.finish();

    let srt = timeline_to_srt(&timeline, SrtOptions::default());
    assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:03,400\n"));
    assert!(srt.contains("\n5\n"));

    let srt_path = temp.path().join("out/video.srt");
    let json_path = temp.path().join("out/timeline.json");
    write_srt(&srt_path, &timeline, SrtOptions::default()).expect("srt should write");
    write_timeline_json(&json_path, &timeline).expect("json should write");

    assert_eq!(std::fs::read_to_string(&srt_path).expect("srt readable"), srt);
    let decoded: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&json_path).expect("json readable"))
            .expect("json should parse");
    assert_eq!(decoded["subtitles"].as_array().map(Vec::len), Some(5));
}
