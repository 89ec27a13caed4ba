use proptest::prelude::*;
use serde_json::{Value, json};
use subsync_core::{
    AudioManifest, DEFAULT_MATCH_WINDOW, FuzzyMatcher, NarrationEvent, SceneCursor, SyncSettings,
    Synchronizer,
};

fn clip_values(texts: &[String]) -> Vec<Value> {
    texts
        .iter()
        .enumerate()
        .map(|(index, text)| json!({"text": text, "file": format!("missing/{index}.wav"), "duration": 1.0}))
        .collect()
}

fn line() -> impl Strategy<Value = String> {
    "[あいうえおかきく]{1,12}"
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    #[test]
    fn cursor_is_monotonic_bounded_and_never_replays(
        clips in prop::collection::vec(line(), 0..16),
        lines in prop::collection::vec(line(), 0..24),
    ) {
        let clips = clip_values(&clips);
        let matcher = FuzzyMatcher::default();
        let mut cursor = SceneCursor::new();
        let mut last_match: Option<usize> = None;

        for text in &lines {
            let before = cursor.speech_index();
            let found = matcher.match_and_advance(text, &clips, &mut cursor);
            let after = cursor.speech_index();

            prop_assert!(after >= before);
            prop_assert!(after <= clips.len());

            match found {
                Some(found) => {
                    prop_assert!(found.ratio > matcher.threshold);
                    prop_assert!(found.index >= before);
                    prop_assert!(found.index < before + DEFAULT_MATCH_WINDOW);
                    prop_assert!(last_match.is_none_or(|last| found.index > last));
                    prop_assert_eq!(after, found.index + 1);
                    last_match = Some(found.index);
                }
                None => prop_assert_eq!(after, before),
            }
        }
    }

    #[test]
    fn window_never_reaches_past_five_candidates(
        filler in prop::collection::vec("[xyz]{3}", 5..10),
        target in "[あいう]{6}",
    ) {
        let mut texts = filler;
        texts.push(target.clone());
        let clips = clip_values(&texts);
        let mut cursor = SceneCursor::new();
        prop_assert!(FuzzyMatcher::default().match_and_advance(&target, &clips, &mut cursor).is_none());
        prop_assert_eq!(cursor.speech_index(), 0);
    }

    #[test]
    fn empty_manifest_always_falls_back(text in ".{0,40}", seconds in 0.5f64..10.0) {
        let manifest = AudioManifest::empty();
        let settings = SyncSettings::default();
        let synchronizer = Synchronizer::new(&manifest, &settings);
        let mut run = synchronizer.begin_scene("Scene01_Intro");

        let result = run.resolve(&NarrationEvent::new("めたん", text).with_duration(seconds));
        prop_assert!(result.clip.is_none());
        prop_assert!(result.index.is_none());
        prop_assert_eq!(result.effective_duration, seconds);
        prop_assert_eq!(run.cursor().speech_index(), 0);
    }
}
