//! Integration tests for crossfader-composition

use crossfader_common::{MediaKind, MediaTime, TimeRange, TrackSlot};
use crossfader_composition::{
    builder::build_plan, ClipInfo, Error, InstructionKind, TransitionComposition,
    TransitionCompositionBuilder,
};

fn secs(s: i64) -> MediaTime {
    MediaTime::from_secs(s)
}

fn millis(ms: i64) -> MediaTime {
    MediaTime::new(ms, 1000).unwrap()
}

fn clip(name: &str, duration: MediaTime) -> ClipInfo {
    ClipInfo::new(name, duration)
}

fn whole_ranges(clips: &[ClipInfo]) -> Vec<TimeRange> {
    clips
        .iter()
        .map(|c| TimeRange::new(MediaTime::ZERO, c.duration))
        .collect()
}

fn build(clips: &[ClipInfo], transition: Option<MediaTime>) -> TransitionComposition {
    TransitionCompositionBuilder::new()
        .requested_transition(transition)
        .build(clips, &whole_ranges(clips))
        .unwrap()
}

/// Two 5s clips with a 2s cross-fade
#[test]
fn test_scenario_two_equal_clips() {
    let clips = vec![clip("a.mov", secs(5)), clip("b.mov", secs(5))];
    let built = build(&clips, Some(secs(2)));

    assert_eq!(built.duration(), secs(8));
    let instructions = &built.video_composition.instructions;
    assert_eq!(instructions.len(), 3);

    assert_eq!(instructions[0].time_range, TimeRange::new(secs(0), secs(3)));
    assert_eq!(instructions[0].layers[0].track, TrackSlot::Primary);

    assert_eq!(instructions[1].kind(), InstructionKind::Transition);
    assert_eq!(instructions[1].time_range, TimeRange::from_start_end(secs(3), secs(5)));

    assert_eq!(instructions[2].time_range, TimeRange::from_start_end(secs(5), secs(8)));
    assert_eq!(instructions[2].layers[0].track, TrackSlot::Secondary);
}

/// Short first clip clamps the transition to half its length
#[test]
fn test_scenario_transition_clamped() {
    let clips = vec![clip("short.mov", secs(1)), clip("long.mov", secs(5))];
    let built = build(&clips, Some(secs(2)));

    assert_eq!(built.plan.transition_duration, millis(500));
    assert_eq!(built.duration(), millis(5500));
    assert_eq!(
        built.video_composition.instructions[1].time_range,
        TimeRange::new(millis(500), millis(500))
    );
}

/// A single clip is one pass-through with no audio ramps
#[test]
fn test_scenario_single_clip() {
    let clips = vec![clip("only.mov", secs(5))];
    let built = build(&clips, Some(secs(2)));

    assert_eq!(built.duration(), secs(5));
    assert_eq!(built.video_composition.instructions.len(), 1);
    assert_eq!(
        built.video_composition.instructions[0].time_range,
        TimeRange::new(secs(0), secs(5))
    );
    assert!(built.audio_mix.is_empty());
}

/// No clips builds an empty result without error
#[test]
fn test_scenario_no_clips() {
    let built = build(&[], Some(secs(2)));

    assert!(built.is_empty());
    assert_eq!(built.duration(), MediaTime::ZERO);
    assert!(built.video_composition.instructions.is_empty());
    assert!(built.audio_mix.is_empty());
    assert!(built.composition.tracks.is_empty());
}

/// A zero-length selected range is rejected
#[test]
fn test_scenario_zero_range_rejected() {
    let clips = vec![clip("a.mov", secs(5)), clip("b.mov", secs(5))];
    let ranges = vec![
        TimeRange::new(secs(0), secs(5)),
        TimeRange::new(secs(2), MediaTime::ZERO),
    ];
    let result = TransitionCompositionBuilder::new()
        .transition_duration(secs(1))
        .build(&clips, &ranges);

    assert!(matches!(result, Err(Error::InvalidRange { clip_index: 1, .. })));
}

fn varied_clips() -> Vec<ClipInfo> {
    [7, 3, 9, 4, 6, 5]
        .iter()
        .enumerate()
        .map(|(i, s)| clip(&format!("clip{i}.mov"), secs(*s)))
        .collect()
}

#[test]
fn test_instructions_tile_timeline() {
    for transition in [None, Some(MediaTime::ZERO), Some(millis(250)), Some(secs(1)), Some(secs(10))] {
        for count in 1..=6 {
            let clips: Vec<_> = varied_clips().into_iter().take(count).collect();
            let built = build(&clips, transition);

            let mut cursor = MediaTime::ZERO;
            for instruction in &built.video_composition.instructions {
                assert_eq!(instruction.time_range.start, cursor);
                assert!(!instruction.time_range.is_empty());
                cursor = instruction.time_range.end();
            }
            assert_eq!(cursor, built.duration());
        }
    }
}

#[test]
fn test_transition_duration_property() {
    let clips = varied_clips();
    let built = build(&clips, Some(secs(2)));
    let effective = built.plan.transition_duration;

    assert_eq!(effective, millis(1500));
    for pair in whole_ranges(&clips).windows(2) {
        assert!(effective <= pair[0].duration.min(pair[1].duration).half());
    }
    let transitions: Vec<_> = built
        .video_composition
        .instructions
        .iter()
        .filter(|i| i.kind() == InstructionKind::Transition)
        .collect();
    assert_eq!(transitions.len(), clips.len() - 1);
    for instruction in transitions {
        assert_eq!(instruction.time_range.duration, effective);
    }
}

#[test]
fn test_slot_alternation() {
    let clips = varied_clips();
    let built = build(&clips, Some(secs(1)));

    for (i, entry) in built.plan.entries.iter().enumerate() {
        assert_eq!(entry.slot, TrackSlot::for_clip(i));
    }
    for slot in TrackSlot::ALL {
        let on_slot: Vec<_> = built.plan.entries.iter().filter(|e| e.slot == slot).collect();
        for pair in on_slot.windows(2) {
            assert!(!pair[0].placement.overlaps(&pair[1].placement));
        }
    }
    for kind in [MediaKind::Video, MediaKind::Audio] {
        assert_eq!(built.composition.tracks_of(kind).count(), 2);
    }
}

#[test]
fn test_audio_ramp_symmetry() {
    let clips = varied_clips();
    let built = build(&clips, Some(secs(1)));
    let ramps = &built.audio_mix.ramps;

    for (i, window) in built.plan.transitions().enumerate() {
        let outgoing = TrackSlot::for_clip(i);
        let incoming = TrackSlot::for_clip(i + 1);

        let fade_out = ramps
            .iter()
            .find(|r| r.track == outgoing && r.time_range == window)
            .unwrap();
        let fade_in = ramps
            .iter()
            .find(|r| r.track == incoming && r.time_range == window)
            .unwrap();
        assert_eq!((fade_out.start_volume, fade_out.end_volume), (1.0, 0.0));
        assert_eq!(fade_in.start_volume, 1.0 - fade_out.start_volume);
        assert_eq!(fade_in.end_volume, 1.0);

        let next_pass = built.plan.entries[i + 1].pass_through;
        let held = ramps
            .iter()
            .find(|r| r.track == incoming && r.time_range == next_pass)
            .unwrap();
        assert_eq!((held.start_volume, held.end_volume), (1.0, 1.0));

        let mid = next_pass.start + next_pass.duration.half();
        assert_eq!(built.audio_mix.volume_at(incoming, mid), 1.0);
    }
}

#[test]
fn test_build_is_idempotent() {
    let clips = varied_clips();
    let builder = TransitionCompositionBuilder::new().transition_duration(secs(1));
    let ranges = whole_ranges(&clips);

    let first = builder.build(&clips, &ranges).unwrap();
    let second = builder.build(&clips, &ranges).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_disabled_transitions_abut() {
    let clips = varied_clips();
    let built = build(&clips, None);

    assert_eq!(built.plan.transition_duration, MediaTime::ZERO);
    assert_eq!(built.video_composition.instructions.len(), clips.len());
    assert!(built
        .video_composition
        .instructions
        .iter()
        .all(|i| i.kind() == InstructionKind::PassThrough));
    assert!(built.audio_mix.is_empty());
    assert_eq!(built.duration(), secs(34));
}

#[test]
fn test_top_layer_at_time() {
    let clips = vec![clip("a.mov", secs(5)), clip("b.mov", secs(5))];
    let built = build(&clips, Some(secs(2)));

    let instruction = built.video_composition.instruction_at(secs(4)).unwrap();
    assert_eq!(instruction.layers[0].opacity_at(secs(4)), 0.5);
    assert_eq!(instruction.layers[1].opacity_at(secs(4)), 1.0);
    assert_eq!(built.plan.entry_at(secs(4)).map(|e| e.clip_index), Some(1));
    assert_eq!(built.audio_mix.volume_at(TrackSlot::Primary, secs(4)), 0.5);
}

#[test]
fn test_plan_only() {
    let clips = vec![clip("a.mov", secs(4)), clip("b.mov", secs(4))];
    let plan = build_plan(&clips, &whole_ranges(&clips), Some(secs(1))).unwrap();
    assert_eq!(plan.duration, secs(7));
    assert_eq!(plan.transitions().count(), 1);
}

#[test]
fn test_unrepresentable_timeline_fails_instead_of_rounding() {
    let clips: Vec<ClipInfo> = [999_983, 999_979, 999_961, 999_959]
        .into_iter()
        .map(|p| ClipInfo::new(format!("clip{p}"), MediaTime::new(11 * p + 2, 2 * p).unwrap()))
        .collect();
    let ranges: Vec<TimeRange> = clips
        .iter()
        .map(|clip| TimeRange::new(MediaTime::ZERO, clip.duration))
        .collect();

    let result = TransitionCompositionBuilder::new()
        .transition_duration(secs(1))
        .build(&clips, &ranges);

    assert!(matches!(result, Err(Error::Common(_))));
}
