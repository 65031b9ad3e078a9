use asteroids_core::{
    Action, FrameClock, GameSession, GameState, HighscoreEntry, HighscoreList, InputFrame,
    KeyBindings, LeaderboardRequest, PlayField, SoundEvent,
};

fn scripted_frame(bindings: &KeyBindings, frame: u32) -> InputFrame {
    let mut held = Vec::new();
    if frame % 2 == 0 {
        held.push("Space");
    }
    if frame % 150 < 40 {
        held.push("ArrowLeft");
    }
    if frame % 200 < 25 {
        held.push("KeyW");
    }
    bindings.frame(held, None)
}

fn run(seed: u32, frames: u32) -> (GameSession, Vec<SoundEvent>) {
    let bindings = KeyBindings::default();
    let mut session = GameSession::new(PlayField::default(), seed);
    let mut clock = FrameClock::new();
    let mut sounds = Vec::new();

    for frame in 0..frames {
        let dt = clock.tick(f64::from(frame) / 60.0);
        session.update(dt, &scripted_frame(&bindings, frame));
        session.flush_sounds(&mut sounds);
        session
            .validate_invariants()
            .unwrap_or_else(|rule| panic!("frame {frame}: {rule}"));
    }
    (session, sounds)
}

#[test]
fn same_seed_and_inputs_replay_identically() {
    let (a, sounds_a) = run(0x1234_5678, 2_400);
    let (b, sounds_b) = run(0x1234_5678, 2_400);

    let snap_a = serde_json::to_string(&a.snapshot()).expect("snapshot serializes");
    let snap_b = serde_json::to_string(&b.snapshot()).expect("snapshot serializes");
    assert_eq!(snap_a, snap_b);
    assert_eq!(sounds_a, sounds_b);
}

#[test]
fn scripted_pilot_breaks_asteroids() {
    let (session, sounds) = run(0xBEEF_0001, 3_000);
    assert!(sounds.contains(&SoundEvent::Shoot));
    assert!(sounds.iter().any(|event| matches!(
        event,
        SoundEvent::ExplosionLarge | SoundEvent::ExplosionMedium | SoundEvent::ExplosionSmall
    )));
    assert_eq!(session.frame_count(), 3_000);
}

#[test]
fn leaderboard_write_back_is_visible_on_the_title() {
    let mut session = GameSession::new(PlayField::default(), 9);
    assert_eq!(session.take_leaderboard_requests(), vec![LeaderboardRequest::Fetch]);

    let rows = vec![
        HighscoreEntry::new("ALPHA", 900, 4, "THE WAVE"),
        HighscoreEntry::new("BETA ", 1_200, 6, "TERMINATOR"),
    ];
    session.apply_leaderboard(HighscoreList::from_rows(rows), true);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.state, GameState::Start);
    assert_eq!(snapshot.top_score, 1_200);
    assert!(snapshot.leaderboard_offline);
    assert_eq!(snapshot.highscores.entries()[0].name, "BETA ");
}

#[test]
fn highscore_list_serializes_as_plain_rows() {
    let mut list = HighscoreList::new();
    list.insert("ACE", 300, 2, "INTERSTELLAR");
    let value = serde_json::to_value(&list).expect("list serializes");
    let rows = value.as_array().expect("list is an array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "ACE");
    assert_eq!(rows[0]["ship"], "INTERSTELLAR");
}

#[test]
fn abilities_are_inert_outside_play() {
    let mut session = GameSession::new(PlayField::default(), 3);
    assert!(!session.activate_lightning());
    assert!(!session.activate_gravity_boom());
    session.update(1.0 / 60.0, &InputFrame::holding(&[Action::Lightning]));
    assert_eq!(session.state(), GameState::Start);
}
