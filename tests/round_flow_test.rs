//! End-to-end tests for a round driven through the public sequencer API.

use rand::SeedableRng;
use rand::rngs::StdRng;
use shell_game_core::{
    CupId, Difficulty, EvenLayout, Message, RecordingSink, RoundPhase, RoundSequencer, SinkEvent,
    SlotIndex, SlotMark, Tone,
};

type Game = RoundSequencer<EvenLayout, RecordingSink, StdRng>;

fn game(seed: u64) -> Game {
    RoundSequencer::new(
        EvenLayout::new(90.0),
        RecordingSink::new(),
        StdRng::seed_from_u64(seed),
    )
}

/// Advances until the sequencer stops handing out wakeups.
fn settle(game: &mut Game) {
    while game.advance().is_some() {}
}

fn assert_permutation(game: &Game) {
    let positions = game.positions();
    for slot in SlotIndex::ALL {
        assert_eq!(positions.slot_of(positions.cup_at(slot)), slot);
    }
    let mut cups: Vec<usize> = positions.cups().iter().map(|c| c.index()).collect();
    cups.sort_unstable();
    assert_eq!(cups, vec![0, 1, 2]);
}

#[test]
fn test_initial_state_waits_for_start() {
    let game = game(1);
    let sink = game.sink();

    assert_eq!(game.phase(), RoundPhase::Idle);
    assert_eq!(sink.message(), Some(Message::Prompt));
    assert!(!sink.token_visible());
    assert!(!sink.picking_enabled());
    assert_eq!(game.scoreboard().score(), 0);
    assert_eq!(game.scoreboard().rounds(), 0);
}

#[test]
fn test_easy_round_with_known_holder() {
    let mut game = game(5);
    let holder = CupId::ALL[1];

    let peek = game.start_round_with_holder(holder).map(|w| w.delay());
    assert_eq!(peek, Some(std::time::Duration::from_millis(3000)));
    assert_eq!(game.phase(), RoundPhase::Peeking);
    assert_eq!(game.sink().token_slot(), Some(SlotIndex::ALL[1]));
    assert!(game.sink().token_visible());
    assert!(game.sink().is_marked(SlotIndex::ALL[1], SlotMark::Peeking));

    settle(&mut game);
    assert_eq!(game.phase(), RoundPhase::AwaitingPick);
    assert_eq!(game.sink().flourishes().len(), 8);
    assert!(!game.sink().token_visible());
    assert!(game.sink().picking_enabled());
    assert_eq!(game.sink().message(), Some(Message::PickACup));

    let slot = game.positions().slot_of(holder);
    game.pick(slot);
    let outcome = game.last_outcome().copied();
    assert!(outcome.is_some_and(|o| o.correct));
    assert_eq!(game.scoreboard().score(), 1);
    assert_eq!(game.scoreboard().rounds(), 1);
    assert_eq!(game.sink().message(), Some(Message::Correct));
    assert_eq!(game.sink().tones(), vec![Tone::SUCCESS]);
    assert!(game.sink().token_visible());
}

#[test]
fn test_wrong_pick_reveals_ball() {
    let mut game = game(9);
    game.start_round_with_holder(CupId::ALL[2]);
    settle(&mut game);

    let ball_slot = game.positions().slot_of(CupId::ALL[2]);
    let wrong = ball_slot.right();
    game.pick(wrong);

    assert_eq!(game.scoreboard().score(), 0);
    assert_eq!(game.scoreboard().rounds(), 1);
    assert_eq!(game.sink().message(), Some(Message::Miss));
    assert_eq!(game.sink().tones(), vec![Tone::FAILURE]);
    assert!(game.sink().is_marked(ball_slot, SlotMark::Revealed));
    assert!(!game.sink().is_marked(wrong, SlotMark::Revealed));
    assert_eq!(game.sink().token_slot(), Some(ball_slot));
    assert!(
        !game
            .sink()
            .events()
            .iter()
            .any(|e| matches!(e, SinkEvent::Confetti(_)))
    );

    settle(&mut game);
    assert_eq!(game.phase(), RoundPhase::Idle);
    assert!(!game.sink().is_marked(ball_slot, SlotMark::Revealed));
    assert!(!game.sink().token_visible());
}

#[test]
fn test_inputs_outside_their_phase_are_ignored() {
    let mut game = game(3);
    assert!(game.pick(SlotIndex::ALL[0]).is_none());
    assert_eq!(game.scoreboard().rounds(), 0);

    game.start_round();
    assert!(game.start_round().is_none());
    assert!(game.pick(SlotIndex::ALL[0]).is_none());

    // Into the shuffle.
    game.advance();
    game.advance();
    assert_eq!(game.phase(), RoundPhase::Shuffling);
    let positions = game.positions().clone();
    let holder = game.ball_holder();
    let scoreboard = *game.scoreboard();
    let progress = game.shuffle_progress();

    assert!(game.pick(SlotIndex::ALL[1]).is_none());
    assert!(game.start_round().is_none());
    assert_eq!(game.positions(), &positions);
    assert_eq!(game.ball_holder(), holder);
    assert_eq!(game.scoreboard(), &scoreboard);
    assert_eq!(game.shuffle_progress(), progress);
    assert_eq!(game.phase(), RoundPhase::Shuffling);
    assert!(game.last_outcome().is_none());

    settle(&mut game);
    game.pick(SlotIndex::ALL[1]);
    assert_eq!(game.phase(), RoundPhase::Revealing);
    assert!(game.pick(SlotIndex::ALL[1]).is_none());
    assert_eq!(game.scoreboard().rounds(), 1);
}

#[test]
fn test_mapping_stays_a_permutation_through_shuffle() {
    let mut game = game(11).with_difficulty(Difficulty::Hard);
    let holder = CupId::ALL[1];
    game.start_round_with_holder(holder);
    while game.advance().is_some() {
        assert_permutation(&game);
        assert_eq!(game.ball_holder(), holder);
    }
    assert_eq!(game.sink().flourishes().len(), 24);
    for [a, b] in game.sink().flourishes() {
        assert_ne!(a, b);
    }
}

#[test]
fn test_resize_during_shuffle_keeps_the_round() {
    let mut game = game(21);
    game.start_round();
    game.advance();
    game.advance();
    game.advance();
    assert_eq!(game.phase(), RoundPhase::Shuffling);

    let positions = game.positions().clone();
    let holder = game.ball_holder();
    let progress = game.shuffle_progress();

    game.layout_provider_mut().set_width(300.0);
    game.relayout();

    assert_eq!(game.positions(), &positions);
    assert_eq!(game.ball_holder(), holder);
    assert_eq!(game.shuffle_progress(), progress);
    assert_eq!(game.layout().center(SlotIndex::ALL[2]), Some(250.0));
}

#[test]
fn test_reset_scores_while_idle() {
    let mut game = game(4);
    for _ in 0..3 {
        game.start_round();
        settle(&mut game);
        let slot = game.positions().slot_of(game.ball_holder());
        game.pick(slot);
        settle(&mut game);
    }
    assert_eq!(game.scoreboard().score(), 3);

    game.reset_scores();
    assert_eq!(game.scoreboard().score(), 0);
    assert_eq!(game.scoreboard().rounds(), 0);
    assert_eq!(game.sink().message(), Some(Message::Prompt));
    assert_eq!(game.phase(), RoundPhase::Idle);
}

#[test]
fn test_reset_scores_does_not_interrupt_a_round() {
    let mut game = game(14);
    game.start_round();
    settle(&mut game);
    let slot = game.positions().slot_of(game.ball_holder());
    game.pick(slot);
    settle(&mut game);
    assert_eq!(game.scoreboard().score(), 1);

    // Reset mid-shuffle.
    game.start_round();
    game.advance();
    game.advance();
    game.advance();
    assert_eq!(game.phase(), RoundPhase::Shuffling);
    let positions = game.positions().clone();
    let holder = game.ball_holder();
    let progress = game.shuffle_progress();

    game.reset_scores();
    assert_eq!(game.phase(), RoundPhase::Shuffling);
    assert_eq!(game.positions(), &positions);
    assert_eq!(game.ball_holder(), holder);
    assert_eq!(game.shuffle_progress(), progress);
    assert_eq!(game.scoreboard().score(), 0);
    assert_eq!(game.scoreboard().rounds(), 0);
    assert_eq!(game.sink().message(), Some(Message::Prompt));

    settle(&mut game);
    assert_eq!(game.phase(), RoundPhase::AwaitingPick);
    assert_eq!(game.sink().message(), Some(Message::PickACup));

    // Reset mid-reveal.
    let slot = game.positions().slot_of(holder);
    game.pick(slot);
    assert_eq!(game.scoreboard().score(), 1);
    let positions = game.positions().clone();

    game.reset_scores();
    assert_eq!(game.phase(), RoundPhase::Revealing);
    assert_eq!(game.positions(), &positions);
    assert_eq!(game.ball_holder(), holder);
    assert_eq!(game.scoreboard().score(), 0);
    assert_eq!(game.scoreboard().rounds(), 0);

    settle(&mut game);
    assert_eq!(game.phase(), RoundPhase::Idle);
    assert_eq!(game.scoreboard().rounds(), 0);
}

#[test]
fn test_difficulty_change_applies_next_round() {
    let mut game = game(8);
    game.start_round();
    game.set_difficulty(Difficulty::Medium);
    settle(&mut game);
    assert_eq!(game.sink().flourishes().len(), 8);

    let slot = game.positions().slot_of(game.ball_holder());
    game.pick(slot);
    settle(&mut game);

    game.sink_mut().clear_events();
    game.start_round();
    settle(&mut game);
    assert_eq!(game.sink().flourishes().len(), 14);
}

#[test]
fn test_failing_tone_does_not_stop_the_round() {
    let mut game = RoundSequencer::new(
        EvenLayout::new(90.0),
        RecordingSink::new().failing_tones(),
        StdRng::seed_from_u64(2),
    );
    game.start_round();
    settle(&mut game);
    let slot = game.positions().slot_of(game.ball_holder());
    game.pick(slot);

    assert_eq!(game.scoreboard().score(), 1);
    assert_eq!(game.phase(), RoundPhase::Revealing);
}
