//! Property tests for complete self-play games.
//!
//! - Games end within one ply per board cell
//! - Outcomes alternate sign backward from the last mover
//! - The replay buffer holds exactly the moves of completed games

use actor::{play_game, ReplayBuffer, ReplaySample, ReplaySink, SelfPlayConfig, TreeStores};
use engine_core::{Game, Player};
use games_caro::CaroGame;
use mcts::{MctsConfig, MctsTree, UniformOracle};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn config(plies_before_greedy: u32) -> SelfPlayConfig {
    SelfPlayConfig {
        mcts: MctsConfig::for_training(),
        searches_per_move: 3,
        batch_size: 4,
        plies_before_greedy,
    }
}

fn arb_player() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::White), Just(Player::Black)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_game_terminates_within_board_cells(
        seed in any::<u64>(),
        variant in 0usize..2,
        greedy_after in 0u32..6,
        first in arb_player()
    ) {
        let game = if variant == 0 {
            CaroGame::tictactoe()
        } else {
            CaroGame::new("caro5x5", 5, 4)
        };
        let cells = game.action_space();
        let oracle = UniformOracle::new(cells);
        let mut tree = MctsTree::new(cells);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut samples: Vec<ReplaySample> = Vec::new();

        let outcome = play_game(
            &game,
            TreeStores::Shared(&mut tree),
            Some(&mut samples),
            &oracle,
            &oracle,
            &config(greedy_after),
            Some(first),
            &mut rng,
        ).unwrap();

        prop_assert!(outcome.plies as usize <= cells);
        prop_assert_eq!(samples.len(), outcome.plies as usize);
        prop_assert_eq!(samples[0].mover, first);
        prop_assert_eq!(samples[0].state.clone(), game.initial_state());
        if outcome.winner.is_none() {
            prop_assert_eq!(outcome.plies as usize, cells);
        }
    }

    #[test]
    fn prop_outcomes_alternate_from_last_mover(
        seed in any::<u64>(),
        first in arb_player()
    ) {
        let game = CaroGame::tictactoe();
        let oracle = UniformOracle::new(9);
        let mut tree = MctsTree::new(9);
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut samples: Vec<ReplaySample> = Vec::new();

        let outcome = play_game(
            &game,
            TreeStores::Shared(&mut tree),
            Some(&mut samples),
            &oracle,
            &oracle,
            &config(3),
            Some(first),
            &mut rng,
        ).unwrap();

        for s in &samples {
            let expected = match outcome.winner {
                Some(w) if w == s.mover => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            };
            prop_assert_eq!(s.outcome, expected);
        }
        let a_result = samples
            .iter()
            .find(|s| s.mover == Player::White)
            .map(|s| s.outcome)
            .unwrap_or(0.0);
        prop_assert_eq!(outcome.result_for_a, a_result);
    }
}

#[test]
fn replay_buffer_keeps_most_recent_games() {
    let game = CaroGame::tictactoe();
    let oracle = UniformOracle::new(9);
    let mut tree = MctsTree::new(9);
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let mut buffer = ReplayBuffer::new(12).unwrap();

    let mut last_game: Vec<ReplaySample> = Vec::new();
    for _ in 0..4 {
        last_game.clear();
        play_game(
            &game,
            TreeStores::Shared(&mut tree),
            Some(&mut last_game),
            &oracle,
            &oracle,
            &config(2),
            None,
            &mut rng,
        )
        .unwrap();
        for sample in &last_game {
            buffer.append(sample.clone());
        }
    }

    assert_eq!(buffer.len(), 12);
    // The newest samples sit at the back in move order.
    let tail: Vec<&ReplaySample> = buffer.iter().skip(12 - last_game.len()).collect();
    for (stored, played) in tail.iter().zip(&last_game) {
        assert_eq!(*stored, played);
    }

    let batch = buffer.sample_batch(5, &mut rng).unwrap();
    assert_eq!(batch.len(), 5);
    assert!(buffer.sample_batch(13, &mut rng).is_err());
}
