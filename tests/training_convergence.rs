use td_tictactoe::{
    agent::Agent,
    app::TrainingConfig,
    pipeline::{Replies, Trainer, compete, exhaustive_outcomes},
    tictactoe::{BoardState, Move, Player, StateGraph},
};

fn trained_pair(episodes: usize, seed: u64) -> (Agent, Agent) {
    let config = TrainingConfig {
        episodes,
        learning_rate: 0.1,
        epsilon: 0.1,
        seed: Some(seed),
        ..TrainingConfig::default()
    };
    let (first_config, second_config) = config.agent_configs();
    let mut first = Agent::from_config(&first_config).unwrap();
    let mut second = Agent::from_config(&second_config).unwrap();
    Trainer::new(config)
        .unwrap()
        .train(&mut first, &mut second)
        .unwrap();
    (first, second)
}

#[test]
fn trained_first_mover_never_loses() {
    let (first, second) = trained_pair(50_000, 7);

    let all = exhaustive_outcomes(&first, Player::X, Replies::All).unwrap();
    assert!(all.never_loses(), "lost {} lines", all.losses());
    assert!(all.wins() > 0);

    let optimal = exhaustive_outcomes(&first, Player::X, Replies::Optimal).unwrap();
    assert!(optimal.never_loses());

    let mut first = first;
    let mut second = second;
    first.set_epsilon(0.0).unwrap();
    second.set_epsilon(0.0).unwrap();
    let report = compete(&mut first, &mut second, 10).unwrap();
    assert_eq!(report.outcomes.second_wins, 0);
}

#[test]
fn seeded_training_opens_in_the_center_and_blocks() {
    let (first, second) = trained_pair(10_000, 0);

    assert_eq!(
        first.greedy_move(&BoardState::new()).unwrap(),
        Move::new(1, 1, Player::X)
    );
    assert!(
        exhaustive_outcomes(&first, Player::X, Replies::All)
            .unwrap()
            .never_loses()
    );

    let state = BoardState::from_grid([[1, 1, 0], [-1, -1, 0], [0, 0, 0]]).unwrap();
    assert_eq!(
        second.greedy_move(&state).unwrap(),
        Move::new(1, 2, Player::O)
    );
}

#[test]
fn terminal_values_stay_anchored() {
    let (first, second) = trained_pair(2_000, 19);
    for node in StateGraph::standard().terminal_states() {
        let hash = node.state.hash_key();
        assert_eq!(
            first.policy().get(hash),
            node.outcome().terminal_value(Player::X)
        );
        assert_eq!(
            second.policy().get(hash),
            node.outcome().terminal_value(Player::O)
        );
    }
}

#[test]
fn values_stay_within_unit_interval() {
    let (first, second) = trained_pair(2_000, 23);
    for table in [first.policy(), second.policy()] {
        assert_eq!(table.len(), StateGraph::standard().len());
        assert!(table.iter().all(|(_, value)| (0.0..=1.0).contains(&value)));
    }
}
