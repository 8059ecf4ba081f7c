use td_tictactoe::{
    Error,
    agent::Agent,
    policy::PolicyTable,
    tictactoe::{BoardState, Move, Player},
};

fn board(grid: [[i8; 3]; 3]) -> BoardState {
    BoardState::from_grid(grid).unwrap()
}

#[test]
fn ties_go_to_first_move_in_row_major_order() {
    let state = board([[1, 0, 0], [0, -1, 0], [0, 0, 0]]);
    let valued = |row, col| (state.next_state(row, col, Player::X).unwrap().hash_key(), 0.8);
    let table = PolicyTable::from_entries(Player::X, [valued(2, 0), valued(0, 2)]).unwrap();
    let mut agent = Agent::new(Player::X, 0.0)
        .unwrap()
        .with_policy(table)
        .unwrap();

    agent.set_state(state);
    assert_eq!(agent.act().unwrap(), Move::new(0, 2, Player::X));
}

#[test]
fn center_opening_from_a_center_preferring_table() {
    let empty = BoardState::new();
    let center = empty.next_state(1, 1, Player::X).unwrap();
    let corner = empty.next_state(0, 0, Player::X).unwrap();
    let table =
        PolicyTable::from_entries(Player::X, [(corner.hash_key(), 0.6), (center.hash_key(), 0.7)])
            .unwrap();
    let mut agent = Agent::new(Player::X, 0.0)
        .unwrap()
        .with_policy(table)
        .unwrap();

    agent.set_state(empty);
    assert_eq!(agent.act().unwrap(), Move::new(1, 1, Player::X));
}

#[test]
fn second_player_completes_its_row() {
    let state = board([[1, 1, 0], [-1, -1, 0], [0, 0, 0]]);
    let mut agent = Agent::new(Player::O, 0.0).unwrap();
    agent.set_state(state);

    let mv = agent.act().unwrap();
    assert_eq!((mv.row, mv.col, mv.player), (1, 2, Player::O));
    assert!(mv.apply(&state).unwrap().is_terminal());
}

#[test]
fn seeded_exploration_is_reproducible() {
    let play = |seed| {
        let mut agent = Agent::new(Player::X, 0.5).unwrap().with_seed(seed);
        agent.set_state(BoardState::new());
        (0..50).map(|_| agent.act().unwrap()).collect::<Vec<_>>()
    };

    let first = play(21);
    assert_eq!(first, play(21));
    assert!(first.iter().any(|mv| *mv != Move::new(0, 0, Player::X)));
}

#[test]
fn acting_does_not_mutate_table_or_state() {
    let state = board([[1, 0, 0], [0, -1, 0], [0, 0, 0]]);
    let mut agent = Agent::new(Player::X, 0.25).unwrap().with_seed(3);
    let table = agent.policy().clone();
    agent.set_state(state);

    for _ in 0..25 {
        agent.act().unwrap();
    }
    assert_eq!(agent.policy(), &table);
    assert_eq!(*agent.current_state(), state);
}

#[test]
fn acting_on_a_finished_game_fails() {
    let mut agent = Agent::new(Player::X, 0.0).unwrap();
    agent.set_state(board([[1, -1, 1], [1, -1, -1], [-1, 1, 1]]));
    assert!(matches!(agent.act(), Err(Error::GameOver)));
}

#[test]
fn greedy_move_ignores_exploration() {
    let state = board([[1, 1, 0], [-1, -1, 0], [0, 0, 0]]);
    let agent = Agent::new(Player::X, 1.0).unwrap().with_seed(1);
    assert_eq!(agent.greedy_move(&state).unwrap(), Move::new(0, 2, Player::X));
}
