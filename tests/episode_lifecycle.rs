//! Episode lifecycle and feedback properties of the Mastermind environment

use mastermind::{
    Code, Error, GameConfig, MastermindEnv, score,
    game::{ActionSpace, EpisodeOutcome, GUESS_REWARD, WIN_BONUS},
};

fn fixed_env(n_pegs: usize, n_colours: usize, n_rows: usize, secret: &Code) -> MastermindEnv {
    let mut env = MastermindEnv::new(GameConfig::new(n_pegs, n_colours, n_rows))
        .unwrap()
        .with_seed(11);
    env.reset(Some(secret)).unwrap();
    env
}

#[test]
fn exact_guess_scores_every_peg() {
    let space = ActionSpace::product(3, 3).unwrap();
    for code in space.iter() {
        assert_eq!(score(code, code).as_pair(), [0, 3]);
    }
}

#[test]
fn duplicate_colours_are_only_credited_once_per_secret_peg() {
    let secret = Code::new([1, 1, 2]);
    assert_eq!(score(&Code::new([1, 1, 1]), &secret).as_pair(), [0, 2]);
    assert_eq!(score(&Code::new([1, 2, 1]), &secret).as_pair(), [2, 1]);
    assert_eq!(score(&Code::new([2, 2, 2]), &secret).as_pair(), [0, 1]);
    assert_eq!(score(&Code::new([2, 1, 1]), &secret).as_pair(), [2, 1]);
}

#[test]
fn winning_guess_ends_episode_with_bonus() {
    let secret = Code::new([1, 1, 2]);
    let mut env = fixed_env(3, 2, 5, &secret);

    let first = env.step(&Code::new([2, 2, 2])).unwrap();
    assert!(!first.done);
    assert_eq!(first.reward, GUESS_REWARD);

    let win = env.step(&secret).unwrap();
    assert!(win.done);
    assert_eq!(win.reward, GUESS_REWARD + WIN_BONUS);
    assert_eq!(win.info, "solved");
    assert_eq!(win.outcome, Some(EpisodeOutcome::Solved { turns: 2 }));
    assert_eq!(win.state.rows_played(), 2);
    assert!(!env.is_active());

    assert!(matches!(env.step(&secret), Err(Error::NotReset)));
}

#[test]
fn running_out_of_rows_ends_episode_without_bonus() {
    let secret = Code::new([1, 1, 2]);
    let mut env = fixed_env(3, 2, 3, &secret);
    let wrong = Code::new([2, 2, 2]);

    let mut steps = Vec::new();
    for _ in 0..3 {
        steps.push(env.step(&wrong).unwrap());
    }

    assert_eq!(
        steps.iter().map(|s| s.done).collect::<Vec<_>>(),
        vec![false, false, true]
    );
    assert!(steps.iter().all(|s| s.reward == GUESS_REWARD));

    let last = steps.last().unwrap();
    assert_eq!(last.info, "exhausted");
    assert_eq!(last.outcome, Some(EpisodeOutcome::Exhausted));
    assert!(last.state.is_full());
    for r in 0..3 {
        assert_eq!(last.state.row(r), Some(&[2, 2, 2, 0, 1][..]));
    }

    assert!(matches!(env.step(&wrong), Err(Error::NotReset)));
    env.reset(None).unwrap();
    assert!(env.step(&wrong).is_ok());
}

#[test]
fn secret_is_fixed_for_the_whole_episode() {
    let mut env = MastermindEnv::new(GameConfig::new(2, 4, 6))
        .unwrap()
        .with_seed(3);
    env.reset(None).unwrap();
    let secret = env.secret().cloned().unwrap();

    for guess in ["1,1", "2,2", "3,3", "4,4"] {
        let step = env.step(&guess.parse::<Code>().unwrap()).unwrap();
        assert_eq!(env.secret(), Some(&secret));
        if step.done {
            break;
        }
    }
}

#[test]
fn unplayed_rows_stay_zero() {
    let secret = Code::new([3, 1]);
    let mut env = fixed_env(2, 3, 4, &secret);
    let step = env.step(&Code::new([1, 3])).unwrap();

    let width = step.state.width();
    assert_eq!(&step.state.cells()[..width], &[1, 3, 2, 0]);
    assert!(step.state.cells()[width..].iter().all(|&c| c == 0));
    assert_eq!(step.state.row(1), None);
}

#[test]
fn custom_action_set_limits_random_secrets() {
    let codes = vec![Code::new([1, 2]), Code::new([2, 1])];
    let mut env = MastermindEnv::with_actions(GameConfig::new(2, 2, 3), codes.clone())
        .unwrap()
        .with_seed(5);
    for _ in 0..20 {
        env.reset(None).unwrap();
        assert!(codes.contains(env.secret().unwrap()));
    }
}
