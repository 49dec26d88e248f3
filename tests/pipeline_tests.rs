//! Tests for the training pipeline

use mastermind::{
    Code, GameConfig, MastermindEnv, QLearningAgent, QLearningConfig,
    pipeline::{
        JsonlObserver, Learner, MetricsObserver, RandomLearner, TrainingConfig, TrainingPipeline,
    },
};

#[test]
fn test_random_baseline_pipeline() {
    let mut env = MastermindEnv::new(GameConfig::new(2, 3, 4)).unwrap();
    let mut learner = RandomLearner::new("Random", env.actions().clone());

    let result = TrainingPipeline::new(TrainingConfig {
        episodes: 50,
        seed: Some(42),
        ..TrainingConfig::default()
    })
    .run(&mut env, &mut learner)
    .unwrap();

    assert_eq!(result.total_episodes, 50);
    assert_eq!(result.wins + result.exhausted, 50);
    assert!(result.win_rate >= 0.0 && result.win_rate <= 1.0);
}

#[test]
fn test_trained_agent_solves_fixed_secret_in_one_guess() {
    let secret = Code::new([2, 3]);
    let mut env = MastermindEnv::new(GameConfig::new(2, 3, 4)).unwrap();
    let config = QLearningConfig::new(0.9, 0.3, 0.3).with_seed(21);
    let mut agent = QLearningAgent::from_config(env.actions().clone(), config).unwrap();

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        episodes: 1500,
        seed: Some(21),
        secret: Some(secret.clone()),
        render_every: None,
    });
    pipeline.run(&mut env, &mut agent).unwrap();

    let evaluation = pipeline.evaluate(&mut env, &mut agent, 20).unwrap();
    assert_eq!(evaluation.wins, 20);
    assert!((evaluation.mean_turns - 1.0).abs() < 1e-12);
    assert!((evaluation.mean_reward - 9.0).abs() < 1e-12);
}

#[test]
fn test_metrics_match_result() {
    let mut env = MastermindEnv::new(GameConfig::new(2, 2, 3)).unwrap();
    let mut agent = QLearningAgent::new(&env, 0.9, 0.2, 0.2).unwrap();
    let metrics = MetricsObserver::new();
    let handle = metrics.handle();

    let result = TrainingPipeline::new(TrainingConfig {
        episodes: 100,
        seed: Some(1),
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(metrics))
    .run(&mut env, &mut agent)
    .unwrap();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.total_episodes, result.total_episodes);
    assert_eq!(snapshot.wins, result.wins);
    assert!((snapshot.mean_turns() - result.mean_turns).abs() < 1e-9);
}

#[test]
fn test_jsonl_trace_has_one_line_per_episode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let mut env = MastermindEnv::new(GameConfig::new(1, 2, 2)).unwrap();
    let mut learner = RandomLearner::with_seed("Random", env.actions().clone(), 4);

    TrainingPipeline::new(TrainingConfig {
        episodes: 7,
        ..TrainingConfig::default()
    })
    .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
    .run(&mut env, &mut learner)
    .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 7);
    for line in contents.lines() {
        let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
        let steps = parsed["steps"].as_array().unwrap();
        assert_eq!(steps.len() as u64, parsed["summary"]["turns"].as_u64().unwrap());
    }
}

#[test]
fn test_reset_clears_learning() {
    let mut env = MastermindEnv::new(GameConfig::new(1, 2, 3)).unwrap();
    let mut agent = QLearningAgent::new(&env, 0.9, 0.2, 0.2).unwrap();

    TrainingPipeline::new(TrainingConfig {
        episodes: 20,
        seed: Some(2),
        ..TrainingConfig::default()
    })
    .run(&mut env, &mut agent)
    .unwrap();
    assert!(agent.table_len() > 0);

    agent.reset().unwrap();
    assert_eq!(agent.table_len(), 0);
}
