use baseline_rust::utils::accuracy::{mae, rmse};
use baseline_rust::{Algo, BaseLineRecommender, BaselineBiasModel, BaselineError, BaselineOptions, Rating};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn to_ratings(triples: &[(u8, u8, f64)]) -> Vec<Rating<u8, u8>> {
    triples.iter().map(|&(u, i, r)| Rating::new(u, i, r)).collect()
}

/// Users with a fixed offset rating items with a fixed offset, plus noise.
fn synthetic_ratings(rng: &mut StdRng, n_users: u32, n_items: u32, density: f64) -> Vec<Rating<u32, u32>> {
    let user_offsets: Vec<f64> = (0..n_users).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let item_offsets: Vec<f64> = (0..n_items).map(|_| rng.gen_range(-1.0..1.0)).collect();

    let mut ratings = Vec::new();
    for u in 0..n_users {
        for i in 0..n_items {
            if rng.gen_bool(density) {
                let noise: f64 = rng.gen_range(-0.3..0.3);
                let value = (3.0 + user_offsets[u as usize] + item_offsets[i as usize] + noise).clamp(1.0, 5.0);
                ratings.push(Rating::new(u, i, value));
            }
        }
    }
    ratings
}

#[test]
fn held_out_error_beats_global_mean() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(42);
    let mut ratings = synthetic_ratings(&mut rng, 60, 40, 0.4);
    ratings.shuffle(&mut rng);
    let split = ratings.len() * 4 / 5;
    let (train, test) = ratings.split_at(split);

    let mut rec = BaseLineRecommender::new();
    rec.fit(train).unwrap();

    let mean = rec.global_mean().unwrap();
    let mean_pairs: Vec<(f64, f64)> = test.iter().map(|r| (r.value, mean)).collect();

    let model_rmse = rec.rmse(test).unwrap();
    assert!(model_rmse < rmse(&mean_pairs).unwrap());
    assert!(rec.mae(test).unwrap() < mae(&mean_pairs).unwrap());
    assert!(rec.fcp(test).unwrap() > 0.5);
}

#[test]
fn refitting_same_data_is_deterministic() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(3);
    let ratings = synthetic_ratings(&mut rng, 30, 20, 0.5);

    let mut first = BaselineBiasModel::new(BaselineOptions::als(25, 5.0, 3.0));
    first.fit(&ratings).unwrap();
    let mut second = BaselineBiasModel::new(BaselineOptions::als(25, 5.0, 3.0).with_n_jobs(3));
    second.fit(&ratings).unwrap();

    assert_eq!(first.user_biases().unwrap(), second.user_biases().unwrap());
    assert_eq!(first.item_biases().unwrap(), second.item_biases().unwrap());
}

#[test]
fn lifecycle_errors_surface_to_caller() {
    let mut model: BaselineBiasModel<u8, u8> = BaselineBiasModel::new(BaselineOptions::default());
    assert_eq!(model.predict(&1, &1, None, true).unwrap_err(), BaselineError::NotFitted);
    let empty: Vec<Rating<u8, u8>> = Vec::new();
    assert!(matches!(model.fit(&empty), Err(BaselineError::InvalidInput(_))));
    assert_eq!(model.item_bias(&1).unwrap_err(), BaselineError::NotFitted);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn global_mean_is_mean_of_training_ratings(
        triples in prop::collection::vec((0u8..8, 0u8..8, 1.0f64..5.0), 1..60),
    ) {
        let ratings = to_ratings(&triples);
        let mut model = BaselineBiasModel::new(BaselineOptions::als(5, 5.0, 3.0));
        model.fit(&ratings).unwrap();

        let expected = triples.iter().map(|t| t.2).sum::<f64>() / triples.len() as f64;
        prop_assert!((model.global_mean().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn cold_start_predicts_global_mean(
        triples in prop::collection::vec((0u8..8, 0u8..8, 1.0f64..5.0), 1..60),
    ) {
        let ratings = to_ratings(&triples);
        let mut model = BaselineBiasModel::new(BaselineOptions::als(5, 5.0, 3.0));
        model.fit(&ratings).unwrap();

        let pred = model.predict(&200, &201, None, true).unwrap();
        prop_assert_eq!(pred.est, model.global_mean().unwrap());
    }

    #[test]
    fn rmse_dominates_mae_and_is_non_negative(
        pairs in prop::collection::vec((1.0f64..5.0, 1.0f64..5.0), 1..100),
    ) {
        let r = rmse(&pairs).unwrap();
        let m = mae(&pairs).unwrap();
        prop_assert!(r >= 0.0);
        prop_assert!(r + 1e-12 >= m);
    }

    #[test]
    fn metrics_ignore_pair_order(
        pairs in prop::collection::vec((1.0f64..5.0, 1.0f64..5.0), 1..100),
        seed in any::<u64>(),
    ) {
        let mut shuffled = pairs.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

        prop_assert!((rmse(&pairs).unwrap() - rmse(&shuffled).unwrap()).abs() < 1e-9);
        prop_assert!((mae(&pairs).unwrap() - mae(&shuffled).unwrap()).abs() < 1e-9);
    }
}
