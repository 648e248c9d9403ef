use std::collections::HashMap;
use std::hash::Hash;

use log::warn;

use crate::error::{BaselineError, Result};

/// One observed rating.
#[derive(Debug, Clone, PartialEq)]
pub struct Rating<U, I> {
    pub user: U,
    pub item: I,
    pub value: f64,
}

impl<U, I> Rating<U, I> {
    pub fn new(user: U, item: I, value: f64) -> Self {
        Rating { user, item, value }
    }
}

impl<U, I> From<(U, I, f64)> for Rating<U, I> {
    fn from((user, item, value): (U, I, f64)) -> Self {
        Rating { user, item, value }
    }
}

/// Ratings indexed by dense inner ids.
///
/// Inner ids are handed out in first-seen order, so two trainsets built from the same
/// sequence of ratings are identical. Repeated (user, item) pairs are collapsed into
/// their average rating; the global mean still covers every raw rating.
///
/// The rating scale passed to `build` is only checked against the data, clipping is
/// done by the model.
#[derive(Debug, Clone)]
pub struct Trainset<U, I> {
    user_index: HashMap<U, usize>,
    item_index: HashMap<I, usize>,
    ur: Vec<Vec<(usize, f64)>>,
    ir: Vec<Vec<(usize, f64)>>,
    n_ratings: usize,
    global_mean: f64,
}

impl<U, I> Trainset<U, I>
where
    U: Eq + Hash + Clone,
    I: Eq + Hash + Clone,
{
    pub fn build(ratings: &[Rating<U, I>], rating_scale: Option<(f64, f64)>) -> Result<Self> {
        if ratings.is_empty() {
            return Err(BaselineError::InvalidInput(
                "training set is empty".to_string(),
            ));
        }

        let mut user_index: HashMap<U, usize> = HashMap::new();
        let mut item_index: HashMap<I, usize> = HashMap::new();

        // (user, item) -> slot in `pairs`, slot holds (sum, count)
        let mut pair_slots: HashMap<(usize, usize), usize> = HashMap::new();
        let mut pairs: Vec<(usize, usize, f64, usize)> = Vec::with_capacity(ratings.len());
        let mut total = 0.0;

        for rating in ratings {
            let next_uid = user_index.len();
            let uid = *user_index.entry(rating.user.clone()).or_insert(next_uid);
            let next_iid = item_index.len();
            let iid = *item_index.entry(rating.item.clone()).or_insert(next_iid);

            total += rating.value;

            match pair_slots.get(&(uid, iid)) {
                Some(&slot) => {
                    pairs[slot].2 += rating.value;
                    pairs[slot].3 += 1;
                }
                None => {
                    pair_slots.insert((uid, iid), pairs.len());
                    pairs.push((uid, iid, rating.value, 1));
                }
            }
        }

        if let Some((lower, upper)) = rating_scale {
            let outside = ratings
                .iter()
                .filter(|r| r.value < lower || r.value > upper)
                .count();
            if outside > 0 {
                warn!(
                    "{} ratings fall outside the rating scale [{}, {}], predictions will be clipped",
                    outside, lower, upper
                );
            }
        }

        let duplicates = ratings.len() - pairs.len();
        if duplicates > 0 {
            warn!(
                "averaged {} duplicate (user, item) ratings into {} observations",
                duplicates,
                pairs.len()
            );
        }

        let mut ur = vec![Vec::new(); user_index.len()];
        let mut ir = vec![Vec::new(); item_index.len()];
        for (uid, iid, sum, count) in pairs {
            let value = sum / count as f64;
            ur[uid].push((iid, value));
            ir[iid].push((uid, value));
        }

        Ok(Trainset {
            user_index,
            item_index,
            ur,
            ir,
            n_ratings: ratings.len(),
            global_mean: total / ratings.len() as f64,
        })
    }

    pub fn to_inner_uid(&self, user: &U) -> Option<usize> {
        self.user_index.get(user).copied()
    }

    pub fn to_inner_iid(&self, item: &I) -> Option<usize> {
        self.item_index.get(item).copied()
    }
}

impl<U, I> Trainset<U, I> {
    pub fn n_users(&self) -> usize {
        self.ur.len()
    }

    pub fn n_items(&self) -> usize {
        self.ir.len()
    }

    /// Number of raw ratings, duplicates included.
    pub fn n_ratings(&self) -> usize {
        self.n_ratings
    }

    pub fn global_mean(&self) -> f64 {
        self.global_mean
    }

    /// (inner item id, rating) observations per inner user id.
    pub fn ur(&self) -> &[Vec<(usize, f64)>] {
        &self.ur
    }

    /// (inner user id, rating) observations per inner item id.
    pub fn ir(&self) -> &[Vec<(usize, f64)>] {
        &self.ir
    }

    /// Every (inner user id, inner item id, rating) observation, user by user.
    pub fn all_ratings(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.ur
            .iter()
            .enumerate()
            .flat_map(|(uid, ratings)| ratings.iter().map(move |&(iid, r)| (uid, iid, r)))
    }
}
