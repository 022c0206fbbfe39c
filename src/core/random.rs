//! Random currency pair, fed by the shake event

use crate::core::rate::{CurrencyRate, RateTable};
use rand::Rng;
use rand::seq::index;

/// Picks two distinct entries uniformly, without replacement.
///
/// `None` when the table holds fewer than two currencies.
pub fn pick_random_pair<R: Rng + ?Sized>(
    table: &RateTable,
    rng: &mut R,
) -> Option<(CurrencyRate, CurrencyRate)> {
    let rates = table.rates();
    if rates.len() < 2 {
        return None;
    }
    let picked = index::sample(rng, rates.len(), 2);
    Some((rates[picked.index(0)].clone(), rates[picked.index(1)].clone()))
}
