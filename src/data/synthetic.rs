use crate::data::bar::Bar;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;

//generates a seeded random-walk bar sequence for demos and fixtures
//close follows a unit-step gaussian walk from 100; open/high/low wrap
//the close so every bar passes ohlc validation
pub fn random_walk(n: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    //unit normal always constructs
    let step = Normal::new(0.0, 1.0).unwrap();

    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;

    for _ in 0..n {
        price += step.sample(&mut rng);

        let open = price + rng.gen_range(-0.5..0.5);
        let high = price.max(open) + rng.gen_range(0.0..1.0);
        let low = price.min(open) - rng.gen_range(0.0..1.0);
        let volume = rng.gen_range(100.0..1000.0);

        bars.push(Bar::new_unchecked(open, high, low, price, volume, None));
    }

    bars
}
