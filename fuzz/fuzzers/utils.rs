extern crate radix4;
extern crate rand;
extern crate rand_pcg;
extern crate ring;

use self::rand::{Rng, SeedableRng};
use self::rand_pcg::Pcg32;
use self::ring::digest;
use radix4::config::{ConfigBuilder, Mode};
use radix4::Config;

/// Build a random, but always valid, configuration seeded from a sha256 of
/// `data` so a given fuzz input always exercises the same configuration on
/// repeated runs.
pub fn random_config(data: &[u8]) -> Config {
    let sha = digest::digest(&digest::SHA256, data);

    let mut seed: [u8; 16] = [0; 16];
    seed.copy_from_slice(&sha.as_ref()[0..16]);

    let mut rng = Pcg32::from_seed(seed);

    let mode = if rng.gen() { Mode::Block } else { Mode::Stream };
    let builder = match mode {
        Mode::Block => ConfigBuilder::block(),
        Mode::Stream => ConfigBuilder::stream(),
    };

    let line_length = if rng.gen() { 0 } else { rng.gen_range(1..40) };

    builder
        .optimistic(rng.gen())
        .terminated(rng.gen())
        .line_length(line_length)
        .build()
        .expect("randomly generated configuration is always valid")
}
