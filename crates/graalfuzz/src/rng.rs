use getrandom::getrandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::FuzzError;

/// Returns the session RNG and the seed it was built from. Without an explicit
/// seed one is drawn from the OS; log it to replay the session.
pub fn session_rng(seed: Option<u64>) -> Result<(StdRng, u64), FuzzError> {
    let seed = match seed {
        Some(seed) => seed,
        None => os_seed()?,
    };
    Ok((StdRng::seed_from_u64(seed), seed))
}

fn os_seed() -> Result<u64, FuzzError> {
    let mut bytes = [0u8; 8];
    getrandom(&mut bytes).map_err(|err| FuzzError::Entropy(err.to_string()))?;
    Ok(u64::from_le_bytes(bytes))
}
