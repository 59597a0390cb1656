//! Proof digests and hash-chain state transitions.

use crate::errors::PowError;
use galena_types::{Digest, MinerId, TimestampMs};

// Domain separation tags; digests from one context never validate in another.
const PROOF_TAG: &[u8] = b"GALENA_PROOF";
const CHAIN_TAG: &[u8] = b"GALENA_CHAIN";
const SEED_TAG: &[u8] = b"GALENA_SEED";

/// Derive a proof digest from the miner's current chain hash, the submitter
/// identity, and a nonce. Deterministic and stateless.
pub fn generate_proof(current_hash: &Digest, miner: &MinerId, nonce: u64) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(PROOF_TAG);
    hasher.update(current_hash);
    hasher.update(miner);
    hasher.update(&nonce.to_le_bytes());
    *hasher.finalize().as_bytes()
}

/// Validate a proof digest against a difficulty target: the first
/// `difficulty` bytes must be zero. Difficulty zero never validates.
pub fn validate_proof(digest: &Digest, difficulty: u8) -> Result<(), PowError> {
    let required = difficulty as usize;
    if required == 0 || required > digest.len() {
        return Err(PowError::InsufficientDifficulty { difficulty });
    }
    if digest[..required].iter().any(|byte| *byte != 0) {
        return Err(PowError::InsufficientDifficulty { difficulty });
    }
    Ok(())
}

/// Derive the miner's next chain hash from an accepted proof, the submission
/// time, and a per-call unique value from the execution context. The unique
/// value keeps an observed proof from being replayed in a later transaction.
pub fn advance_chain(proof: &Digest, now_ms: TimestampMs, uniq: &[u8; 32]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(CHAIN_TAG);
    hasher.update(proof);
    hasher.update(&now_ms.to_le_bytes());
    hasher.update(uniq);
    *hasher.finalize().as_bytes()
}

/// Seed a fresh hash chain for a newly registered account. Distinct
/// identities or uniqueness values yield distinct starting chains.
pub fn initial_chain_hash(miner: &MinerId, uniq: &[u8; 32]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(SEED_TAG);
    hasher.update(miner);
    hasher.update(uniq);
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINER: MinerId = [7u8; 32];
    const CHAIN: Digest = [1u8; 32];

    /// Brute-force a nonce whose proof has exactly `zeros` leading zero
    /// bytes. Expected work at two bytes is ~65k digests.
    fn find_nonce_with_exact_zeros(zeros: usize) -> (u64, Digest) {
        for nonce in 0..10_000_000u64 {
            let digest = generate_proof(&CHAIN, &MINER, nonce);
            if digest[..zeros].iter().all(|b| *b == 0) && digest[zeros] != 0 {
                return (nonce, digest);
            }
        }
        panic!("no nonce with {zeros} leading zero bytes in search bound");
    }

    #[test]
    fn proof_is_deterministic() {
        let a = generate_proof(&CHAIN, &MINER, 42);
        let b = generate_proof(&CHAIN, &MINER, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn proof_depends_on_every_input() {
        let base = generate_proof(&CHAIN, &MINER, 42);
        assert_ne!(base, generate_proof(&CHAIN, &MINER, 43));
        assert_ne!(base, generate_proof(&[2u8; 32], &MINER, 42));
        assert_ne!(base, generate_proof(&CHAIN, &[8u8; 32], 42));
    }

    #[test]
    fn zero_difficulty_never_validates() {
        let all_zero = [0u8; 32];
        assert_eq!(
            validate_proof(&all_zero, 0),
            Err(PowError::InsufficientDifficulty { difficulty: 0 })
        );
    }

    #[test]
    fn validation_checks_leading_zero_bytes() {
        let mut digest = [0u8; 32];
        digest[3] = 0xFF;
        assert!(validate_proof(&digest, 1).is_ok());
        assert!(validate_proof(&digest, 3).is_ok());
        assert!(validate_proof(&digest, 4).is_err());

        let full = [0u8; 32];
        assert!(validate_proof(&full, 32).is_ok());
        assert!(validate_proof(&full, 33).is_err());
    }

    #[test]
    fn mined_nonce_validates_at_its_level_and_fails_above() {
        let (_, digest) = find_nonce_with_exact_zeros(2);
        assert!(validate_proof(&digest, 1).is_ok());
        assert!(validate_proof(&digest, 2).is_ok());
        assert_eq!(
            validate_proof(&digest, 3),
            Err(PowError::InsufficientDifficulty { difficulty: 3 })
        );
    }

    #[test]
    fn chain_advancement_binds_time_and_uniqueness() {
        let proof = generate_proof(&CHAIN, &MINER, 42);
        let next = advance_chain(&proof, 1_000, &[9u8; 32]);
        assert_ne!(next, proof);
        assert_ne!(next, advance_chain(&proof, 1_001, &[9u8; 32]));
        assert_ne!(next, advance_chain(&proof, 1_000, &[10u8; 32]));
    }

    #[test]
    fn registration_seeds_are_distinct() {
        let a = initial_chain_hash(&MINER, &[1u8; 32]);
        let b = initial_chain_hash(&MINER, &[2u8; 32]);
        let c = initial_chain_hash(&[8u8; 32], &[1u8; 32]);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn domains_are_separated() {
        // Same 32-byte inputs through different derivations must not collide.
        let seed = initial_chain_hash(&MINER, &CHAIN);
        let next = advance_chain(&CHAIN, 0, &MINER);
        assert_ne!(seed, next);
    }
}
