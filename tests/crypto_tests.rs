//! Integration tests for the ezpass crypto module.

use ezpass::crypto::kdf::{derive_master_key, generate_salt, KdfParams, MasterKey};
use ezpass::crypto::{open, seal, NONCE_LEN, TAG_LEN};
use ezpass::errors::EzPassError;

/// Cheap-but-valid Argon2 parameters so the test suite stays fast.
fn test_params() -> KdfParams {
    KdfParams {
        memory_kib: 8_192,
        iterations: 1,
        parallelism: 1,
    }
}

fn test_key(byte: u8) -> MasterKey {
    MasterKey::new([byte; 32])
}

// ---------------------------------------------------------------------------
// Seal / open round-trip
// ---------------------------------------------------------------------------

#[test]
fn seal_open_roundtrip() {
    let key = test_key(0xAB);
    let plaintext = b"credential payload bytes";

    let (nonce, ciphertext) = seal(&key, plaintext).expect("seal should succeed");

    assert_eq!(nonce.len(), NONCE_LEN);
    // Ciphertext carries the 16-byte tag.
    assert_eq!(ciphertext.len(), plaintext.len() + TAG_LEN);

    let recovered = open(&key, &nonce, &ciphertext).expect("open should succeed");
    assert_eq!(recovered, plaintext);
}

#[test]
fn seal_uses_a_fresh_nonce_every_time() {
    let key = test_key(0xCD);
    let plaintext = b"same plaintext";

    let (nonce1, ct1) = seal(&key, plaintext).expect("seal 1");
    let (nonce2, ct2) = seal(&key, plaintext).expect("seal 2");

    assert_ne!(nonce1, nonce2, "nonces must never repeat");
    assert_ne!(ct1, ct2, "two encryptions of the same plaintext must differ");
}

#[test]
fn open_with_wrong_key_fails_with_authentication_error() {
    let key = test_key(0x11);
    let wrong_key = test_key(0x22);

    let (nonce, ciphertext) = seal(&key, b"top secret").expect("seal");
    let result = open(&wrong_key, &nonce, &ciphertext);

    assert!(matches!(result, Err(EzPassError::Authentication)));
}

#[test]
fn any_single_bit_flip_is_detected() {
    let key = test_key(0xBB);
    let (nonce, ciphertext) = seal(&key, b"integrity matters").expect("seal");

    // Flip one bit at a time across the whole ciphertext-plus-tag buffer:
    // every position, including the tag bytes, must fail authentication.
    for index in 0..ciphertext.len() {
        let mut tampered = ciphertext.clone();
        tampered[index] ^= 0x01;
        assert!(
            matches!(open(&key, &nonce, &tampered), Err(EzPassError::Authentication)),
            "bit flip at byte {index} must fail authentication"
        );
    }
}

#[test]
fn open_with_truncated_ciphertext_fails() {
    let key = test_key(0xAA);
    let nonce = [0u8; NONCE_LEN];
    // Shorter than a tag can never authenticate.
    let result = open(&key, &nonce, &[0u8; 5]);
    assert!(matches!(result, Err(EzPassError::Authentication)));
}

// ---------------------------------------------------------------------------
// Key derivation (Argon2id)
// ---------------------------------------------------------------------------

#[test]
fn derive_master_key_is_deterministic() {
    let salt = generate_salt();
    let params = test_params();

    let key1 = derive_master_key(b"my-secure-passphrase", &salt, &params).expect("derive 1");
    let key2 = derive_master_key(b"my-secure-passphrase", &salt, &params).expect("derive 2");

    assert_eq!(
        key1.as_bytes(),
        key2.as_bytes(),
        "same passphrase + salt + params must produce the same key"
    );
}

#[test]
fn different_salts_produce_different_keys() {
    let params = test_params();
    let salt1 = generate_salt();
    let salt2 = generate_salt();

    let key1 = derive_master_key(b"same-passphrase", &salt1, &params).expect("derive 1");
    let key2 = derive_master_key(b"same-passphrase", &salt2, &params).expect("derive 2");

    assert_ne!(key1.as_bytes(), key2.as_bytes());
}

#[test]
fn wrong_passphrase_key_cannot_open_sealed_data() {
    let salt = generate_salt();
    let params = test_params();

    let right = derive_master_key(b"Tr0ub4dor&3", &salt, &params).expect("derive right");
    let wrong = derive_master_key(b"wrong", &salt, &params).expect("derive wrong");

    let (nonce, ciphertext) = seal(&right, b"vault payload").expect("seal");
    assert!(matches!(
        open(&wrong, &nonce, &ciphertext),
        Err(EzPassError::Authentication)
    ));
}

#[test]
fn malformed_kdf_params_are_rejected() {
    let salt = generate_salt();

    let too_little_memory = KdfParams {
        memory_kib: 1_024,
        iterations: 3,
        parallelism: 4,
    };
    assert!(matches!(
        derive_master_key(b"pw", &salt, &too_little_memory),
        Err(EzPassError::KeyDerivation(_))
    ));

    let zero_iterations = KdfParams {
        memory_kib: 65_536,
        iterations: 0,
        parallelism: 4,
    };
    assert!(matches!(
        derive_master_key(b"pw", &salt, &zero_iterations),
        Err(EzPassError::KeyDerivation(_))
    ));

    let zero_parallelism = KdfParams {
        memory_kib: 65_536,
        iterations: 3,
        parallelism: 0,
    };
    assert!(matches!(
        derive_master_key(b"pw", &salt, &zero_parallelism),
        Err(EzPassError::KeyDerivation(_))
    ));
}

#[test]
fn generated_salts_are_unique() {
    let salts: Vec<[u8; 16]> = (0..8).map(|_| generate_salt()).collect();
    for (i, a) in salts.iter().enumerate() {
        for b in &salts[i + 1..] {
            assert_ne!(a, b, "two random salts collided");
        }
    }
}
