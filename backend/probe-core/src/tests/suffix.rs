use crate::suffix::{DEFAULT_SUFFIX_LENGTH, SUFFIX_ALPHABET, SuffixGenerator};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// **VALUE**: Verifies generated suffixes have the requested length and only use `a-z0-9`.
///
/// **WHY THIS MATTERS**: Probed URLs must look like the random slugs the target serves.
/// Uppercase or punctuation would change what is being measured.
#[test]
fn given_default_length_when_generating_then_suffix_is_twelve_lowercase_alphanumerics() {
    // GIVEN: A generator with the default length
    let mut generator = SuffixGenerator::new(DEFAULT_SUFFIX_LENGTH);

    for _ in 0..200 {
        // WHEN: Generating a suffix
        let suffix = generator.generate();

        // THEN: Length and alphabet hold
        assert_eq!(suffix.len(), 12);
        assert!(
            suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)),
            "Unexpected character in {suffix}"
        );
    }
}

#[test]
fn given_same_seed_when_generating_then_sequences_match() {
    let mut first = SuffixGenerator::with_rng(8, StdRng::seed_from_u64(7));
    let mut second = SuffixGenerator::with_rng(8, StdRng::seed_from_u64(7));

    let a: Vec<String> = (0..5).map(|_| first.generate()).collect();
    let b: Vec<String> = (0..5).map(|_| second.generate()).collect();

    assert_eq!(a, b);
}

/// **BUG THIS CATCHES**: Would catch a generator that caches its first value and
/// probes the same URL repeatedly.
#[test]
fn given_generator_when_called_repeatedly_then_suffixes_vary() {
    let mut generator = SuffixGenerator::with_rng(12, StdRng::seed_from_u64(42));

    let first = generator.generate();
    let distinct = (0..50).map(|_| generator.generate()).any(|s| s != first);

    assert!(distinct, "Suffixes should not repeat every call");
}

#[test]
fn given_custom_length_when_generating_then_length_is_respected() {
    let mut generator = SuffixGenerator::with_rng(3, StdRng::seed_from_u64(1));

    assert_eq!(generator.length(), 3);
    assert_eq!(generator.generate().len(), 3);
}

#[test]
fn given_alphabet_when_inspected_then_covers_lowercase_and_digits() {
    assert_eq!(SUFFIX_ALPHABET.len(), 36);
    assert!(SUFFIX_ALPHABET.iter().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
}
