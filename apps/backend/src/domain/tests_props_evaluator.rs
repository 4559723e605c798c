use proptest::prelude::*;

use crate::domain::code::Code;
use crate::domain::evaluator::exact_matches;

fn arb_code() -> impl Strategy<Value = Code> {
    proptest::collection::vec(0u8..10, 4).prop_map(|ds| {
        let raw: String = ds.iter().map(|d| char::from(b'0' + d)).collect();
        Code::parse(&raw).unwrap()
    })
}

proptest! {
    #[test]
    fn match_count_is_in_range(guess in arb_code(), secret in arb_code()) {
        let m = exact_matches(&guess, &secret);
        prop_assert!(m <= 4);
    }

    #[test]
    fn match_count_equals_positionwise_count(guess in arb_code(), secret in arb_code()) {
        let expected = guess
            .digits()
            .iter()
            .zip(secret.digits().iter())
            .filter(|(g, s)| g == s)
            .count() as u8;
        prop_assert_eq!(exact_matches(&guess, &secret), expected);
    }

    #[test]
    fn evaluator_is_symmetric(guess in arb_code(), secret in arb_code()) {
        prop_assert_eq!(exact_matches(&guess, &secret), exact_matches(&secret, &guess));
    }

    #[test]
    fn self_match_is_always_four(code in arb_code()) {
        prop_assert_eq!(exact_matches(&code, &code), 4);
    }

    #[test]
    fn swapping_two_positions_in_both_preserves_count(
        guess in arb_code(),
        secret in arb_code(),
        i in 0usize..4,
        j in 0usize..4,
    ) {
        // Permuting guess and secret by the same position swap cannot change
        // the number of exact matches.
        let swap = |c: &Code| {
            let mut d = *c.digits();
            d.swap(i, j);
            let raw: String = d.iter().map(|x| char::from(b'0' + x)).collect();
            Code::parse(&raw).unwrap()
        };
        prop_assert_eq!(
            exact_matches(&swap(&guess), &swap(&secret)),
            exact_matches(&guess, &secret)
        );
    }
}
