use proptest::prelude::*;

use voteweb_crypto::{HashSecret, IdentityHasher};

fn hasher(secret: &str) -> IdentityHasher {
    IdentityHasher::new(&HashSecret::new(secret).unwrap()).unwrap()
}

proptest! {
    /// Hashing the same identity twice with one secret yields the same token.
    #[test]
    fn hashing_is_deterministic(identity in ".{0,64}") {
        let h = hasher("fixed-secret-one");
        prop_assert_eq!(h.hash_identity(&identity), h.hash_identity(&identity));
    }

    /// Two different secrets give different tokens for the same identity.
    #[test]
    fn secrets_separate_tokens(identity in ".{0,64}") {
        let a = hasher("fixed-secret-one");
        let b = hasher("fixed-secret-two");
        prop_assert_ne!(a.hash_identity(&identity), b.hash_identity(&identity));
    }

    /// A rebuilt hasher from an equal secret agrees with the original.
    #[test]
    fn rebuilt_hasher_agrees(identity in "[0-9a-f:.]{1,45}") {
        let a = hasher("fixed-secret-one");
        let b = hasher("fixed-secret-one");
        prop_assert_eq!(a.hash_identity(&identity), b.hash_identity(&identity));
    }
}
