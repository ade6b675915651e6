//! Property-based invariant tests for binding-key normalization.
//!
//! 1. Normalization is idempotent
//! 2. Keys never contain parentheses, colons or whitespace
//! 3. Parenthesized and bare spellings of a feature share one key
//! 4. Thresholds read back from their own query text unchanged

use proptest::prelude::*;
use rubberband_core::{AxisKind, BindingKey, Bound, MediaQuery, Threshold, Unit};

// ── Strategies ──────────────────────────────────────────────────────────

fn query_text() -> impl Strategy<Value = String> {
    "[ ()a-zA-Z0-9:.\\-\t]{0,40}"
}

fn feature() -> impl Strategy<Value = String> {
    "[a-z][a-z\\-]{0,12}[a-z]"
}

fn value() -> impl Strategy<Value = String> {
    "[0-9]{1,5}(px|em|rem)?"
}

fn axis() -> impl Strategy<Value = AxisKind> {
    prop_oneof![
        Just(AxisKind::MinWidth),
        Just(AxisKind::MaxWidth),
        Just(AxisKind::MinHeight),
        Just(AxisKind::MaxHeight),
    ]
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn normalization_is_idempotent(text in query_text()) {
        let once = BindingKey::normalize(&text);
        let twice = BindingKey::normalize(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn keys_have_no_punctuation_or_whitespace(text in query_text()) {
        let key = BindingKey::normalize(&text);
        prop_assert!(!key.as_str().contains(|c: char| c.is_whitespace() || "():".contains(c)));
    }

    #[test]
    fn spellings_share_a_key(f in feature(), v in value(), pad in " {0,3}") {
        let spaced = format!("{pad}({f}:{pad} {v}){pad}");
        let bare = format!("{f}:{v}");
        prop_assert_eq!(
            MediaQuery::new(spaced).key(),
            MediaQuery::new(bare).key()
        );
    }

    #[test]
    fn threshold_query_round_trip(
        axis in axis(),
        value in 0u32..99_999,
        unbounded in any::<bool>(),
    ) {
        let bound = if unbounded { Bound::Unbounded } else { Bound::from(value) };
        let threshold = Threshold::new(axis, bound, Unit::default());
        let back = Threshold::from_query(&threshold.query()).expect("own query parses");
        prop_assert_eq!(back, threshold);
    }
}
