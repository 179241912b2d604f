//! Property tests for ID and event-ID text forms.

use proptest::prelude::*;
use tracelink_core::{EventId, Id, TraceError, web::decode_header};

fn arb_id() -> impl Strategy<Value = Id> {
    any::<u64>().prop_map(Id::new)
}

// Zero is "no parent", so a present parent is never zero.
fn arb_parent() -> impl Strategy<Value = Id> {
    (1..=u64::MAX).prop_map(Id::new)
}

fn arb_event_id() -> impl Strategy<Value = EventId> {
    (arb_id(), arb_id(), proptest::option::of(arb_parent())).prop_map(|(root, id, parent)| EventId {
        root,
        id,
        parent,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn format_is_16_lowercase_hex_digits(id in arb_id()) {
        let s = id.to_string();
        prop_assert_eq!(s.len(), 16);
        prop_assert!(s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }

    #[test]
    fn parse_inverts_format(id in arb_id()) {
        prop_assert_eq!(Id::parse(&id.to_string()).unwrap(), id);
        prop_assert_eq!(Id::parse(&id.to_string().to_uppercase()).unwrap(), id);
    }

    #[test]
    fn json_round_trip(id in arb_id()) {
        let json = serde_json::to_string(&id).unwrap();
        prop_assert_eq!(serde_json::from_str::<Id>(&json).unwrap(), id);
        prop_assert_eq!(serde_json::from_str::<Id>(&id.get().to_string()).unwrap(), id);
    }

    #[test]
    fn parse_rejects_other_lengths(s in "[0-9a-f]{0,15}|[0-9a-f]{17,24}") {
        prop_assert!(matches!(Id::parse(&s), Err(TraceError::MalformedId)));
    }

    #[test]
    fn query_and_path_forms_round_trip(e in arb_event_id()) {
        prop_assert_eq!(EventId::parse_query(&e.to_query()).unwrap(), e);
        prop_assert_eq!(EventId::parse_path(&e.to_path()).unwrap(), e);
        prop_assert_eq!(decode_header(Some(&e.to_query())).unwrap(), Some(e));
    }

    #[test]
    fn a_non_hex_digit_anywhere_is_rejected(e in arb_event_id(), pos in 0usize..16, c in "[g-z]") {
        let mut root = e.root.to_string();
        root.replace_range(pos..pos + 1, &c);
        let header = format!("root={}&id={}", root, e.id);
        prop_assert!(matches!(decode_header(Some(&header)), Err(TraceError::MalformedEventId)));
    }
}
