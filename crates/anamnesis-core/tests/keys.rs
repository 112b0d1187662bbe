use anamnesis_core::keys;

#[test]
fn session_and_hash_objects_live_under_the_tenant_prefix() {
    let prefix = keys::tenant_prefix("clinic-a");
    assert_eq!(prefix, "insights/clinic-a/");

    let session = keys::session_insight("clinic-a", "s-42");
    assert_eq!(session, "insights/clinic-a/sessions/s-42.json");
    assert!(session.starts_with(&prefix));

    let hashed = keys::hashed_insight("clinic-a", "abc123");
    assert_eq!(hashed, "insights/clinic-a/hashes/abc123.json");
    assert!(hashed.starts_with(keys::INSIGHTS_PREFIX));
}

#[test]
fn slashes_in_ids_cannot_cross_tenants() {
    let a = keys::session_insight("x", "y/sessions/z");
    let b = keys::session_insight("x/sessions/y", "z");
    assert_ne!(a, b);
    assert_eq!(a, "insights/x/sessions/y%2Fsessions%2Fz.json");
    assert!(b.starts_with("insights/x%2Fsessions%2Fy/"));

    assert_ne!(
        keys::hashed_insight("x", "y/hashes/z"),
        keys::hashed_insight("x/hashes/y", "z")
    );
}

#[test]
fn escaped_ids_stay_distinct_from_literal_escapes() {
    assert_ne!(
        keys::session_insight("t", "a/b"),
        keys::session_insight("t", "a%2Fb")
    );
    assert_eq!(keys::session_insight("t", "a%2Fb"), "insights/t/sessions/a%252Fb.json");
    assert_eq!(keys::tenant_prefix("clinic_a-1"), "insights/clinic_a-1/");
    assert_eq!(keys::session_insight("t", ".."), "insights/t/sessions/%2E%2E.json");
}
