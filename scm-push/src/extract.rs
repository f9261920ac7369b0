//! Typed reference extraction.
//!
//! One extractor per entity category, each reading the category's own record
//! shape and returning `(target kind, target name)` pairs, dispatched from a
//! single [`extract_references`] entry point.
//!
//! ## Reference shapes
//!
//! Member fields come in three forms across the API and all are accepted:
//! a bare string, a list of strings, or `{name: ...}` records (single or in
//! a list). Platform sentinels (`any`, `none`, `application-default`) are
//! built-ins, never real objects, and are excluded.
//!
//! Malformed fragments (a string where a list is expected, a record without
//! a name) are skipped quietly: graph building never fails on item shape.

use serde_json::Value;

use crate::item::ItemKind;

/// One outbound dependency declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Target category; `None` when the category is deliberately
    /// unspecified (the placeholder node must keep an unset kind).
    pub target_kind: Option<ItemKind>,
    pub target_name: String,
}

/// Extraction result for one item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedRefs {
    /// References recorded as graph edges.
    pub edges: Vec<Reference>,
    /// References tracked for data integrity but kept out of the edge set,
    /// so validation cannot fail on them.
    pub informational: Vec<Reference>,
}

/// Extract the outbound references of one item, dispatched by category.
pub fn extract_references(kind: ItemKind, data: &Value) -> ExtractedRefs {
    match kind {
        ItemKind::AddressGroup => edges(address_group_refs(data)),
        ItemKind::ServiceGroup => edges(service_group_refs(data)),
        ItemKind::SecurityRule => edges(security_rule_refs(data)),
        ItemKind::NatRule | ItemKind::PbfRule => edges(rule_refs(data)),
        ItemKind::DecryptionRule => edges(decryption_rule_refs(data)),
        ItemKind::AuthenticationRule => edges(authentication_rule_refs(data)),
        ItemKind::QosRule => edges(qos_rule_refs(data)),
        ItemKind::ProfileGroup => profile_group_refs(data),
        ItemKind::IkeGateway => edges(ike_gateway_refs(data)),
        ItemKind::IpsecTunnel => edges(ipsec_tunnel_refs(data)),
        ItemKind::ServiceConnection => edges(service_connection_refs(data)),
        ItemKind::RemoteNetwork => edges(remote_network_refs(data)),
        _ => ExtractedRefs::default(),
    }
}

fn edges(edges: Vec<Reference>) -> ExtractedRefs {
    ExtractedRefs {
        edges,
        informational: Vec::new(),
    }
}

fn address_group_refs(data: &Value) -> Vec<Reference> {
    let mut out = Vec::new();
    for key in ["static", "dynamic"] {
        push_members(&mut out, data.get(key), ItemKind::AddressObject, &["any", "none"]);
    }
    out
}

fn service_group_refs(data: &Value) -> Vec<Reference> {
    let mut out = Vec::new();
    push_members(&mut out, data.get("services"), ItemKind::ServiceObject, &["any", "none"]);
    out
}

/// References shared by every rule category: addresses, services,
/// applications.
fn rule_refs(data: &Value) -> Vec<Reference> {
    let mut out = Vec::new();
    for side in ["source", "destination"] {
        push_members(&mut out, data.get(side), ItemKind::AddressObject, &["any", "none"]);
    }
    push_members(
        &mut out,
        data.get("service"),
        ItemKind::ServiceObject,
        &["any", "none", "application-default"],
    );
    push_members(&mut out, data.get("application"), ItemKind::ApplicationObject, &["any", "none"]);
    out
}

fn security_rule_refs(data: &Value) -> Vec<Reference> {
    let mut out = rule_refs(data);
    let group = data.get("profile_setting").and_then(|s| s.get("group"));
    push_members(&mut out, group, ItemKind::ProfileGroup, &["none"]);
    out
}

fn decryption_rule_refs(data: &Value) -> Vec<Reference> {
    let mut out = rule_refs(data);
    push_field(&mut out, data.get("profile"), ItemKind::DecryptionProfile, &["none"]);
    out
}

fn authentication_rule_refs(data: &Value) -> Vec<Reference> {
    let mut out = rule_refs(data);
    push_field(
        &mut out,
        data.get("authentication_profile"),
        ItemKind::AuthenticationProfile,
        &["none"],
    );
    out
}

fn qos_rule_refs(data: &Value) -> Vec<Reference> {
    let mut out = rule_refs(data);
    push_field(&mut out, data.get("qos_profile"), ItemKind::QosProfile, &["none"]);
    out
}

fn profile_group_refs(data: &Value) -> ExtractedRefs {
    let mut out = ExtractedRefs::default();
    let member_lists = [
        ("virus", ItemKind::AntivirusProfile),
        ("spyware", ItemKind::AntiSpywareProfile),
        ("vulnerability", ItemKind::VulnerabilityProfile),
        ("file_blocking", ItemKind::FileBlockingProfile),
        ("wildfire_analysis", ItemKind::WildfireProfile),
    ];
    for (key, target) in member_lists {
        push_members(&mut out.edges, data.get(key), target, &["none"]);
    }
    // url_filtering sits behind a deprecated endpoint; keep the names for
    // reporting but out of the edge set so validation cannot fail on them.
    push_members(
        &mut out.informational,
        data.get("url_filtering"),
        ItemKind::UrlFilteringProfile,
        &["none"],
    );
    out
}

fn ike_gateway_refs(data: &Value) -> Vec<Reference> {
    let protocol = data.get("protocol");
    let profile = ["ikev1", "ikev2"].iter().find_map(|version| {
        protocol?
            .get(version)
            .and_then(|p| single_name(p.get("ike_crypto_profile")))
    });
    profile
        .map(|name| vec![reference(ItemKind::IkeCryptoProfile, name)])
        .unwrap_or_default()
}

fn ipsec_tunnel_refs(data: &Value) -> Vec<Reference> {
    let mut out = Vec::new();
    let Some(auto_key) = data.get("auto_key") else {
        return out;
    };
    // The gateway field shows up as a bare string, a one-element list, or a
    // {name} record depending on API version; single_name handles all three.
    if let Some(gateway) = single_name(auto_key.get("ike_gateway")) {
        out.push(reference(ItemKind::IkeGateway, gateway));
    }
    if let Some(profile) = single_name(auto_key.get("ipsec_crypto_profile")) {
        out.push(reference(ItemKind::IpsecCryptoProfile, profile));
    }
    out
}

fn service_connection_refs(data: &Value) -> Vec<Reference> {
    let mut out = Vec::new();
    if let Some(tunnel) = single_name(data.get("ipsec_tunnel")) {
        out.push(reference(ItemKind::IpsecTunnel, tunnel));
    }
    // Chained failover: the backup points at another service connection, but
    // the target category is left unspecified so the placeholder keeps an
    // unset kind until its real definition is seen.
    if let Some(backup) = single_name(data.get("backup_SC")) {
        out.push(Reference {
            target_kind: None,
            target_name: backup,
        });
    }
    out
}

fn remote_network_refs(data: &Value) -> Vec<Reference> {
    single_name(data.get("ipsec_tunnel"))
        .map(|tunnel| vec![reference(ItemKind::IpsecTunnel, tunnel)])
        .unwrap_or_default()
}

fn reference(target_kind: ItemKind, target_name: String) -> Reference {
    Reference {
        target_kind: Some(target_kind),
        target_name,
    }
}

/// Append every member name of a list field, excluding sentinels.
///
/// Member lists must be arrays; any other shape is malformed and skipped
/// without affecting the containing item's registration.
fn push_members(out: &mut Vec<Reference>, field: Option<&Value>, target: ItemKind, excluded: &[&str]) {
    let Some(entries) = field.and_then(Value::as_array) else {
        return;
    };
    for name in entries.iter().filter_map(entry_name) {
        if excluded.iter().any(|s| name.eq_ignore_ascii_case(s)) {
            continue;
        }
        out.push(reference(target, name));
    }
}

/// Append names from a single-value-or-list field, excluding sentinels.
fn push_field(out: &mut Vec<Reference>, field: Option<&Value>, target: ItemKind, excluded: &[&str]) {
    let names = match field {
        Some(Value::Array(entries)) => entries.iter().filter_map(entry_name).collect(),
        Some(other) => entry_name(other).into_iter().collect::<Vec<_>>(),
        None => Vec::new(),
    };
    for name in names {
        if excluded.iter().any(|s| name.eq_ignore_ascii_case(s)) {
            continue;
        }
        out.push(reference(target, name));
    }
}

/// Name from a single-valued field: bare string, one-element list, or
/// `{name}` record.
fn single_name(field: Option<&Value>) -> Option<String> {
    match field? {
        Value::Array(entries) => entries.first().and_then(entry_name),
        other => entry_name(other),
    }
}

fn entry_name(entry: &Value) -> Option<String> {
    let raw = match entry {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("name")?.as_str()?,
        _ => return None,
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::{extract_references, Reference};
    use crate::item::ItemKind;

    fn names(refs: &[Reference]) -> Vec<&str> {
        refs.iter().map(|r| r.target_name.as_str()).collect()
    }

    #[test]
    fn any_sentinel_is_never_a_dependency() {
        let rule = json!({
            "source": ["any"],
            "destination": ["server1"],
            "service": ["any", "application-default"],
            "application": ["any"]
        });
        let refs = extract_references(ItemKind::SecurityRule, &rule);
        assert_eq!(names(&refs.edges), vec!["server1"]);
    }

    #[test]
    fn group_members_accept_strings_and_records() {
        let group = json!({"static": ["web1", {"name": "db1"}, 42, {"tag": "x"}]});
        let refs = extract_references(ItemKind::AddressGroup, &group);
        assert_eq!(names(&refs.edges), vec!["web1", "db1"]);
    }

    #[test]
    fn malformed_member_list_is_skipped() {
        for junk in [json!({"static": "not-a-list"}), json!({"static": {"filter": "x"}})] {
            let refs = extract_references(ItemKind::AddressGroup, &junk);
            assert!(refs.edges.is_empty());
        }
    }

    #[test]
    fn single_value_profile_fields_accept_string_or_list() {
        for profile in [json!("decrypt-strict"), json!(["decrypt-strict"])] {
            let rule = json!({"source": ["any"], "profile": profile});
            let refs = extract_references(ItemKind::DecryptionRule, &rule);
            assert_eq!(names(&refs.edges), vec!["decrypt-strict"]);
        }
    }

    #[test]
    fn security_rule_reads_profile_group() {
        let rule = json!({
            "source": ["any"],
            "destination": ["any"],
            "profile_setting": {"group": ["strict-group"]}
        });
        let refs = extract_references(ItemKind::SecurityRule, &rule);
        assert_eq!(
            refs.edges,
            vec![Reference {
                target_kind: Some(ItemKind::ProfileGroup),
                target_name: "strict-group".to_string()
            }]
        );
    }

    #[test]
    fn profile_group_keeps_url_filtering_informational() {
        let group = json!({
            "virus": ["av-default"],
            "url_filtering": ["url-default"]
        });
        let refs = extract_references(ItemKind::ProfileGroup, &group);
        assert_eq!(names(&refs.edges), vec!["av-default"]);
        assert_eq!(names(&refs.informational), vec!["url-default"]);
    }

    #[test]
    fn ike_gateway_reads_either_protocol_version() {
        let v1 = json!({"protocol": {"ikev1": {"ike_crypto_profile": "crypto-v1"}}});
        let refs = extract_references(ItemKind::IkeGateway, &v1);
        assert_eq!(names(&refs.edges), vec!["crypto-v1"]);

        let v2 = json!({"protocol": {"ikev2": {"ike_crypto_profile": "crypto-v2"}}});
        let refs = extract_references(ItemKind::IkeGateway, &v2);
        assert_eq!(names(&refs.edges), vec!["crypto-v2"]);
    }

    #[test]
    fn tunnel_gateway_forms_normalize_to_one_name() {
        for gateway in [json!("gw1"), json!(["gw1"]), json!({"name": "gw1"})] {
            let tunnel = json!({"auto_key": {"ike_gateway": gateway, "ipsec_crypto_profile": "esp1"}});
            let refs = extract_references(ItemKind::IpsecTunnel, &tunnel);
            assert_eq!(names(&refs.edges), vec!["gw1", "esp1"]);
        }
    }

    #[test]
    fn service_connection_backup_has_no_target_kind() {
        let sc = json!({"ipsec_tunnel": "tun1", "backup_SC": "sc-backup"});
        let refs = extract_references(ItemKind::ServiceConnection, &sc);
        assert_eq!(refs.edges[0].target_kind, Some(ItemKind::IpsecTunnel));
        assert_eq!(refs.edges[1].target_kind, None);
        assert_eq!(refs.edges[1].target_name, "sc-backup");
    }

    #[test]
    fn kinds_without_declared_references_extract_nothing() {
        let refs = extract_references(ItemKind::AddressObject, &json!({"ip_netmask": "10.0.0.1/32"}));
        assert!(refs.edges.is_empty());
        assert!(refs.informational.is_empty());
    }
}
