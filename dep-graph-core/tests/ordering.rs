use dep_graph_core::DependencyGraph;
use pretty_assertions::assert_eq;
use serde_json::json;

fn infrastructure_chain() -> DependencyGraph {
    // service connection -> ipsec tunnel -> ike gateway -> ike crypto profile
    let mut graph = DependencyGraph::new();
    graph.add_node("sc-primary", Some("service_connection"), Some(json!({})));
    graph.add_node("tun-primary", Some("ipsec_tunnel"), Some(json!({})));
    graph.add_node("gw-primary", Some("ike_gateway"), Some(json!({})));
    graph.add_node("ike-default", Some("ike_crypto_profile"), Some(json!({})));
    graph.add_dependency("sc-primary", "tun-primary", Some("service_connection"), Some("ipsec_tunnel"));
    graph.add_dependency("tun-primary", "gw-primary", Some("ipsec_tunnel"), Some("ike_gateway"));
    graph.add_dependency("gw-primary", "ike-default", Some("ike_gateway"), Some("ike_crypto_profile"));
    graph
}

#[test]
fn every_edge_target_precedes_its_source() {
    let graph = infrastructure_chain();
    let order = graph.topological_order();
    assert_eq!(order.len(), graph.len());
    for (from, to) in graph.edges() {
        let from_at = order.iter().position(|id| id == from).expect("from in order");
        let to_at = order.iter().position(|id| id == to).expect("to in order");
        assert!(to_at < from_at, "expected {to} before {from} in {order:?}");
    }
}

#[test]
fn strict_and_best_effort_agree_on_dags() {
    let graph = infrastructure_chain();
    let strict = graph.try_topological_order().expect("acyclic");
    assert_eq!(strict, graph.topological_order());
}

#[test]
fn cycle_keeps_best_effort_order_complete() {
    let mut graph = infrastructure_chain();
    // Chained failover connections pointing at each other.
    graph.add_dependency("sc-primary", "sc-backup", Some("service_connection"), None);
    graph.add_dependency("sc-backup", "sc-primary", None, Some("service_connection"));

    assert!(graph.has_cycles());
    let order = graph.topological_order();
    // Every node is still present exactly once.
    assert_eq!(order.len(), graph.len());

    let err = graph.try_topological_order().expect_err("cyclic");
    assert!(err.ordered.len() < graph.len());
    assert!(err.cyclic.contains(&"sc-primary".to_string()));
    assert!(err.cyclic.contains(&"sc-backup".to_string()));
}
