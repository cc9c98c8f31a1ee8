//! Candidate edge enumeration.
//!
//! A pair of entities is *viable* when its great-circle distance is within a
//! ceiling. The builder checks the full cross product, which is fine for the
//! tens to low hundreds of entities a regional study contains.
//!
//! Two independent relations are built per run:
//!
//! | Relation    | Source             | Destination        | Ceiling            |
//! |-------------|--------------------|--------------------|--------------------|
//! | inter-array | wind farm          | offshore substation| `inter_array_max_km` |
//! | export      | offshore substation| onshore substation | `export_max_km`      |
//!
//! Entities without any viable partner are kept and listed as isolated; the
//! formulator's degree constraints force their selection to zero.

use crate::config::ViabilityConfig;
use crate::geodesic::haversine_km;
use owe_core::{
    Kilometers, Located, OffshoreSubstationId, OnshoreSubstationId, Scenario, WindFarmId,
};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;
use std::hash::Hash;
use tracing::debug;

/// One viable pair, annotated with its geodesic distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateEdge<S, D> {
    pub source: S,
    pub destination: D,
    pub distance: Kilometers,
}

/// Wind farm to offshore substation
pub type InterArrayEdge = CandidateEdge<WindFarmId, OffshoreSubstationId>;
/// Offshore substation to onshore substation
pub type ExportEdge = CandidateEdge<OffshoreSubstationId, OnshoreSubstationId>;

/// The viable subset of one source x destination cross product.
#[derive(Debug, Clone)]
pub struct ViableEdges<S, D> {
    /// Sorted by source id, then destination id
    pub edges: Vec<CandidateEdge<S, D>>,
    pub isolated_sources: Vec<S>,
    pub isolated_destinations: Vec<D>,
    pub max_distance: Kilometers,
}

impl<S, D> ViableEdges<S, D>
where
    S: Copy + Ord + Hash + Display,
    D: Copy + Ord + Hash + Display,
{
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Bipartite petgraph view, nodes labelled with the entity display name
    /// and edges weighted with the distance in km.
    pub fn to_graph(&self) -> UnGraph<String, f64> {
        let mut graph = UnGraph::new_undirected();
        let mut sources: HashMap<S, NodeIndex> = HashMap::new();
        let mut destinations: HashMap<D, NodeIndex> = HashMap::new();

        for edge in &self.edges {
            let s = *sources
                .entry(edge.source)
                .or_insert_with(|| graph.add_node(edge.source.to_string()));
            let d = *destinations
                .entry(edge.destination)
                .or_insert_with(|| graph.add_node(edge.destination.to_string()));
            graph.add_edge(s, d, edge.distance.value());
        }
        for id in &self.isolated_sources {
            graph.add_node(id.to_string());
        }
        for id in &self.isolated_destinations {
            graph.add_node(id.to_string());
        }
        graph
    }

    /// Number of connected groups in the bipartite view; isolated entities
    /// count as their own group.
    pub fn cluster_count(&self) -> usize {
        connected_components(&self.to_graph())
    }
}

/// Enumerate all source/destination pairs within `max_distance`.
pub fn find_viable_edges<A, B>(
    sources: &[A],
    destinations: &[B],
    max_distance: Kilometers,
) -> ViableEdges<A::Id, B::Id>
where
    A: Located,
    B: Located,
{
    let mut edges = Vec::new();
    let mut linked_sources = BTreeSet::new();
    let mut linked_destinations = BTreeSet::new();

    for source in sources {
        for destination in destinations {
            let distance = haversine_km(source.location(), destination.location());
            if distance <= max_distance {
                edges.push(CandidateEdge {
                    source: source.id(),
                    destination: destination.id(),
                    distance,
                });
                linked_sources.insert(source.id());
                linked_destinations.insert(destination.id());
            }
        }
    }

    edges.sort_by(|a, b| (a.source, a.destination).cmp(&(b.source, b.destination)));

    let mut isolated_sources: Vec<A::Id> = sources
        .iter()
        .map(|s| s.id())
        .filter(|id| !linked_sources.contains(id))
        .collect();
    isolated_sources.sort();
    let mut isolated_destinations: Vec<B::Id> = destinations
        .iter()
        .map(|d| d.id())
        .filter(|id| !linked_destinations.contains(id))
        .collect();
    isolated_destinations.sort();

    ViableEdges {
        edges,
        isolated_sources,
        isolated_destinations,
        max_distance,
    }
}

/// Both candidate relations of a run.
#[derive(Debug, Clone)]
pub struct ViabilityGraph {
    pub inter_array: ViableEdges<WindFarmId, OffshoreSubstationId>,
    pub export: ViableEdges<OffshoreSubstationId, OnshoreSubstationId>,
}

impl ViabilityGraph {
    pub fn build(scenario: &Scenario, config: &ViabilityConfig) -> Self {
        let inter_array = find_viable_edges(
            &scenario.wind_farms,
            &scenario.offshore,
            Kilometers(config.inter_array_max_km),
        );
        let export = find_viable_edges(
            &scenario.offshore,
            &scenario.onshore,
            Kilometers(config.export_max_km),
        );

        debug!(
            inter_array = inter_array.len(),
            export = export.len(),
            isolated_wind_farms = inter_array.isolated_sources.len(),
            "viability graph built"
        );

        Self {
            inter_array,
            export,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owe_core::{
        GeoPoint, Megawatts, Meters, OffshoreSubstation, OnshoreSubstation, WindFarm,
    };

    fn linked(
        viable: &ViableEdges<WindFarmId, OffshoreSubstationId>,
        wf: WindFarmId,
        oss: OffshoreSubstationId,
    ) -> bool {
        viable.edges.iter().any(|e| e.source == wf && e.destination == oss)
    }

    fn farms() -> Vec<WindFarm> {
        [(1, 3.0, 54.0), (2, 3.5, 54.2), (3, 8.0, 57.0)]
            .iter()
            .map(|&(id, lon, lat)| {
                WindFarm::new(WindFarmId::new(id), "NL", GeoPoint::new(lon, lat), Megawatts(300.0))
            })
            .collect()
    }

    fn substations() -> Vec<OffshoreSubstation> {
        [(20, 3.2, 54.1), (10, 3.0, 54.5)]
            .iter()
            .map(|&(id, lon, lat)| {
                OffshoreSubstation::new(
                    OffshoreSubstationId::new(id),
                    "NL",
                    GeoPoint::new(lon, lat),
                    Meters(40.0),
                    Kilometers(80.0),
                )
            })
            .collect()
    }

    #[test]
    fn test_pairs_within_threshold_only() {
        let wf = farms();
        let oss = substations();
        let ceiling = Kilometers(60.0);
        let viable = find_viable_edges(&wf, &oss, ceiling);

        for a in &wf {
            for b in &oss {
                let d = haversine_km(a.location, b.location);
                assert_eq!(linked(&viable, a.id, b.id), d <= ceiling, "{} {}", a.id, b.id);
            }
        }
        assert_eq!(viable.isolated_sources, vec![WindFarmId::new(3)]);
        assert!(viable.isolated_destinations.is_empty());
    }

    #[test]
    fn test_sorted_output() {
        let viable = find_viable_edges(&farms(), &substations(), Kilometers(1000.0));
        let keys: Vec<_> = viable.edges.iter().map(|e| (e.source, e.destination)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(viable.len(), 6);
    }

    #[test]
    fn test_monotonic_in_threshold() {
        let wf = farms();
        let oss = substations();
        let mut previous: Vec<(WindFarmId, OffshoreSubstationId)> = Vec::new();
        for km in [0.0, 10.0, 25.0, 50.0, 100.0, 400.0, 1000.0] {
            let viable = find_viable_edges(&wf, &oss, Kilometers(km));
            for pair in &previous {
                assert!(linked(&viable, pair.0, pair.1));
            }
            previous = viable.edges.iter().map(|e| (e.source, e.destination)).collect();
        }
    }

    #[test]
    fn test_zero_threshold_keeps_coincident_pairs() {
        let wf = vec![WindFarm::new(WindFarmId::new(1), "DK", GeoPoint::new(11.0, 55.0), Megawatts(10.0))];
        let onss = vec![OnshoreSubstation::new(
            owe_core::OnshoreSubstationId::new(1),
            "DK",
            GeoPoint::new(11.0, 55.0),
        )];
        let viable = find_viable_edges(&wf, &onss, Kilometers(0.0));
        assert_eq!(viable.len(), 1);
    }

    #[test]
    fn test_graph_view() {
        let viable = find_viable_edges(&farms(), &substations(), Kilometers(60.0));
        let graph = viable.to_graph();
        assert_eq!(graph.edge_count(), viable.len());
        // 3 farms + 2 substations, the isolated farm included
        assert_eq!(graph.node_count(), 5);
    }

    #[test]
    fn test_cluster_count() {
        // Both nearby farms reach both substations; farm 3 stands alone
        let viable = find_viable_edges(&farms(), &substations(), Kilometers(60.0));
        assert_eq!(viable.cluster_count(), 2);
        let none = find_viable_edges(&farms(), &substations(), Kilometers(0.0));
        assert_eq!(none.cluster_count(), 5);
    }

    #[test]
    fn test_build_uses_independent_ceilings() {
        let mut scenario = Scenario::default();
        scenario.wind_farms = farms();
        scenario.offshore = substations();
        scenario.onshore = vec![OnshoreSubstation::new(
            owe_core::OnshoreSubstationId::new(1),
            "NL",
            GeoPoint::new(4.5, 52.5),
        )];

        let config = ViabilityConfig {
            inter_array_max_km: 1.0,
            export_max_km: 1000.0,
        };
        let graph = ViabilityGraph::build(&scenario, &config);
        assert!(graph.inter_array.is_empty());
        assert_eq!(graph.export.len(), 2);
    }
}
