//! Endpoint normalization.
//!
//! Converts raw EDS assignments and DNS resolution results into the uniform
//! priority/locality/endpoint structure consumed downstream. The dual-stack
//! flag is resolved once at construction; it controls whether additional
//! (non-primary) endpoint addresses are kept.

use crate::resource::{
    ClusterLoadAssignment, DenominatorType, DropCategory, Endpoint, EndpointAddress,
    EndpointResource, HealthStatus, Locality, LocalityEntry, PriorityEntry, WeightedEndpoint,
};
use std::collections::BTreeMap;
use tracing::debug;

const PER_MILLION: u32 = 1_000_000;

#[derive(Debug, Clone, Copy)]
pub struct EndpointNormalizer {
    dual_stack: bool,
}

impl EndpointNormalizer {
    pub fn new(dual_stack: bool) -> Self {
        Self { dual_stack }
    }

    /// Normalize an EDS ClusterLoadAssignment.
    ///
    /// Drop overloads are converted to a per-million integer (saturating at
    /// one million); entries without a percentage are skipped. Localities
    /// with missing/zero weight are skipped, as are endpoints that are
    /// neither UNKNOWN nor HEALTHY. Sparse input priorities collapse into a
    /// dense table that preserves their relative order.
    pub fn from_load_assignment(&self, assignment: &ClusterLoadAssignment) -> EndpointResource {
        let mut drop_categories = Vec::new();
        for overload in &assignment.drop_overloads {
            let Some(percentage) = overload.drop_percentage else {
                continue;
            };
            let per_million = match percentage.denominator {
                DenominatorType::Hundred => percentage.numerator.saturating_mul(10_000),
                DenominatorType::TenThousand => percentage.numerator.saturating_mul(100),
                DenominatorType::Million => percentage.numerator,
            }
            .min(PER_MILLION);
            drop_categories.push(DropCategory {
                category: overload.category.clone(),
                requests_per_million: per_million,
            });
        }

        let mut priorities: BTreeMap<u32, Vec<LocalityEntry>> = BTreeMap::new();
        for group in &assignment.endpoints {
            let weight = match group.load_balancing_weight {
                Some(weight) if weight > 0 => weight,
                _ => {
                    debug!(
                        "endpoints: skipping unweighted locality, cluster={}, locality={:?}",
                        assignment.cluster_name, group.locality
                    );
                    continue;
                }
            };

            let mut endpoints = Vec::new();
            for lb_endpoint in &group.lb_endpoints {
                if !matches!(
                    lb_endpoint.health_status,
                    HealthStatus::Unknown | HealthStatus::Healthy
                ) {
                    continue;
                }
                let mut addresses = vec![lb_endpoint.address.clone()];
                if self.dual_stack {
                    addresses.extend(lb_endpoint.additional_addresses.iter().cloned());
                }
                endpoints.push(WeightedEndpoint {
                    endpoint: Endpoint { addresses },
                    weight: match lb_endpoint.load_balancing_weight {
                        Some(weight) if weight > 0 => weight,
                        _ => 1,
                    },
                });
            }
            if endpoints.is_empty() {
                continue;
            }

            priorities.entry(group.priority).or_default().push(LocalityEntry {
                locality: group.locality.clone(),
                weight,
                endpoints,
            });
        }

        EndpointResource {
            // BTreeMap iteration discards empty priority slots while keeping
            // the surviving ones in input priority order.
            priorities: priorities
                .into_values()
                .map(|localities| PriorityEntry { localities })
                .collect(),
            drop_categories,
        }
    }

    /// Wrap a DNS resolution result: a single priority with a single
    /// unnamed locality, everything weighted 1, no drop categories.
    pub fn from_dns_addresses(&self, addresses: &[EndpointAddress]) -> EndpointResource {
        if addresses.is_empty() {
            return EndpointResource {
                priorities: Vec::new(),
                drop_categories: Vec::new(),
            };
        }
        let endpoints = addresses
            .iter()
            .map(|address| WeightedEndpoint {
                endpoint: Endpoint {
                    addresses: vec![address.clone()],
                },
                weight: 1,
            })
            .collect();
        EndpointResource {
            priorities: vec![PriorityEntry {
                localities: vec![LocalityEntry {
                    locality: Locality::default(),
                    weight: 1,
                    endpoints,
                }],
            }],
            drop_categories: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{DropOverload, FractionalPercent, LbEndpoint, LocalityLbEndpoints};

    fn make_endpoint(host: &str, port: u16, health: HealthStatus) -> LbEndpoint {
        LbEndpoint {
            address: EndpointAddress::new(host, port),
            additional_addresses: vec![],
            health_status: health,
            load_balancing_weight: None,
        }
    }

    fn make_group(priority: u32, weight: Option<u32>, endpoints: Vec<LbEndpoint>) -> LocalityLbEndpoints {
        LocalityLbEndpoints {
            locality: Locality {
                region: "r".into(),
                zone: "z".into(),
                sub_zone: "sz".into(),
            },
            load_balancing_weight: weight,
            priority,
            lb_endpoints: endpoints,
        }
    }

    fn make_assignment(groups: Vec<LocalityLbEndpoints>) -> ClusterLoadAssignment {
        ClusterLoadAssignment {
            cluster_name: "c1".into(),
            endpoints: groups,
            drop_overloads: vec![],
        }
    }

    #[test]
    fn test_drop_overload_conversion() {
        let mut assignment = make_assignment(vec![]);
        assignment.drop_overloads = vec![
            DropOverload {
                category: "throttle".into(),
                drop_percentage: Some(FractionalPercent {
                    numerator: 3,
                    denominator: DenominatorType::Hundred,
                }),
            },
            DropOverload {
                category: "lb".into(),
                drop_percentage: Some(FractionalPercent {
                    numerator: 45,
                    denominator: DenominatorType::TenThousand,
                }),
            },
            DropOverload {
                category: "raw".into(),
                drop_percentage: Some(FractionalPercent {
                    numerator: 77,
                    denominator: DenominatorType::Million,
                }),
            },
            DropOverload {
                category: "missing".into(),
                drop_percentage: None,
            },
        ];

        let resource = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        assert_eq!(
            resource.drop_categories,
            vec![
                DropCategory {
                    category: "throttle".into(),
                    requests_per_million: 30_000
                },
                DropCategory {
                    category: "lb".into(),
                    requests_per_million: 4_500
                },
                DropCategory {
                    category: "raw".into(),
                    requests_per_million: 77
                },
            ]
        );
    }

    #[test]
    fn test_drop_overload_saturates_at_one_million() {
        let mut assignment = make_assignment(vec![]);
        assignment.drop_overloads = vec![DropOverload {
            category: "all".into(),
            drop_percentage: Some(FractionalPercent {
                numerator: 250,
                denominator: DenominatorType::Hundred,
            }),
        }];
        let resource = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        assert_eq!(resource.drop_categories[0].requests_per_million, 1_000_000);
    }

    #[test]
    fn test_unhealthy_endpoints_filtered() {
        let assignment = make_assignment(vec![make_group(
            0,
            Some(1),
            vec![
                make_endpoint("10.0.0.1", 80, HealthStatus::Healthy),
                make_endpoint("10.0.0.2", 80, HealthStatus::Unknown),
                make_endpoint("10.0.0.3", 80, HealthStatus::Unhealthy),
                make_endpoint("10.0.0.4", 80, HealthStatus::Draining),
            ],
        )]);
        let resource = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        let endpoints = &resource.priorities[0].localities[0].endpoints;
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].endpoint.addresses[0].host, "10.0.0.1");
        assert_eq!(endpoints[1].endpoint.addresses[0].host, "10.0.0.2");
    }

    #[test]
    fn test_zero_weight_locality_skipped() {
        let assignment = make_assignment(vec![
            make_group(0, None, vec![make_endpoint("10.0.0.1", 80, HealthStatus::Healthy)]),
            make_group(0, Some(0), vec![make_endpoint("10.0.0.2", 80, HealthStatus::Healthy)]),
            make_group(0, Some(7), vec![make_endpoint("10.0.0.3", 80, HealthStatus::Healthy)]),
        ]);
        let resource = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        assert_eq!(resource.priorities.len(), 1);
        let localities = &resource.priorities[0].localities;
        assert_eq!(localities.len(), 1);
        assert_eq!(localities[0].weight, 7);
    }

    #[test]
    fn test_all_filtered_group_dropped() {
        let assignment = make_assignment(vec![
            make_group(0, Some(1), vec![make_endpoint("10.0.0.1", 80, HealthStatus::Unhealthy)]),
            make_group(1, Some(1), vec![make_endpoint("10.0.0.2", 80, HealthStatus::Healthy)]),
        ]);
        let resource = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        // Priority 0 vanished entirely; priority 1 collapsed into slot 0.
        assert_eq!(resource.priorities.len(), 1);
        assert_eq!(
            resource.priorities[0].localities[0].endpoints[0]
                .endpoint
                .addresses[0]
                .host,
            "10.0.0.2"
        );
    }

    #[test]
    fn test_sparse_priorities_collapse_in_order() {
        let assignment = make_assignment(vec![
            make_group(5, Some(1), vec![make_endpoint("10.0.0.5", 80, HealthStatus::Healthy)]),
            make_group(1, Some(1), vec![make_endpoint("10.0.0.1", 80, HealthStatus::Healthy)]),
            make_group(3, Some(1), vec![make_endpoint("10.0.0.3", 80, HealthStatus::Healthy)]),
        ]);
        let resource = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        let hosts: Vec<&str> = resource
            .priorities
            .iter()
            .map(|p| p.localities[0].endpoints[0].endpoint.addresses[0].host.as_str())
            .collect();
        assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.3", "10.0.0.5"]);
    }

    #[test]
    fn test_endpoint_weight_defaults_to_one() {
        let mut endpoint = make_endpoint("10.0.0.1", 80, HealthStatus::Healthy);
        endpoint.load_balancing_weight = Some(9);
        let assignment = make_assignment(vec![make_group(
            0,
            Some(1),
            vec![endpoint, make_endpoint("10.0.0.2", 80, HealthStatus::Healthy)],
        )]);
        let resource = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        let endpoints = &resource.priorities[0].localities[0].endpoints;
        assert_eq!(endpoints[0].weight, 9);
        assert_eq!(endpoints[1].weight, 1);
    }

    #[test]
    fn test_dual_stack_keeps_additional_addresses() {
        let mut endpoint = make_endpoint("10.0.0.1", 80, HealthStatus::Healthy);
        endpoint.additional_addresses = vec![EndpointAddress::new("fd00::1", 80)];
        let assignment = make_assignment(vec![make_group(0, Some(1), vec![endpoint])]);

        let single = EndpointNormalizer::new(false).from_load_assignment(&assignment);
        assert_eq!(
            single.priorities[0].localities[0].endpoints[0]
                .endpoint
                .addresses
                .len(),
            1
        );

        let dual = EndpointNormalizer::new(true).from_load_assignment(&assignment);
        let addresses = &dual.priorities[0].localities[0].endpoints[0].endpoint.addresses;
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[0].host, "10.0.0.1");
        assert_eq!(addresses[1].host, "fd00::1");
    }

    #[test]
    fn test_dns_wrap() {
        let normalizer = EndpointNormalizer::new(false);
        let resource = normalizer.from_dns_addresses(&[
            EndpointAddress::new("10.0.0.1", 443),
            EndpointAddress::new("10.0.0.2", 443),
        ]);
        assert_eq!(resource.priorities.len(), 1);
        assert!(resource.drop_categories.is_empty());
        let locality = &resource.priorities[0].localities[0];
        assert_eq!(locality.locality, Locality::default());
        assert_eq!(locality.weight, 1);
        assert_eq!(locality.endpoints.len(), 2);
        assert!(locality.endpoints.iter().all(|e| e.weight == 1));
    }

    #[test]
    fn test_dns_empty_result() {
        let resource = EndpointNormalizer::new(false).from_dns_addresses(&[]);
        assert!(resource.priorities.is_empty());
    }
}
