use super::calculations::is_valid_quantity;
use crate::config::AllocationConfig;
use crate::models::{AllocationPlan, FieldId, ResourcePool, ResourceRequest, ResourceTotals};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Sanitized demand of one field.
struct FieldDemand {
    priority: f64,
    needs: BTreeMap<String, f64>,
}

/// Split the pool across fields by priority-weighted proportional rationing.
///
/// Fields get their full ideal quantity when a resource is not short. Under a
/// shortage each field loses `shortage% × (1 - priority / max priority)` of its
/// ideal, where the max priority is taken over every field in the run, capped at `max_reduction`, then the resource is scaled down so the
/// allocated total never exceeds what is available.
pub fn allocate_resources(
    pool: &ResourcePool,
    requests: &[ResourceRequest],
    config: &AllocationConfig,
) -> AllocationPlan {
    let demands = sanitize_requests(requests);

    let resource_types: BTreeSet<&str> = demands
        .values()
        .flat_map(|d| d.needs.keys().map(String::as_str))
        .collect();

    let max_priority = demands
        .values()
        .map(|d| d.priority)
        .fold(0.0f64, f64::max);

    let mut plan = AllocationPlan::default();
    for field_id in demands.keys() {
        plan.allocations.insert(field_id.clone(), BTreeMap::new());
    }

    for resource_type in resource_types {
        if let Some(stock) = pool.get(resource_type) {
            if !is_valid_quantity(stock.quantity) {
                warn!(
                    "Pool quantity {} for {} is invalid, treating as 0",
                    stock.quantity, resource_type
                );
            }
        }
        let available = pool.available(resource_type);

        let ideals: BTreeMap<&FieldId, (f64, f64)> = demands
            .iter()
            .filter_map(|(field_id, demand)| {
                demand
                    .needs
                    .get(resource_type)
                    .map(|ideal| (field_id, (*ideal, demand.priority)))
            })
            .collect();

        let requested: f64 = ideals.values().map(|(ideal, _)| ideal).sum();

        let mut allocated: BTreeMap<&FieldId, f64> = if requested <= available {
            ideals.iter().map(|(f, (ideal, _))| (*f, *ideal)).collect()
        } else {
            let shortage_pct = 1.0 - available / requested;
            ideals
                .iter()
                .map(|(f, (ideal, priority))| {
                    let reduction = if max_priority > 0.0 {
                        shortage_pct * (1.0 - priority / max_priority)
                    } else {
                        shortage_pct
                    };
                    let reduction = reduction.clamp(0.0, config.max_reduction);
                    (*f, ideal * (1.0 - reduction))
                })
                .collect()
        };

        let rebalanced = enforce_conservation(&mut allocated, available);
        if rebalanced {
            debug!(
                "Rebalanced {} to fit {:.3} available (requested {:.3})",
                resource_type, available, requested
            );
        }

        let total_allocated: f64 = allocated.values().sum();
        for (field_id, quantity) in allocated {
            if let Some(field) = plan.allocations.get_mut(field_id) {
                field.insert(resource_type.to_string(), quantity);
            }
        }

        let shortage = (requested - available).max(0.0);
        plan.shortages.insert(resource_type.to_string(), shortage);
        plan.totals.insert(
            resource_type.to_string(),
            ResourceTotals {
                available,
                requested,
                allocated: total_allocated,
                shortage,
                rebalanced,
            },
        );
    }

    plan
}

/// Merge requests per field and replace unusable numbers.
fn sanitize_requests(requests: &[ResourceRequest]) -> BTreeMap<FieldId, FieldDemand> {
    let default_priority = ResourceRequest::new("").priority;
    let mut demands: BTreeMap<FieldId, FieldDemand> = BTreeMap::new();

    for request in requests {
        let priority = if request.priority.is_finite() && request.priority >= 0.0 {
            request.priority
        } else {
            warn!(
                "Invalid priority {} for field {}, using {}",
                request.priority, request.field_id, default_priority
            );
            default_priority
        };

        if demands.contains_key(&request.field_id) {
            warn!(
                "Duplicate request for field {}, merging quantities",
                request.field_id
            );
        }
        let demand = demands
            .entry(request.field_id.clone())
            .or_insert_with(|| FieldDemand {
                priority,
                needs: BTreeMap::new(),
            });
        demand.priority = demand.priority.max(priority);

        for (resource_type, quantity) in &request.needs {
            let quantity = if is_valid_quantity(*quantity) {
                *quantity
            } else {
                warn!(
                    "Invalid {} request {} for field {}, using 0",
                    resource_type, quantity, request.field_id
                );
                0.0
            };
            *demand.needs.entry(resource_type.clone()).or_insert(0.0) += quantity;
        }
    }

    demands
}

/// Scale allocations so their sum does not exceed `available`, then trim any
/// floating-point residue from the largest allocation. Returns whether
/// anything was changed.
fn enforce_conservation(allocated: &mut BTreeMap<&FieldId, f64>, available: f64) -> bool {
    let mut total: f64 = allocated.values().sum();
    if total <= available {
        return false;
    }

    let factor = if total > 0.0 { available / total } else { 0.0 };
    for quantity in allocated.values_mut() {
        *quantity *= factor;
    }

    // Bounded: every pass lowers the largest allocation by at least one ulp.
    for _ in 0..10_000 {
        total = allocated.values().sum();
        if total <= available {
            break;
        }
        let excess = total - available;
        let Some(largest) = allocated.values_mut().max_by(|a, b| a.total_cmp(b)) else {
            break;
        };
        if *largest <= 0.0 {
            break;
        }
        let trimmed = (*largest - excess).max(0.0);
        *largest = if trimmed < *largest {
            trimmed
        } else {
            f64::from_bits(largest.to_bits() - 1)
        };
    }

    true
}
