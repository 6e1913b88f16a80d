//! Statistic cards shown on the dashboard and in reports.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::bill::Bill;
use crate::domain::rider::{Rider, RiderStatus};
use crate::domain::shift::Shift;
use crate::domain::spare_part::SparePart;
use crate::domain::vehicle::{Vehicle, VehicleStatus};

pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Counts items per key, ordered by key.
pub fn count_by<T, K, F>(items: &[T], key: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    items.iter().fold(BTreeMap::new(), |mut counts, item| {
        *counts.entry(key(item)).or_insert(0) += 1;
        counts
    })
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FleetSummary {
    pub total: usize,
    pub available: usize,
    pub taken: usize,
    pub under_maintenance: usize,
    pub out_of_service: usize,
}

impl FleetSummary {
    pub fn from_vehicles(vehicles: &[Vehicle]) -> Self {
        let counts = count_by(vehicles, |v| v.status.clone());
        let get = |status: VehicleStatus| counts.get(&status).copied().unwrap_or(0);
        Self {
            total: vehicles.len(),
            available: get(VehicleStatus::Available),
            taken: get(VehicleStatus::Taken),
            under_maintenance: get(VehicleStatus::UnderMaintenance),
            out_of_service: get(VehicleStatus::OutOfService),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RiderSummary {
    pub total: usize,
    pub active: usize,
    /// Active riders without a vehicle.
    pub without_vehicle: usize,
    pub by_status: BTreeMap<String, usize>,
}

impl RiderSummary {
    pub fn from_riders(riders: &[Rider]) -> Self {
        let active: Vec<&Rider> = riders
            .iter()
            .filter(|r| r.status == RiderStatus::Active)
            .collect();
        Self {
            total: riders.len(),
            active: active.len(),
            without_vehicle: active
                .iter()
                .filter(|r| r.vehicle_plate.as_deref().is_none_or(|p| p.trim().is_empty()))
                .count(),
            by_status: count_by(riders, |r| r.status.to_string()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ShiftTotals {
    pub shifts: usize,
    pub total_orders: i64,
    pub total_hours: f64,
    /// Zero when there are no shifts.
    pub average_orders: f64,
}

impl ShiftTotals {
    pub fn from_shifts(shifts: &[Shift]) -> Self {
        let total_orders: i64 = shifts.iter().map(|s| i64::from(s.orders)).sum();
        let total_hours: f64 = shifts.iter().map(|s| s.hours_worked).sum();
        let average_orders = if shifts.is_empty() {
            0.0
        } else {
            total_orders as f64 / shifts.len() as f64
        };
        Self {
            shifts: shifts.len(),
            total_orders,
            total_hours,
            average_orders,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InventorySummary {
    pub parts: usize,
    pub units: i64,
    pub value: f64,
    pub low_stock: Vec<SparePart>,
}

impl InventorySummary {
    pub fn from_parts(parts: &[SparePart]) -> Self {
        Self {
            parts: parts.len(),
            units: parts.iter().map(|p| i64::from(p.quantity)).sum(),
            value: inventory_value(parts),
            low_stock: low_stock(parts, LOW_STOCK_THRESHOLD),
        }
    }
}

/// Σ quantity × price.
pub fn inventory_value(parts: &[SparePart]) -> f64 {
    parts
        .iter()
        .map(|p| f64::from(p.quantity) * p.price)
        .sum()
}

/// Parts whose quantity is at or below `threshold`.
pub fn low_stock(parts: &[SparePart], threshold: i32) -> Vec<SparePart> {
    parts
        .iter()
        .filter(|p| p.quantity <= threshold)
        .cloned()
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BillTotals {
    pub total: f64,
    pub paid: f64,
    pub outstanding: f64,
}

impl BillTotals {
    pub fn from_bills(bills: &[Bill]) -> Self {
        let (paid, outstanding) = bills.iter().fold((0.0, 0.0), |(paid, open), bill| {
            if bill.paid {
                (paid + bill.amount, open)
            } else {
                (paid, open + bill.amount)
            }
        });
        Self {
            total: paid + outstanding,
            paid,
            outstanding,
        }
    }
}
