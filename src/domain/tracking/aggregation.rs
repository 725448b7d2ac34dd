use std::collections::HashMap;

use uuid::Uuid;

use super::entity::{stage_label, OrderTracking, TrackingRow, TrackingStage, TRACKING_STAGES};
use crate::domain::order::OrderStatus;

type GroupKey = (Uuid, Uuid, String, String);

/// Fold raw tracking rows into one summary per order line.
///
/// Rows are grouped by (order, product, size, color) in first-seen order.
/// Each stage takes the earliest row carrying its status. Unknown status
/// text is skipped.
pub fn build_tracking(rows: Vec<TrackingRow>) -> Vec<OrderTracking> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut summaries: Vec<OrderTracking> = Vec::new();

    for row in rows {
        let status = match row.status.parse::<OrderStatus>() {
            Ok(status) => status,
            Err(_) => {
                log::warn!(
                    "Skipping tracking row with unknown status '{}' (order {})",
                    row.status,
                    row.order_id
                );
                continue;
            }
        };

        let key = (row.order_id, row.product_id, row.size.clone(), row.color.clone());
        let slot = *index.entry(key).or_insert_with(|| {
            summaries.push(empty_summary(&row));
            summaries.len() - 1
        });
        let summary = &mut summaries[slot];

        if status == OrderStatus::Cancelled {
            summary.is_cancelled = true;
            continue;
        }

        if let Some(stage) = summary.stages.iter_mut().find(|s| s.status == status) {
            match stage.reached_at {
                Some(existing) if existing <= row.recorded_at => {}
                _ => stage.reached_at = Some(row.recorded_at),
            }
        }
    }

    for summary in &mut summaries {
        finish(summary);
    }

    summaries
}

fn empty_summary(row: &TrackingRow) -> OrderTracking {
    OrderTracking {
        order_id: row.order_id,
        product_id: row.product_id,
        product_name: row.product_name.clone(),
        image_url: row.image_url.clone(),
        size: row.size.clone(),
        color: row.color.clone(),
        quantity: row.quantity,
        stages: TRACKING_STAGES
            .iter()
            .map(|&status| TrackingStage {
                status,
                label: stage_label(status).to_string(),
                reached_at: None,
            })
            .collect(),
        is_delivered: false,
        is_cancelled: false,
        current_status: OrderStatus::Placed,
    }
}

fn finish(summary: &mut OrderTracking) {
    summary.is_delivered = summary
        .stages
        .iter()
        .any(|s| s.status == OrderStatus::Delivered && s.is_reached());

    summary.current_status = if summary.is_cancelled {
        OrderStatus::Cancelled
    } else {
        summary
            .stages
            .iter()
            .rev()
            .find(|s| s.is_reached())
            .map(|s| s.status)
            .unwrap_or(OrderStatus::Placed)
    };
}
