use std::collections::BTreeMap;

use tracing::info;

use crate::domain::{Order, OrderSide};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolSummary {
    pub total: usize,
    pub buys: usize,
    pub sells: usize,
    pub avg_price: f64,
    pub avg_quantity: f64,
}

/// Per-symbol breakdown of a generated flow.
#[derive(Debug, Clone, Default)]
pub struct FlowSummary {
    pub symbols: BTreeMap<String, SymbolSummary>,
    pub first_timestamp: Option<u64>,
    pub last_timestamp: Option<u64>,
}

impl FlowSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut sums: BTreeMap<&str, (SymbolSummary, f64, f64)> = BTreeMap::new();
        for order in orders {
            let (summary, price_sum, qty_sum) = sums.entry(order.symbol.as_str()).or_default();
            summary.total += 1;
            match order.side {
                OrderSide::Buy => summary.buys += 1,
                OrderSide::Sell => summary.sells += 1,
            }
            *price_sum += order.price;
            *qty_sum += order.quantity as f64;
        }

        let symbols = sums
            .into_iter()
            .map(|(symbol, (mut summary, price_sum, qty_sum))| {
                summary.avg_price = price_sum / summary.total as f64;
                summary.avg_quantity = qty_sum / summary.total as f64;
                (symbol.to_string(), summary)
            })
            .collect();

        Self {
            symbols,
            first_timestamp: orders.iter().map(|o| o.timestamp).min(),
            last_timestamp: orders.iter().map(|o| o.timestamp).max(),
        }
    }

    pub fn total(&self) -> usize {
        self.symbols.values().map(|s| s.total).sum()
    }

    pub fn log(&self) {
        info!("Order Statistics:");
        for (symbol, s) in &self.symbols {
            info!(
                "{}: total={} buy={} sell={} avg_price=${:.2} avg_qty={:.0}",
                symbol, s.total, s.buys, s.sells, s.avg_price, s.avg_quantity
            );
        }
        if let (Some(first), Some(last)) = (self.first_timestamp, self.last_timestamp) {
            info!(
                "time span: {:.3}s ({}us .. {}us)",
                (last - first) as f64 / 1_000_000.0,
                first,
                last
            );
        }
    }
}
