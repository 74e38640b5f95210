use super::coerce::{round2, to_decimal};
use super::tax::{split_gross, withholdings_total};
use crate::models::{ExportBatch, InvoiceRecord};
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 默认容差 (比索)
pub const DEFAULT_TOLERANCE: f64 = 0.10;

/// 单张票据的金额核对结果
///
/// 明细反算的净额/税额/总额 与 AI 返回的合计对比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathCheck {
    pub ok: bool,
    pub net_items: f64,
    pub net_declared: f64,
    pub net_diff: f64,
    pub vat_items: f64,
    pub vat_declared: f64,
    pub vat_diff: f64,
    pub total_items: f64,
    pub total_declared: f64,
    pub total_theoretical: f64,
    pub total_diff_items: f64,
    pub total_diff_theoretical: f64,
}

/// 批次中每张票据的核对结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryCheck {
    pub filename: String,
    #[serde(flatten)]
    pub check: MathCheck,
}

fn to_report(v: &BigDecimal) -> f64 {
    round2(v).to_string().parse().unwrap_or(0.0)
}

pub fn check_math(record: &InvoiceRecord, tolerance: f64) -> MathCheck {
    let tot = &record.totals;

    let net_declared = to_decimal(tot.taxed_net.as_ref());
    let exempt = to_decimal(tot.exempt.as_ref());
    let untaxed = to_decimal(tot.untaxed_net.as_ref());
    let total_declared = to_decimal(tot.total.as_ref());
    let withholdings = withholdings_total(tot);

    let vat_declared = tot
        .vat
        .iter()
        .fold(BigDecimal::zero(), |acc, v| acc + to_decimal(v.amount.as_ref()));

    let mut net_items = BigDecimal::zero();
    let mut vat_items = BigDecimal::zero();
    let mut total_items = BigDecimal::zero();
    for item in &record.line_items {
        let line_total = to_decimal(item.line_total.as_ref());
        let split = split_gross(&line_total, &to_decimal(item.vat_rate.as_ref()));
        net_items += split.net;
        vat_items += split.tax;
        total_items += line_total;
    }

    let total_theoretical = &net_declared + &vat_declared + &exempt + &untaxed + &withholdings;

    let net_diff = &net_items - &net_declared;
    let vat_diff = &vat_items - &vat_declared;
    let total_diff_items = &total_items - &total_declared;
    let total_diff_theoretical = &total_theoretical - &total_declared;

    let limit = BigDecimal::from_str(&tolerance.to_string()).unwrap_or_else(|_| BigDecimal::zero());
    let within = |d: &BigDecimal| d.abs() <= limit;
    let ok = within(&net_diff)
        && within(&vat_diff)
        && within(&total_diff_items)
        && within(&total_diff_theoretical);

    if !ok {
        tracing::debug!(
            "Math check failed: net diff {}, vat diff {}, total diff {}",
            net_diff,
            vat_diff,
            total_diff_items
        );
    }

    MathCheck {
        ok,
        net_items: to_report(&net_items),
        net_declared: to_report(&net_declared),
        net_diff: to_report(&net_diff),
        vat_items: to_report(&vat_items),
        vat_declared: to_report(&vat_declared),
        vat_diff: to_report(&vat_diff),
        total_items: to_report(&total_items),
        total_declared: to_report(&total_declared),
        total_theoretical: to_report(&total_theoretical),
        total_diff_items: to_report(&total_diff_items),
        total_diff_theoretical: to_report(&total_diff_theoretical),
    }
}

pub fn check_batch(batch: &ExportBatch, tolerance: f64) -> Vec<EntryCheck> {
    batch
        .entries
        .iter()
        .map(|entry| EntryCheck {
            filename: entry.filename.clone(),
            check: check_math(&entry.effective_record(), tolerance),
        })
        .collect()
}
