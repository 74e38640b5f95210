use super::coerce::{round2, to_decimal};
use crate::models::Totals;
use bigdecimal::{BigDecimal, Zero};

/// 含税金额拆分结果
#[derive(Debug, Clone, PartialEq)]
pub struct NetSplit {
    pub net: BigDecimal,
    pub tax: BigDecimal,
}

/// 由含税金额和税率反算净额与税额
///
/// 税率 > 0: `net = round2(total / (1 + rate/100))`, `tax = round2(total - net)`;
/// 否则 `net = total`, `tax = 0`
pub fn split_gross(total: &BigDecimal, rate: &BigDecimal) -> NetSplit {
    if rate > &BigDecimal::zero() {
        let divisor = BigDecimal::from(1) + rate / BigDecimal::from(100);
        let net = round2(&(total / divisor));
        let tax = round2(&(total - &net));
        NetSplit { net, tax }
    } else {
        NetSplit {
            net: total.clone(),
            tax: BigDecimal::zero(),
        }
    }
}

/// 代扣合计 (增值税 + 毛收入税 + 其他)
pub fn withholdings_total(totals: &Totals) -> BigDecimal {
    to_decimal(totals.vat_withholding.as_ref())
        + to_decimal(totals.gross_receipts_withholding.as_ref())
        + to_decimal(totals.other_withholding.as_ref())
}
