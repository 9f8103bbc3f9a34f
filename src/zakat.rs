//! Zakat due on a set of assets, measured against the Nisab
use crate::locale::{to_western_numerals, Locale};
use serde::Serialize;
use time::Date;

/// Grams of gold making up the Nisab under the gold standard
pub const NISAB_GOLD_GRAMS: f64 = 85.0;

/// Grams of silver making up the Nisab under the silver standard
pub const NISAB_SILVER_GRAMS: f64 = 595.0;

/// 2.5%
pub const ZAKAT_RATE: f64 = 0.025;

/// Default gold price in SAR per gram
pub const DEFAULT_GOLD_PRICE: f64 = 250.0;

/// Default silver price in SAR per gram
pub const DEFAULT_SILVER_PRICE: f64 = 3.0;

/// Amounts are in SAR except for gold and silver, which are in grams
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZakatAssets {
    pub cash: f64,
    #[serde(rename = "gold")]
    pub gold_grams: f64,
    #[serde(rename = "silver")]
    pub silver_grams: f64,
    pub business: f64,
    pub investments: f64,
    pub other: f64,
}

/// Metal prices in SAR per gram
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetalPrices {
    #[serde(rename = "goldPricePerGram")]
    pub gold: f64,
    #[serde(rename = "silverPricePerGram")]
    pub silver: f64,
}

impl Default for MetalPrices {
    fn default() -> MetalPrices {
        MetalPrices {
            gold: DEFAULT_GOLD_PRICE,
            silver: DEFAULT_SILVER_PRICE,
        }
    }
}

/// Which metal the Nisab is measured in
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum NisabStandard {
    #[default]
    Gold,
    Silver,
}

impl NisabStandard {
    pub fn threshold(self, prices: MetalPrices) -> f64 {
        match self {
            NisabStandard::Gold => NISAB_GOLD_GRAMS * prices.gold,
            NisabStandard::Silver => NISAB_SILVER_GRAMS * prices.silver,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZakatCalculation {
    pub total_wealth: f64,
    pub nisab_threshold: f64,
    pub zakat_due: f64,
    pub is_zakat_applicable: bool,
    #[serde(skip)]
    pub breakdown: ZakatAssets,
}

pub fn calculate(
    assets: ZakatAssets,
    prices: MetalPrices,
    standard: NisabStandard,
) -> ZakatCalculation {
    let total_wealth = assets.cash
        + assets.gold_grams * prices.gold
        + assets.silver_grams * prices.silver
        + assets.business
        + assets.investments
        + assets.other;
    let nisab_threshold = standard.threshold(prices);
    let is_zakat_applicable = total_wealth >= nisab_threshold;
    let zakat_due = if is_zakat_applicable {
        total_wealth * ZAKAT_RATE
    } else {
        0.0
    };
    tracing::debug!(
        total_wealth,
        nisab_threshold,
        zakat_due,
        ?standard,
        "calculated zakat"
    );
    ZakatCalculation {
        total_wealth,
        nisab_threshold,
        zakat_due,
        is_zakat_applicable,
        breakdown: assets,
    }
}

/// Parse a user-entered amount.  Anything that is not a finite,
/// non-negative number counts as zero.  Arabic-Indic digits and separators
/// are accepted, as are thousands separators.
pub fn parse_amount(s: &str) -> f64 {
    let cleaned = to_western_numerals(s.trim())
        .replace('٫', ".")
        .chars()
        .filter(|&ch| ch != ',' && ch != '٬')
        .collect::<String>();
    match cleaned.parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 0.0 => x,
        _ => 0.0,
    }
}

impl ZakatCalculation {
    /// A plain-text report of the assets and the result, dated `date`
    pub fn summary(&self, prices: MetalPrices, locale: Locale, date: Date) -> String {
        let a = &self.breakdown;
        let sar = |x: f64| locale.format_sar(x);
        let num = |x: f64| locale.format_number(x, 2);
        let rule = "━━━━━━━━━━━━━━━━";
        let mut lines = match locale {
            Locale::En => vec![
                String::from("Zakat Calculation"),
                format!("Date: {}", locale.format_long(date)),
                String::new(),
                String::from("Your Assets:"),
                rule.to_owned(),
                format!("• Cash: {}", sar(a.cash)),
                format!(
                    "• Gold: {} grams ({})",
                    num(a.gold_grams),
                    sar(a.gold_grams * prices.gold)
                ),
                format!(
                    "• Silver: {} grams ({})",
                    num(a.silver_grams),
                    sar(a.silver_grams * prices.silver)
                ),
                format!("• Business Assets: {}", sar(a.business)),
                format!("• Investments: {}", sar(a.investments)),
                format!("• Other Assets: {}", sar(a.other)),
                String::new(),
                String::from("Calculation Result:"),
                rule.to_owned(),
                format!("• Total Wealth: {}", sar(self.total_wealth)),
                format!("• Nisab Threshold: {}", sar(self.nisab_threshold)),
                format!(
                    "• Status: {}",
                    if self.is_zakat_applicable {
                        "Zakat Due ✓"
                    } else {
                        "Below Nisab"
                    }
                ),
            ],
            Locale::Ar => vec![
                String::from("حساب الزكاة"),
                format!("التاريخ: {}", locale.format_long(date)),
                String::new(),
                String::from("أصولك:"),
                rule.to_owned(),
                format!("• النقد: {}", sar(a.cash)),
                format!(
                    "• الذهب: {} جرام ({})",
                    num(a.gold_grams),
                    sar(a.gold_grams * prices.gold)
                ),
                format!(
                    "• الفضة: {} جرام ({})",
                    num(a.silver_grams),
                    sar(a.silver_grams * prices.silver)
                ),
                format!("• الأصول التجارية: {}", sar(a.business)),
                format!("• الاستثمارات: {}", sar(a.investments)),
                format!("• أصول أخرى: {}", sar(a.other)),
                String::new(),
                String::from("نتيجة الحساب:"),
                rule.to_owned(),
                format!("• إجمالي الثروة: {}", sar(self.total_wealth)),
                format!("• عتبة النصاب: {}", sar(self.nisab_threshold)),
                format!(
                    "• الحالة: {}",
                    if self.is_zakat_applicable {
                        "الزكاة واجبة ✓"
                    } else {
                        "أقل من النصاب"
                    }
                ),
            ],
        };
        if self.is_zakat_applicable {
            lines.push(String::new());
            lines.push(match locale {
                Locale::En => format!("• Zakat Due (2.5%): {}", sar(self.zakat_due)),
                Locale::Ar => format!("• الزكاة المستحقة (٢٫٥٪): {}", sar(self.zakat_due)),
            });
        }
        lines.join("\n")
    }

    pub fn report(&self, prices: MetalPrices, date: Date) -> ZakatReport {
        ZakatReport {
            date: date.to_string(),
            assets: self.breakdown,
            prices,
            calculation: *self,
        }
    }
}

/// Machine-readable form of a calculation, for `--json` output
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZakatReport {
    pub date: String,
    pub assets: ZakatAssets,
    #[serde(flatten)]
    pub prices: MetalPrices,
    pub calculation: ZakatCalculation,
}
