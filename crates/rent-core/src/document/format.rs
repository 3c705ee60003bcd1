//! Spanish formatting of money, dates and percentages

use chrono::{Datelike, NaiveDate};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// `$1000.00`: two decimals, no thousands separator
pub fn money(amount: f64) -> String {
    // -0.0 + 0.0 is +0.0
    format!("${:.2}", amount + 0.0)
}

/// `1 de enero de 2024`
pub fn long_date(date: NaiveDate) -> String {
    let month = MONTHS_ES[date.month0() as usize];
    format!("{} de {} de {}", date.day(), month, date.year())
}

/// `10%` for whole numbers, `12.50%` otherwise
pub fn percentage(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}%", value)
    } else {
        format!("{:.2}%", value)
    }
}
