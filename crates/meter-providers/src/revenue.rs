use meter_types::{Invoice, Period};

/// Sum of invoice amounts issued inside `period`.
pub fn total_in(invoices: &[Invoice], period: &Period) -> f64 {
    invoices
        .iter()
        .filter(|invoice| period.contains(invoice.issued_on))
        .map(|invoice| invoice.amount)
        .sum()
}
