//! Invoice and invoice item entities.
//!
//! Payment state is derived: a paid invoice always carries the `Paid` status,
//! whatever status the caller supplied. Item totals are computed on read and
//! never stored.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{INVOICE_STATUS_PAID, INVOICE_STATUS_PENDING, INVOICE_TAX_RATE_PERCENT};
use crate::error::{collect, DomainResult};

/// Invoice domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    /// Human-facing invoice number, assigned by the store
    pub id_invoice: i64,
    pub user_id: Option<Uuid>,
    pub invoice_status: String,
    pub invoice_type: String,
    pub quantity: Option<i32>,
    pub invoice_datetime: DateTime<Utc>,
    pub cost: Decimal,
    pub paid: bool,
    pub payment_method: String,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub items: Vec<InvoiceItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::from_items(&self.items)
    }
}

/// Invoice line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub shipment_type: String,
    pub weight: Decimal,
    pub delivery_speed: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

impl InvoiceItem {
    pub fn total_price(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Subtotal, tax and grand total of an invoice's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    pub fn from_items(items: &[InvoiceItem]) -> Self {
        let subtotal: Decimal = items.iter().map(InvoiceItem::total_price).sum();
        let tax = (subtotal * Decimal::from(INVOICE_TAX_RATE_PERCENT) / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Invoice create/update data. `items` replaces the whole item set.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceInput {
    pub user_id: Option<Uuid>,
    /// Ignored when `paid` is true
    pub invoice_status: Option<String>,
    #[validate(length(max = 50))]
    pub invoice_type: String,
    pub quantity: Option<i32>,
    /// Defaults to the time of the write
    pub invoice_datetime: Option<DateTime<Utc>>,
    pub cost: Decimal,
    pub paid: bool,
    #[validate(length(max = 50))]
    pub payment_method: String,
    #[validate(length(max = 100))]
    pub name: String,
    #[validate(length(max = 255))]
    pub address: String,
    #[validate(length(max = 20))]
    pub contact: String,
    pub items: Vec<InvoiceItemInput>,
}

impl InvoiceInput {
    pub fn validate_rules(&self) -> DomainResult<()> {
        self.validate()?;

        let mut violations = Vec::new();
        if self.cost < Decimal::ZERO {
            violations.push("Invoice cost cannot be negative.".to_string());
        }
        if let Some(quantity) = self.quantity {
            if quantity <= 0 {
                violations.push("Invoice quantity must be greater than zero.".to_string());
            }
        }
        if !self.paid
            && self
                .invoice_status
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case(INVOICE_STATUS_PAID))
        {
            violations.push("Invoice status cannot be Paid unless the invoice is paid.".to_string());
        }
        for (idx, item) in self.items.iter().enumerate() {
            if let Err(e) = item.validate_rules() {
                violations.push(format!("Item {}: {}", idx + 1, e));
            }
        }
        collect(violations)
    }

    /// Status that will be persisted for this input.
    pub fn effective_status(&self) -> String {
        derive_status(self.paid, self.invoice_status.as_deref())
    }
}

/// Payment derivation: `paid` wins over any supplied status.
pub fn derive_status(paid: bool, requested: Option<&str>) -> String {
    if paid {
        return INVOICE_STATUS_PAID.to_string();
    }
    match requested.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => INVOICE_STATUS_PENDING.to_string(),
    }
}

/// Invoice line create data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceItemInput {
    #[validate(length(max = 50))]
    pub shipment_type: String,
    pub weight: Decimal,
    #[validate(length(max = 50))]
    pub delivery_speed: String,
    #[validate(range(min = 1, message = "Item quantity must be at least 1"))]
    pub quantity: i32,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

impl InvoiceItemInput {
    pub fn validate_rules(&self) -> DomainResult<()> {
        self.validate()?;

        let mut violations = Vec::new();
        if self.weight < Decimal::ZERO {
            violations.push("Item weight cannot be negative.".to_string());
        }
        if self.unit_price < Decimal::ZERO {
            violations.push("Item unit price cannot be negative.".to_string());
        }
        collect(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: i32, unit_price: Decimal) -> InvoiceItem {
        InvoiceItem {
            id: Uuid::new_v4(),
            invoice_id: Uuid::new_v4(),
            shipment_type: "Parcel".into(),
            weight: dec!(2.5),
            delivery_speed: "Express".into(),
            quantity,
            unit_price,
            notes: None,
        }
    }

    #[test]
    fn paid_forces_paid_status() {
        assert_eq!(derive_status(true, Some("Overdue")), "Paid");
        assert_eq!(derive_status(false, Some("Overdue")), "Overdue");
        assert_eq!(derive_status(false, Some("  ")), "Pending");
        assert_eq!(derive_status(false, None), "Pending");
    }

    fn unpaid_input(status: &str) -> InvoiceInput {
        InvoiceInput {
            user_id: None,
            invoice_status: Some(status.to_string()),
            invoice_type: "Shipping".into(),
            quantity: None,
            invoice_datetime: None,
            cost: dec!(10),
            paid: false,
            payment_method: "Cash".into(),
            name: "Ana".into(),
            address: "Rua A 1".into(),
            contact: "910000000".into(),
            items: Vec::new(),
        }
    }

    #[test]
    fn paid_status_requires_payment() {
        assert!(unpaid_input(" paid ").validate_rules().is_err());
        assert!(unpaid_input("Overdue").validate_rules().is_ok());

        let mut paid = unpaid_input("Paid");
        paid.paid = true;
        assert!(paid.validate_rules().is_ok());
    }

    #[test]
    fn totals_apply_tax_on_subtotal() {
        let totals = InvoiceTotals::from_items(&[item(2, dec!(10.00)), item(1, dec!(5.50))]);
        assert_eq!(totals.subtotal, dec!(25.50));
        assert_eq!(totals.tax, dec!(5.87));
        assert_eq!(totals.total, dec!(31.37));
    }

    #[test]
    fn zero_item_quantity_is_rejected() {
        let input = InvoiceItemInput {
            shipment_type: "Parcel".into(),
            weight: dec!(1),
            delivery_speed: "Standard".into(),
            quantity: 0,
            unit_price: dec!(3),
            notes: None,
        };
        assert!(input.validate_rules().is_err());
    }
}
