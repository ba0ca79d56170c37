//! Invoice database entity.

use sea_orm::entity::prelude::*;

use domain::{Invoice, InvoiceItem};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub id_invoice: i64,
    pub user_id: Option<Uuid>,
    pub invoice_status: String,
    pub invoice_type: String,
    pub quantity: Option<i32>,
    pub invoice_datetime: DateTimeUtc,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cost: Decimal,
    pub paid: bool,
    pub payment_method: String,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    Items,
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Assemble the domain invoice from its row and item rows.
    pub fn into_domain(self, items: Vec<InvoiceItem>) -> Invoice {
        Invoice {
            id: self.id,
            id_invoice: self.id_invoice,
            user_id: self.user_id,
            invoice_status: self.invoice_status,
            invoice_type: self.invoice_type,
            quantity: self.quantity,
            invoice_datetime: self.invoice_datetime,
            cost: self.cost,
            paid: self.paid,
            payment_method: self.payment_method,
            name: self.name,
            address: self.address,
            contact: self.contact,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
