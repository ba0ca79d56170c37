//! Invoice item database entity. `total_price` is never stored.

use sea_orm::entity::prelude::*;

use domain::InvoiceItem;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub shipment_type: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub weight: Decimal,
    pub delivery_speed: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id",
        on_delete = "Cascade"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for InvoiceItem {
    fn from(model: Model) -> Self {
        InvoiceItem {
            id: model.id,
            invoice_id: model.invoice_id,
            shipment_type: model.shipment_type,
            weight: model.weight,
            delivery_speed: model.delivery_speed,
            quantity: model.quantity,
            unit_price: model.unit_price,
            notes: model.notes,
        }
    }
}
