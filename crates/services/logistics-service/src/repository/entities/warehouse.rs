//! Warehouse database entity.

use sea_orm::entity::prelude::*;

use domain::Warehouse;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub contact: Option<String>,
    pub po_schedule_open: Time,
    pub po_schedule_close: Time,
    pub maximum_storage_capacity: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Warehouse {
    fn from(model: Model) -> Self {
        Warehouse {
            id: model.id,
            name: model.name,
            address: model.address,
            contact: model.contact,
            po_schedule_open: model.po_schedule_open,
            po_schedule_close: model.po_schedule_close,
            maximum_storage_capacity: model.maximum_storage_capacity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
