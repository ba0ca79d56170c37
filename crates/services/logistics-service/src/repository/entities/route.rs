//! Route database entity.

use sea_orm::entity::prelude::*;

use domain::{Route, RouteStatus, Stop};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "routes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub delivery_status: String,
    pub delivery_date: Date,
    pub delivery_start_time: Time,
    pub delivery_end_time: Time,
    pub expected_duration_minutes: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub kms_travelled: Decimal,
    pub driver_notes: Option<String>,
    pub driver_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub warehouse_id: Option<Uuid>,
    pub origin_name: Option<String>,
    pub origin_address: Option<String>,
    pub origin_contact: Option<String>,
    pub destination_name: Option<String>,
    pub destination_address: Option<String>,
    pub destination_contact: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Route {
    type Error = domain::DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Route {
            id: model.id,
            description: model.description,
            delivery_status: RouteStatus::parse(&model.delivery_status)?,
            delivery_date: model.delivery_date,
            delivery_start_time: model.delivery_start_time,
            delivery_end_time: model.delivery_end_time,
            expected_duration_minutes: model.expected_duration_minutes,
            kms_travelled: model.kms_travelled,
            driver_notes: model.driver_notes,
            driver_id: model.driver_id,
            vehicle_id: model.vehicle_id,
            warehouse_id: model.warehouse_id,
            origin: Stop {
                name: model.origin_name,
                address: model.origin_address,
                contact: model.origin_contact,
            },
            destination: Stop {
                name: model.destination_name,
                address: model.destination_address,
                contact: model.destination_contact,
            },
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
