//! Vehicle database entity.

use sea_orm::entity::prelude::*;

use domain::Vehicle;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub plate_number: String,
    pub vehicle_type: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub capacity: Decimal,
    pub vehicle_status: String,
    pub year: i32,
    pub fuel_type: Option<String>,
    pub last_maintenance_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vehicle {
    fn from(model: Model) -> Self {
        Vehicle {
            id: model.id,
            plate_number: model.plate_number,
            vehicle_type: model.vehicle_type,
            brand: model.brand,
            model: model.model,
            capacity: model.capacity,
            vehicle_status: model.vehicle_status,
            year: model.year,
            fuel_type: model.fuel_type,
            last_maintenance_date: model.last_maintenance_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
