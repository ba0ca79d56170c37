//! Driver specialization row.

use sea_orm::entity::prelude::*;

use domain::DriverInfo;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employee_drivers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub employee_id: Uuid,
    pub license_number: String,
    pub license_category: String,
    pub license_expiry_date: Date,
    pub driving_experience_years: i32,
    pub driver_status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DriverInfo {
    fn from(model: Model) -> Self {
        DriverInfo {
            license_number: model.license_number,
            license_category: model.license_category,
            license_expiry_date: model.license_expiry_date,
            driving_experience_years: model.driving_experience_years,
            driver_status: model.driver_status,
        }
    }
}
