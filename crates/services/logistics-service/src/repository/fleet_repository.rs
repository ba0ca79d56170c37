//! Warehouse and vehicle repositories.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{vehicle, warehouse};
use common::AppResult;
use domain::{Vehicle, Warehouse};

pub struct WarehouseRepo<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> WarehouseRepo<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Warehouse>> {
        let result = warehouse::Entity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(Warehouse::from))
    }

    pub async fn list(&self) -> AppResult<Vec<Warehouse>> {
        let models = warehouse::Entity::find()
            .order_by_asc(warehouse::Column::Name)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Warehouse::from).collect())
    }

    pub async fn save(&self, w: &Warehouse, is_new: bool) -> AppResult<Warehouse> {
        let active = warehouse::ActiveModel {
            id: Set(w.id),
            name: Set(w.name.clone()),
            address: Set(w.address.clone()),
            contact: Set(w.contact.clone()),
            po_schedule_open: Set(w.po_schedule_open),
            po_schedule_close: Set(w.po_schedule_close),
            maximum_storage_capacity: Set(w.maximum_storage_capacity),
            created_at: Set(w.created_at),
            updated_at: Set(w.updated_at),
        };

        let model = if is_new {
            active.insert(self.conn).await?
        } else {
            active.update(self.conn).await?
        };
        Ok(Warehouse::from(model))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = warehouse::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}

pub struct VehicleRepo<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> VehicleRepo<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let result = vehicle::Entity::find_by_id(id).one(self.conn).await?;
        Ok(result.map(Vehicle::from))
    }

    pub async fn find_by_plate(&self, plate_number: &str) -> AppResult<Option<Vehicle>> {
        let result = vehicle::Entity::find()
            .filter(vehicle::Column::PlateNumber.eq(plate_number))
            .one(self.conn)
            .await?;
        Ok(result.map(Vehicle::from))
    }

    pub async fn list(&self) -> AppResult<Vec<Vehicle>> {
        let models = vehicle::Entity::find()
            .order_by_asc(vehicle::Column::PlateNumber)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Vehicle::from).collect())
    }

    pub async fn save(&self, v: &Vehicle, is_new: bool) -> AppResult<Vehicle> {
        let active = vehicle::ActiveModel {
            id: Set(v.id),
            plate_number: Set(v.plate_number.clone()),
            vehicle_type: Set(v.vehicle_type.clone()),
            brand: Set(v.brand.clone()),
            model: Set(v.model.clone()),
            capacity: Set(v.capacity),
            vehicle_status: Set(v.vehicle_status.clone()),
            year: Set(v.year),
            fuel_type: Set(v.fuel_type.clone()),
            last_maintenance_date: Set(v.last_maintenance_date),
            created_at: Set(v.created_at),
            updated_at: Set(v.updated_at),
        };

        let model = if is_new {
            active.insert(self.conn).await?
        } else {
            active.update(self.conn).await?
        };
        Ok(Vehicle::from(model))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = vehicle::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }
}
