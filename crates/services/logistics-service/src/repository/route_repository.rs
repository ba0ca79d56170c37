//! Route repository.

use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::route;
use common::AppResult;
use domain::{Route, RouteScope, RouteSlot};

pub struct RouteRepo<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> RouteRepo<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Route>> {
        match route::Entity::find_by_id(id).one(self.conn).await? {
            Some(model) => Ok(Some(Route::try_from(model)?)),
            None => Ok(None),
        }
    }

    /// The route occupying `slot`, other than `exclude`.
    pub async fn find_by_slot(&self, slot: RouteSlot, exclude: Option<Uuid>) -> AppResult<Option<Route>> {
        let mut query = route::Entity::find()
            .filter(route::Column::DriverId.eq(slot.driver_id))
            .filter(route::Column::VehicleId.eq(slot.vehicle_id))
            .filter(route::Column::DeliveryDate.eq(slot.delivery_date));
        if let Some(id) = exclude {
            query = query.filter(route::Column::Id.ne(id));
        }

        match query.one(self.conn).await? {
            Some(model) => Ok(Some(Route::try_from(model)?)),
            None => Ok(None),
        }
    }

    /// Routes visible under `scope`, latest date first.
    pub async fn list(&self, scope: RouteScope) -> AppResult<Vec<Route>> {
        let query = route::Entity::find()
            .order_by_desc(route::Column::DeliveryDate)
            .order_by_asc(route::Column::DeliveryStartTime);
        let query = match scope {
            RouteScope::All => query,
            RouteScope::Driver(driver_id) => query.filter(route::Column::DriverId.eq(driver_id)),
            RouteScope::Nothing => return Ok(Vec::new()),
        };

        query
            .all(self.conn)
            .await?
            .into_iter()
            .map(|m| Route::try_from(m).map_err(Into::into))
            .collect()
    }

    pub async fn save(&self, r: &Route, is_new: bool) -> AppResult<Route> {
        let active = route::ActiveModel {
            id: Set(r.id),
            description: Set(r.description.clone()),
            delivery_status: Set(r.delivery_status.as_str().to_string()),
            delivery_date: Set(r.delivery_date),
            delivery_start_time: Set(r.delivery_start_time),
            delivery_end_time: Set(r.delivery_end_time),
            expected_duration_minutes: Set(r.expected_duration_minutes),
            kms_travelled: Set(r.kms_travelled),
            driver_notes: Set(r.driver_notes.clone()),
            driver_id: Set(r.driver_id),
            vehicle_id: Set(r.vehicle_id),
            warehouse_id: Set(r.warehouse_id),
            origin_name: Set(r.origin.name.clone()),
            origin_address: Set(r.origin.address.clone()),
            origin_contact: Set(r.origin.contact.clone()),
            destination_name: Set(r.destination.name.clone()),
            destination_address: Set(r.destination.address.clone()),
            destination_contact: Set(r.destination.contact.clone()),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
        };

        let model = if is_new {
            active.insert(self.conn).await?
        } else {
            active.update(self.conn).await?
        };
        Ok(Route::try_from(model)?)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = route::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn count_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<u64> {
        Ok(route::Entity::find()
            .filter(route::Column::VehicleId.eq(vehicle_id))
            .count(self.conn)
            .await?)
    }

    pub async fn count_by_driver(&self, driver_id: Uuid) -> AppResult<u64> {
        Ok(route::Entity::find()
            .filter(route::Column::DriverId.eq(driver_id))
            .count(self.conn)
            .await?)
    }

    /// Detach routes from a warehouse that is about to be deleted.
    pub async fn clear_warehouse(&self, warehouse_id: Uuid) -> AppResult<u64> {
        let result = route::Entity::update_many()
            .col_expr(route::Column::WarehouseId, Expr::value(Option::<Uuid>::None))
            .filter(route::Column::WarehouseId.eq(warehouse_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
