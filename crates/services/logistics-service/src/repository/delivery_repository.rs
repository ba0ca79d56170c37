//! Delivery repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use uuid::Uuid;

use super::entities::delivery;
use common::AppResult;
use domain::{Delivery, DeliveryScope};

pub struct DeliveryRepo<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> DeliveryRepo<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Delivery>> {
        match delivery::Entity::find_by_id(id).one(self.conn).await? {
            Some(model) => Ok(Some(Delivery::try_from(model)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_tracking(&self, tracking_number: &str) -> AppResult<Option<Delivery>> {
        let model = delivery::Entity::find()
            .filter(delivery::Column::TrackingNumber.eq(tracking_number))
            .one(self.conn)
            .await?;

        match model {
            Some(model) => Ok(Some(Delivery::try_from(model)?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_route(&self, route_id: Uuid) -> AppResult<Vec<Delivery>> {
        delivery::Entity::find()
            .filter(delivery::Column::RouteId.eq(route_id))
            .order_by_asc(delivery::Column::RegisteredAt)
            .all(self.conn)
            .await?
            .into_iter()
            .map(|m| Delivery::try_from(m).map_err(Into::into))
            .collect()
    }

    /// Deliveries visible under `scope`, most recently registered first.
    pub async fn list(&self, scope: DeliveryScope) -> AppResult<Vec<Delivery>> {
        let query = delivery::Entity::find().order_by_desc(delivery::Column::RegisteredAt);
        let query = match scope {
            DeliveryScope::All => query,
            DeliveryScope::Driver(employee_id) => {
                query.filter(delivery::Column::DriverId.eq(employee_id))
            }
            DeliveryScope::Client(user_id) => query.filter(delivery::Column::ClientId.eq(user_id)),
            DeliveryScope::Nothing => return Ok(Vec::new()),
        };

        query
            .all(self.conn)
            .await?
            .into_iter()
            .map(|m| Delivery::try_from(m).map_err(Into::into))
            .collect()
    }

    pub async fn save(&self, d: &Delivery, is_new: bool) -> AppResult<Delivery> {
        let active = delivery::ActiveModel::from(d);
        let model = if is_new {
            active.insert(self.conn).await?
        } else {
            active.update(self.conn).await?
        };
        Ok(Delivery::try_from(model)?)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        let result = delivery::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn count_by_route(&self, route_id: Uuid) -> AppResult<u64> {
        Ok(delivery::Entity::find()
            .filter(delivery::Column::RouteId.eq(route_id))
            .count(self.conn)
            .await?)
    }

    pub async fn count_by_driver(&self, driver_id: Uuid) -> AppResult<u64> {
        Ok(delivery::Entity::find()
            .filter(delivery::Column::DriverId.eq(driver_id))
            .count(self.conn)
            .await?)
    }

    pub async fn count_by_invoice(&self, invoice_id: Uuid) -> AppResult<u64> {
        Ok(delivery::Entity::find()
            .filter(delivery::Column::InvoiceId.eq(invoice_id))
            .count(self.conn)
            .await?)
    }
}
