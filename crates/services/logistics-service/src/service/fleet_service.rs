//! Warehouses and vehicles.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    Actor, NotificationType, Vehicle, VehicleInput, Warehouse, WarehouseInput,
    DEFAULT_VEHICLE_STATUS,
};

use crate::infra::UnitOfWork;
use crate::notifications::NotificationDispatcher;

#[async_trait]
pub trait FleetService: Send + Sync {
    async fn upsert_warehouse(
        &self,
        actor: &Actor,
        input: WarehouseInput,
        existing: Option<Uuid>,
    ) -> AppResult<Warehouse>;

    async fn get_warehouse(&self, id: Uuid) -> AppResult<Warehouse>;

    async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>>;

    /// Routes pointing at the warehouse keep existing without one.
    async fn delete_warehouse(&self, actor: &Actor, id: Uuid) -> AppResult<()>;

    async fn upsert_vehicle(
        &self,
        actor: &Actor,
        input: VehicleInput,
        existing: Option<Uuid>,
    ) -> AppResult<Vehicle>;

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Vehicle>;

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;

    /// Refused while any route uses the vehicle.
    async fn delete_vehicle(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct FleetManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<NotificationDispatcher>,
}

impl<U: UnitOfWork> FleetManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<NotificationDispatcher>) -> Self {
        Self { uow, notifier }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> FleetService for FleetManager<U> {
    #[instrument(skip(self, actor, input), fields(name = %input.name))]
    async fn upsert_warehouse(
        &self,
        actor: &Actor,
        input: WarehouseInput,
        existing: Option<Uuid>,
    ) -> AppResult<Warehouse> {
        input.validate_rules()?;
        let now = Utc::now();

        let warehouse = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let previous = match existing {
                        Some(id) => Some(
                            ctx.warehouses()
                                .find_by_id(id)
                                .await?
                                .ok_or_not_found("Warehouse")?,
                        ),
                        None => None,
                    };

                    let warehouse = Warehouse {
                        id: previous.as_ref().map(|w| w.id).unwrap_or_else(Uuid::new_v4),
                        name: input.name.trim().to_string(),
                        address: input.address.trim().to_string(),
                        contact: input.contact,
                        po_schedule_open: input.po_schedule_open,
                        po_schedule_close: input.po_schedule_close,
                        maximum_storage_capacity: input.maximum_storage_capacity,
                        created_at: previous.as_ref().map(|w| w.created_at).unwrap_or(now),
                        updated_at: now,
                    };
                    ctx.warehouses().save(&warehouse, previous.is_none()).await
                })
            })
            .await?;

        self.notifier.record(
            NotificationType::WarehouseSaved,
            &actor.contact,
            "Warehouse saved",
            format!("Warehouse {} saved", warehouse.name),
        );
        Ok(warehouse)
    }

    async fn get_warehouse(&self, id: Uuid) -> AppResult<Warehouse> {
        self.uow
            .reader()
            .warehouses()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Warehouse")
    }

    async fn list_warehouses(&self) -> AppResult<Vec<Warehouse>> {
        self.uow.reader().warehouses().list().await
    }

    #[instrument(skip(self, actor))]
    async fn delete_warehouse(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let (name, detached) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let warehouse = ctx
                        .warehouses()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Warehouse")?;
                    let detached = ctx.routes().clear_warehouse(id).await?;
                    ctx.warehouses().delete(id).await?;
                    Ok((warehouse.name, detached))
                })
            })
            .await?;

        tracing::info!(warehouse_id = %id, detached_routes = detached, "Warehouse deleted");
        self.notifier.record(
            NotificationType::WarehouseDeleted,
            &actor.contact,
            "Warehouse deleted",
            format!("Warehouse {} deleted", name),
        );
        Ok(())
    }

    #[instrument(skip(self, actor, input), fields(plate = %input.plate_number))]
    async fn upsert_vehicle(
        &self,
        actor: &Actor,
        input: VehicleInput,
        existing: Option<Uuid>,
    ) -> AppResult<Vehicle> {
        input.validate_rules()?;
        let now = Utc::now();

        let vehicle = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let previous = match existing {
                        Some(id) => Some(
                            ctx.vehicles()
                                .find_by_id(id)
                                .await?
                                .ok_or_not_found("Vehicle")?,
                        ),
                        None => None,
                    };

                    let plate_number = input.normalized_plate();
                    if let Some(other) = ctx.vehicles().find_by_plate(&plate_number).await? {
                        if existing != Some(other.id) {
                            return Err(AppError::conflict(format!(
                                "Plate number {} is already registered",
                                plate_number
                            )));
                        }
                    }

                    let vehicle = Vehicle {
                        id: previous.as_ref().map(|v| v.id).unwrap_or_else(Uuid::new_v4),
                        plate_number,
                        vehicle_type: input.vehicle_type,
                        brand: input.brand,
                        model: input.model,
                        capacity: input.capacity,
                        vehicle_status: input
                            .vehicle_status
                            .filter(|s| !s.trim().is_empty())
                            .unwrap_or_else(|| DEFAULT_VEHICLE_STATUS.to_string()),
                        year: input.year,
                        fuel_type: input.fuel_type,
                        last_maintenance_date: input.last_maintenance_date,
                        created_at: previous.as_ref().map(|v| v.created_at).unwrap_or(now),
                        updated_at: now,
                    };
                    ctx.vehicles().save(&vehicle, previous.is_none()).await
                })
            })
            .await?;

        self.notifier.record(
            NotificationType::VehicleSaved,
            &actor.contact,
            "Vehicle saved",
            format!("Vehicle {} saved", vehicle.plate_number),
        );
        Ok(vehicle)
    }

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Vehicle> {
        self.uow
            .reader()
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Vehicle")
    }

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        self.uow.reader().vehicles().list().await
    }

    #[instrument(skip(self, actor))]
    async fn delete_vehicle(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let plate = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let vehicle = ctx.vehicles().find_by_id(id).await?.ok_or_not_found("Vehicle")?;
                    let routes = ctx.routes().count_by_vehicle(id).await?;
                    if routes > 0 {
                        return Err(AppError::conflict(format!(
                            "Vehicle {} is still used by {} route(s)",
                            vehicle.plate_number, routes
                        )));
                    }
                    ctx.vehicles().delete(id).await?;
                    Ok(vehicle.plate_number)
                })
            })
            .await?;

        self.notifier.record(
            NotificationType::VehicleDeleted,
            &actor.contact,
            "Vehicle deleted",
            format!("Vehicle {} deleted", plate),
        );
        Ok(())
    }
}
