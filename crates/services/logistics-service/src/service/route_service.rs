//! Route service.
//!
//! Two rules live here: a driver+vehicle pair is booked at most once per
//! date, and saving a route as `Completed` completes every delivery on it in
//! the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::ConnectionTrait;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, Delivery, NotificationType, Route, RouteInput, RouteStatus};

use crate::infra::{Repositories, UnitOfWork};
use crate::notifications::NotificationDispatcher;

#[async_trait]
pub trait RouteService: Send + Sync {
    /// Create or update a route. Fails with a conflict when the driver and
    /// vehicle are already booked on that date by another route.
    async fn upsert_route(
        &self,
        actor: &Actor,
        input: RouteInput,
        existing: Option<Uuid>,
    ) -> AppResult<Route>;

    /// Mark a stored route completed, cascading to its deliveries.
    async fn complete_route(&self, actor: &Actor, id: Uuid) -> AppResult<Route>;

    async fn get_route(&self, actor: &Actor, id: Uuid) -> AppResult<Route>;

    async fn list_routes(&self, actor: &Actor) -> AppResult<Vec<Route>>;

    /// Refused while deliveries are attached to the route.
    async fn delete_route(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct RouteManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<NotificationDispatcher>,
}

impl<U: UnitOfWork> RouteManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<NotificationDispatcher>) -> Self {
        Self { uow, notifier }
    }
}

/// Complete every delivery of `route_id` that is not completed yet, dating
/// it `today`. Returns the deliveries that changed; running it again on the
/// same route changes nothing. Any invalid delivery aborts the whole
/// operation so the caller's transaction rolls back.
pub async fn cascade_route_completion<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    route_id: Uuid,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> AppResult<Vec<Delivery>> {
    let deliveries = repos.deliveries();
    let mut completed = Vec::new();

    for mut delivery in deliveries.find_by_route(route_id).await? {
        if delivery.complete_on(today, now)? {
            completed.push(deliveries.save(&delivery, false).await?);
        }
    }

    if !completed.is_empty() {
        metrics::counter!("route_completion_cascaded_deliveries_total")
            .increment(completed.len() as u64);
        tracing::info!(%route_id, deliveries = completed.len(), "Route completion cascaded");
    }
    Ok(completed)
}

struct SavedRoute {
    route: Route,
    previous_status: Option<RouteStatus>,
    driver_email: Option<String>,
    /// Client emails of deliveries completed by the cascade
    client_emails: Vec<String>,
}

#[async_trait]
impl<U: UnitOfWork + 'static> RouteService for RouteManager<U> {
    #[instrument(skip(self, actor, input), fields(date = %input.delivery_date, status = %input.delivery_status))]
    async fn upsert_route(
        &self,
        actor: &Actor,
        input: RouteInput,
        existing: Option<Uuid>,
    ) -> AppResult<Route> {
        input.validate_rules()?;
        let now = Utc::now();
        let today = now.date_naive();

        let saved = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let previous = match existing {
                        Some(id) => Some(ctx.routes().find_by_id(id).await?.ok_or_not_found("Route")?),
                        None => None,
                    };

                    let driver_email = match input.driver_id {
                        Some(driver_id) => {
                            let driver = ctx
                                .employees()
                                .find_by_id(driver_id)
                                .await?
                                .ok_or_not_found("Driver")?;
                            if !driver.is_driver() {
                                return Err(AppError::validation(
                                    "Route driver must be an employee with position Driver",
                                ));
                            }
                            ctx.users().find_by_id(driver.user_id).await?.map(|u| u.email)
                        }
                        None => None,
                    };
                    if let Some(vehicle_id) = input.vehicle_id {
                        ctx.vehicles().find_by_id(vehicle_id).await?.ok_or_not_found("Vehicle")?;
                    }
                    if let Some(warehouse_id) = input.warehouse_id {
                        ctx.warehouses()
                            .find_by_id(warehouse_id)
                            .await?
                            .ok_or_not_found("Warehouse")?;
                    }

                    if let Some(slot) = input.slot() {
                        if let Some(booked) = ctx.routes().find_by_slot(slot, existing).await? {
                            return Err(AppError::conflict(format!(
                                "Driver and vehicle are already assigned on {} to route {} ({})",
                                slot.delivery_date, booked.id, booked.description
                            )));
                        }
                    }

                    let route = Route {
                        id: previous.as_ref().map(|r| r.id).unwrap_or_else(Uuid::new_v4),
                        description: input.description.trim().to_string(),
                        delivery_status: input.delivery_status,
                        delivery_date: input.delivery_date,
                        delivery_start_time: input.delivery_start_time,
                        delivery_end_time: input.delivery_end_time,
                        expected_duration_minutes: input.expected_duration_minutes,
                        kms_travelled: input.kms_travelled,
                        driver_notes: input.driver_notes,
                        driver_id: input.driver_id,
                        vehicle_id: input.vehicle_id,
                        warehouse_id: input.warehouse_id,
                        origin: input.origin,
                        destination: input.destination,
                        created_at: previous.as_ref().map(|r| r.created_at).unwrap_or(now),
                        updated_at: now,
                    };
                    let route = ctx.routes().save(&route, previous.is_none()).await?;

                    let mut client_emails = Vec::new();
                    if route.delivery_status.is_completed() {
                        let completed = cascade_route_completion(&ctx, route.id, today, now).await?;
                        for client_id in completed.iter().filter_map(|d| d.client_id) {
                            if let Some(client) = ctx.users().find_by_id(client_id).await? {
                                client_emails.push(client.email);
                            }
                        }
                    }

                    Ok(SavedRoute {
                        route,
                        previous_status: previous.map(|p| p.delivery_status),
                        driver_email,
                        client_emails,
                    })
                })
            })
            .await?;

        let SavedRoute {
            route,
            previous_status,
            driver_email,
            client_emails,
        } = saved;

        let (kind, subject) = match previous_status {
            None if route.delivery_status.is_completed() => {
                (NotificationType::RouteCompleted, "Route completed")
            }
            None => (NotificationType::RouteCreated, "Route created"),
            Some(prev) if !prev.is_completed() && route.delivery_status.is_completed() => {
                (NotificationType::RouteCompleted, "Route completed")
            }
            Some(_) => (NotificationType::RouteUpdated, "Route updated"),
        };
        let message = format!(
            "Route {} on {} is {}",
            route.description, route.delivery_date, route.delivery_status
        );
        self.notifier.record_all(
            kind,
            [Some(actor.contact.as_str()), driver_email.as_deref()]
                .into_iter()
                .flatten(),
            subject,
            &message,
        );
        self.notifier.record_all(
            NotificationType::DeliveryUpdated,
            client_emails.iter().map(String::as_str),
            "Delivery completed",
            &format!("Your delivery on route {} was completed", route.description),
        );

        Ok(route)
    }

    async fn complete_route(&self, actor: &Actor, id: Uuid) -> AppResult<Route> {
        let route = self
            .uow
            .reader()
            .routes()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Route")?;

        let mut input = RouteInput::from(&route);
        input.delivery_status = RouteStatus::Completed;
        self.upsert_route(actor, input, Some(id)).await
    }

    async fn get_route(&self, actor: &Actor, id: Uuid) -> AppResult<Route> {
        let scope = actor.route_scope()?;
        let route = self
            .uow
            .reader()
            .routes()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Route")?;

        if !scope.admits(route.driver_id) {
            return Err(AppError::Forbidden);
        }
        Ok(route)
    }

    async fn list_routes(&self, actor: &Actor) -> AppResult<Vec<Route>> {
        let scope = actor.route_scope()?;
        self.uow.reader().routes().list(scope).await
    }

    #[instrument(skip(self, actor))]
    async fn delete_route(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let description = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let route = ctx.routes().find_by_id(id).await?.ok_or_not_found("Route")?;
                    let deliveries = ctx.deliveries().count_by_route(id).await?;
                    if deliveries > 0 {
                        return Err(AppError::conflict(format!(
                            "Route {} still has {} delivery(ies)",
                            route.description, deliveries
                        )));
                    }
                    ctx.routes().delete(id).await?;
                    Ok(route.description)
                })
            })
            .await?;

        self.notifier.record(
            NotificationType::RouteDeleted,
            &actor.contact,
            "Route deleted",
            format!("Route {} deleted", description),
        );
        Ok(())
    }
}
