//! Delivery service.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, Delivery, DeliveryInput, DeliveryStatus, NotificationType};

use crate::infra::UnitOfWork;
use crate::notifications::NotificationDispatcher;

#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Create or update a delivery. The stored record always satisfies the
    /// delivery invariants: positive weight, a date when completed and
    /// `updated_at` after `registered_at`.
    async fn upsert_delivery(
        &self,
        actor: &Actor,
        input: DeliveryInput,
        existing: Option<Uuid>,
    ) -> AppResult<Delivery>;

    async fn get_delivery(&self, actor: &Actor, id: Uuid) -> AppResult<Delivery>;

    async fn track_delivery(&self, tracking_number: &str) -> AppResult<Delivery>;

    async fn list_deliveries(&self, actor: &Actor) -> AppResult<Vec<Delivery>>;

    async fn delete_delivery(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct DeliveryManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<NotificationDispatcher>,
}

impl<U: UnitOfWork> DeliveryManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<NotificationDispatcher>) -> Self {
        Self { uow, notifier }
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> DeliveryService for DeliveryManager<U> {
    #[instrument(skip(self, actor, input), fields(tracking = %input.tracking_number, status = %input.status))]
    async fn upsert_delivery(
        &self,
        actor: &Actor,
        input: DeliveryInput,
        existing: Option<Uuid>,
    ) -> AppResult<Delivery> {
        input.validate_rules()?;
        let now = Utc::now();

        let (delivery, is_new, client_email) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let previous = match existing {
                        Some(id) => Some(
                            ctx.deliveries()
                                .find_by_id(id)
                                .await?
                                .ok_or_not_found("Delivery")?,
                        ),
                        None => None,
                    };

                    let tracking = input.tracking_number.trim();
                    if let Some(other) = ctx.deliveries().find_by_tracking(tracking).await? {
                        if existing != Some(other.id) {
                            return Err(AppError::conflict(format!(
                                "Tracking number {} already exists",
                                tracking
                            )));
                        }
                    }

                    if let Some(driver_id) = input.driver_id {
                        let driver = ctx
                            .employees()
                            .find_by_id(driver_id)
                            .await?
                            .ok_or_not_found("Driver")?;
                        if !driver.is_driver() {
                            return Err(AppError::validation(
                                "Delivery driver must be an employee with position Driver",
                            ));
                        }
                    }
                    let client_email = match input.client_id {
                        Some(client_id) => Some(
                            ctx.users()
                                .find_by_id(client_id)
                                .await?
                                .ok_or_not_found("Client")?
                                .email,
                        ),
                        None => None,
                    };
                    if let Some(route_id) = input.route_id {
                        let route =
                            ctx.routes().find_by_id(route_id).await?.ok_or_not_found("Route")?;
                        if route.delivery_status.is_completed()
                            && input.status != DeliveryStatus::Completed
                        {
                            return Err(AppError::validation(format!(
                                "Route {} is completed; its deliveries must be Completed",
                                route.id
                            )));
                        }
                    }
                    if let Some(invoice_id) = input.invoice_id {
                        ctx.invoices()
                            .find_by_id(invoice_id)
                            .await?
                            .ok_or_not_found("Invoice")?;
                    }

                    let id = previous.as_ref().map(|d| d.id).unwrap_or_else(Uuid::new_v4);
                    let delivery = input.apply(id, previous.as_ref(), now);
                    delivery.check_invariants()?;

                    let is_new = previous.is_none();
                    let delivery = ctx.deliveries().save(&delivery, is_new).await?;
                    Ok((delivery, is_new, client_email))
                })
            })
            .await?;

        let (kind, subject) = if is_new {
            (NotificationType::DeliveryCreated, "Delivery registered")
        } else {
            (NotificationType::DeliveryUpdated, "Delivery updated")
        };
        self.notifier.record_all(
            kind,
            [Some(actor.contact.as_str()), client_email.as_deref()]
                .into_iter()
                .flatten(),
            subject,
            &format!("Delivery {} is {}", delivery.tracking_number, delivery.status),
        );

        Ok(delivery)
    }

    async fn get_delivery(&self, actor: &Actor, id: Uuid) -> AppResult<Delivery> {
        let delivery = self
            .uow
            .reader()
            .deliveries()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Delivery")?;

        if !actor
            .delivery_scope()
            .admits(delivery.driver_id, delivery.client_id)
        {
            return Err(AppError::Forbidden);
        }
        Ok(delivery)
    }

    async fn track_delivery(&self, tracking_number: &str) -> AppResult<Delivery> {
        self.uow
            .reader()
            .deliveries()
            .find_by_tracking(tracking_number.trim())
            .await?
            .ok_or_not_found("Delivery")
    }

    async fn list_deliveries(&self, actor: &Actor) -> AppResult<Vec<Delivery>> {
        self.uow
            .reader()
            .deliveries()
            .list(actor.delivery_scope())
            .await
    }

    #[instrument(skip(self, actor))]
    async fn delete_delivery(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let tracking = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let delivery = ctx
                        .deliveries()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Delivery")?;
                    ctx.deliveries().delete(id).await?;
                    Ok(delivery.tracking_number)
                })
            })
            .await?;

        self.notifier.record(
            NotificationType::DeliveryDeleted,
            &actor.contact,
            "Delivery deleted",
            format!("Delivery {} deleted", tracking),
        );
        Ok(())
    }
}
