//! Invoice service.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, Invoice, InvoiceInput, NotificationType};

use crate::infra::UnitOfWork;
use crate::notifications::NotificationDispatcher;

#[async_trait]
pub trait InvoiceService: Send + Sync {
    /// Create or update an invoice together with its line items. A paid
    /// invoice always ends up with status `Paid`.
    async fn upsert_invoice(
        &self,
        actor: &Actor,
        input: InvoiceInput,
        existing: Option<Uuid>,
    ) -> AppResult<Invoice>;

    async fn get_invoice(&self, actor: &Actor, id: Uuid) -> AppResult<Invoice>;

    async fn list_invoices(&self, actor: &Actor) -> AppResult<Vec<Invoice>>;

    /// Refused while deliveries reference the invoice.
    async fn delete_invoice(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct InvoiceManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<NotificationDispatcher>,
}

impl<U: UnitOfWork> InvoiceManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<NotificationDispatcher>) -> Self {
        Self { uow, notifier }
    }
}

struct SavedInvoice {
    invoice: Invoice,
    was_paid: Option<bool>,
    owner_email: Option<String>,
}

#[async_trait]
impl<U: UnitOfWork + 'static> InvoiceService for InvoiceManager<U> {
    #[instrument(skip(self, actor, input), fields(items = input.items.len()))]
    async fn upsert_invoice(
        &self,
        actor: &Actor,
        input: InvoiceInput,
        existing: Option<Uuid>,
    ) -> AppResult<Invoice> {
        input.validate_rules()?;
        let now = Utc::now();
        let status = input.effective_status();

        let saved = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let previous = match existing {
                        Some(id) => Some(
                            ctx.invoices()
                                .find_by_id(id)
                                .await?
                                .ok_or_not_found("Invoice")?,
                        ),
                        None => None,
                    };

                    let owner_email = match input.user_id {
                        Some(user_id) => Some(
                            ctx.users()
                                .find_by_id(user_id)
                                .await?
                                .ok_or_not_found("User")?
                                .email,
                        ),
                        None => None,
                    };

                    let id_invoice = match &previous {
                        Some(p) => p.id_invoice,
                        None => ctx.invoices().next_id_invoice().await?,
                    };

                    let mut invoice = Invoice {
                        id: previous.as_ref().map(|p| p.id).unwrap_or_else(Uuid::new_v4),
                        id_invoice,
                        user_id: input.user_id,
                        invoice_status: status,
                        invoice_type: input.invoice_type,
                        quantity: input.quantity,
                        invoice_datetime: input
                            .invoice_datetime
                            .or(previous.as_ref().map(|p| p.invoice_datetime))
                            .unwrap_or(now),
                        cost: input.cost,
                        paid: input.paid,
                        payment_method: input.payment_method,
                        name: input.name,
                        address: input.address,
                        contact: input.contact,
                        items: Vec::new(),
                        created_at: previous.as_ref().map(|p| p.created_at).unwrap_or(now),
                        updated_at: now,
                    };

                    ctx.invoices().save(&invoice, previous.is_none()).await?;
                    invoice.items = ctx.invoices().replace_items(invoice.id, &input.items).await?;

                    Ok(SavedInvoice {
                        invoice,
                        was_paid: previous.map(|p| p.paid),
                        owner_email,
                    })
                })
            })
            .await?;

        let SavedInvoice {
            invoice,
            was_paid,
            owner_email,
        } = saved;

        let (kind, subject) = if invoice.paid && was_paid != Some(true) {
            (NotificationType::InvoicePaid, "Invoice paid")
        } else if was_paid.is_none() {
            (NotificationType::InvoiceCreated, "Invoice created")
        } else {
            (NotificationType::InvoiceUpdated, "Invoice updated")
        };
        let totals = invoice.totals();
        self.notifier.record_all(
            kind,
            [Some(actor.contact.as_str()), owner_email.as_deref()]
                .into_iter()
                .flatten(),
            subject,
            &format!(
                "Invoice #{} ({}), total {}",
                invoice.id_invoice, invoice.invoice_status, totals.total
            ),
        );

        Ok(invoice)
    }

    async fn get_invoice(&self, actor: &Actor, id: Uuid) -> AppResult<Invoice> {
        let scope = actor.invoice_scope()?;
        let invoice = self
            .uow
            .reader()
            .invoices()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Invoice")?;

        if !scope.admits(invoice.user_id) {
            return Err(AppError::Forbidden);
        }
        Ok(invoice)
    }

    async fn list_invoices(&self, actor: &Actor) -> AppResult<Vec<Invoice>> {
        let scope = actor.invoice_scope()?;
        self.uow.reader().invoices().list(scope).await
    }

    #[instrument(skip(self, actor))]
    async fn delete_invoice(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let id_invoice = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let invoice = ctx.invoices().find_by_id(id).await?.ok_or_not_found("Invoice")?;
                    let deliveries = ctx.deliveries().count_by_invoice(id).await?;
                    if deliveries > 0 {
                        return Err(AppError::conflict(format!(
                            "Invoice #{} is referenced by {} delivery(ies)",
                            invoice.id_invoice, deliveries
                        )));
                    }
                    ctx.invoices().delete(id).await?;
                    Ok(invoice.id_invoice)
                })
            })
            .await?;

        self.notifier.record(
            NotificationType::InvoiceDeleted,
            &actor.contact,
            "Invoice deleted",
            format!("Invoice #{} deleted", id_invoice),
        );
        Ok(())
    }
}
