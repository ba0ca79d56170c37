//! Invoice repository. Invoices own their items; the item set is replaced
//! as a whole.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::{invoice, invoice_item};
use common::AppResult;
use domain::{Invoice, InvoiceItem, InvoiceItemInput, InvoiceScope};

pub struct InvoiceRepo<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> InvoiceRepo<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Invoice>> {
        match invoice::Entity::find_by_id(id).one(self.conn).await? {
            Some(model) => {
                let items = self.items_of(model.id).await?;
                Ok(Some(model.into_domain(items)))
            }
            None => Ok(None),
        }
    }

    /// Invoices visible under `scope`, newest first.
    pub async fn list(&self, scope: InvoiceScope) -> AppResult<Vec<Invoice>> {
        let mut query = invoice::Entity::find().order_by_desc(invoice::Column::IdInvoice);
        if let InvoiceScope::Owner(user_id) = scope {
            query = query.filter(invoice::Column::UserId.eq(user_id));
        }

        let models = query.all(self.conn).await?;
        let mut invoices = Vec::with_capacity(models.len());
        for model in models {
            let items = self.items_of(model.id).await?;
            invoices.push(model.into_domain(items));
        }
        Ok(invoices)
    }

    /// Next human-facing invoice number. Races are caught by the unique index.
    pub async fn next_id_invoice(&self) -> AppResult<i64> {
        let max: Option<Option<i64>> = invoice::Entity::find()
            .select_only()
            .column_as(invoice::Column::IdInvoice.max(), "max_id")
            .into_tuple()
            .one(self.conn)
            .await?;

        Ok(max.flatten().unwrap_or(0) + 1)
    }

    /// Insert or update the invoice row; `invoice.items` is ignored here.
    pub async fn save(&self, inv: &Invoice, is_new: bool) -> AppResult<()> {
        let active = invoice::ActiveModel {
            id: Set(inv.id),
            id_invoice: Set(inv.id_invoice),
            user_id: Set(inv.user_id),
            invoice_status: Set(inv.invoice_status.clone()),
            invoice_type: Set(inv.invoice_type.clone()),
            quantity: Set(inv.quantity),
            invoice_datetime: Set(inv.invoice_datetime),
            cost: Set(inv.cost),
            paid: Set(inv.paid),
            payment_method: Set(inv.payment_method.clone()),
            name: Set(inv.name.clone()),
            address: Set(inv.address.clone()),
            contact: Set(inv.contact.clone()),
            created_at: Set(inv.created_at),
            updated_at: Set(inv.updated_at),
        };

        if is_new {
            active.insert(self.conn).await?;
        } else {
            active.update(self.conn).await?;
        }
        Ok(())
    }

    /// Drop the current items and insert `items` in order.
    pub async fn replace_items(
        &self,
        invoice_id: Uuid,
        items: &[InvoiceItemInput],
    ) -> AppResult<Vec<InvoiceItem>> {
        invoice_item::Entity::delete_many()
            .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
            .exec(self.conn)
            .await?;

        let mut saved = Vec::with_capacity(items.len());
        for item in items {
            let model = invoice_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                invoice_id: Set(invoice_id),
                shipment_type: Set(item.shipment_type.clone()),
                weight: Set(item.weight),
                delivery_speed: Set(item.delivery_speed.clone()),
                quantity: Set(item.quantity),
                unit_price: Set(item.unit_price),
                notes: Set(item.notes.clone()),
            }
            .insert(self.conn)
            .await?;
            saved.push(InvoiceItem::from(model));
        }
        Ok(saved)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        invoice_item::Entity::delete_many()
            .filter(invoice_item::Column::InvoiceId.eq(id))
            .exec(self.conn)
            .await?;
        let result = invoice::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    async fn items_of(&self, invoice_id: Uuid) -> AppResult<Vec<InvoiceItem>> {
        let models = invoice_item::Entity::find()
            .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(InvoiceItem::from).collect())
    }
}
