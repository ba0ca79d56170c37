//! Delivery database entity.

use sea_orm::entity::prelude::*;

use domain::{Delivery, DeliveryStatus, Party};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deliveries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tracking_number: String,
    pub description: Option<String>,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_phone: Option<String>,
    pub sender_email: Option<String>,
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_phone: Option<String>,
    pub recipient_email: Option<String>,
    pub item_type: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub weight: Decimal,
    pub dimensions: Option<String>,
    pub status: String,
    pub priority: Option<String>,
    pub registered_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub in_transition: bool,
    pub destination: Option<String>,
    pub delivery_date: Option<Date>,
    pub invoice_id: Option<Uuid>,
    pub driver_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub route_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Delivery {
    type Error = domain::DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Delivery {
            id: model.id,
            tracking_number: model.tracking_number,
            description: model.description,
            sender: Party {
                name: model.sender_name,
                address: model.sender_address,
                phone: model.sender_phone,
                email: model.sender_email,
            },
            recipient: Party {
                name: model.recipient_name,
                address: model.recipient_address,
                phone: model.recipient_phone,
                email: model.recipient_email,
            },
            item_type: model.item_type,
            weight: model.weight,
            dimensions: model.dimensions,
            status: DeliveryStatus::parse(&model.status)?,
            priority: model.priority,
            registered_at: model.registered_at,
            updated_at: model.updated_at,
            in_transition: model.in_transition,
            destination: model.destination,
            delivery_date: model.delivery_date,
            invoice_id: model.invoice_id,
            driver_id: model.driver_id,
            client_id: model.client_id,
            route_id: model.route_id,
        })
    }
}

impl From<&Delivery> for ActiveModel {
    fn from(d: &Delivery) -> Self {
        use sea_orm::Set;

        ActiveModel {
            id: Set(d.id),
            tracking_number: Set(d.tracking_number.clone()),
            description: Set(d.description.clone()),
            sender_name: Set(d.sender.name.clone()),
            sender_address: Set(d.sender.address.clone()),
            sender_phone: Set(d.sender.phone.clone()),
            sender_email: Set(d.sender.email.clone()),
            recipient_name: Set(d.recipient.name.clone()),
            recipient_address: Set(d.recipient.address.clone()),
            recipient_phone: Set(d.recipient.phone.clone()),
            recipient_email: Set(d.recipient.email.clone()),
            item_type: Set(d.item_type.clone()),
            weight: Set(d.weight),
            dimensions: Set(d.dimensions.clone()),
            status: Set(d.status.as_str().to_string()),
            priority: Set(d.priority.clone()),
            registered_at: Set(d.registered_at),
            updated_at: Set(d.updated_at),
            in_transition: Set(d.in_transition),
            destination: Set(d.destination.clone()),
            delivery_date: Set(d.delivery_date),
            invoice_id: Set(d.invoice_id),
            driver_id: Set(d.driver_id),
            client_id: Set(d.client_id),
            route_id: Set(d.route_id),
        }
    }
}
