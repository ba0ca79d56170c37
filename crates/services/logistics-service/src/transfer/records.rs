//! Flat row shapes used by both CSV and JSON.
//!
//! `id` is never read: a caller-supplied identifier is dropped on import and
//! the store assigns a fresh one. On export it carries the stored id.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domain::{
    Delivery, DeliveryInput, DeliveryStatus, DomainResult, Invoice, InvoiceInput, InvoiceItem,
    InvoiceItemInput, Party, Route, RouteInput, RouteStatus, Stop, Vehicle, VehicleInput,
    Warehouse, WarehouseInput,
};

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseRecord {
    #[serde(skip_deserializing)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(alias = "location")]
    pub address: String,
    #[serde(default)]
    pub contact: Option<String>,
    pub po_schedule_open: NaiveTime,
    pub po_schedule_close: NaiveTime,
    #[serde(alias = "capacity")]
    pub maximum_storage_capacity: i32,
}

impl From<WarehouseRecord> for WarehouseInput {
    fn from(r: WarehouseRecord) -> Self {
        WarehouseInput {
            name: r.name,
            address: r.address,
            contact: blank_to_none(r.contact),
            po_schedule_open: r.po_schedule_open,
            po_schedule_close: r.po_schedule_close,
            maximum_storage_capacity: r.maximum_storage_capacity,
        }
    }
}

impl From<Warehouse> for WarehouseRecord {
    fn from(w: Warehouse) -> Self {
        WarehouseRecord {
            id: Some(w.id),
            name: w.name,
            address: w.address,
            contact: w.contact,
            po_schedule_open: w.po_schedule_open,
            po_schedule_close: w.po_schedule_close,
            maximum_storage_capacity: w.maximum_storage_capacity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(skip_deserializing)]
    pub id: Option<Uuid>,
    pub plate_number: String,
    pub vehicle_type: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub capacity: Decimal,
    #[serde(default)]
    pub vehicle_status: Option<String>,
    pub year: i32,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub last_maintenance_date: Option<NaiveDate>,
}

impl From<VehicleRecord> for VehicleInput {
    fn from(r: VehicleRecord) -> Self {
        VehicleInput {
            plate_number: r.plate_number,
            vehicle_type: r.vehicle_type,
            brand: blank_to_none(r.brand),
            model: blank_to_none(r.model),
            capacity: r.capacity,
            vehicle_status: blank_to_none(r.vehicle_status),
            year: r.year,
            fuel_type: blank_to_none(r.fuel_type),
            last_maintenance_date: r.last_maintenance_date,
        }
    }
}

impl From<Vehicle> for VehicleRecord {
    fn from(v: Vehicle) -> Self {
        VehicleRecord {
            id: Some(v.id),
            plate_number: v.plate_number,
            vehicle_type: v.vehicle_type,
            brand: v.brand,
            model: v.model,
            capacity: v.capacity,
            vehicle_status: Some(v.vehicle_status),
            year: v.year,
            fuel_type: v.fuel_type,
            last_maintenance_date: v.last_maintenance_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(skip_deserializing)]
    pub id: Option<Uuid>,
    pub description: String,
    #[serde(default)]
    pub delivery_status: String,
    #[serde(default)]
    pub vehicle_id: Option<Uuid>,
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    #[serde(default)]
    pub warehouse_id: Option<Uuid>,
    pub delivery_date: NaiveDate,
    pub delivery_start_time: NaiveTime,
    pub delivery_end_time: NaiveTime,
    #[serde(default)]
    pub kms_travelled: Decimal,
    pub expected_duration_minutes: i32,
    #[serde(default)]
    pub driver_notes: Option<String>,
    #[serde(default)]
    pub origin_name: Option<String>,
    #[serde(default)]
    pub origin_address: Option<String>,
    #[serde(default)]
    pub origin_contact: Option<String>,
    #[serde(default)]
    pub destination_name: Option<String>,
    #[serde(default)]
    pub destination_address: Option<String>,
    #[serde(default)]
    pub destination_contact: Option<String>,
}

impl RouteRecord {
    pub fn into_input(self) -> DomainResult<RouteInput> {
        Ok(RouteInput {
            description: self.description,
            delivery_status: RouteStatus::parse(&self.delivery_status)?,
            delivery_date: self.delivery_date,
            delivery_start_time: self.delivery_start_time,
            delivery_end_time: self.delivery_end_time,
            expected_duration_minutes: self.expected_duration_minutes,
            kms_travelled: self.kms_travelled,
            driver_notes: blank_to_none(self.driver_notes),
            driver_id: self.driver_id,
            vehicle_id: self.vehicle_id,
            warehouse_id: self.warehouse_id,
            origin: Stop {
                name: blank_to_none(self.origin_name),
                address: blank_to_none(self.origin_address),
                contact: blank_to_none(self.origin_contact),
            },
            destination: Stop {
                name: blank_to_none(self.destination_name),
                address: blank_to_none(self.destination_address),
                contact: blank_to_none(self.destination_contact),
            },
        })
    }
}

impl From<Route> for RouteRecord {
    fn from(r: Route) -> Self {
        RouteRecord {
            id: Some(r.id),
            description: r.description,
            delivery_status: r.delivery_status.as_str().to_string(),
            vehicle_id: r.vehicle_id,
            driver_id: r.driver_id,
            warehouse_id: r.warehouse_id,
            delivery_date: r.delivery_date,
            delivery_start_time: r.delivery_start_time,
            delivery_end_time: r.delivery_end_time,
            kms_travelled: r.kms_travelled,
            expected_duration_minutes: r.expected_duration_minutes,
            driver_notes: r.driver_notes,
            origin_name: r.origin.name,
            origin_address: r.origin.address,
            origin_contact: r.origin.contact,
            destination_name: r.destination.name,
            destination_address: r.destination.address,
            destination_contact: r.destination.contact,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecord {
    #[serde(skip_deserializing)]
    pub id: Option<Uuid>,
    pub tracking_number: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sender_name: String,
    pub sender_address: String,
    #[serde(default)]
    pub sender_phone: Option<String>,
    #[serde(default)]
    pub sender_email: Option<String>,
    pub recipient_name: String,
    pub recipient_address: String,
    #[serde(default)]
    pub recipient_phone: Option<String>,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub item_type: Option<String>,
    pub weight: Decimal,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub in_transition: bool,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub invoice_id: Option<Uuid>,
    #[serde(default)]
    pub driver_id: Option<Uuid>,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    #[serde(default)]
    pub route_id: Option<Uuid>,
}

impl DeliveryRecord {
    pub fn into_input(self) -> DomainResult<DeliveryInput> {
        Ok(DeliveryInput {
            tracking_number: self.tracking_number,
            description: blank_to_none(self.description),
            sender: Party {
                name: self.sender_name,
                address: self.sender_address,
                phone: blank_to_none(self.sender_phone),
                email: blank_to_none(self.sender_email),
            },
            recipient: Party {
                name: self.recipient_name,
                address: self.recipient_address,
                phone: blank_to_none(self.recipient_phone),
                email: blank_to_none(self.recipient_email),
            },
            item_type: blank_to_none(self.item_type),
            weight: self.weight,
            dimensions: blank_to_none(self.dimensions),
            status: DeliveryStatus::parse(&self.status)?,
            priority: blank_to_none(self.priority),
            registered_at: self.registered_at,
            in_transition: self.in_transition,
            destination: blank_to_none(self.destination),
            delivery_date: self.delivery_date,
            invoice_id: self.invoice_id,
            driver_id: self.driver_id,
            client_id: self.client_id,
            route_id: self.route_id,
        })
    }
}

impl From<Delivery> for DeliveryRecord {
    fn from(d: Delivery) -> Self {
        DeliveryRecord {
            id: Some(d.id),
            tracking_number: d.tracking_number,
            description: d.description,
            sender_name: d.sender.name,
            sender_address: d.sender.address,
            sender_phone: d.sender.phone,
            sender_email: d.sender.email,
            recipient_name: d.recipient.name,
            recipient_address: d.recipient.address,
            recipient_phone: d.recipient.phone,
            recipient_email: d.recipient.email,
            item_type: d.item_type,
            weight: d.weight,
            dimensions: d.dimensions,
            status: d.status.as_str().to_string(),
            priority: d.priority,
            registered_at: Some(d.registered_at),
            in_transition: d.in_transition,
            destination: d.destination,
            delivery_date: d.delivery_date,
            invoice_id: d.invoice_id,
            driver_id: d.driver_id,
            client_id: d.client_id,
            route_id: d.route_id,
        }
    }
}

/// Invoice header row. CSV carries only this; JSON nests the items, see
/// [`InvoiceDocument`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(skip_deserializing)]
    pub id: Option<Uuid>,
    #[serde(skip_deserializing)]
    pub id_invoice: Option<i64>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub invoice_status: Option<String>,
    pub invoice_type: String,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub invoice_datetime: Option<DateTime<Utc>>,
    pub cost: Decimal,
    #[serde(default)]
    pub paid: bool,
    pub payment_method: String,
    pub name: String,
    pub address: String,
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItemRecord {
    pub shipment_type: String,
    pub weight: Decimal,
    pub delivery_speed: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDocument {
    #[serde(flatten)]
    pub invoice: InvoiceRecord,
    #[serde(default)]
    pub items: Vec<InvoiceItemRecord>,
}

impl From<InvoiceRecord> for InvoiceDocument {
    fn from(invoice: InvoiceRecord) -> Self {
        InvoiceDocument {
            invoice,
            items: Vec::new(),
        }
    }
}

impl From<InvoiceDocument> for InvoiceInput {
    fn from(doc: InvoiceDocument) -> Self {
        let r = doc.invoice;
        InvoiceInput {
            user_id: r.user_id,
            invoice_status: blank_to_none(r.invoice_status),
            invoice_type: r.invoice_type,
            quantity: r.quantity,
            invoice_datetime: r.invoice_datetime,
            cost: r.cost,
            paid: r.paid,
            payment_method: r.payment_method,
            name: r.name,
            address: r.address,
            contact: r.contact,
            items: doc
                .items
                .into_iter()
                .map(|i| InvoiceItemInput {
                    shipment_type: i.shipment_type,
                    weight: i.weight,
                    delivery_speed: i.delivery_speed,
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    notes: blank_to_none(i.notes),
                })
                .collect(),
        }
    }
}

impl From<InvoiceItem> for InvoiceItemRecord {
    fn from(i: InvoiceItem) -> Self {
        InvoiceItemRecord {
            shipment_type: i.shipment_type,
            weight: i.weight,
            delivery_speed: i.delivery_speed,
            quantity: i.quantity,
            unit_price: i.unit_price,
            notes: i.notes,
        }
    }
}

impl From<Invoice> for InvoiceDocument {
    fn from(inv: Invoice) -> Self {
        InvoiceDocument {
            invoice: InvoiceRecord {
                id: Some(inv.id),
                id_invoice: Some(inv.id_invoice),
                user_id: inv.user_id,
                invoice_status: Some(inv.invoice_status),
                invoice_type: inv.invoice_type,
                quantity: inv.quantity,
                invoice_datetime: Some(inv.invoice_datetime),
                cost: inv.cost,
                paid: inv.paid,
                payment_method: inv.payment_method,
                name: inv.name,
                address: inv.address,
                contact: inv.contact,
            },
            items: inv.items.into_iter().map(InvoiceItemRecord::from).collect(),
        }
    }
}
