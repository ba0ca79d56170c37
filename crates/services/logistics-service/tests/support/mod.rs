//! Shared fixtures: an in-memory SQLite database with the full schema and a
//! service container on top of it.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal_macros::dec;
use uuid::Uuid;

use domain::{
    Actor, DeliveryInput, DeliveryStatus, DriverInfo, Employee, EmployeeInput,
    EmployeeSpecialization, Party, RouteInput, RouteStatus, StaffInfo, Stop, User, UserInput,
    UserRole, Vehicle, VehicleInput,
};
use logistics_service_lib::infra::Database;
use logistics_service_lib::notifications::{
    InMemoryNotificationStore, NotificationDispatcher, NotificationStore,
};
use logistics_service_lib::service::{ServiceContainer, Services};

pub struct TestApp {
    pub db: Database,
    pub services: Services,
    pub notifier: Arc<NotificationDispatcher>,
}

pub async fn setup() -> (TestApp, Arc<InMemoryNotificationStore>) {
    let store = Arc::new(InMemoryNotificationStore::new());
    let app = setup_with_store(store.clone()).await;
    (app, store)
}

pub async fn setup_with_store(store: Arc<dyn NotificationStore>) -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    let notifier = Arc::new(NotificationDispatcher::start(store, 64));
    let services = Services::from_connection(db.get_connection(), notifier.clone());
    TestApp {
        db,
        services,
        notifier,
    }
}

impl TestApp {
    pub async fn register(&self, username: &str, role: UserRole) -> User {
        self.services
            .users()
            .register_user(UserInput {
                username: username.to_string(),
                full_name: format!("{} Test", username),
                email: format!("{}@example.com", username),
                contact: Some("912345678".to_string()),
                address: None,
                tax_id: None,
                role: Some(role),
            })
            .await
            .expect("register user")
    }

    pub async fn admin(&self) -> Actor {
        let user = self.register("admin", UserRole::Admin).await;
        Actor::new(user.id, user.role, user.email)
    }

    pub async fn actor(&self, user_id: Uuid) -> Actor {
        self.services
            .users()
            .actor_for(user_id)
            .await
            .expect("actor")
    }

    pub async fn driver(&self, actor: &Actor, username: &str) -> Employee {
        let user = self.register(username, UserRole::Driver).await;
        self.services
            .employees()
            .upsert_employee(actor, employee_input(user.id, driver_spec()), None)
            .await
            .expect("driver employee")
    }

    pub async fn vehicle(&self, actor: &Actor, plate: &str) -> Vehicle {
        self.services
            .fleet()
            .upsert_vehicle(actor, vehicle_input(plate), None)
            .await
            .expect("vehicle")
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn driver_spec() -> EmployeeSpecialization {
    EmployeeSpecialization::Driver(DriverInfo {
        license_number: "L-0001".into(),
        license_category: "C".into(),
        license_expiry_date: today() + Duration::days(365),
        driving_experience_years: 5,
        driver_status: "Available".into(),
    })
}

pub fn staff_spec() -> EmployeeSpecialization {
    EmployeeSpecialization::Staff(StaffInfo {
        department: "Sorting".into(),
    })
}

pub fn employee_input(user_id: Uuid, specialization: EmployeeSpecialization) -> EmployeeInput {
    EmployeeInput {
        user_id,
        schedule: Some("Mon-Fri 08:00-17:00".into()),
        wage: dec!(1250.00),
        hire_date: NaiveDate::from_ymd_opt(2024, 3, 1).expect("date"),
        is_active: true,
        specialization,
    }
}

pub fn vehicle_input(plate: &str) -> VehicleInput {
    VehicleInput {
        plate_number: plate.into(),
        vehicle_type: "Van".into(),
        brand: Some("Renault".into()),
        model: Some("Master".into()),
        capacity: dec!(1500),
        vehicle_status: None,
        year: 2021,
        fuel_type: Some("Diesel".into()),
        last_maintenance_date: None,
    }
}

pub fn route_input(date: NaiveDate, driver: Option<Uuid>, vehicle: Option<Uuid>) -> RouteInput {
    RouteInput {
        description: "Lisbon loop".into(),
        delivery_status: RouteStatus::Pending,
        delivery_date: date,
        delivery_start_time: NaiveTime::from_hms_opt(8, 0, 0).expect("time"),
        delivery_end_time: NaiveTime::from_hms_opt(12, 0, 0).expect("time"),
        expected_duration_minutes: 240,
        kms_travelled: dec!(0),
        driver_notes: None,
        driver_id: driver,
        vehicle_id: vehicle,
        warehouse_id: None,
        origin: Stop {
            name: Some("North hub".into()),
            address: Some("Rua A 1".into()),
            contact: None,
        },
        destination: Stop::default(),
    }
}

pub fn party(name: &str) -> Party {
    Party {
        name: name.into(),
        address: "Avenida B 2".into(),
        phone: None,
        email: None,
    }
}

pub fn delivery_input(tracking: &str, route_id: Option<Uuid>) -> DeliveryInput {
    DeliveryInput {
        tracking_number: tracking.into(),
        description: Some("Books".into()),
        sender: party("Sender"),
        recipient: party("Recipient"),
        item_type: Some("Parcel".into()),
        weight: dec!(2.5),
        dimensions: None,
        status: DeliveryStatus::Registered,
        priority: None,
        registered_at: None,
        in_transition: false,
        destination: None,
        delivery_date: None,
        invoice_id: None,
        driver_id: None,
        client_id: None,
        route_id,
    }
}
