//! Bulk import and export.

mod support;

use chrono::NaiveDate;

use domain::{NotificationType, RouteStatus};
use logistics_service_lib::service::ServiceContainer;
use logistics_service_lib::transfer::{self, EntityKind, Format};

use support::{route_input, setup};

#[tokio::test]
async fn json_import_ignores_ids_and_accepts_legacy_warehouse_fields() {
    let (app, store) = setup().await;
    let admin = app.admin().await;

    let json = r#"[
        {"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "name": "North hub",
         "address": "Rua A 1", "po_schedule_open": "08:00:00",
         "po_schedule_close": "17:00:00", "maximum_storage_capacity": 500},
        {"name": "South hub", "location": "Rua B 2", "contact": "912000000",
         "po_schedule_open": "07:30:00", "po_schedule_close": "19:00:00", "capacity": 250},
        {"name": "Broken hub", "address": "Rua C 3",
         "po_schedule_open": "18:00:00", "po_schedule_close": "09:00:00", "capacity": 10}
    ]"#;

    let report = transfer::import(
        &app.services,
        &admin,
        EntityKind::Warehouses,
        Format::Json,
        json.as_bytes(),
    )
    .await
    .unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 3);

    let warehouses = app.services.fleet().list_warehouses().await.unwrap();
    assert_eq!(warehouses.len(), 2);
    assert!(warehouses
        .iter()
        .all(|w| w.id.to_string() != "7c9e6679-7425-40de-944b-e07fc1f90ae7"));
    let south = warehouses.iter().find(|w| w.name == "South hub").unwrap();
    assert_eq!(south.address, "Rua B 2");
    assert_eq!(south.maximum_storage_capacity, 250);

    app.notifier.shutdown().await;
    let imported = store
        .all()
        .await
        .into_iter()
        .find(|n| n.notification_type == NotificationType::DataImported)
        .unwrap();
    assert_eq!(imported.status, "sent");
    assert_eq!(imported.recipient_contact, admin.contact);
}

#[tokio::test]
async fn csv_import_reports_bad_rows_without_aborting() {
    let (app, _) = setup().await;
    let admin = app.admin().await;

    let csv = "\
id,plate_number,vehicle_type,brand,model,capacity,vehicle_status,year,fuel_type,last_maintenance_date
1,aa-01-bb,Van,Renault,Master,1200,,2020,Diesel,2025-01-10
2,CC-02-DD,Truck,Volvo,FH,0,,2019,Diesel,
3,EE-03-FF,Van,Ford,Transit,900,Maintenance,2022,,
";

    let report = transfer::import(
        &app.services,
        &admin,
        EntityKind::Vehicles,
        Format::Csv,
        csv.as_bytes(),
    )
    .await
    .unwrap();

    assert_eq!(report.imported, 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 2);
    assert!(!report.is_clean());

    let vehicles = app.services.fleet().list_vehicles().await.unwrap();
    let first = vehicles.iter().find(|v| v.plate_number == "AA-01-BB").unwrap();
    assert_eq!(first.vehicle_status, "Active");
    assert_eq!(
        first.last_maintenance_date,
        NaiveDate::from_ymd_opt(2025, 1, 10)
    );
}

#[tokio::test]
async fn csv_export_writes_ids_and_iso_dates() {
    let (app, _) = setup().await;
    let admin = app.admin().await;

    let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let route = app
        .services
        .routes()
        .upsert_route(&admin, route_input(date, None, None), None)
        .await
        .unwrap();

    let mut out = Vec::new();
    let count = transfer::export(&app.services, &admin, EntityKind::Routes, Format::Csv, &mut out)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,description,delivery_status"));
    let row = lines.next().unwrap();
    assert!(row.starts_with(&route.id.to_string()));
    assert!(row.contains("2025-06-01"));
    assert!(row.contains("08:00:00"));
    assert!(row.contains(RouteStatus::Pending.as_str()));
}

#[tokio::test]
async fn exported_routes_import_as_new_records() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let date = NaiveDate::from_ymd_opt(2025, 7, 15).unwrap();

    app.services
        .routes()
        .upsert_route(&admin, route_input(date, None, None), None)
        .await
        .unwrap();

    let mut out = Vec::new();
    transfer::export(&app.services, &admin, EntityKind::Routes, Format::Json, &mut out)
        .await
        .unwrap();

    let report = transfer::import(
        &app.services,
        &admin,
        EntityKind::Routes,
        Format::Json,
        out.as_slice(),
    )
    .await
    .unwrap();
    assert_eq!(report.imported, 1);

    let routes = app.services.routes().list_routes(&admin).await.unwrap();
    assert_eq!(routes.len(), 2);
    assert_ne!(routes[0].id, routes[1].id);
    assert!(routes.iter().all(|r| r.delivery_date == date));
}
