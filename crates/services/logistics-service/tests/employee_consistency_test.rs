//! Employee / user consistency against a real (SQLite) schema.

mod support;

use chrono::Duration;
use uuid::Uuid;

use common::AppError;
use domain::{DriverInfo, EmployeeSpecialization, NotificationType, Position, UserRole};
use logistics_service_lib::infra::{Persistence, UnitOfWork};
use logistics_service_lib::service::ServiceContainer;

use support::{driver_spec, employee_input, route_input, setup, staff_spec, today};

#[tokio::test]
async fn creating_a_driver_syncs_the_user_role() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let user = app.register("joao", UserRole::Staff).await;

    let employee = app
        .services
        .employees()
        .upsert_employee(&admin, employee_input(user.id, driver_spec()), None)
        .await
        .unwrap();

    assert_eq!(employee.position, Position::Driver);
    let user = app.services.users().get_user(user.id).await.unwrap();
    assert_eq!(user.role, UserRole::Driver);

    let stored = app.services.employees().get_employee(employee.id).await.unwrap();
    assert!(stored.driver_info().is_some());
    assert!(stored.staff_info().is_none());
}

#[tokio::test]
async fn changing_position_swaps_the_specialization() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let driver = app.driver(&admin, "rita").await;

    let updated = app
        .services
        .employees()
        .upsert_employee(&admin, employee_input(driver.user_id, staff_spec()), Some(driver.id))
        .await
        .unwrap();
    assert_eq!(updated.id, driver.id);
    assert_eq!(updated.position, Position::Staff);

    let user = app.services.users().get_user(driver.user_id).await.unwrap();
    assert_eq!(user.role, UserRole::Staff);

    let persistence = Persistence::new(app.db.get_connection());
    let employees = persistence.reader().employees();
    assert_eq!(employees.count_specializations(driver.id).await.unwrap(), 1);
    let stored = employees.find_by_id(driver.id).await.unwrap().unwrap();
    assert!(stored.staff_info().is_some());
    assert!(stored.driver_info().is_none());
}

#[tokio::test]
async fn booked_driver_cannot_be_moved_to_staff() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let driver = app.driver(&admin, "hugo").await;
    let vehicle = app.vehicle(&admin, "GH-12-IJ").await;

    let route = app
        .services
        .routes()
        .upsert_route(&admin, route_input(today(), Some(driver.id), Some(vehicle.id)), None)
        .await
        .unwrap();

    let result = app
        .services
        .employees()
        .upsert_employee(&admin, employee_input(driver.user_id, staff_spec()), Some(driver.id))
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    let stored = app.services.employees().get_employee(driver.id).await.unwrap();
    assert_eq!(stored.position, Position::Driver);
    assert!(stored.driver_info().is_some());
    let user = app.services.users().get_user(driver.user_id).await.unwrap();
    assert_eq!(user.role, UserRole::Driver);

    // Once unassigned the position change goes through.
    app.services.routes().delete_route(&admin, route.id).await.unwrap();
    let moved = app
        .services
        .employees()
        .upsert_employee(&admin, employee_input(driver.user_id, staff_spec()), Some(driver.id))
        .await
        .unwrap();
    assert_eq!(moved.position, Position::Staff);
}

#[tokio::test]
async fn admins_and_clients_cannot_become_employees() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let client = app.register("cliente", UserRole::Client).await;

    for user_id in [admin.user_id, client.id] {
        let result = app
            .services
            .employees()
            .upsert_employee(&admin, employee_input(user_id, staff_spec()), None)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    let client = app.services.users().get_user(client.id).await.unwrap();
    assert_eq!(client.role, UserRole::Client);
}

#[tokio::test]
async fn second_employee_for_same_user_conflicts() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let driver = app.driver(&admin, "pedro").await;

    let result = app
        .services
        .employees()
        .upsert_employee(&admin, employee_input(driver.user_id, staff_spec()), None)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    let user = app.services.users().get_user(driver.user_id).await.unwrap();
    assert_eq!(user.role, UserRole::Driver);
}

#[tokio::test]
async fn license_must_expire_after_today() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let user = app.register("ines", UserRole::Driver).await;

    let spec = EmployeeSpecialization::Driver(DriverInfo {
        license_number: "L-9".into(),
        license_category: "B".into(),
        license_expiry_date: today(),
        driving_experience_years: 1,
        driver_status: "Available".into(),
    });
    let result = app
        .services
        .employees()
        .upsert_employee(&admin, employee_input(user.id, spec), None)
        .await;
    assert!(result.unwrap_err().is_validation());

    let mut input = employee_input(user.id, driver_spec());
    if let EmployeeSpecialization::Driver(info) = &mut input.specialization {
        info.license_expiry_date = today() + Duration::days(1);
    }
    assert!(app
        .services
        .employees()
        .upsert_employee(&admin, input, None)
        .await
        .is_ok());
}

#[tokio::test]
async fn unknown_employee_update_is_not_found() {
    let (app, _) = setup().await;
    let admin = app.admin().await;
    let user = app.register("nuno", UserRole::Staff).await;

    let result = app
        .services
        .employees()
        .upsert_employee(&admin, employee_input(user.id, staff_spec()), Some(Uuid::new_v4()))
        .await;
    assert!(result.unwrap_err().is_not_found());
}

#[tokio::test]
async fn delete_is_protected_while_routes_reference_the_driver() {
    let (app, store) = setup().await;
    let admin = app.admin().await;
    let driver = app.driver(&admin, "carla").await;
    let vehicle = app.vehicle(&admin, "AA-00-01").await;

    let route = app
        .services
        .routes()
        .upsert_route(&admin, route_input(today(), Some(driver.id), Some(vehicle.id)), None)
        .await
        .unwrap();

    let result = app.services.employees().delete_employee(&admin, driver.id).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    app.services.routes().delete_route(&admin, route.id).await.unwrap();
    app.services
        .employees()
        .delete_employee(&admin, driver.id)
        .await
        .unwrap();

    let user = app.services.users().get_user(driver.user_id).await.unwrap();
    assert_eq!(user.role, UserRole::Client);
    assert!(app
        .services
        .employees()
        .get_employee(driver.id)
        .await
        .unwrap_err()
        .is_not_found());

    app.notifier.shutdown().await;
    let deleted = store
        .all()
        .await
        .into_iter()
        .filter(|n| n.notification_type == NotificationType::EmployeeDeleted)
        .count();
    assert_eq!(deleted, 2);
}
