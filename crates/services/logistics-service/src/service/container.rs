//! Service container - one place to reach every application service.

use std::sync::Arc;

use super::{
    DeliveryManager, DeliveryService, EmployeeManager, EmployeeService, FleetManager,
    FleetService, InvoiceManager, InvoiceService, RouteManager, RouteService, UserManager,
    UserService,
};
use crate::infra::Persistence;
use crate::notifications::NotificationDispatcher;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn users(&self) -> Arc<dyn UserService>;

    fn employees(&self) -> Arc<dyn EmployeeService>;

    fn fleet(&self) -> Arc<dyn FleetService>;

    fn invoices(&self) -> Arc<dyn InvoiceService>;

    fn routes(&self) -> Arc<dyn RouteService>;

    fn deliveries(&self) -> Arc<dyn DeliveryService>;

    fn notifications(&self) -> Arc<NotificationDispatcher>;
}

pub struct Services {
    user_service: Arc<dyn UserService>,
    employee_service: Arc<dyn EmployeeService>,
    fleet_service: Arc<dyn FleetService>,
    invoice_service: Arc<dyn InvoiceService>,
    route_service: Arc<dyn RouteService>,
    delivery_service: Arc<dyn DeliveryService>,
    notifier: Arc<NotificationDispatcher>,
}

impl Services {
    /// Wire every service onto one database connection and one dispatcher.
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        notifier: Arc<NotificationDispatcher>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            user_service: Arc::new(UserManager::new(uow.clone())),
            employee_service: Arc::new(EmployeeManager::new(uow.clone(), notifier.clone())),
            fleet_service: Arc::new(FleetManager::new(uow.clone(), notifier.clone())),
            invoice_service: Arc::new(InvoiceManager::new(uow.clone(), notifier.clone())),
            route_service: Arc::new(RouteManager::new(uow.clone(), notifier.clone())),
            delivery_service: Arc::new(DeliveryManager::new(uow, notifier.clone())),
            notifier,
        }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeService> {
        self.employee_service.clone()
    }

    fn fleet(&self) -> Arc<dyn FleetService> {
        self.fleet_service.clone()
    }

    fn invoices(&self) -> Arc<dyn InvoiceService> {
        self.invoice_service.clone()
    }

    fn routes(&self) -> Arc<dyn RouteService> {
        self.route_service.clone()
    }

    fn deliveries(&self) -> Arc<dyn DeliveryService> {
        self.delivery_service.clone()
    }

    fn notifications(&self) -> Arc<NotificationDispatcher> {
        self.notifier.clone()
    }
}
