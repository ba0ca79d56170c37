//! Employee service.
//!
//! Owns the employee/user consistency rules: one employee per user, exactly
//! one specialization row matching the position, and the user's role always
//! mirroring that position.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, Employee, EmployeeInput, NotificationType, Position, UserRole};

use crate::infra::UnitOfWork;
use crate::notifications::NotificationDispatcher;

#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// Create (`existing = None`) or update an employee.
    async fn upsert_employee(
        &self,
        actor: &Actor,
        input: EmployeeInput,
        existing: Option<Uuid>,
    ) -> AppResult<Employee>;

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee>;

    async fn list_employees(&self) -> AppResult<Vec<Employee>>;

    /// Delete an employee that no route or delivery references; the user
    /// falls back to the `client` role.
    async fn delete_employee(&self, actor: &Actor, id: Uuid) -> AppResult<()>;
}

pub struct EmployeeManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<NotificationDispatcher>,
}

impl<U: UnitOfWork> EmployeeManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<NotificationDispatcher>) -> Self {
        Self { uow, notifier }
    }
}

fn other_position(position: Position) -> Position {
    match position {
        Position::Driver => Position::Staff,
        Position::Staff => Position::Driver,
    }
}

#[async_trait]
impl<U: UnitOfWork + 'static> EmployeeService for EmployeeManager<U> {
    #[instrument(skip(self, actor, input), fields(user_id = %input.user_id, position = %input.position()))]
    async fn upsert_employee(
        &self,
        actor: &Actor,
        input: EmployeeInput,
        existing: Option<Uuid>,
    ) -> AppResult<Employee> {
        let now = Utc::now();
        input.validate_rules(now.date_naive())?;

        let (employee, user_email) = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let user = ctx
                        .users()
                        .find_by_id(input.user_id)
                        .await?
                        .ok_or_not_found("User")?;

                    let previous = match existing {
                        Some(id) => {
                            let employee =
                                ctx.employees().find_by_id(id).await?.ok_or_not_found("Employee")?;
                            if employee.user_id != input.user_id {
                                return Err(AppError::validation(
                                    "An employee cannot be moved to another user",
                                ));
                            }
                            Some(employee)
                        }
                        None => {
                            if !user.role.can_become_employee() {
                                return Err(AppError::validation(format!(
                                    "Users with role '{}' cannot be registered as employees",
                                    user.role
                                )));
                            }
                            if ctx.employees().find_by_user(user.id).await?.is_some() {
                                return Err(AppError::conflict(format!(
                                    "User '{}' already has an employee record",
                                    user.username
                                )));
                            }
                            None
                        }
                    };

                    let position = input.position();
                    if let Some(prev) = previous.as_ref() {
                        if prev.position == Position::Driver && position != Position::Driver {
                            let routes = ctx.routes().count_by_driver(prev.id).await?;
                            let deliveries = ctx.deliveries().count_by_driver(prev.id).await?;
                            if routes + deliveries > 0 {
                                return Err(AppError::conflict(format!(
                                    "Driver is still assigned to {} route(s) and {} delivery(ies)",
                                    routes, deliveries
                                )));
                            }
                        }
                    }

                    let employee = Employee {
                        id: previous.as_ref().map(|e| e.id).unwrap_or_else(Uuid::new_v4),
                        user_id: user.id,
                        position,
                        schedule: input.schedule,
                        wage: input.wage,
                        hire_date: input.hire_date,
                        is_active: input.is_active,
                        specialization: Some(input.specialization),
                        created_at: previous.as_ref().map(|e| e.created_at).unwrap_or(now),
                        updated_at: now,
                    };

                    let employees = ctx.employees();
                    employees.save(&employee, previous.is_none()).await?;

                    let stale = employees
                        .delete_specialization(employee.id, other_position(position))
                        .await?;
                    if stale > 0 {
                        tracing::info!(employee_id = %employee.id, %position, "Stale specialization removed");
                    }
                    if let Some(spec) = &employee.specialization {
                        employees.upsert_specialization(employee.id, spec).await?;
                    }

                    if user.role != position.role() {
                        ctx.users().set_role(user.id, position.role()).await?;
                        tracing::info!(user_id = %user.id, role = %position.role(), "User role synchronized");
                    }

                    Ok((employee, user.email))
                })
            })
            .await?;

        self.notifier.record_all(
            NotificationType::EmployeeSaved,
            [actor.contact.as_str(), user_email.as_str()],
            "Employee saved",
            &format!("Employee record saved with position {}", employee.position),
        );

        Ok(employee)
    }

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee> {
        self.uow
            .reader()
            .employees()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Employee")
    }

    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.uow.reader().employees().list().await
    }

    #[instrument(skip(self, actor))]
    async fn delete_employee(&self, actor: &Actor, id: Uuid) -> AppResult<()> {
        let user_email = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let employee =
                        ctx.employees().find_by_id(id).await?.ok_or_not_found("Employee")?;

                    let routes = ctx.routes().count_by_driver(id).await?;
                    let deliveries = ctx.deliveries().count_by_driver(id).await?;
                    if routes + deliveries > 0 {
                        return Err(AppError::conflict(format!(
                            "Employee is still assigned to {} route(s) and {} delivery(ies)",
                            routes, deliveries
                        )));
                    }

                    ctx.employees().delete(id).await?;
                    let user = ctx.users().set_role(employee.user_id, UserRole::Client).await?;
                    Ok(user.email)
                })
            })
            .await?;

        tracing::info!(employee_id = %id, "Employee deleted");
        self.notifier.record_all(
            NotificationType::EmployeeDeleted,
            [actor.contact.as_str(), user_email.as_str()],
            "Employee deleted",
            "Employee record removed",
        );
        Ok(())
    }
}
