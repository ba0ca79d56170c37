//! Employee repository. An employee row is always read together with its
//! specialization row.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::{employee, employee_driver, employee_staff};
use common::{AppError, AppResult};
use domain::{Employee, EmployeeSpecialization, Position};

pub struct EmployeeRepo<'a, C> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> EmployeeRepo<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Employee>> {
        match employee::Entity::find_by_id(id).one(self.conn).await? {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_user(&self, user_id: Uuid) -> AppResult<Option<Employee>> {
        let model = employee::Entity::find()
            .filter(employee::Column::UserId.eq(user_id))
            .one(self.conn)
            .await?;

        match model {
            Some(model) => Ok(Some(self.hydrate(model).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Employee>> {
        let models = employee::Entity::find()
            .order_by_asc(employee::Column::HireDate)
            .all(self.conn)
            .await?;

        let mut employees = Vec::with_capacity(models.len());
        for model in models {
            employees.push(self.hydrate(model).await?);
        }
        Ok(employees)
    }

    /// Insert or update the employee row (not its specialization).
    pub async fn save(&self, employee: &Employee, is_new: bool) -> AppResult<()> {
        let active = employee::ActiveModel {
            id: Set(employee.id),
            user_id: Set(employee.user_id),
            position: Set(employee.position.as_str().to_string()),
            schedule: Set(employee.schedule.clone()),
            wage: Set(employee.wage),
            hire_date: Set(employee.hire_date),
            is_active: Set(employee.is_active),
            created_at: Set(employee.created_at),
            updated_at: Set(employee.updated_at),
        };

        if is_new {
            active.insert(self.conn).await?;
        } else {
            active.update(self.conn).await?;
        }
        Ok(())
    }

    /// Remove the specialization row of the position the employee no longer holds.
    pub async fn delete_specialization(&self, employee_id: Uuid, position: Position) -> AppResult<u64> {
        let result = match position {
            Position::Driver => {
                employee_driver::Entity::delete_many()
                    .filter(employee_driver::Column::EmployeeId.eq(employee_id))
                    .exec(self.conn)
                    .await?
            }
            Position::Staff => {
                employee_staff::Entity::delete_many()
                    .filter(employee_staff::Column::EmployeeId.eq(employee_id))
                    .exec(self.conn)
                    .await?
            }
        };
        Ok(result.rows_affected)
    }

    /// Create or overwrite the specialization row for the current position.
    pub async fn upsert_specialization(
        &self,
        employee_id: Uuid,
        specialization: &EmployeeSpecialization,
    ) -> AppResult<()> {
        match specialization {
            EmployeeSpecialization::Driver(info) => {
                let existing = employee_driver::Entity::find()
                    .filter(employee_driver::Column::EmployeeId.eq(employee_id))
                    .one(self.conn)
                    .await?;

                let is_new = existing.is_none();
                let mut active: employee_driver::ActiveModel = match existing {
                    Some(row) => row.into(),
                    None => employee_driver::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        employee_id: Set(employee_id),
                        ..Default::default()
                    },
                };
                active.license_number = Set(info.license_number.clone());
                active.license_category = Set(info.license_category.clone());
                active.license_expiry_date = Set(info.license_expiry_date);
                active.driving_experience_years = Set(info.driving_experience_years);
                active.driver_status = Set(info.driver_status.clone());

                if is_new {
                    active.insert(self.conn).await?;
                } else {
                    active.update(self.conn).await?;
                }
            }
            EmployeeSpecialization::Staff(info) => {
                let existing = employee_staff::Entity::find()
                    .filter(employee_staff::Column::EmployeeId.eq(employee_id))
                    .one(self.conn)
                    .await?;

                let is_new = existing.is_none();
                let mut active: employee_staff::ActiveModel = match existing {
                    Some(row) => row.into(),
                    None => employee_staff::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        employee_id: Set(employee_id),
                        ..Default::default()
                    },
                };
                active.department = Set(info.department.clone());

                if is_new {
                    active.insert(self.conn).await?;
                } else {
                    active.update(self.conn).await?;
                }
            }
        }
        Ok(())
    }

    /// Delete the employee; specialization rows cascade.
    pub async fn delete(&self, id: Uuid) -> AppResult<u64> {
        employee_driver::Entity::delete_many()
            .filter(employee_driver::Column::EmployeeId.eq(id))
            .exec(self.conn)
            .await?;
        employee_staff::Entity::delete_many()
            .filter(employee_staff::Column::EmployeeId.eq(id))
            .exec(self.conn)
            .await?;

        let result = employee::Entity::delete_by_id(id).exec(self.conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn count_specializations(&self, employee_id: Uuid) -> AppResult<u64> {
        let drivers = employee_driver::Entity::find()
            .filter(employee_driver::Column::EmployeeId.eq(employee_id))
            .count(self.conn)
            .await?;
        let staff = employee_staff::Entity::find()
            .filter(employee_staff::Column::EmployeeId.eq(employee_id))
            .count(self.conn)
            .await?;
        Ok(drivers + staff)
    }

    async fn hydrate(&self, model: employee::Model) -> AppResult<Employee> {
        let position = Position::parse(&model.position).map_err(AppError::from)?;

        let specialization = match position {
            Position::Driver => employee_driver::Entity::find()
                .filter(employee_driver::Column::EmployeeId.eq(model.id))
                .one(self.conn)
                .await?
                .map(|row| EmployeeSpecialization::Driver(row.into())),
            Position::Staff => employee_staff::Entity::find()
                .filter(employee_staff::Column::EmployeeId.eq(model.id))
                .one(self.conn)
                .await?
                .map(|row| EmployeeSpecialization::Staff(row.into())),
        };

        Ok(Employee {
            id: model.id,
            user_id: model.user_id,
            position,
            schedule: model.schedule,
            wage: model.wage,
            hire_date: model.hire_date,
            is_active: model.is_active,
            specialization,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
