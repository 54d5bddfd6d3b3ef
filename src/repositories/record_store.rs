//! Record Store
//!
//! Única puerta de acceso a la persistencia. Los servicios dependen del trait
//! y no de `PgPool`, de modo que los tests pueden usar `InMemoryRecordStore`.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::attachment_repository::AttachmentRepository;
use super::employee_repository::EmployeeRepository;
use super::mission_repository::MissionRepository;
use super::vehicle_repository::VehicleRepository;
use crate::models::{
    Attachment, DriverSummary, Employee, Mission, MissionRecord, NewAttachment, NewEmployee,
    Vehicle,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait RecordStore: Send + Sync {
    // Employees
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;
    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>>;
    async fn find_employee_by_badge(&self, badge_number: &str) -> AppResult<Option<Employee>>;
    async fn create_employee(&self, employee: NewEmployee) -> AppResult<Employee>;
    async fn update_employee(&self, id: i64, employee: NewEmployee) -> AppResult<Option<Employee>>;
    async fn delete_employee(&self, id: i64) -> AppResult<bool>;
    async fn employee_is_referenced(&self, id: i64) -> AppResult<bool>;
    async fn list_drivers(&self) -> AppResult<Vec<Employee>>;
    async fn find_driver_by_name(&self, last_name: &str, first_name: &str) -> AppResult<Option<Employee>>;
    async fn available_drivers(&self, today: NaiveDate) -> AppResult<Vec<DriverSummary>>;

    // Vehicles
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;
    async fn find_vehicle(&self, matricule: i32) -> AppResult<Option<Vehicle>>;
    async fn find_vehicle_by_make_model(&self, make: &str, model: &str) -> AppResult<Option<Vehicle>>;
    async fn create_vehicle(&self, vehicle: Vehicle) -> AppResult<Vehicle>;
    async fn update_vehicle(&self, matricule: i32, make: String, model: String) -> AppResult<Option<Vehicle>>;
    async fn delete_vehicle(&self, matricule: i32) -> AppResult<bool>;
    async fn vehicle_is_referenced(&self, matricule: i32) -> AppResult<bool>;
    async fn available_vehicles(&self, today: NaiveDate) -> AppResult<Vec<Vehicle>>;

    // Missions
    async fn list_missions(&self) -> AppResult<Vec<Mission>>;
    async fn find_mission(&self, id: i64) -> AppResult<Option<Mission>>;
    async fn create_mission(&self, record: MissionRecord) -> AppResult<Mission>;
    async fn update_mission(&self, id: i64, record: MissionRecord) -> AppResult<Option<Mission>>;
    async fn delete_mission(&self, id: i64) -> AppResult<bool>;
    async fn find_overlapping_missions(
        &self,
        vehicle_matricule: Option<i32>,
        driver_id: Option<i64>,
        departure: NaiveDate,
        return_date: NaiveDate,
        exclude_id: Option<i64>,
    ) -> AppResult<Vec<Mission>>;

    // Attachments
    async fn create_attachment(&self, attachment: NewAttachment) -> AppResult<Attachment>;
    async fn attachments_for_mission(&self, mission_id: i64) -> AppResult<Vec<Attachment>>;
    async fn delete_attachment(&self, id: i64) -> AppResult<bool>;
}

/// Implementación PostgreSQL, compone los repositorios por tabla
pub struct PgRecordStore {
    employees: EmployeeRepository,
    vehicles: VehicleRepository,
    missions: MissionRepository,
    attachments: AttachmentRepository,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            employees: EmployeeRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            missions: MissionRepository::new(pool.clone()),
            attachments: AttachmentRepository::new(pool),
        }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.employees.list().await
    }

    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        self.employees.find_by_id(id).await
    }

    async fn find_employee_by_badge(&self, badge_number: &str) -> AppResult<Option<Employee>> {
        self.employees.find_by_badge(badge_number).await
    }

    async fn create_employee(&self, employee: NewEmployee) -> AppResult<Employee> {
        self.employees.create(employee).await
    }

    async fn update_employee(&self, id: i64, employee: NewEmployee) -> AppResult<Option<Employee>> {
        self.employees.update(id, employee).await
    }

    async fn delete_employee(&self, id: i64) -> AppResult<bool> {
        self.employees.delete(id).await
    }

    async fn employee_is_referenced(&self, id: i64) -> AppResult<bool> {
        self.employees.is_referenced(id).await
    }

    async fn list_drivers(&self) -> AppResult<Vec<Employee>> {
        self.employees.list_drivers().await
    }

    async fn find_driver_by_name(&self, last_name: &str, first_name: &str) -> AppResult<Option<Employee>> {
        self.employees.find_driver_by_name(last_name, first_name).await
    }

    async fn available_drivers(&self, today: NaiveDate) -> AppResult<Vec<DriverSummary>> {
        self.employees.available_drivers(today).await
    }

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        self.vehicles.list().await
    }

    async fn find_vehicle(&self, matricule: i32) -> AppResult<Option<Vehicle>> {
        self.vehicles.find_by_matricule(matricule).await
    }

    async fn find_vehicle_by_make_model(&self, make: &str, model: &str) -> AppResult<Option<Vehicle>> {
        self.vehicles.find_by_make_model(make, model).await
    }

    async fn create_vehicle(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        self.vehicles.create(vehicle).await
    }

    async fn update_vehicle(&self, matricule: i32, make: String, model: String) -> AppResult<Option<Vehicle>> {
        self.vehicles.update(matricule, make, model).await
    }

    async fn delete_vehicle(&self, matricule: i32) -> AppResult<bool> {
        self.vehicles.delete(matricule).await
    }

    async fn vehicle_is_referenced(&self, matricule: i32) -> AppResult<bool> {
        self.vehicles.is_referenced(matricule).await
    }

    async fn available_vehicles(&self, today: NaiveDate) -> AppResult<Vec<Vehicle>> {
        self.vehicles.available(today).await
    }

    async fn list_missions(&self) -> AppResult<Vec<Mission>> {
        self.missions.list().await
    }

    async fn find_mission(&self, id: i64) -> AppResult<Option<Mission>> {
        self.missions.find_by_id(id).await
    }

    async fn create_mission(&self, record: MissionRecord) -> AppResult<Mission> {
        self.missions.create(record).await
    }

    async fn update_mission(&self, id: i64, record: MissionRecord) -> AppResult<Option<Mission>> {
        self.missions.update(id, record).await
    }

    async fn delete_mission(&self, id: i64) -> AppResult<bool> {
        self.missions.delete(id).await
    }

    async fn find_overlapping_missions(
        &self,
        vehicle_matricule: Option<i32>,
        driver_id: Option<i64>,
        departure: NaiveDate,
        return_date: NaiveDate,
        exclude_id: Option<i64>,
    ) -> AppResult<Vec<Mission>> {
        self.missions
            .find_overlapping(vehicle_matricule, driver_id, departure, return_date, exclude_id)
            .await
    }

    async fn create_attachment(&self, attachment: NewAttachment) -> AppResult<Attachment> {
        self.attachments.create(attachment).await
    }

    async fn attachments_for_mission(&self, mission_id: i64) -> AppResult<Vec<Attachment>> {
        self.attachments.find_by_mission(mission_id).await
    }

    async fn delete_attachment(&self, id: i64) -> AppResult<bool> {
        self.attachments.delete(id).await
    }
}
