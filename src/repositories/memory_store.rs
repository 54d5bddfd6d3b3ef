//! Record Store en memoria
//!
//! Reproduce la semántica del esquema PostgreSQL (unicidad del matricule,
//! claves foráneas RESTRICT, borrado en cascada de adjuntos, orden de las
//! consultas) sin necesidad de una base de datos.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::cmp::Reverse;
use tokio::sync::RwLock;

use super::record_store::RecordStore;
use crate::models::employee::is_driver_department;
use crate::models::{
    Attachment, DriverSummary, Employee, Mission, MissionRecord, NewAttachment, NewEmployee,
    Vehicle,
};
use crate::utils::errors::{conflict_error, AppError, AppResult};

#[derive(Default)]
struct Tables {
    employees: Vec<Employee>,
    vehicles: Vec<Vehicle>,
    missions: Vec<Mission>,
    attachments: Vec<Attachment>,
    next_employee_id: i64,
    next_mission_id: i64,
    next_attachment_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn check_mission_references(&self, record: &MissionRecord) -> AppResult<()> {
        let employee_exists = |id: i64| self.employees.iter().any(|e| e.id == id);

        if !employee_exists(record.requester_id) {
            return Err(AppError::Conflict(format!(
                "requester {} does not exist", record.requester_id
            )));
        }
        if let Some(driver_id) = record.driver_id {
            if !employee_exists(driver_id) {
                return Err(AppError::Conflict(format!("driver {} does not exist", driver_id)));
            }
        }
        if let Some(matricule) = record.vehicle_matricule {
            if !self.vehicles.iter().any(|v| v.matricule == matricule) {
                return Err(AppError::Conflict(format!("vehicle {} does not exist", matricule)));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<Tables>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn by_name(a: &Employee, b: &Employee) -> std::cmp::Ordering {
    (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        let mut employees = tables.employees.clone();
        employees.sort_by(by_name);
        Ok(employees)
    }

    async fn find_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn find_employee_by_badge(&self, badge_number: &str) -> AppResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.badge_number == badge_number).cloned())
    }

    async fn create_employee(&self, employee: NewEmployee) -> AppResult<Employee> {
        let mut tables = self.tables.write().await;
        if tables.employees.iter().any(|e| e.badge_number == employee.badge_number) {
            return Err(conflict_error("Employee", "badge_number", &employee.badge_number));
        }
        let id = Tables::next_id(&mut tables.next_employee_id);
        let created = employee.into_employee(id);
        tables.employees.push(created.clone());
        Ok(created)
    }

    async fn update_employee(&self, id: i64, employee: NewEmployee) -> AppResult<Option<Employee>> {
        let mut tables = self.tables.write().await;
        if tables
            .employees
            .iter()
            .any(|e| e.id != id && e.badge_number == employee.badge_number)
        {
            return Err(conflict_error("Employee", "badge_number", &employee.badge_number));
        }
        let Some(slot) = tables.employees.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        *slot = employee.into_employee(id);
        Ok(Some(slot.clone()))
    }

    async fn delete_employee(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .missions
            .iter()
            .any(|m| m.requester_id == id || m.driver_id == Some(id))
        {
            return Err(AppError::Conflict(format!(
                "Error deleting employee: employee {} is still referenced by a mission", id
            )));
        }
        let before = tables.employees.len();
        tables.employees.retain(|e| e.id != id);
        Ok(tables.employees.len() < before)
    }

    async fn employee_is_referenced(&self, id: i64) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .missions
            .iter()
            .any(|m| m.requester_id == id || m.driver_id == Some(id)))
    }

    async fn list_drivers(&self) -> AppResult<Vec<Employee>> {
        let mut drivers: Vec<Employee> = self
            .list_employees()
            .await?
            .into_iter()
            .filter(Employee::is_driver)
            .collect();
        drivers.sort_by(by_name);
        Ok(drivers)
    }

    async fn find_driver_by_name(&self, last_name: &str, first_name: &str) -> AppResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .iter()
            .filter(|e| e.last_name == last_name && e.first_name == first_name)
            .filter(|e| is_driver_department(&e.department))
            .min_by_key(|e| e.id)
            .cloned())
    }

    async fn available_drivers(&self, today: NaiveDate) -> AppResult<Vec<DriverSummary>> {
        let tables = self.tables.read().await;
        let mut drivers: Vec<Employee> = tables
            .employees
            .iter()
            .filter(|e| e.is_driver())
            .filter(|e| {
                !tables
                    .missions
                    .iter()
                    .any(|m| m.driver_id == Some(e.id) && m.blocks_availability_on(today))
            })
            .cloned()
            .collect();
        drivers.sort_by(by_name);
        Ok(drivers.into_iter().map(DriverSummary::from).collect())
    }

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        let mut vehicles = tables.vehicles.clone();
        vehicles.sort_by_key(|v| v.matricule);
        Ok(vehicles)
    }

    async fn find_vehicle(&self, matricule: i32) -> AppResult<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables.vehicles.iter().find(|v| v.matricule == matricule).cloned())
    }

    async fn find_vehicle_by_make_model(&self, make: &str, model: &str) -> AppResult<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables
            .vehicles
            .iter()
            .filter(|v| v.make == make && v.model == model)
            .min_by_key(|v| v.matricule)
            .cloned())
    }

    async fn create_vehicle(&self, vehicle: Vehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        if tables.vehicles.iter().any(|v| v.matricule == vehicle.matricule) {
            return Err(conflict_error("Vehicle", "matricule", &vehicle.matricule.to_string()));
        }
        tables.vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    async fn update_vehicle(&self, matricule: i32, make: String, model: String) -> AppResult<Option<Vehicle>> {
        let mut tables = self.tables.write().await;
        let Some(slot) = tables.vehicles.iter_mut().find(|v| v.matricule == matricule) else {
            return Ok(None);
        };
        slot.make = make;
        slot.model = model;
        Ok(Some(slot.clone()))
    }

    async fn delete_vehicle(&self, matricule: i32) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.missions.iter().any(|m| m.vehicle_matricule == Some(matricule)) {
            return Err(AppError::Conflict(format!(
                "Error deleting vehicle: vehicle {} is still referenced by a mission", matricule
            )));
        }
        let before = tables.vehicles.len();
        tables.vehicles.retain(|v| v.matricule != matricule);
        Ok(tables.vehicles.len() < before)
    }

    async fn vehicle_is_referenced(&self, matricule: i32) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.missions.iter().any(|m| m.vehicle_matricule == Some(matricule)))
    }

    async fn available_vehicles(&self, today: NaiveDate) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        let mut vehicles: Vec<Vehicle> = tables
            .vehicles
            .iter()
            .filter(|v| {
                !tables
                    .missions
                    .iter()
                    .any(|m| m.vehicle_matricule == Some(v.matricule) && m.blocks_availability_on(today))
            })
            .cloned()
            .collect();
        vehicles.sort_by_key(|v| v.matricule);
        Ok(vehicles)
    }

    async fn list_missions(&self) -> AppResult<Vec<Mission>> {
        let tables = self.tables.read().await;
        let mut missions = tables.missions.clone();
        // departure_date DESC NULLS LAST, id DESC
        missions.sort_by_key(|m| (m.departure_date.is_none(), Reverse(m.departure_date), Reverse(m.id)));
        Ok(missions)
    }

    async fn find_mission(&self, id: i64) -> AppResult<Option<Mission>> {
        let tables = self.tables.read().await;
        Ok(tables.missions.iter().find(|m| m.id == id).cloned())
    }

    async fn create_mission(&self, record: MissionRecord) -> AppResult<Mission> {
        let mut tables = self.tables.write().await;
        tables.check_mission_references(&record)?;
        let id = Tables::next_id(&mut tables.next_mission_id);
        let mission = record.into_mission(id);
        tables.missions.push(mission.clone());
        Ok(mission)
    }

    async fn update_mission(&self, id: i64, record: MissionRecord) -> AppResult<Option<Mission>> {
        let mut tables = self.tables.write().await;
        tables.check_mission_references(&record)?;
        let Some(slot) = tables.missions.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        *slot = record.into_mission(id);
        Ok(Some(slot.clone()))
    }

    async fn delete_mission(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.missions.len();
        tables.missions.retain(|m| m.id != id);
        tables.attachments.retain(|a| a.mission_id != id);
        Ok(tables.missions.len() < before)
    }

    async fn find_overlapping_missions(
        &self,
        vehicle_matricule: Option<i32>,
        driver_id: Option<i64>,
        departure: NaiveDate,
        return_date: NaiveDate,
        exclude_id: Option<i64>,
    ) -> AppResult<Vec<Mission>> {
        let tables = self.tables.read().await;
        Ok(tables
            .missions
            .iter()
            .filter(|m| Some(m.id) != exclude_id)
            .filter(|m| {
                (vehicle_matricule.is_some() && m.vehicle_matricule == vehicle_matricule)
                    || (driver_id.is_some() && m.driver_id == driver_id)
            })
            .filter(|m| m.overlaps(departure, return_date))
            .cloned()
            .collect())
    }

    async fn create_attachment(&self, attachment: NewAttachment) -> AppResult<Attachment> {
        let mut tables = self.tables.write().await;
        if !tables.missions.iter().any(|m| m.id == attachment.mission_id) {
            return Err(AppError::Conflict(format!(
                "Error creating attachment: mission {} does not exist", attachment.mission_id
            )));
        }
        let id = Tables::next_id(&mut tables.next_attachment_id);
        let created = Attachment {
            id,
            employee_id: attachment.employee_id,
            image_url: attachment.image_url,
            mission_id: attachment.mission_id,
        };
        tables.attachments.push(created.clone());
        Ok(created)
    }

    async fn attachments_for_mission(&self, mission_id: i64) -> AppResult<Vec<Attachment>> {
        let tables = self.tables.read().await;
        let mut attachments: Vec<Attachment> = tables
            .attachments
            .iter()
            .filter(|a| a.mission_id == mission_id)
            .cloned()
            .collect();
        attachments.sort_by(|a, b| (&a.image_url, a.id).cmp(&(&b.image_url, b.id)));
        Ok(attachments)
    }

    async fn delete_attachment(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.attachments.len();
        tables.attachments.retain(|a| a.id != id);
        Ok(tables.attachments.len() < before)
    }
}
