//! In-memory doubles for the database-backed stores

use async_trait::async_trait;
use campus_core::{AppError, AppRole, NewAdmissionApplication, NewContactMessage};
use campus_db::{RoleStore, SubmissionStore};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemorySubmissionStore {
    contacts: Mutex<Vec<NewContactMessage>>,
    admissions: Mutex<Vec<NewAdmissionApplication>>,
    unavailable: AtomicBool,
}

impl InMemorySubmissionStore {
    /// Make every insert fail as if the database were down
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn contacts(&self) -> Vec<NewContactMessage> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn admissions(&self) -> Vec<NewAdmissionApplication> {
        self.admissions.lock().unwrap().clone()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "connection to server at 10.0.4.12:5432 refused".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert_contact_message(&self, message: NewContactMessage) -> Result<Uuid, AppError> {
        self.check_available()?;
        self.contacts.lock().unwrap().push(message);
        Ok(Uuid::new_v4())
    }

    async fn insert_admission_application(
        &self,
        application: NewAdmissionApplication,
    ) -> Result<Uuid, AppError> {
        self.check_available()?;
        self.admissions.lock().unwrap().push(application);
        Ok(Uuid::new_v4())
    }
}

#[derive(Default)]
pub struct InMemoryRoleStore {
    grants: Mutex<HashSet<(Uuid, AppRole)>>,
}

impl InMemoryRoleStore {
    pub fn grant(&self, user_id: Uuid, role: AppRole) {
        self.grants.lock().unwrap().insert((user_id, role));
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, AppError> {
        Ok(self.grants.lock().unwrap().contains(&(user_id, role)))
    }
}
