// ============================================================================
// Rent Core - User Service
// File: crates/rent-core/src/services/user_service.rs
// ============================================================================
//! Party directory: landlords (admin), tenants and references

use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use rent_shared::utils::{dedup_ids, mask_email};

use crate::domain::{NewUser, PartyView, User, UserFilter, UserPatch};
use crate::error::DomainError;
use crate::repositories::Repositories;

pub struct UserService {
    repos: Repositories,
}

impl UserService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn create(&self, fields: NewUser) -> Result<PartyView, DomainError> {
        let user = User::new(fields)?;
        let created = self.repos.users.create(&user).await?;
        info!(
            "User created: {} ({}, {})",
            created.id,
            created.user_type.as_str(),
            mask_email(&created.email)
        );
        self.with_address(created).await
    }

    pub async fn get(&self, id: Uuid) -> Result<PartyView, DomainError> {
        let user = self.find_live(id).await?;
        self.with_address(user).await
    }

    pub async fn list(&self, filter: UserFilter) -> Result<Vec<PartyView>, DomainError> {
        let users = self.repos.users.list(&filter).await?;
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let address_ids = dedup_ids(&users.iter().map(|u| u.address_id).collect::<Vec<_>>());
        let addresses: HashMap<Uuid, _> = self
            .repos
            .addresses
            .find_by_ids(&address_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| PartyView {
                address: addresses.get(&user.address_id).cloned(),
                user,
            })
            .collect())
    }

    pub async fn update(&self, id: Uuid, patch: UserPatch) -> Result<PartyView, DomainError> {
        let mut user = self.find_live(id).await?;
        user.apply(patch)?;
        let updated = self.repos.users.update(&user).await?;
        info!("User updated: {}", id);
        self.with_address(updated).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repos.users.soft_delete(&id).await? {
            warn!("Delete failed: user not found: {}", id);
            return Err(DomainError::not_found("User", id));
        }
        info!("User deleted: {}", id);
        Ok(())
    }

    async fn find_live(&self, id: Uuid) -> Result<User, DomainError> {
        self.repos.users.find_by_id(&id).await?.ok_or_else(|| {
            warn!("User not found: {}", id);
            DomainError::not_found("User", id)
        })
    }

    async fn with_address(&self, user: User) -> Result<PartyView, DomainError> {
        let address = self
            .repos
            .addresses
            .find_by_ids(&[user.address_id])
            .await?
            .into_iter()
            .next();
        Ok(PartyView { user, address })
    }
}
