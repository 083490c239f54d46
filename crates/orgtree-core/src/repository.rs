//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations live in the
//! database crate; the access-control layer is generic over these traits
//! and never touches storage directly.

use uuid::Uuid;

use crate::error::OrgtreeResult;
use crate::models::{
    business_unit::{BusinessUnit, BusinessUnitTreeNode, CreateBusinessUnit, UpdateBusinessUnit},
    organization::{CreateOrganization, Organization, UpdateOrganization},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = OrgtreeResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgtreeResult<Organization>> + Send;
    fn get_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = OrgtreeResult<Organization>> + Send;
    /// Returns the first organization by creation order. Used as the
    /// default organization when backfilling ownership columns.
    fn first(&self) -> impl Future<Output = OrgtreeResult<Organization>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateOrganization,
    ) -> impl Future<Output = OrgtreeResult<Organization>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgtreeResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgtreeResult<PaginatedResult<Organization>>> + Send;
    /// All enabled organizations, unpaginated.
    fn list_enabled(&self) -> impl Future<Output = OrgtreeResult<Vec<Organization>>> + Send;
    /// Sets the `organization` field of every record in `table` to the
    /// given organization. Returns the number of records updated.
    fn assign_organization(
        &self,
        table: &str,
        organization_id: Uuid,
    ) -> impl Future<Output = OrgtreeResult<u64>> + Send;
}

pub trait BusinessUnitRepository: Send + Sync {
    fn create(
        &self,
        input: CreateBusinessUnit,
    ) -> impl Future<Output = OrgtreeResult<BusinessUnit>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgtreeResult<BusinessUnit>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateBusinessUnit,
    ) -> impl Future<Output = OrgtreeResult<BusinessUnit>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgtreeResult<()>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = OrgtreeResult<PaginatedResult<BusinessUnit>>> + Send;
    /// All business-unit ids, optionally restricted to one organization.
    fn ids(
        &self,
        organization_id: Option<Uuid>,
    ) -> impl Future<Output = OrgtreeResult<Vec<Uuid>>> + Send;
    /// The assembled business-unit hierarchy, optionally restricted to one
    /// organization. Top-level units are the roots.
    fn tree(
        &self,
        organization_id: Option<Uuid>,
    ) -> impl Future<Output = OrgtreeResult<Vec<BusinessUnitTreeNode>>> + Send;
}

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = OrgtreeResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = OrgtreeResult<User>> + Send;
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = OrgtreeResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = OrgtreeResult<User>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = OrgtreeResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = OrgtreeResult<PaginatedResult<User>>> + Send;
    /// The business units the user belongs to, with their organization
    /// references. Fails with `NotFound` if the user does not exist.
    fn business_units(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = OrgtreeResult<Vec<BusinessUnit>>> + Send;
    fn add_to_business_unit(
        &self,
        user_id: Uuid,
        business_unit_id: Uuid,
    ) -> impl Future<Output = OrgtreeResult<()>> + Send;
    fn remove_from_business_unit(
        &self,
        user_id: Uuid,
        business_unit_id: Uuid,
    ) -> impl Future<Output = OrgtreeResult<()>> + Send;
}
