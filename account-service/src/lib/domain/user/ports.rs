use async_trait::async_trait;

use crate::domain::user::errors::DirectoryError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Group;
use crate::domain::user::models::Identity;
use crate::domain::user::models::UserName;
use crate::domain::user::models::UserRecord;

/// Read-mostly access to the external user/group store.
///
/// This subsystem does not own the data behind this port; it only needs
/// identity lookups plus the narrow writes the authentication flows
/// require.
#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// Retrieve the full record for a user name, including the password hash.
    ///
    /// # Arguments
    /// * `user_name` - User name to search for
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `Database` - Lookup failed
    async fn find_by_user_name(&self, user_name: &str)
        -> Result<Option<UserRecord>, DirectoryError>;

    /// Retrieve an identity snapshot by id.
    ///
    /// # Arguments
    /// * `id` - Account id
    ///
    /// # Returns
    /// Optional identity (None if not found)
    ///
    /// # Errors
    /// * `Database` - Lookup failed
    async fn find_identity(&self, id: i64) -> Result<Option<Identity>, DirectoryError>;

    /// Resolve a group to its capability set.
    ///
    /// # Arguments
    /// * `group_id` - Group id referenced from an identity
    ///
    /// # Returns
    /// Optional group (None if not found)
    ///
    /// # Errors
    /// * `Database` - Lookup failed
    async fn find_group(&self, group_id: i64) -> Result<Option<Group>, DirectoryError>;

    /// Create a new account with the default group.
    ///
    /// # Arguments
    /// * `user_name` - Validated user name
    /// * `email` - Validated email address
    /// * `password_hash` - Already-hashed password
    ///
    /// # Returns
    /// Identity of the created account
    ///
    /// # Errors
    /// * `UserNameTaken` - User name is already registered
    /// * `EmailTaken` - Email is already registered
    /// * `Database` - Write failed
    async fn create_user(
        &self,
        user_name: &UserName,
        email: &EmailAddress,
        password_hash: String,
    ) -> Result<Identity, DirectoryError>;

    /// Flag an account's email address as verified.
    ///
    /// # Arguments
    /// * `user_id` - Account id
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Write failed
    async fn mark_email_verified(&self, user_id: i64) -> Result<(), DirectoryError>;

    /// Replace an account's password hash.
    ///
    /// # Arguments
    /// * `user_id` - Account id
    /// * `password_hash` - Already-hashed replacement password
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Write failed
    async fn set_password_hash(
        &self,
        user_id: i64,
        password_hash: String,
    ) -> Result<(), DirectoryError>;
}
