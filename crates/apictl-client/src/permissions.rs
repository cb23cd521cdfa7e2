//! Permission bitmask read/modify/write against a resource's `permission` attribute.
//!
//! Add and remove are a GET followed by one PATCH. There is no compare-and-swap,
//! so two clients changing the same object concurrently can lose an update.

use apictl_models::{AuthPermission, Object, PermissionOp, Resource};
use tracing::{info, warn};

use crate::error::{ClientError, ClientResult};
use crate::transport::{ApiClient, require_id, require_name};

/// Attribute holding the bitmask on every resource.
pub(crate) const PERMISSION_ATTRIBUTE: &str = "permission";

impl ApiClient {
    /// Current permission bitmask of `type/id`.
    pub async fn get_permission(&self, kind: &str, id: &str) -> ClientResult<AuthPermission> {
        let resource = self.read(kind, id).await?;
        let value = resource.attribute(PERMISSION_ATTRIBUTE).ok_or_else(|| {
            ClientError::validation(format!(
                "{kind}/{id} has no '{PERMISSION_ATTRIBUTE}' attribute"
            ))
        })?;
        AuthPermission::from_attribute(value).map_err(|err| {
            warn!(%kind, %id, %value, "unexpected permission representation");
            err.into()
        })
    }

    /// Overwrite the permission bitmask with a single PATCH.
    pub async fn set_permission(
        &self,
        kind: &str,
        id: &str,
        permission: AuthPermission,
    ) -> ClientResult<AuthPermission> {
        require_name("resource type", kind)?;
        require_id(kind, id)?;
        let mut attributes = Object::new();
        attributes.insert(PERMISSION_ATTRIBUTE.to_string(), permission.to_attribute());
        self.update(&Resource::new(kind, id).with_attributes(attributes))
            .await?;
        info!(%kind, %id, permission = permission.bits(), "permission written");
        Ok(permission)
    }

    /// Read the current bitmask, combine it with `delta`, and write it back.
    ///
    /// Returns the value that was written.
    pub async fn apply_permission(
        &self,
        kind: &str,
        id: &str,
        delta: AuthPermission,
        op: PermissionOp,
    ) -> ClientResult<AuthPermission> {
        let current = self.get_permission(kind, id).await?;
        let next = AuthPermission::combine(current, delta, op);
        self.set_permission(kind, id, next).await
    }
}
