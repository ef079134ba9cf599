//! Device operations.

use super::{Operator, Target, require_id, require_non_empty};
use crate::auth::Operation;
use crate::error::OperatorResult;
use crate::model::{Device, DeviceFlags, User};

impl Operator {
    /// Create a device owned by `owner`. Requires USER toward the owner.
    pub async fn create_device(&self, name: &str, owner: &User) -> OperatorResult<Device> {
        require_non_empty(name, "device name")?;
        require_id(owner.id, "user id")?;
        self.authorize(Operation::CreateDevice, Target::User(owner))?;

        Ok(self.storage.create_device(name, owner.id).await?)
    }

    /// All devices of `user`. Requires FAMILY toward the user.
    pub async fn read_devices_for_user(&self, user: &User) -> OperatorResult<Vec<Device>> {
        self.authorize(Operation::ReadDevicesForUser, Target::User(user))?;

        Ok(self.storage.read_devices_for_user(user.id).await?)
    }

    /// The device of `user` called `name`. Requires FAMILY toward the user.
    pub async fn read_device_for_user_by_name(
        &self,
        user: &User,
        name: &str,
    ) -> OperatorResult<Device> {
        require_non_empty(name, "device name")?;
        self.authorize(Operation::ReadDeviceForUserByName, Target::User(user))?;

        Ok(self.storage.read_device_for_user_by_name(user.id, name).await?)
    }

    /// Look up any device by API key. ROOT only.
    pub async fn read_device_by_api_key(&self, api_key: &str) -> OperatorResult<Device> {
        require_non_empty(api_key, "api key")?;
        self.authorize(Operation::ReadDeviceByApiKey, Target::General)?;

        Ok(self.storage.read_device_by_api_key(api_key).await?)
    }

    /// Write the name and API key of `device` back. Requires DEVICE toward
    /// it, so a device may update itself but not its siblings.
    ///
    /// The capability flags are left untouched; see [`Self::set_device_flags`].
    pub async fn update_device(&self, device: &Device) -> OperatorResult<()> {
        require_id(device.id, "device id")?;
        require_non_empty(&device.name, "device name")?;
        require_non_empty(&device.api_key, "api key")?;
        self.authorize(Operation::UpdateDevice, Target::Device(device))?;

        Ok(self.storage.update_device(device.user_id, device).await?)
    }

    /// Change the capability flags of the device `id`. ROOT only.
    pub async fn set_device_flags(&self, id: i64, flags: DeviceFlags) -> OperatorResult<()> {
        require_id(id, "device id")?;
        self.authorize(Operation::SetDeviceFlags, Target::General)?;

        Ok(self.storage.set_device_flags(id, flags).await?)
    }

    /// Delete `device` and its streams. Requires USER toward it.
    pub async fn delete_device(&self, device: &Device) -> OperatorResult<()> {
        require_id(device.id, "device id")?;
        self.authorize(Operation::DeleteDevice, Target::Device(device))?;

        Ok(self.storage.delete_device(device.user_id, device.id).await?)
    }
}
