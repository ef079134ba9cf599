//! Stream operations. Access to a stream is governed by access to the
//! device that owns it.

use super::{Operator, Target, require_id, require_non_empty};
use crate::auth::Operation;
use crate::error::{OperatorError, OperatorResult};
use crate::model::{Device, Stream};

fn require_owned(stream: &Stream, device: &Device) -> OperatorResult<()> {
    if stream.is_owned_by(device) {
        Ok(())
    } else {
        Err(OperatorError::InvalidParameter("stream does not belong to device"))
    }
}

impl Operator {
    /// Create a stream under `owner`. Requires USER toward the device.
    pub async fn create_stream(
        &self,
        name: &str,
        stream_type: &str,
        owner: &Device,
    ) -> OperatorResult<Stream> {
        require_non_empty(name, "stream name")?;
        require_non_empty(stream_type, "stream type")?;
        require_id(owner.id, "device id")?;
        self.authorize(Operation::CreateStream, Target::Device(owner))?;

        Ok(self.storage.create_stream(name, stream_type, owner.id).await?)
    }

    /// All streams of `device`. Requires FAMILY toward the device.
    pub async fn read_streams_by_device(&self, device: &Device) -> OperatorResult<Vec<Stream>> {
        self.authorize(Operation::ReadStreamsByDevice, Target::Device(device))?;

        Ok(self.storage.read_streams_by_device(device.id).await?)
    }

    /// The stream of `device` called `name`. Requires FAMILY toward the device.
    pub async fn read_stream_by_name(&self, device: &Device, name: &str) -> OperatorResult<Stream> {
        require_non_empty(name, "stream name")?;
        self.authorize(Operation::ReadStreamByName, Target::Device(device))?;

        Ok(self
            .storage
            .read_stream_by_device_and_name(device.id, name)
            .await?)
    }

    /// Write name and type back. Requires USER toward the owning device.
    ///
    /// Storage only touches the stream if it still belongs to `device`.
    pub async fn update_stream(&self, device: &Device, stream: &Stream) -> OperatorResult<()> {
        require_id(stream.id, "stream id")?;
        require_non_empty(&stream.name, "stream name")?;
        require_non_empty(&stream.stream_type, "stream type")?;
        require_owned(stream, device)?;
        self.authorize(Operation::UpdateStream, Target::Stream(stream, device))?;

        Ok(self.storage.update_stream(device.id, stream).await?)
    }

    /// Delete a stream of `device`. Requires USER toward the device.
    pub async fn delete_stream(&self, device: &Device, stream: &Stream) -> OperatorResult<()> {
        require_id(stream.id, "stream id")?;
        require_owned(stream, device)?;
        self.authorize(Operation::DeleteStream, Target::Stream(stream, device))?;

        Ok(self.storage.delete_stream(device.id, stream.id).await?)
    }
}
