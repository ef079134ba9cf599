//! Phone carrier operations. Carriers are global: any enabled device may
//! read them, only ROOT may change them.

use super::{Operator, Target, require_id, require_non_empty};
use crate::auth::Operation;
use crate::error::OperatorResult;
use crate::model::PhoneCarrier;

impl Operator {
    pub async fn create_phone_carrier(
        &self,
        name: &str,
        email_domain: &str,
    ) -> OperatorResult<PhoneCarrier> {
        require_non_empty(name, "carrier name")?;
        require_non_empty(email_domain, "carrier email domain")?;
        self.authorize(Operation::CreatePhoneCarrier, Target::General)?;

        Ok(self.storage.create_phone_carrier(name, email_domain).await?)
    }

    pub async fn read_phone_carrier_by_id(&self, id: i64) -> OperatorResult<PhoneCarrier> {
        self.authorize(Operation::ReadPhoneCarrier, Target::General)?;

        Ok(self.storage.read_phone_carrier_by_id(id).await?)
    }

    pub async fn read_all_phone_carriers(&self) -> OperatorResult<Vec<PhoneCarrier>> {
        self.authorize(Operation::ReadAllPhoneCarriers, Target::General)?;

        Ok(self.storage.read_all_phone_carriers().await?)
    }

    pub async fn update_phone_carrier(&self, carrier: &PhoneCarrier) -> OperatorResult<()> {
        require_id(carrier.id, "carrier id")?;
        require_non_empty(&carrier.name, "carrier name")?;
        require_non_empty(&carrier.email_domain, "carrier email domain")?;
        self.authorize(Operation::UpdatePhoneCarrier, Target::General)?;

        Ok(self.storage.update_phone_carrier(carrier).await?)
    }

    pub async fn delete_phone_carrier(&self, id: i64) -> OperatorResult<()> {
        require_id(id, "carrier id")?;
        self.authorize(Operation::DeletePhoneCarrier, Target::General)?;

        Ok(self.storage.delete_phone_carrier(id).await?)
    }
}
