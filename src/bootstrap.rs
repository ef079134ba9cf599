//! Startup tasks run through the administrator Operator.

use crate::config::CarrierSeed;
use crate::error::OperatorResult;
use crate::operator::Operator;
use std::collections::HashSet;
use tracing::info;

/// Create every configured carrier that does not exist yet (matched by
/// name). Returns how many were created.
pub async fn seed_carriers(operator: &Operator, seeds: &[CarrierSeed]) -> OperatorResult<usize> {
    let existing: HashSet<String> = operator
        .read_all_phone_carriers()
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();

    let mut created = 0;
    for seed in seeds.iter().filter(|s| !existing.contains(&s.name)) {
        let carrier = operator
            .create_phone_carrier(&seed.name, &seed.email_domain)
            .await?;
        info!(id = carrier.id, name = %carrier.name, "Seeded phone carrier");
        created += 1;
    }
    Ok(created)
}
