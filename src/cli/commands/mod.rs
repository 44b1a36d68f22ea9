mod ledger;
mod system;

use super::registry::CommandRegistry;

/// Ledger commands first, then `help` and `exit`.
pub(crate) fn registry() -> CommandRegistry {
    ledger::definitions()
        .into_iter()
        .chain(system::definitions())
        .collect()
}
