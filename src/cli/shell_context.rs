use std::sync::Arc;

use chrono::{DateTime, Local};
use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{utils, LedgerStore, SystemClock},
    currency,
    storage::JsonFileStore,
    utils as app_utils,
};

use super::{
    commands,
    errors::{CliError, CommandError},
    io as cli_io,
    registry::{CommandEntry, CommandRegistry},
};

/// Filter used by the shell when the config does not name one.
const CLI_LOG_FILTER: &str = "spendly=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub store: LedgerStore,
    pub config: Config,
}

impl ShellContext {
    /// Opens the configured ledger under the application directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = utils::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(&base)?;
        let config = config_manager.load()?;
        app_utils::init_tracing(Some(config.log_filter.as_deref().unwrap_or(CLI_LOG_FILTER)));

        let backend = JsonFileStore::new(config.resolve_data_dir(&base))?;
        let store = LedgerStore::load(
            Arc::new(backend),
            Arc::new(SystemClock),
            config.carry_forward,
        )?;
        for warning in &store.load_report().warnings {
            cli_io::print_warning(warning);
        }
        Ok(Self::with_store(mode, store, config))
    }

    pub fn with_store(mode: CliMode, store: LedgerStore, config: Config) -> Self {
        Self {
            mode,
            registry: commands::registry(),
            theme: ColorfulTheme::default(),
            store,
            config,
        }
    }

    pub fn prompt(&self) -> String {
        format!("spendly [{}]> ", self.money(self.store.current_balance()))
    }

    pub fn money(&self, value: Decimal) -> String {
        currency::format_amount(&self.config.currency_symbol, value)
    }

    pub fn now_local(&self) -> DateTime<Local> {
        self.store.clock().now_local()
    }

    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.entries().iter().map(|entry| entry.name)
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let handler = self.registry.get(command).map(|entry| entry.handler);
        if let Some(handler) = handler {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        let needle = input.to_lowercase();
        let best = self
            .command_names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        match self.confirm("Exit shell?") {
            Ok(answer) => Ok(answer),
            Err(CommandError::Io(err)) => Err(err.into()),
            Err(_) => Ok(true),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_info("Use `help <command>` for usage details.");
            }
            other => cli_io::print_error(other),
        }
    }

    /// Waits for pending ledger writes before the shell returns.
    pub fn shutdown(&self) {
        self.store.flush();
    }
}
