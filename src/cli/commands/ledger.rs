use crate::{
    cli::{
        errors::{CommandError, CommandResult},
        io as cli_io,
        output,
        registry::CommandEntry,
        shell_context::{CliMode, ShellContext},
    },
    core::{CarryForwardPolicy, PeriodSummary},
    currency::{self, format_date, parse_decimal},
    ledger::{Category, Transaction, TransactionDraft, TransactionKind, ViewWindow},
};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "balance",
            "Show the current balance and baseline",
            "balance",
            cmd_balance,
        ),
        CommandEntry::new(
            "add",
            "Record an income or expense",
            "add <income|expense> <amount> <category> <description...>",
            cmd_add,
        ),
        CommandEntry::new(
            "set-balance",
            "Replace the baseline balance",
            "set-balance <amount>",
            cmd_set_balance,
        ),
        CommandEntry::new(
            "carry-forward",
            "Make the current balance the new baseline",
            "carry-forward",
            cmd_carry_forward,
        ),
        CommandEntry::new(
            "view",
            "List transactions and totals for a period",
            "view [day|week|month]",
            cmd_view,
        ),
        CommandEntry::new(
            "categories",
            "List the available categories",
            "categories",
            cmd_categories,
        ),
    ]
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Balance");
    cli_io::print_info(format!(
        "Current balance: {}",
        context.money(context.store.current_balance())
    ));
    cli_io::print_info(format!("Baseline: {}", context.money(context.store.baseline())));
    cli_io::print_info(format!("Transactions: {}", context.store.transactions().len()));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.mode == CliMode::Interactive {
        prompt_draft(context)?
    } else {
        draft_from_args(args)?
    };
    let added = context.store.add_transaction(draft)?;
    cli_io::print_success(format!(
        "Added {} {} ({}, {})",
        added.kind,
        context.money(added.amount),
        added.description,
        added.category
    ));
    cli_io::print_info(format!(
        "Current balance: {}",
        context.money(context.store.current_balance())
    ));
    Ok(())
}

fn draft_from_args(args: &[&str]) -> Result<TransactionDraft, CommandError> {
    let [kind, amount, category, description @ ..] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: add <income|expense> <amount> <category> <description...>".into(),
        ));
    };
    Ok(TransactionDraft::new(
        kind.parse::<TransactionKind>()?,
        description.join(" "),
        *amount,
        category.parse::<Category>()?,
    ))
}

fn prompt_draft(context: &ShellContext) -> Result<TransactionDraft, CommandError> {
    let kind_index = cli_io::prompt_select(&context.theme, "Type", &TransactionKind::ALL)?;
    let amount = cli_io::prompt_text(&context.theme, "Amount")?;
    let category_index = cli_io::prompt_select(&context.theme, "Category", &Category::ALL)?;
    let description = cli_io::prompt_text(&context.theme, "Description")?;
    Ok(TransactionDraft::new(
        TransactionKind::ALL[kind_index],
        description,
        amount,
        Category::ALL[category_index],
    ))
}

fn cmd_set_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: set-balance <amount>".into(),
        ));
    };
    let value = parse_decimal(raw)?;
    context.store.set_balance(value)?;
    cli_io::print_success(format!("Baseline set to {}", context.money(value)));
    Ok(())
}

fn cmd_carry_forward(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let policy = context.store.policy();
    let prompt = format!(
        "Carry {} forward as the new baseline?",
        context.money(context.store.current_balance())
    );
    if !context.confirm(&prompt)? {
        cli_io::print_info("Carry forward cancelled.");
        return Ok(());
    }
    let outcome = context.store.carry_forward_balance()?;
    cli_io::print_success(format!(
        "Baseline moved from {} to {}",
        context.money(outcome.previous_baseline),
        context.money(outcome.new_baseline)
    ));
    match policy {
        CarryForwardPolicy::ClearHistory => {
            cli_io::print_info(format!("Cleared {} transaction(s).", outcome.cleared));
        }
        CarryForwardPolicy::RetainHistory if !context.store.transactions().is_empty() => {
            cli_io::print_warning(
                "Existing transactions were kept and now count again on top of the new baseline.",
            );
        }
        CarryForwardPolicy::RetainHistory => {}
    }
    Ok(())
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let window = match args {
        [] => context.config.default_window,
        [name] => name.parse::<ViewWindow>()?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: view [day|week|month]".into(),
            ))
        }
    };
    let summary = context.store.view(window, &context.now_local());
    print_summary(context, &summary);
    Ok(())
}

fn print_summary(context: &ShellContext, summary: &PeriodSummary) {
    output::section(window_title(summary.window));
    if summary.transactions.is_empty() {
        cli_io::print_info("No transactions in this period.");
    }
    for txn in &summary.transactions {
        cli_io::print_info(transaction_row(context, txn));
    }
    cli_io::print_info(format!("Income: {}", context.money(summary.totals.income)));
    cli_io::print_info(format!("Expenses: {}", context.money(summary.totals.expense)));
    cli_io::print_info(format!(
        "Current balance: {}",
        context.money(summary.current_balance)
    ));
}

fn window_title(window: ViewWindow) -> &'static str {
    match window {
        ViewWindow::Day => "Today",
        ViewWindow::Week => "This week",
        ViewWindow::Month => "This month",
    }
}

fn transaction_row(context: &ShellContext, txn: &Transaction) -> String {
    let local = txn.timestamp.with_timezone(&chrono::Local);
    format!(
        "  {:<10} {:<13} {:<24} {}",
        format_date(local.date_naive()),
        txn.category,
        txn.description,
        currency::format_signed(&context.config.currency_symbol, txn.kind, txn.amount)
    )
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Categories");
    for category in Category::ALL {
        cli_io::print_info(format!("  {}", category));
    }
    Ok(())
}
