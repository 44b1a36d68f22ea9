use super::{io, output::section as output_section, registry::CommandEntry};

pub fn print_overview(entries: &[CommandEntry]) {
    output_section("Available commands");
    for entry in entries {
        io::print_info(format!("  {:<16} {}", entry.name, entry.description));
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  Description: {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
}
