//! Terminal output utilities.
//!
//! Provides formatting helpers for terminal output.

use colored::Colorize;

use crate::allocator::AllocationRecord;

/// Format a value as a quoted, right-aligned field.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Print a human-readable, colorized summary of `records` to stdout, grouped
/// by account and region. Used when the CLI is given no `--output` path.
pub fn print_summary(records: &[AllocationRecord]) {
    if records.is_empty() {
        println!("{}", "No allocations produced.".yellow());
        return;
    }

    println!(
        "{}",
        format!("Planned {} subnet allocations", records.len()).green()
    );

    let mut last_account: Option<&str> = None;
    let mut last_region: Option<&str> = None;
    let mut last_az: Option<&str> = None;

    for record in records {
        if Some(record.account_name.as_str()) != last_account {
            println!("{}", format!("account: {}", record.account_name).cyan());
            last_account = Some(&record.account_name);
            last_region = None;
            last_az = None;
        }
        if Some(record.region_name.as_str()) != last_region {
            println!(
                "  {} region: {} ({})",
                record.cloud_provider, record.region_name, record.region_cidr
            );
            last_region = Some(&record.region_name);
            last_az = None;
        }
        if Some(record.availability_zone.as_str()) != last_az {
            println!("    az: {} ({})", record.availability_zone, record.az_cidr);
            last_az = Some(&record.availability_zone);
        }
        println!(
            "      {subnet_role}  {subnet_cidr}  usable={usable_ips}",
            subnet_role = format_field(&record.subnet_role, 12),
            subnet_cidr = format_field(&record.subnet_cidr, 20),
            usable_ips = record.usable_ips,
        );
    }
}
