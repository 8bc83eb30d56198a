//! CSV output for allocation records.

use std::io::Write;
use std::path::Path;

use crate::allocator::AllocationRecord;
use crate::error::{PlannerError, Result};

const HEADER: &str = "accountName,vpcName,cloudProvider,regionName,availabilityZone,regionCidr,vpcCidr,azCidr,subnetCidr,subnetRole,usableIps";

/// Write `records` as CSV to `path`, one row per allocation, in the fixed
/// column order of the wire contract.
pub fn write_csv(path: &Path, records: &[AllocationRecord]) -> Result<()> {
    let mut file = std::fs::File::create(path).map_err(|e| PlannerError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let body = render_csv(records);
    file.write_all(body.as_bytes())
        .map_err(|e| PlannerError::Io {
            path: path.display().to_string(),
            source: e,
        })
}

/// Render `records` as CSV text (header + one row per record), without
/// touching the filesystem — used by `write_csv` and directly by tests.
pub fn render_csv(records: &[AllocationRecord]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    for record in records {
        out.push_str(&csv_row(record));
        out.push('\n');
    }
    out
}

fn csv_row(record: &AllocationRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}",
        escape_csv_field(&record.account_name),
        escape_csv_field(&record.vpc_name),
        escape_csv_field(&record.cloud_provider),
        escape_csv_field(&record.region_name),
        escape_csv_field(&record.availability_zone),
        escape_csv_field(&record.region_cidr),
        escape_csv_field(&record.vpc_cidr),
        escape_csv_field(&record.az_cidr),
        escape_csv_field(&record.subnet_cidr),
        escape_csv_field(&record.subnet_role),
        record.usable_ips,
    )
}

fn escape_csv_field(input: &str) -> String {
    if input.contains(',') || input.contains('"') {
        let escaped = input.replace('"', "\"\"");
        format!("\"{escaped}\"")
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AllocationRecord {
        AllocationRecord {
            account_name: "prod".to_string(),
            vpc_name: "prod-vpc".to_string(),
            cloud_provider: "aws".to_string(),
            region_name: "us-east-1".to_string(),
            availability_zone: "us-east-1a".to_string(),
            subnet_role: "Public".to_string(),
            region_cidr: "10.0.0.0/20".to_string(),
            vpc_cidr: "10.0.0.0/16".to_string(),
            az_cidr: "10.0.0.0/24".to_string(),
            subnet_cidr: "10.0.0.0/26".to_string(),
            usable_ips: 62,
        }
    }

    #[test]
    fn header_matches_fixed_column_order() {
        let csv = render_csv(&[]);
        assert_eq!(
            csv.lines().next().unwrap(),
            "accountName,vpcName,cloudProvider,regionName,availabilityZone,regionCidr,vpcCidr,azCidr,subnetCidr,subnetRole,usableIps"
        );
    }

    #[test]
    fn row_round_trips_by_naive_comma_split() {
        let csv = render_csv(&[sample_record()]);
        let row = csv.lines().nth(1).unwrap();
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields[0], "prod");
        assert_eq!(fields[1], "prod-vpc");
        assert_eq!(fields[2], "aws");
        assert_eq!(fields[8], "10.0.0.0/26");
        assert_eq!(fields[10], "62");
    }

    #[test]
    fn fields_with_commas_are_quoted() {
        let mut record = sample_record();
        record.subnet_role = "Public, External".to_string();
        let csv = render_csv(&[record]);
        assert!(csv.contains("\"Public, External\""));
    }
}
