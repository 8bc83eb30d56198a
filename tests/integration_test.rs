//! End-to-end scenarios for the planner, exercised through the public API
//! (`config::parse_input_record_str` → `allocator::generate` → `output`).

use std::collections::HashSet;

use cidr_planner::allocator::{generate, AllocationRecord};
use cidr_planner::cidr::Cidr;
use cidr_planner::config::parse_input_record_str;
use cidr_planner::output::render_csv;

fn run(json: &str) -> Vec<AllocationRecord> {
    let input = parse_input_record_str(json, Some("json")).expect("valid config");
    generate(&input).expect("generate succeeds")
}

fn try_run(json: &str) -> cidr_planner::Result<Vec<AllocationRecord>> {
    let input = parse_input_record_str(json, Some("json")).expect("valid config");
    generate(&input)
}

const S1_CONFIG: &str = r#"
{
  "baseCidr": "10.0.0.0/8",
  "prefixLengths": { "account": 16, "region": 20, "az": 24 },
  "cloudProviders": ["aws"],
  "accounts": [
    {
      "name": "prod",
      "clouds": {
        "aws": { "regions": ["us-east-1", "us-west-2"] }
      }
    }
  ],
  "subnetTypes": { "Public": 26, "Private": 27 }
}
"#;

#[test]
fn s1_baseline() {
    let records = run(S1_CONFIG);
    // us-east-1 carries a catalog override of 6 AZs, us-west-2 uses the
    // generic default of 3: (6 + 3) AZ-units x 2 roles = 18 rows.
    assert_eq!(records.len(), 18);

    let east_azs: HashSet<&str> = records
        .iter()
        .filter(|r| r.region_name == "us-east-1")
        .map(|r| r.availability_zone.as_str())
        .collect();
    assert_eq!(
        east_azs,
        HashSet::from([
            "us-east-1a",
            "us-east-1b",
            "us-east-1c",
            "us-east-1d",
            "us-east-1e",
            "us-east-1f",
        ])
    );

    for record in &records {
        let subnet = Cidr::parse(&record.subnet_cidr).unwrap();
        match record.subnet_role.as_str() {
            "Public" => {
                assert_eq!(subnet.prefix(), 26);
                assert_eq!(record.usable_ips, 62);
            }
            "Private" => {
                assert_eq!(subnet.prefix(), 27);
                assert_eq!(record.usable_ips, 30);
            }
            other => panic!("unexpected role {other}"),
        }
    }
}

#[test]
fn s2_account_cidr_override() {
    let config = r#"
    {
      "baseCidr": "10.0.0.0/8",
      "prefixLengths": { "account": 16, "region": 20, "az": 24 },
      "cloudProviders": ["aws"],
      "accounts": [
        {
          "name": "prod",
          "clouds": {
            "aws": { "baseCidr": "172.16.0.0/12", "regions": ["us-east-1"] }
          }
        }
      ],
      "subnetTypes": { "Public": 26, "Private": 27 }
    }
    "#;
    let records = run(config);
    assert!(!records.is_empty());

    let vpc = Cidr::parse("172.16.0.0/12").unwrap();
    for record in &records {
        assert_eq!(record.vpc_cidr, "172.16.0.0/12");
        let subnet = Cidr::parse(&record.subnet_cidr).unwrap();
        assert!(vpc.contains(&subnet));
    }
}

#[test]
fn s3_insufficient_space() {
    let config = r#"
    {
      "baseCidr": "10.0.0.0/30",
      "prefixLengths": { "account": 16, "region": 20, "az": 24 },
      "cloudProviders": ["aws"],
      "accounts": [
        {
          "name": "prod",
          "clouds": {
            "aws": { "regions": ["us-east-1", "us-west-2"] }
          }
        }
      ],
      "subnetTypes": { "Public": 26, "Private": 27 }
    }
    "#;
    let err = try_run(config).unwrap_err();
    assert_eq!(err.code(), 3004, "insufficient space is error family 3004");
}

#[test]
fn s4_azure_az_naming() {
    let config = r#"
    {
      "baseCidr": "10.0.0.0/8",
      "prefixLengths": { "account": 16, "region": 20, "az": 24 },
      "accounts": [
        {
          "name": "prod",
          "clouds": {
            "azure": { "regions": ["eastus"] }
          }
        }
      ],
      "subnetTypes": { "Public": 26 }
    }
    "#;
    let records = run(config);
    let azs: HashSet<&str> = records.iter().map(|r| r.availability_zone.as_str()).collect();
    assert_eq!(azs, HashSet::from(["eastus-1", "eastus-2", "eastus-3"]));
    assert!(records.iter().all(|r| r.cloud_provider == "azure"));
}

#[test]
fn s5_gcp_az_naming() {
    let config = r#"
    {
      "baseCidr": "10.0.0.0/8",
      "prefixLengths": { "account": 16, "region": 20, "az": 24 },
      "accounts": [
        {
          "name": "prod",
          "clouds": {
            "gcp": { "regions": ["us-central1"] }
          }
        }
      ],
      "subnetTypes": { "Public": 26 }
    }
    "#;
    let records = run(config);
    let azs: HashSet<&str> = records.iter().map(|r| r.availability_zone.as_str()).collect();
    assert_eq!(
        azs,
        HashSet::from(["us-central1a", "us-central1b", "us-central1c"])
    );
    assert!(records.iter().all(|r| r.cloud_provider == "gcp"));
}

#[test]
fn s6_role_order_preserved_and_contiguous() {
    let config = r#"
    {
      "baseCidr": "10.0.0.0/8",
      "prefixLengths": { "account": 16, "region": 20, "az": 24 },
      "accounts": [
        {
          "name": "prod",
          "clouds": {
            "aws": { "regions": ["us-east-1"] }
          }
        }
      ],
      "subnetTypes": { "Public": 26, "Private": 26 }
    }
    "#;
    let records = run(config);
    let first_az = &records[0].availability_zone;
    let first_az_records: Vec<_> = records.iter().filter(|r| &r.availability_zone == first_az).collect();
    assert_eq!(first_az_records[0].subnet_role, "Public");
    assert_eq!(first_az_records[1].subnet_role, "Private");

    let public = Cidr::parse(&first_az_records[0].subnet_cidr).unwrap();
    let private = Cidr::parse(&first_az_records[1].subnet_cidr).unwrap();
    assert!(public.address() < private.address());
    assert!(!public.overlap(&private));
    assert_eq!(
        u32::from(public.broadcast()) + 1,
        u32::from(private.address()),
        "same-size roles are adjacent"
    );
}

#[test]
fn universal_properties_hold_for_a_multi_provider_plan() {
    let config = r#"
    {
      "baseCidr": "10.0.0.0/8",
      "prefixLengths": { "account": 14, "region": 18, "az": 22 },
      "accounts": [
        {
          "name": "prod",
          "clouds": {
            "aws": { "regions": ["us-east-1", "us-west-2"] },
            "azure": { "regions": ["eastus"] }
          }
        },
        {
          "name": "staging",
          "clouds": {
            "gcp": { "regions": ["us-central1"] }
          }
        }
      ],
      "subnetTypes": { "Public": 26, "Private": 27, "Data": 28 }
    }
    "#;
    let records = run(config);

    // 1. Uniqueness
    let subnets: HashSet<&str> = records.iter().map(|r| r.subnet_cidr.as_str()).collect();
    assert_eq!(subnets.len(), records.len());

    // 2. Non-overlap + 3. Containment
    let parsed: Vec<Cidr> = records.iter().map(|r| Cidr::parse(&r.subnet_cidr).unwrap()).collect();
    for i in 0..parsed.len() {
        for j in (i + 1)..parsed.len() {
            assert!(!parsed[i].overlap(&parsed[j]), "subnets must not overlap");
        }
    }
    for record in &records {
        let az = Cidr::parse(&record.az_cidr).unwrap();
        let region = Cidr::parse(&record.region_cidr).unwrap();
        let vpc = Cidr::parse(&record.vpc_cidr).unwrap();
        let subnet = Cidr::parse(&record.subnet_cidr).unwrap();
        assert!(az.contains(&subnet));
        assert!(region.contains(&az));
        assert!(vpc.contains(&region) || vpc == region);
    }

    // 4. Role prefix respected (az_prefix here is 22; no role is smaller)
    for record in &records {
        let subnet = Cidr::parse(&record.subnet_cidr).unwrap();
        let az = Cidr::parse(&record.az_cidr).unwrap();
        let expected = match record.subnet_role.as_str() {
            "Public" => 26u8,
            "Private" => 27,
            "Data" => 28,
            other => panic!("unexpected role {other}"),
        };
        assert_eq!(subnet.prefix(), expected.max(az.prefix()));
    }

    // 5. Cardinality: prod/aws is us-east-1 (override: 6 AZs) + us-west-2
    // (generic default: 3 AZs); prod/azure is eastus (3 AZs); staging/gcp is
    // us-central1 (3 AZs). Roles = 3 each.
    let expected_rows = (6 + 3 + 3) * 3 + 3 * 3;
    assert_eq!(records.len(), expected_rows);

    // 6. Round-trip parse
    for record in &records {
        let subnet = Cidr::parse(&record.subnet_cidr).unwrap();
        assert_eq!(subnet.to_string(), record.subnet_cidr);
    }

    // 7. Determinism
    let input = parse_input_record_str(config, Some("json")).unwrap();
    let second = generate(&input).unwrap();
    assert_eq!(records, second);
}

#[test]
fn empty_accounts_and_empty_subnet_types_are_accepted() {
    assert!(run(r#"{ "baseCidr": "10.0.0.0/8" }"#).is_empty());

    let config = r#"
    {
      "baseCidr": "10.0.0.0/8",
      "prefixLengths": { "account": 16, "region": 20, "az": 24 },
      "accounts": [
        { "name": "prod", "clouds": { "aws": { "regions": ["us-east-1"] } } }
      ],
      "subnetTypes": {}
    }
    "#;
    assert!(run(config).is_empty());
}

#[test]
fn single_region_single_role_row_count_matches_az_count() {
    // us-west-1 has a catalog AZ-count override of 2, so 1 region x 2 AZs x
    // 1 role must be exactly 2 rows - the cardinality formula (property 5)
    // at its smallest non-trivial size.
    let config = r#"
    {
      "baseCidr": "10.0.0.0/8",
      "prefixLengths": { "account": 16, "region": 20, "az": 24 },
      "accounts": [
        { "name": "prod", "clouds": { "aws": { "regions": ["us-west-1"] } } }
      ],
      "subnetTypes": { "Public": 26 }
    }
    "#;
    let records = run(config);
    assert_eq!(records.len(), 2);
}

#[test]
fn config_round_trips_through_json_and_yaml() {
    let json_input = parse_input_record_str(S1_CONFIG, Some("json")).unwrap();
    let yaml_text = r#"
baseCidr: "10.0.0.0/8"
prefixLengths:
  account: 16
  region: 20
  az: 24
cloudProviders: ["aws"]
accounts:
  - name: prod
    clouds:
      aws:
        regions: ["us-east-1", "us-west-2"]
subnetTypes:
  Public: 26
  Private: 27
"#;
    let yaml_input = parse_input_record_str(yaml_text, Some("yaml")).unwrap();
    assert_eq!(json_input, yaml_input);
}

#[test]
fn csv_output_round_trips_in_fixed_column_order() {
    let records = run(S1_CONFIG);
    let csv = render_csv(&records);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "accountName,vpcName,cloudProvider,regionName,availabilityZone,regionCidr,vpcCidr,azCidr,subnetCidr,subnetRole,usableIps"
    );
    let first_row: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(first_row.len(), 11);
    assert_eq!(first_row[0], "prod");
    assert_eq!(first_row[1], "prod-vpc");
}

#[test]
fn missing_config_path_is_a_configuration_error_not_a_panic() {
    use std::path::Path;
    let err = cidr_planner::config::load_input_record(Path::new("/no/such/file.json")).unwrap_err();
    assert_eq!(err.code(), 4001);
}
