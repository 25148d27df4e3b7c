//! # Foliate CLI
//!
//! Usage:
//!   foliate request.json
//!   echo '{ ... }' | foliate
//!   foliate request.json -o custom-name.pdf
//!   foliate --example > request.json
//!
//! Without `-o`, the output filename is derived from the report title and
//! today's date.

use std::env;
use std::fs;
use std::io::{self, Read};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_request_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        match fs::read_to_string(&args[1]) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("✗ Failed to read {}: {}", args[1], e);
                std::process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("✗ Failed to read stdin: {}", e);
            std::process::exit(1);
        }
        buf
    };

    let output_override = args.windows(2).find(|w| w[0] == "-o").map(|w| w[1].clone());

    match foliate::generate_report_json(&input) {
        Ok(artifact) => {
            let path = output_override.unwrap_or_else(|| artifact.filename.clone());
            if let Err(e) = fs::write(&path, &artifact.bytes) {
                eprintln!("✗ Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
            log::info!("report written: {} ({} bytes)", path, artifact.bytes.len());
            eprintln!("✓ Written {} bytes to {}", artifact.bytes.len(), path);
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn example_request_json() -> &'static str {
    r##"{
  "form": {
    "title": "Q3 Vendor Change",
    "description": "Replace the current logistics vendor with Northwind Freight for all EU shipments.",
    "reason": "The current vendor cannot meet the revised delivery SLA.",
    "priority": "High",
    "importance": "Critical path",
    "milestone": "EU rollout",
    "tasksAffected": ["t-104", "t-117"],
    "deliverableImpact": "Shipping integration must be re-certified against the new carrier API.",
    "nonResponseImpact": "SLA penalties accrue from October onward.",
    "cost": "EUR 24k one-off migration cost",
    "quality": "No regression expected; carrier offers better tracking granularity.",
    "deadlineImpact": 5,
    "alternatives": "Renegotiate SLA with current vendor; split shipments across both carriers.",
    "finalComments": "Procurement has pre-approved the contract draft."
  },
  "tasks": [
    {
      "id": "t-104",
      "name": "Carrier API integration",
      "startDate": "2026-09-01",
      "endDate": "2026-09-19",
      "durationDays": 15
    },
    {
      "id": "t-117",
      "name": "Warehouse label re-print",
      "startDate": "2026-09-22",
      "endDate": "2026-09-26",
      "durationDays": 5
    },
    {
      "id": "t-120",
      "name": "Customs paperwork review",
      "startDate": "2026-10-01",
      "endDate": "2026-10-03",
      "durationDays": 3
    }
  ]
}"##
}
