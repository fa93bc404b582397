use crate::error::CliError;
use model::report::RunReport;

/// Rejected rows shown in the table view before truncating.
const MAX_REJECTED_SHOWN: usize = 10;

fn report_json(report: &RunReport) -> Result<String, CliError> {
    serde_json::to_string_pretty(report).map_err(CliError::JsonSerialize)
}

pub async fn write_report(report: &RunReport, path: String) -> Result<(), CliError> {
    tokio::fs::write(path, report_json(report)?).await?;
    Ok(())
}

pub fn print_json(report: &RunReport) -> Result<(), CliError> {
    println!("{}", report_json(report)?);
    Ok(())
}

pub fn print_table(report: &RunReport) {
    println!("Import run {}:", report.run_id);
    println!("-----------------------------");
    println!("{:<16} {}", "Strategy", report.strategy);
    println!("{:<16} {}", "Stage", report.stage.as_str());
    println!("{:<16} {}", "Workers", report.worker_count);
    println!("{:<16} {}", "Rows read", report.rows_read);
    println!("{:<16} {}", "Rows inserted", report.rows_inserted);
    println!("{:<16} {}", "Rows rejected", report.rows_rejected);
    println!("{:<16} {}", "Rows failed", report.rows_failed);
    println!("{:<16} {}", "Batches", report.batches_executed);
    if let Some(fatal) = &report.fatal {
        println!("{:<16} {}", "Fatal", fatal);
    }

    if !report.batch_failures.is_empty() {
        println!("Failed batches:");
        for failure in &report.batch_failures {
            println!(
                "  worker {} batch {} rows {}..={}: {}",
                failure.worker_id,
                failure.seq,
                failure.first_ordinal,
                failure.last_ordinal,
                failure.message
            );
        }
    }

    if !report.rejected_rows.is_empty() {
        println!("Rejected rows:");
        for rejected in report.rejected_rows.iter().take(MAX_REJECTED_SHOWN) {
            println!("  row {}: {}", rejected.ordinal, rejected.reason);
        }
        if report.rejected_rows.len() > MAX_REJECTED_SHOWN {
            println!(
                "  ... and {} more",
                report.rejected_rows.len() - MAX_REJECTED_SHOWN
            );
        }
    }
}
