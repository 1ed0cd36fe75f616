use dotenvy::dotenv;
use log::{error, info};

use motoverse::modules::helpers::logging::setup_logging;
use motoverse::modules::models::general::establish_connection;
use motoverse::modules::reconciler;

/// offline batch entry point: collapse loosely named imported car models into
/// canonical model families.
fn main() {
    dotenv().ok();
    setup_logging().expect("failed to setup logging");

    let conn = &mut establish_connection();
    match reconciler::run(conn) {
        Ok(summary) => {
            info!(target:"bin/merge_model_families", "reconcile finished: {:?}", summary);
            println!(
                "merged {} families, moved {} generations, deleted {} models ({} groups skipped)",
                summary.families_merged,
                summary.generations_moved,
                summary.models_deleted,
                summary.groups_skipped
            );
        }
        Err(error) => {
            error!(target:"bin/merge_model_families", "reconcile failed: {}", error);
            eprintln!("reconcile failed: {}", error);
            std::process::exit(1);
        }
    }
}
