//! rHourTracker main entrypoint.

use rhourtracker::run;
use rhourtracker::ui::messages::error;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
