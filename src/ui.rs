// UI layer: the operator-facing unload flow. Results go to stdout with
// `println!`; diagnostics go through `log` to stderr.

use crate::api::{ApiClient, UnloadError};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// How an unload run ended when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum UnloadOutcome {
    NothingLoaded,
    Unloaded { message: String },
}

/// Full run: optional banner, liveness check, unload. Returns the process
/// exit code, 0 for success and 1 for any failure.
pub fn run(api: &ApiClient, verbose: bool) -> i32 {
    if verbose {
        println!("\n=== Image Server Unload Utility ===");
        println!("Server URL: {}", api.base_url());
        println!("==================================\n");
    }

    if !api.is_running() {
        println!("Error: Server is not running");
        return 1;
    }

    let success = unload_directory(api, verbose);

    if verbose {
        println!("\n=== Operation completed ===");
    }

    if success { 0 } else { 1 }
}

/// Unload whatever directory the server has loaded and report the result.
/// Never fails outward: every error is printed and becomes `false`.
pub fn unload_directory(api: &ApiClient, verbose: bool) -> bool {
    match try_unload(api, verbose) {
        Ok(UnloadOutcome::NothingLoaded) => {
            println!("No directory is currently loaded on the server.");
            true
        }
        Ok(UnloadOutcome::Unloaded { message }) => {
            println!("Success: {}", message);
            if verbose {
                verify_unloaded(api);
            }
            true
        }
        Err(e) => {
            report_failure(&e);
            false
        }
    }
}

/// Decide and perform the unload. Only the steps before the POST print;
/// the outcome itself is reported by `unload_directory`.
pub fn try_unload(api: &ApiClient, verbose: bool) -> Result<UnloadOutcome, UnloadError> {
    let info = match api.server_info() {
        Ok(Some(info)) => info,
        Ok(None) => return Err(UnloadError::StatusUnavailable),
        Err(e) => {
            log::error!("status fetch failed: {:#}", e);
            return Err(UnloadError::StatusUnavailable);
        }
    };

    let Some(dir) = info.loaded_directory() else {
        return Ok(UnloadOutcome::NothingLoaded);
    };

    if verbose {
        println!("Currently loaded directory: {}", dir);
        println!("Images loaded: {}", info.image_count());
        println!("Sending unload request to {}", api.unload_url());
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Unloading...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    let result = api.unload();
    spinner.finish_and_clear();

    let resp = result?;
    Ok(UnloadOutcome::Unloaded {
        message: resp.message_or_default().to_string(),
    })
}

/// Re-read the server state after an unload. Only informs the operator;
/// the verdict was already decided by the POST.
fn verify_unloaded(api: &ApiClient) {
    let still_loaded = match api.server_info() {
        Ok(Some(info)) => info.loaded_directory().is_some(),
        Ok(None) => true,
        Err(e) => {
            log::warn!("verification fetch failed: {:#}", e);
            true
        }
    };
    if still_loaded {
        println!("Warning: Directory might still be loaded. Server state unclear.");
    } else {
        println!("Verified: No directory is currently loaded.");
    }
}

fn report_failure(err: &UnloadError) {
    match err {
        UnloadError::StatusUnavailable => println!("Error: {}", err),
        UnloadError::Rejected { body, .. } => {
            println!("Error: {}", err);
            println!("Response: {}", body);
        }
        UnloadError::Transport(e) => println!("Error during unload operation: {}", e),
    }
}
