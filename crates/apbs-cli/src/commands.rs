pub mod local;
pub mod remote;
pub mod status;

use apbs_opal::remote::client::JobOutcome;
use std::fmt::Write;

/// The user-facing summary of a finished or detached remote job.
pub fn describe_outcome(outcome: &JobOutcome) -> String {
    let mut out = String::new();
    match outcome {
        JobOutcome::Detached { job_id, base_url } => {
            let _ = writeln!(out, "When the job is complete, the results can be retrieved at:");
            let _ = writeln!(out, "\t{base_url}");
            let _ = writeln!(
                out,
                "If you want to use the APBS client to download the results for you, the job ID is:"
            );
            let _ = writeln!(out, "\t{job_id}");
        }
        JobOutcome::Fetched {
            directory, files, ..
        } => {
            let _ = writeln!(out, "Downloaded results:");
            let _ = writeln!(out, "\tOutput directory:  {}", directory.display());
            for file in files {
                let _ = writeln!(out, "\t{}", file.display());
            }
        }
        JobOutcome::Completed { outputs, .. } => {
            let _ = writeln!(out, "\tStandard Output:  {}", outputs.std_out_url);
            let _ = writeln!(out, "\tStandard Error:  {}", outputs.std_err_url);
            for file in &outputs.files {
                let _ = writeln!(out, "\t{}:  {}", file.name, file.url);
            }
        }
    }
    out
}
