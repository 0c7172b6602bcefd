//! EstoquePlus entry point.

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    estoque_cli::run().await
}
