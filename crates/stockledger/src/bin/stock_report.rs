//! stock-report - Stock and balance reports.
//!
//! Primary binary for valuing inventory and aggregating account balances.

fn main() -> std::process::ExitCode {
    stockledger::cmd::report_cmd::main()
}
